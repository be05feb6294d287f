use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time left until polls close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Countdown {
    Remaining { days: i64, hours: i64, minutes: i64 },
    ElectionDay,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
            } => write!(f, "{}d {}h {}m until Election Day", days, hours, minutes),
            Countdown::ElectionDay => write!(f, "Election Day is Here!"),
        }
    }
}

/// Countdown to a fixed local election time.
#[derive(Debug, Clone, Copy)]
pub struct ElectionCountdown {
    election_at: NaiveDateTime,
}

impl ElectionCountdown {
    pub fn new(election_at: NaiveDateTime) -> Self {
        Self { election_at }
    }

    /// Whole days, hours and minutes left at local time `now`.
    pub fn at(&self, now: NaiveDateTime) -> Countdown {
        let left = self.election_at - now;
        if left.num_seconds() <= 0 {
            return Countdown::ElectionDay;
        }

        let total_minutes = left.num_minutes();
        Countdown::Remaining {
            days: total_minutes / (24 * 60),
            hours: (total_minutes % (24 * 60)) / 60,
            minutes: total_minutes % 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_remaining_time() {
        let countdown = ElectionCountdown::new(at(2024, 11, 5, 20, 0));
        let left = countdown.at(at(2024, 11, 3, 17, 30));
        assert_eq!(
            left,
            Countdown::Remaining {
                days: 2,
                hours: 2,
                minutes: 30
            }
        );
        assert_eq!(left.to_string(), "2d 2h 30m until Election Day");
    }

    #[test]
    fn test_election_day() {
        let countdown = ElectionCountdown::new(at(2024, 11, 5, 20, 0));
        assert_eq!(countdown.at(at(2024, 11, 5, 20, 0)), Countdown::ElectionDay);
        assert_eq!(
            countdown.at(at(2025, 1, 1, 0, 0)).to_string(),
            "Election Day is Here!"
        );
    }
}
