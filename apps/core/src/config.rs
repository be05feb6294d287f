//! Runtime configuration.
//!
//! Every knob comes from an environment variable with a default matching the
//! live site. The console loads a `.env` file before calling
//! [`CampaignConfig::from_env`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

use crate::error::AppError;
use crate::models::Money;

const ELECTION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// How long past the expected completion a payment may take before it is
/// settled as failed.
const PAYMENT_GRACE: Duration = Duration::from_secs(10);

/// Timing of simulated latency in the UI flows, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    pub reply_min_ms: u64,
    pub reply_max_ms: u64,
    pub quick_reply_ms: u64,
    pub payment_completion_ms: u64,
    pub form_submit_ms: u64,
    pub notification_ttl_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            reply_min_ms: 1000,
            reply_max_ms: 2000,
            quick_reply_ms: 500,
            payment_completion_ms: 2000,
            form_submit_ms: 1500,
            notification_ttl_ms: 6000,
        }
    }
}

impl Pacing {
    /// No artificial delays at all.
    pub fn immediate() -> Self {
        Self {
            reply_min_ms: 0,
            reply_max_ms: 0,
            quick_reply_ms: 0,
            payment_completion_ms: 0,
            form_submit_ms: 0,
            notification_ttl_ms: 6000,
        }
    }

    pub fn payment_completion(&self) -> Duration {
        Duration::from_millis(self.payment_completion_ms)
    }

    /// Upper bound on how long a settlement may take. Past it the payment is
    /// settled as failed.
    pub fn payment_timeout(&self) -> Duration {
        self.payment_completion().saturating_add(PAYMENT_GRACE)
    }

    /// Longest delay the assistant waits before revealing one reply.
    pub fn slowest_reply(&self) -> Duration {
        Duration::from_millis(self.reply_max_ms.max(self.quick_reply_ms))
    }

    pub fn form_submit(&self) -> Duration {
        Duration::from_millis(self.form_submit_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

/// Campaign-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CampaignConfig {
    /// Fundraising goal in dollars. Must be positive.
    #[validate(range(min = 0.01, message = "goal must be positive"))]
    pub goal_dollars: f64,
    /// Total raised before any contribution is recorded on this device.
    #[validate(range(min = 0.0, message = "starting amount cannot be negative"))]
    pub starting_raised_dollars: f64,
    /// Smallest accepted donation.
    #[validate(range(min = 0.01, message = "minimum donation must be positive"))]
    pub min_donation_dollars: f64,
    #[validate(length(min = 1))]
    pub campaign_id: String,
    #[validate(url)]
    pub site_url: String,
    /// Local date and time polls close.
    pub election_at: NaiveDateTime,
    pub pacing: Pacing,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            goal_dollars: 50_000.0,
            starting_raised_dollars: 0.0,
            min_donation_dollars: 1.0,
            campaign_id: "imam-yussuf-abdi-district-1".to_string(),
            site_url: "https://voteyussuf.com".to_string(),
            election_at: NaiveDateTime::parse_from_str("2024-11-05T20:00:00", ELECTION_FORMAT)
                .unwrap_or_default(),
            pacing: Pacing::default(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} = '{}': {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}

impl CampaignConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let pacing = Pacing {
            reply_min_ms: env_parse("CHAT_REPLY_MIN_MS", defaults.pacing.reply_min_ms)?,
            reply_max_ms: env_parse("CHAT_REPLY_MAX_MS", defaults.pacing.reply_max_ms)?,
            quick_reply_ms: env_parse("CHAT_QUICK_REPLY_MS", defaults.pacing.quick_reply_ms)?,
            payment_completion_ms: env_parse(
                "PAYMENT_COMPLETION_MS",
                defaults.pacing.payment_completion_ms,
            )?,
            form_submit_ms: env_parse("FORM_SUBMIT_MS", defaults.pacing.form_submit_ms)?,
            notification_ttl_ms: env_parse(
                "NOTIFICATION_TTL_MS",
                defaults.pacing.notification_ttl_ms,
            )?,
        };

        let election_at = match env::var("ELECTION_AT") {
            Ok(raw) => NaiveDateTime::parse_from_str(raw.trim(), ELECTION_FORMAT)?,
            Err(_) => defaults.election_at,
        };

        let config = Self {
            goal_dollars: env_parse("CAMPAIGN_GOAL", defaults.goal_dollars)?,
            starting_raised_dollars: env_parse(
                "CAMPAIGN_STARTING_RAISED",
                defaults.starting_raised_dollars,
            )?,
            min_donation_dollars: env_parse(
                "CAMPAIGN_MIN_DONATION",
                defaults.min_donation_dollars,
            )?,
            campaign_id: env::var("CAMPAIGN_ID").unwrap_or(defaults.campaign_id),
            site_url: env::var("CAMPAIGN_SITE_URL").unwrap_or(defaults.site_url),
            election_at,
            pacing,
        };

        config.check()?;
        Ok(config)
    }

    /// Validates field ranges and cross-field constraints.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::Config(format!("invalid campaign settings: {}", e)))?;
        if self.pacing.reply_min_ms > self.pacing.reply_max_ms {
            return Err(AppError::Config(format!(
                "CHAT_REPLY_MIN_MS ({}) exceeds CHAT_REPLY_MAX_MS ({})",
                self.pacing.reply_min_ms, self.pacing.reply_max_ms
            )));
        }
        Ok(())
    }

    pub fn goal(&self) -> Result<Money, AppError> {
        let goal = Money::try_from_dollars_f64(self.goal_dollars)
            .map_err(|_| AppError::Config(format!("bad goal {}", self.goal_dollars)))?;
        if goal.is_zero() {
            return Err(AppError::Config("campaign goal must be positive".to_string()));
        }
        Ok(goal)
    }

    pub fn starting_raised(&self) -> Result<Money, AppError> {
        Money::try_from_dollars_f64(self.starting_raised_dollars).map_err(|_| {
            AppError::Config(format!("bad starting amount {}", self.starting_raised_dollars))
        })
    }

    pub fn min_donation(&self) -> Result<Money, AppError> {
        Money::try_from_dollars_f64(self.min_donation_dollars).map_err(|_| {
            AppError::Config(format!("bad minimum donation {}", self.min_donation_dollars))
        })
    }
}
