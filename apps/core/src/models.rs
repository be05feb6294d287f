use crate::error::AppError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// An exact amount of money in US cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    pub const fn from_dollars(dollars: u64) -> Self {
        Money(dollars * 100)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Converts a dollar figure, rounding to the nearest cent.
    ///
    /// Rejects negative, NaN and infinite values.
    pub fn try_from_dollars_f64(dollars: f64) -> Result<Self, AppError> {
        if !dollars.is_finite() || dollars < 0.0 {
            return Err(AppError::InvalidAmount(dollars.to_string()));
        }
        let cents = (dollars * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(AppError::InvalidAmount(dollars.to_string()));
        }
        Ok(Money(cents as u64))
    }

    /// Parses a visitor-entered contribution. Zero counts as invalid.
    pub fn parse_contribution(text: &str) -> Result<Self, AppError> {
        let amount: Money = text.parse()?;
        if amount.is_zero() {
            return Err(AppError::InvalidAmount(text.trim().to_string()));
        }
        Ok(amount)
    }

    /// Decimal dollar string used for the persisted scalar, e.g. `1250.50`.
    pub fn to_storage_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = AppError;

    /// Accepts `25`, `25.5`, `$1,000.00`. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let cleaned: String = trimmed
            .strip_prefix('$')
            .unwrap_or(trimmed)
            .chars()
            .filter(|c| *c != ',')
            .collect();

        if cleaned.is_empty() {
            return Err(AppError::InvalidAmount(s.to_string()));
        }

        let dollars: f64 = cleaned
            .parse()
            .map_err(|_| AppError::InvalidAmount(s.to_string()))?;
        Money::try_from_dollars_f64(dollars).map_err(|_| AppError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = (self.0 / 100).to_string();
        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, ch) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        match self.0 % 100 {
            0 => write!(f, "${}", grouped),
            cents => write!(f, "${}.{:02}", grouped, cents),
        }
    }
}

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single message in the assistant transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ConversationEntry {
    pub fn user(text: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp,
        }
    }

    pub fn assistant(text: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            timestamp,
        }
    }
}

/// Donor fields collected by the donation form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DonorDetails {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "a valid e-mail address is required"))]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(length(min = 5, max = 10, message = "zip code looks wrong"))]
    pub zip: Option<String>,
}

/// A checkout session issued by the payment boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub amount: Money,
    pub currency: String,
    pub campaign_id: String,
}

/// Snapshot of campaign progress, ready for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    pub raised: Money,
    pub remaining: Money,
    pub goal: Money,
    /// Clamped to `[0, 100]`.
    pub percentage: f64,
}
