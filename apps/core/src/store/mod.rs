//! # Store Module
//!
//! Key-value persistence boundary for the campaign core.
//!
//! ## Components
//! - `memory`: process-local map, can simulate an unavailable store
//! - `sqlite`: durable SQLite table via `sqlx`

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::AppError;
use async_trait::async_trait;

/// Key holding the running donation total (decimal dollars).
pub const RAISED_AMOUNT_KEY: &str = "campaign_raised_amount";
/// Key holding the JSON transcript snapshot.
pub const CHAT_HISTORY_KEY: &str = "district1_chat_history";
/// Key holding the calendar day the transcript belongs to (`YYYY-MM-DD`).
pub const CHAT_DATE_KEY: &str = "district1_chat_date";

/// A string key-value store provided by the hosting environment.
///
/// Every failure is reported as [`AppError::PersistenceUnavailable`]; owners are
/// expected to fall back to in-memory operation rather than fail.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn remove(&self, key: &str) -> Result<(), AppError>;
}
