//! Day-scoped chat transcript.
//!
//! The whole transcript is written through to the store on every append, next
//! to the calendar day it belongs to. A transcript from another day is cleared
//! instead of loaded.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::AppError;
use crate::models::ConversationEntry;
use crate::store::{KeyValueStore, CHAT_DATE_KEY, CHAT_HISTORY_KEY};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Owner of the persisted transcript.
pub struct TranscriptStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    day: NaiveDate,
    entries: Vec<ConversationEntry>,
    degraded: bool,
}

impl TranscriptStore {
    /// Opens the transcript for the current day.
    pub async fn open(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let day = clock.today();
        let mut transcript = Self {
            store,
            clock,
            day,
            entries: Vec::new(),
            degraded: false,
        };
        transcript.reload().await;
        transcript
    }

    /// Re-reads the persisted transcript.
    ///
    /// If the stored day differs from today the stored transcript is removed
    /// and today's date is recorded.
    pub async fn reload(&mut self) -> &[ConversationEntry] {
        let today = self.clock.today();
        self.day = today;
        self.entries.clear();

        if self.degraded {
            return &self.entries;
        }

        match self.read_for(today).await {
            Ok(entries) => self.entries = entries,
            Err(e) => self.degrade(&e),
        }
        &self.entries
    }

    async fn read_for(&self, today: NaiveDate) -> Result<Vec<ConversationEntry>, AppError> {
        let stored_day = self.store.get(CHAT_DATE_KEY).await?;
        let today_str = today.format(DAY_FORMAT).to_string();

        if stored_day.as_deref() != Some(today_str.as_str()) {
            if stored_day.is_some() {
                info!(stored_day = ?stored_day, today = %today_str, "discarding stale transcript");
            }
            self.store.remove(CHAT_HISTORY_KEY).await?;
            self.store.set(CHAT_DATE_KEY, &today_str).await?;
            return Ok(Vec::new());
        }

        let Some(raw) = self.store.get(CHAT_HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<ConversationEntry>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Stored transcript is unreadable, starting fresh: {}", e);
                self.store.remove(CHAT_HISTORY_KEY).await?;
                Ok(Vec::new())
            }
        }
    }

    /// Appends an entry and persists the full transcript.
    ///
    /// Crossing midnight starts a new day's transcript first. Persistence
    /// failures switch the store to memory-only mode; the entry is kept.
    pub async fn append(&mut self, entry: ConversationEntry) {
        let today = self.clock.today();
        if today != self.day {
            info!(previous = %self.day, today = %today, "new day, starting a fresh transcript");
            self.day = today;
            self.entries.clear();
        }

        self.entries.push(entry);

        if self.degraded {
            return;
        }
        if let Err(e) = self.persist().await {
            self.degrade(&e);
        }
    }

    async fn persist(&self) -> Result<(), AppError> {
        let snapshot = serde_json::to_string(&self.entries)?;
        self.store
            .set(CHAT_DATE_KEY, &self.day.format(DAY_FORMAT).to_string())
            .await?;
        self.store.set(CHAT_HISTORY_KEY, &snapshot).await
    }

    fn degrade(&mut self, err: &AppError) {
        warn!(
            "Transcript persistence unavailable, keeping chat in memory for this session: {}",
            err
        );
        self.degraded = true;
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
