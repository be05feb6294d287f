use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::ProgressState;

/// Visual tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A toast message shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }
}

/// Events published by the donation actor for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CampaignEvent {
    Notification(Notification),
    ProgressChanged(ProgressState),
    /// First crossing of the goal since load or the last reset.
    GoalReached(ProgressState),
}

/// Stack of visible notifications with automatic expiry.
///
/// Several notifications may be visible at once; a new one never replaces an
/// older one.
pub struct NotificationCenter {
    /// Visible notifications, oldest first, with the instant they were shown.
    active: Vec<(Notification, Instant)>,
    /// How long a notification stays up unless dismissed.
    ttl: Duration,
}

impl NotificationCenter {
    /// Creates a new `NotificationCenter`.
    ///
    /// # Arguments
    ///
    /// * `ttl` - How long each notification stays visible.
    pub fn new(ttl: Duration) -> Self {
        NotificationCenter {
            active: Vec::new(),
            ttl,
        }
    }

    /// Shows a notification and returns its id.
    pub fn push(&mut self, notification: Notification) -> Uuid {
        let id = notification.id;
        self.active.push((notification, Instant::now()));
        id
    }

    /// Closes a notification early. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.active.len();
        self.active.retain(|(n, _)| n.id != id);
        self.active.len() != before
    }

    /// Currently visible notifications, oldest first.
    pub fn visible(&mut self) -> Vec<&Notification> {
        // Drop notifications older than the ttl
        if let Some(cutoff) = Instant::now().checked_sub(self.ttl) {
            self.active.retain(|&(_, shown_at)| shown_at > cutoff);
        }

        self.active.iter().map(|(n, _)| n).collect()
    }
}
