//! Campaign fundraising progress.
//!
//! Keeps the running total against a fixed goal, persists it as one scalar and
//! reports when the goal is first reached.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::models::{Money, ProgressState};
use crate::store::{KeyValueStore, RAISED_AMOUNT_KEY};

/// Result of a mutation: the new state, plus whether the celebration fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub state: ProgressState,
    /// `true` exactly once per crossing of the goal.
    pub goal_reached: bool,
}

/// Owned fundraising state.
pub struct ProgressTracker {
    goal: Money,
    raised: Money,
    store: Arc<dyn KeyValueStore>,
    degraded: bool,
    celebrated: bool,
}

impl ProgressTracker {
    /// Loads the persisted total, or starts from `starting_raised` when none is stored.
    ///
    /// A total that is already at the goal on load counts as celebrated.
    #[instrument(skip(store))]
    pub async fn load(
        goal: Money,
        starting_raised: Money,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, AppError> {
        if goal.is_zero() {
            return Err(AppError::Config("campaign goal must be positive".to_string()));
        }

        let mut tracker = Self {
            goal,
            raised: starting_raised,
            store,
            degraded: false,
            celebrated: false,
        };

        match tracker.store.get(RAISED_AMOUNT_KEY).await {
            Ok(Some(saved)) => {
                tracker.raised = saved.parse().unwrap_or_else(|_| {
                    warn!("Persisted total '{}' is unreadable, using 0", saved);
                    Money::ZERO
                });
            }
            Ok(None) => {}
            Err(e) => tracker.degrade(&e),
        }

        tracker.celebrated = tracker.raised >= tracker.goal;
        info!(raised = %tracker.raised, goal = %tracker.goal, "progress loaded");
        Ok(tracker)
    }

    /// Adds a confirmed contribution.
    #[instrument(skip_all, fields(amount = %amount))]
    pub async fn record_contribution(
        &mut self,
        amount: Money,
    ) -> Result<ProgressUpdate, AppError> {
        if amount.is_zero() {
            return Err(AppError::InvalidAmount(amount.to_string()));
        }

        self.raised = self.raised.saturating_add(amount);
        self.persist().await;
        Ok(self.update())
    }

    /// Replaces the running total. Administrative use only.
    #[instrument(skip_all, fields(total = %total))]
    pub async fn set_total(&mut self, total: Money) -> ProgressUpdate {
        self.raised = total;
        if self.raised < self.goal {
            self.celebrated = false;
        }
        self.persist().await;
        self.update()
    }

    /// Sets the total back to zero and re-arms the celebration. Administrative
    /// use only.
    #[instrument(skip(self))]
    pub async fn reset(&mut self) -> ProgressState {
        self.raised = Money::ZERO;
        self.celebrated = false;
        self.persist().await;
        self.state()
    }

    pub fn state(&self) -> ProgressState {
        let percentage =
            (self.raised.as_dollars() / self.goal.as_dollars() * 100.0).clamp(0.0, 100.0);
        ProgressState {
            raised: self.raised,
            remaining: self.goal.saturating_sub(self.raised),
            goal: self.goal,
            percentage,
        }
    }

    pub fn goal(&self) -> Money {
        self.goal
    }

    /// Whether the tracker fell back to memory-only operation.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn update(&mut self) -> ProgressUpdate {
        let state = self.state();
        let goal_reached = self.raised >= self.goal && !self.celebrated;
        if goal_reached {
            info!(raised = %state.raised, "campaign goal reached");
            self.celebrated = true;
        }
        ProgressUpdate {
            state,
            goal_reached,
        }
    }

    async fn persist(&mut self) {
        if self.degraded {
            return;
        }
        if let Err(e) = self
            .store
            .set(RAISED_AMOUNT_KEY, &self.raised.to_storage_string())
            .await
        {
            self.degrade(&e);
        }
    }

    fn degrade(&mut self, err: &AppError) {
        warn!("Progress persistence unavailable, tracking in memory for this session: {}", err);
        self.degraded = true;
    }
}
