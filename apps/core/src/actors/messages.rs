use serde::Serialize;
use tokio::sync::oneshot;

use crate::assistant::{Category, QuickTopic};
use crate::models::{CheckoutSession, ConversationEntry, DonorDetails, Money, ProgressState};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// The actor's mailbox is closed; it has shut down.
    #[error("Actor unavailable: {0}")]
    Unavailable(String),
    /// The actor dropped the responder without answering.
    #[error("Actor dropped the request: {0}")]
    Dropped(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// An assistant reply, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    /// `None` for quick-select answers, which skip classification.
    pub category: Option<Category>,
    pub entry: ConversationEntry,
}

/// Messages that can be sent to the assistant actor.
#[derive(Debug)]
pub enum AssistantMessage {
    /// Free-text question from the visitor.
    Ask {
        text: String,
        /// A channel to send the reply back. Dropping the receiver cancels the reply.
        responder: oneshot::Sender<Result<Reply, AppError>>,
    },
    /// A quick-select button press.
    Quick {
        topic: QuickTopic,
        responder: oneshot::Sender<Result<Reply, AppError>>,
    },
    /// Snapshot of today's transcript.
    History {
        responder: oneshot::Sender<Vec<ConversationEntry>>,
    },
    /// A command to stop the actor.
    Shutdown,
}

/// Confirmation handed back once a donation has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationReceipt {
    pub session: CheckoutSession,
    pub progress: ProgressState,
    pub goal_reached: bool,
}

/// Outcome reported by the payment boundary for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PaymentOutcome {
    Succeeded,
    Failed(String),
}

/// Messages that can be sent to the donation actor.
#[derive(Debug)]
#[allow(clippy::large_enum_variant)]
pub enum DonationMessage {
    /// A donation form submission.
    Donate {
        amount_text: String,
        donor: DonorDetails,
        responder: oneshot::Sender<Result<DonationReceipt, AppError>>,
    },
    /// Payment completion for an open checkout session. Safe to deliver twice.
    PaymentCompleted {
        session_id: String,
        outcome: PaymentOutcome,
        /// `true` when the completion was applied, `false` for unknown or repeated sessions.
        responder: Option<oneshot::Sender<bool>>,
    },
    GetState {
        responder: oneshot::Sender<ProgressState>,
    },
    /// Administrative override of the running total.
    SetTotal {
        total: Money,
        responder: oneshot::Sender<ProgressState>,
    },
    /// Administrative reset to zero.
    Reset {
        responder: oneshot::Sender<ProgressState>,
    },
    /// A command to stop the actor.
    Shutdown,
}
