//! # Actors Module
//!
//! Long-lived tasks that own mutable campaign state and serve requests one
//! at a time over `mpsc` mailboxes.
//!
//! ## Components
//! - `assistant`: chat actor, owns the response engine and the transcript
//! - `donations`: donation actor, owns the progress tracker and open checkouts
//! - `gateway`: simulated payment boundary
//! - `messages`: mailbox messages and replies
//! - `traits`: the payment boundary contract

pub mod assistant;
pub mod donations;
pub mod gateway;
pub mod messages;
pub mod traits;

pub use assistant::AssistantHandle;
pub use donations::DonationHandle;
pub use gateway::SimulatedGateway;
pub use messages::{DonationReceipt, PaymentOutcome, Reply};
pub use traits::PaymentGateway;
