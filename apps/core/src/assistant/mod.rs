//! # Assistant Module
//!
//! Canned-response chat assistant for District 1 residents.
//! Answers come from a fixed rule table, never from a model.
//!
//! ## Components
//! - `topics`: categories, rule table, quick-select answers
//! - `engine`: first-match keyword classifier
//! - `transcript`: day-scoped, write-through transcript persistence

pub mod engine;
pub mod topics;
pub mod transcript;

pub use engine::{Classification, ResponseEngine};
pub use topics::{default_rules, Category, QuickTopic, TopicRule, FALLBACK_RESPONSE};
pub use transcript::TranscriptStore;
