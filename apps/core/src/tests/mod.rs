//! Test Module
//!
//! Cross-component test suite for the campaign core.
//!
//! ## Test Categories
//! - `assistant_tests`: classification properties and the rule table
//! - `progress_tests`: running total, clamping, celebration, persistence
//! - `transcript_tests`: day-scoped transcript persistence
//! - `store_tests`: SQLite and memory key-value stores
//! - `actor_tests`: assistant and donation actor behavior
//! - `integration_tests`: full workflows over a durable store

pub mod progress_tests;
pub mod transcript_tests;
