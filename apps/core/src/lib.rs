//! Core of the District 1 campaign site: the canned-response chat assistant,
//! fundraising progress, the mocked payment boundary and the small site
//! utilities around them.

pub mod actors;
pub mod assistant;
pub mod clock;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod models;
pub mod notifications;
pub mod progress;
pub mod site;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use error::AppError;
