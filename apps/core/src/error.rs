use thiserror::Error;

/// Crate-wide error type, consolidating every failure the core can surface.
///
/// All variants are local and recoverable: callers show a message, fall back,
/// or retry on the next user action.
#[derive(Debug, Error)]
pub enum AppError {
    /// An empty or whitespace-only chat message. Nothing is recorded.
    #[error("Message is empty")]
    InvalidInput,

    /// A non-positive or non-numeric contribution. State is left unchanged.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The key-value store could not be read or written.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Represents data validation errors (e.g., a malformed e-mail address).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., unparsable environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The payment boundary reported a failed or rejected checkout.
    #[error("Payment failed: {0}")]
    Payment(String),

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(#[from] crate::actors::messages::ActorError),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message suitable for showing to a site visitor.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput => "Please type a message first.".to_string(),
            AppError::InvalidAmount(_) => "Please enter a valid donation amount.".to_string(),
            AppError::Validation(msg) => format!("Please check the form: {}", msg),
            AppError::Payment(_) => "Unable to process donation. Please try again.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::PersistenceUnavailable(format!("SQLite error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Validation(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Config(format!("Date parse error: {}", err))
    }
}
