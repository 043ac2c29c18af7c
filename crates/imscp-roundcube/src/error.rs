//! Error types for the plugin services.

use thiserror::Error;

use crate::service::ValidationError;

/// Errors that can occur while saving or loading a mail account change.
///
/// A failed daemon notification is not an error: the change is saved at that
/// point and is reported as [`crate::SaveOutcome::Pending`].
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No `mail_users` row matches the address.
    #[error("Mail user not found: {0}")]
    MailUserNotFound(String),

    /// Mail address is malformed.
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    /// Submitted values were rejected before touching the database.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Settings could not be parsed.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the localization label shown to the user for this error.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.message_key(),
            _ => "internalerror",
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
