//! Error types for the Shop Sphere authentication backend.

use thiserror::Error;

/// Common error type for authentication operations.
///
/// Every externally-triggered failure carries a user-safe message; the web
/// boundary maps each variant to a status code and never exposes internals.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing or malformed input (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// Duplicate email on signup (HTTP 400).
    #[error("{0}")]
    Conflict(String),

    /// No matching account, for flows that intentionally reveal existence (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// Bad credentials or an invalid/expired session token (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),

    /// Database error.
    ///
    /// Errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Password hashing failure.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Email delivery failure. Aborts the enclosing state transition.
    #[error("failed to send email: {0}")]
    Mail(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Database(e.to_string())
    }
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
