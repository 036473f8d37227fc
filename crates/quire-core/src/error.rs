//! Error types for quire.

use thiserror::Error;

/// Result type alias using quire's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for quire operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (malformed import payload, bad column definition, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Text generation failed (network, auth, quota, timeout)
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a missing database.
    pub fn database_not_found(id: &str) -> Self {
        Error::NotFound(format!("Database {} not found", id))
    }

    /// Shorthand for a missing page.
    pub fn page_not_found(id: &str) -> Self {
        Error::NotFound(format!("Page {} not found", id))
    }

    /// Shorthand for a missing dashboard.
    pub fn dashboard_not_found(id: &str) -> Self {
        Error::NotFound(format!("Dashboard {} not found", id))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::InvalidInput(format!("CSV: {}", e))
    }
}
