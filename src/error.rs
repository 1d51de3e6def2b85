//! Error types for pinwatch

use thiserror::Error;

/// Main error type for pinwatch operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid pin: {0}")]
    InvalidPin(String),

    #[error("Overlap violation: {0}")]
    OverlapViolation(String),

    #[error("Pin not found: {0}")]
    NotFound(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for pinwatch operations
pub type Result<T> = std::result::Result<T, Error>;
