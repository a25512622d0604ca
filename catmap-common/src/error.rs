//! Common error types for catmap

use thiserror::Error;

/// Common result type for catmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the catmap tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source discovery matched nothing; the run cannot start
    #[error("No CSV files matched pattern: {pattern}")]
    NoSourcesFound { pattern: String },

    /// Invalid user input or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
