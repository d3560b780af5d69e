//! Error types for the application layer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input line could not be parsed as a command
    #[error("Command error: {0}")]
    Command(String),

    /// A value was rejected by the inputs model
    #[error(transparent)]
    Input(#[from] dcf_core::Error),

    /// Report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the application layer
pub type Result<T> = std::result::Result<T, AppError>;
