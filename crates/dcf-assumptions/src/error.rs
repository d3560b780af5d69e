//! Error types for assumption lookups

use thiserror::Error;

/// Message shown to users whenever a lookup fails
pub const MANUAL_ENTRY_MESSAGE: &str =
    "Unable to fetch stock data, please enter the values manually.";

/// Assumption lookup errors
#[derive(Debug, Error)]
pub enum AssumptionError {
    /// Empty or malformed ticker symbol
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// The LLM provider failed (network, auth, rate limit, bad response)
    #[error("Provider error: {0}")]
    Provider(#[from] dcf_llm::LLMError),

    /// The reply did not contain a usable JSON object
    #[error("Could not parse assumptions: {0}")]
    Parse(String),

    /// Prompt template failed to render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AssumptionError {
    /// The single user-facing message for any lookup failure
    pub fn user_message(&self) -> &'static str {
        MANUAL_ENTRY_MESSAGE
    }
}

/// Result type alias for assumption lookups
pub type Result<T> = std::result::Result<T, AssumptionError>;
