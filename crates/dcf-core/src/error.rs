//! Error types for dcf-core
//!
//! The engine itself never fails. These errors come from editing inputs by
//! name, which is how interactive front ends drive the model.

use thiserror::Error;

/// Result type alias for dcf-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for input editing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The field name does not match any input
    #[error("Unknown input field: {0}")]
    UnknownField(String),

    /// The text could not be read as a number
    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: String, value: String },

    /// NaN or infinity was supplied
    #[error("Value for {0} must be finite")]
    NonFinite(String),
}
