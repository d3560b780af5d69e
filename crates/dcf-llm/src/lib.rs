//! LLM provider abstraction layer for dcf-rs
//!
//! This crate provides provider-agnostic types for asking a Large Language
//! Model for a single text completion, optionally grounded in web search:
//!
//! - Message types
//! - Completion request/response types, including grounding citations
//! - The [`LLMProvider`] trait
//! - Concrete providers (behind the `gemini` and `openai` features)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "gemini", feature = "openai"))]
pub mod providers;
