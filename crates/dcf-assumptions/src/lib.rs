//! Assumption lookup for DCF valuations
//!
//! Given a ticker symbol, an [`AssumptionSource`] returns a best-effort
//! [`ValuationInputs`](dcf_core::ValuationInputs) together with a short
//! rationale and the URLs the numbers were taken from. The bundled
//! [`LlmAssumptionSource`] asks a search-grounded LLM:
//!
//! 1. renders the lookup prompt ([`prompt`])
//! 2. sends one completion request with web search enabled
//! 3. extracts the JSON object from the reply and keeps only numeric fields,
//!    substituting defaults for anything missing ([`parse`])
//! 4. de-duplicates the grounding citations
//!
//! There is no retry and no caching. A failure is reported once and callers
//! fall back to manual entry, usually by showing
//! [`AssumptionError::user_message`].
//!
//! # Example
//!
//! ```rust,ignore
//! use dcf_assumptions::{AssumptionConfig, AssumptionSource, LlmAssumptionSource};
//!
//! let config = AssumptionConfig::from_env()?;
//! let source = LlmAssumptionSource::from_config(&config)?;
//! let report = source.lookup("AAPL").await?;
//! let result = dcf_core::compute(&report.inputs);
//! ```

pub mod config;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod source;

pub use config::{AssumptionConfig, AssumptionConfigBuilder, ProviderKind, ReasoningLanguage};
pub use error::{AssumptionError, Result};
pub use source::{AssumptionReport, AssumptionSource, LlmAssumptionSource};
