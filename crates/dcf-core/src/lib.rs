//! Discounted cash flow valuation engine
//!
//! This crate holds the deterministic part of dcf-rs:
//!
//! - [`ValuationInputs`]: the assumption set a user edits
//! - [`compute`]: projects free cash flow, discounts it, adds a Gordon Growth
//!   terminal value and derives the per-share intrinsic value
//! - [`ValuationResult`]: the projection table and the over/under-valued verdict
//! - [`chart_series`] and the [`format`] helpers used by renderers
//!
//! Nothing here performs I/O or keeps state between calls.
//!
//! # Example
//!
//! ```
//! use dcf_core::{ValuationInputs, compute};
//!
//! let inputs = ValuationInputs {
//!     free_cash_flow: 100.0,
//!     shares_outstanding: 1000.0,
//!     current_price: 50.0,
//!     ..ValuationInputs::default()
//! };
//!
//! let result = compute(&inputs);
//! assert_eq!(result.projections.len(), 5);
//! assert!(result.total_enterprise_value > 0.0);
//! ```

pub mod chart;
pub mod engine;
pub mod error;
pub mod format;
pub mod inputs;
pub mod result;

pub use chart::{ChartBar, ChartBarKind, chart_series};
pub use engine::{TERMINAL_DENOMINATOR_FLOOR, compute, is_terminal_clamped, terminal_denominator};
pub use error::{Error, Result};
pub use format::{CompactStyle, format_compact, format_currency, format_percent};
pub use inputs::{
    DEFAULT_DISCOUNT_RATE_PCT, DEFAULT_GROWTH_RATE_PCT, DEFAULT_PROJECTION_YEARS,
    DEFAULT_TERMINAL_GROWTH_RATE_PCT, InputField, MAX_PROJECTION_YEARS, MIN_PROJECTION_YEARS,
    ValuationInputs,
};
pub use result::{ValuationResult, Verdict, YearProjection};
