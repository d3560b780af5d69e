//! Interactive valuation session for dcf-rs
//!
//! - [`AppState`] holds the inputs being edited and the valuation derived
//!   from them; it changes only through [`Event`]s
//! - [`App`] runs the lookups an [`AppState`] asks for against an
//!   [`AssumptionSource`](dcf_assumptions::AssumptionSource)
//! - [`Command`] parses slash commands typed into the REPL
//! - [`render`] turns a state into a text or JSON report

pub mod commands;
pub mod error;
pub mod render;
pub mod state;

pub use commands::Command;
pub use error::{AppError, Result};
pub use render::{JsonFormatter, ReportFormat, ReportFormatter, TextFormatter, formatter, render_chart};
pub use state::{App, AppState, EMPTY_TICKER_MESSAGE, Effect, Event};
