//! Shared utilities for dcf-rs
//!
//! This crate provides the pieces every binary and library in the workspace
//! shares: tracing setup and the application-level configuration.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::{DEFAULT_LOG_FILTER, init_tracing, init_tracing_with};
