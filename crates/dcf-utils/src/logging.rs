//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "warn,dcf=info";

/// Initialize tracing subscriber with default configuration
///
/// Honors `RUST_LOG` and falls back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Initialize tracing with an explicit fallback filter
///
/// Output goes to stderr so that JSON reports on stdout stay machine readable.
/// Calling this twice is harmless; the second registration is ignored.
pub fn init_tracing_with(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
