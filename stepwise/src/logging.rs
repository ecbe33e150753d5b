//! Development-time tracing for debugging suite runs.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Diagnostics via `RUST_LOG`, output to stderr.
//!   Never mixed into the report.
//!
//! - **Report output (`suite`)**: The indented pass/fail text on stdout.
//!   Always written, unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset, which surfaces one
/// line per failed step.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=stepwise=debug stepwise run mathematics --workers 4
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
