//! Log sink setup.
//!
//! The job and notifiers only emit `tracing` events with structured fields;
//! which writer receives them is decided here, once, at startup.

use tracing_subscriber::{fmt, fmt::MakeWriter, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize logging to stdout. Called once from main.rs.
pub fn init_logging() {
    init_logging_with(std::io::stdout);
}

/// Initialize logging into an arbitrary writer.
///
/// Silently keeps the existing subscriber if one is already installed.
pub fn init_logging_with<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging initialized");
    }
}
