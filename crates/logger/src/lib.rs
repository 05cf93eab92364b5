//! Structured logging setup shared by the pipeline binaries.
//!
//! Library crates only emit `tracing` events; a binary calls [`init`] once at startup.
//! `RUST_LOG` takes precedence over the filter configured in the settings file.

use models::{LogFormat, LoggingSettings};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Returns `false` when one was already installed.
pub fn init(settings: &LoggingSettings) -> bool {
    let filter = build_filter(settings);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::rfc_3339())
        .with_target(true);

    let installed = match settings.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.is_ok()
}

fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
