//! Log subscriber setup for the CLI.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;

/// Build the event filter: `RUST_LOG` wins, then `--verbose`, then settings.
pub fn env_filter(settings: &LoggingSettings, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"))
        }
    })
}

/// Install a stderr fmt subscriber. Does nothing if one is already set.
pub fn init(settings: &LoggingSettings, verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(settings, verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
