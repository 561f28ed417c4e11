//! Tracing subscriber setup for binaries embedding the gateway.
//!
//! Library crates only emit events; installing a subscriber is the
//! embedding binary's job, and it calls this once at startup with the
//! loaded logging settings. `RUST_LOG` always wins over the configured
//! level.

use switchboard_config::LoggingSection;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber per the logging settings.
///
/// Safe to call once; later calls are no-ops (the first subscriber wins).
pub fn init_tracing(logging: &LoggingSection) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
