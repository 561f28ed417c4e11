//! Configuration for the Switchboard control plane.
//!
//! A single [`Settings`] type covers every tunable: approval workflow
//! knobs, ranking parity thresholds, audit query defaults, and logging.
//!
//! # Usage
//!
//! ```rust,no_run
//! use switchboard_config::Settings;
//!
//! let settings = Settings::load(Some(std::path::Path::new("switchboard.toml"))).unwrap();
//! println!("poll every {}s", settings.approval.poll_interval_secs);
//! ```
//!
//! # Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Environment variables** (`SWITCHBOARD_*`)
//! 2. **Overlay file** (path given to [`Settings::load`])
//! 3. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! This crate has no dependencies on other internal switchboard crates;
//! conversion to domain types (parity thresholds, phrase books) happens at
//! the gateway boundary.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Configuration error types.
pub mod error;
/// Config file loading and environment overrides.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::{ApprovalSection, AuditSection, LoggingSection, ParitySection, Settings};

impl Settings {
    /// Load settings with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the overlay file is malformed, an
    /// environment override is unparseable, or validation fails.
    pub fn load(overlay: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(overlay)
    }
}
