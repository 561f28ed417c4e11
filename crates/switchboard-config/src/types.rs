//! Configuration struct definitions.
//!
//! Every section implements [`Default`] with production values, so a bare
//! `[section]` header in TOML yields a working configuration. This crate
//! has no dependencies on other internal switchboard crates; domain types
//! are converted at the integration boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the Switchboard control plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Two-person approval workflow knobs.
    pub approval: ApprovalSection,
    /// Ranking parity gate thresholds.
    pub parity: ParitySection,
    /// Audit log query defaults.
    pub audit: AuditSection,
    /// Logging level and format.
    pub logging: LoggingSection,
}

/// Approval workflow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalSection {
    /// How often dashboards should poll for pending requests, in seconds.
    pub poll_interval_secs: u64,
    /// Confirmation phrase overrides, keyed by action kind
    /// (e.g. `runtime_switch = "SWITCH-RUNTIME"`). Unlisted kinds keep
    /// their built-in phrase.
    pub phrases: BTreeMap<String, String>,
}

impl Default for ApprovalSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            phrases: BTreeMap::new(),
        }
    }
}

/// Ranking parity gate thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParitySection {
    /// Largest tolerated absolute percentile difference.
    pub max_abs_percentile_diff: f64,
    /// Largest tolerated number of rank mismatches.
    pub max_rank_mismatches: u64,
}

impl Default for ParitySection {
    fn default() -> Self {
        Self {
            max_abs_percentile_diff: 0.5,
            max_rank_mismatches: 0,
        }
    }
}

/// Audit log query defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Default number of events returned by recent-event queries.
    pub recent_limit: usize,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self { recent_limit: 50 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Minimum level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Output format: `pretty` or `json`.
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
