//! Per-subsystem runtime configuration records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use switchboard_core::{Actor, MODE_INACTIVE, Subsystem, Timestamp};

/// The persistent mode record for one controllable subsystem.
///
/// `requested_mode` is what an admin last asked for; `effective_mode` is
/// what gating actually let through. They only diverge while a blocking
/// condition (freeze, failed readiness, failed parity) is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// The subsystem this record belongs to.
    pub subsystem: Subsystem,
    /// The mode an admin last asked for.
    pub requested_mode: String,
    /// The mode actually in force after gating.
    pub effective_mode: String,
    /// Module key → version key overrides.
    pub overrides: BTreeMap<String, String>,
    /// Serve cached results instead of recomputing while in degraded state.
    pub prefer_cache: bool,
    /// When this record last changed.
    pub updated_at: Timestamp,
    /// Who last changed it (`None` until the first switch).
    pub updated_by: Option<Actor>,
}

impl RuntimeConfig {
    /// The mode a subsystem starts in before any switch.
    #[must_use]
    pub fn initial_mode(subsystem: Subsystem) -> &'static str {
        match subsystem {
            Subsystem::Ranking => "legacy",
            Subsystem::Irt | Subsystem::Graph => MODE_INACTIVE,
            Subsystem::Warehouse => "batch",
            Subsystem::Email => "smtp",
            Subsystem::Search => "database",
        }
    }

    /// Seed record for a subsystem that has never been switched.
    #[must_use]
    pub fn seed(subsystem: Subsystem) -> Self {
        let mode = Self::initial_mode(subsystem).to_string();
        Self {
            subsystem,
            requested_mode: mode.clone(),
            effective_mode: mode,
            overrides: BTreeMap::new(),
            prefer_cache: false,
            updated_at: Timestamp::now(),
            updated_by: None,
        }
    }

    /// Whether intent and reality currently diverge.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        self.requested_mode != self.effective_mode
    }
}

/// Safe-mode view carried on runtime status responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeMode {
    /// Whether the global freeze gate is up.
    pub freeze_updates: bool,
    /// Whether this subsystem prefers cached results.
    pub prefer_cache: bool,
}
