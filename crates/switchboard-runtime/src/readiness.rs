//! Subsystem readiness evaluation.
//!
//! Before a switch becomes effective, the engine asks the subsystem's
//! registered [`ReadinessProbe`] whether it can safely take over (data
//! sources reachable, fallback engine healthy, index warm). Hard failures
//! block the switch; soft issues surface as warnings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A subsystem's self-report on whether it can safely become effective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    /// True iff no blocking reasons were found.
    pub ready: bool,
    /// Named check results (e.g. `"warehouse_reachable": true`).
    pub checks: BTreeMap<String, bool>,
    /// Hard failures that prevent the switch from becoming effective.
    pub blocking_reasons: Vec<String>,
    /// Soft issues worth surfacing without blocking.
    pub warnings: Vec<String>,
}

impl Readiness {
    /// A readiness report with no checks and no findings.
    #[must_use]
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// Build a report from check results and findings, deriving `ready`.
    #[must_use]
    pub fn from_findings(
        checks: BTreeMap<String, bool>,
        blocking_reasons: Vec<String>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            ready: blocking_reasons.is_empty(),
            checks,
            blocking_reasons,
            warnings,
        }
    }
}

/// Probe a subsystem's readiness to run in a new mode.
///
/// Probes are registered on the switch engine per subsystem; a subsystem
/// without a probe is considered ready. Implementations typically perform
/// I/O (ping a data source, check a queue depth) and must be cheap enough
/// to run on every switch attempt and every status read.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Evaluate readiness for the given target mode.
    async fn check(&self, target_mode: &str) -> Readiness;
}

/// Probe that always reports ready. Used where no probe is registered.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

#[async_trait]
impl ReadinessProbe for AlwaysReady {
    async fn check(&self, _target_mode: &str) -> Readiness {
        Readiness::ready()
    }
}
