//! Ranking parity gate.
//!
//! Before the ranking engine switches modes, the most recent comparison of
//! old-engine vs new-engine outputs is consulted. A failed comparison
//! blocks the switch; a missing one is only a warning, since the gate
//! exists to stop known regressions, not to demand proof.

use serde::{Deserialize, Serialize};

use switchboard_core::Timestamp;

/// Thresholds a parity comparison must stay within to pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParityThresholds {
    /// Largest tolerated absolute percentile difference.
    pub max_abs_percentile_diff: f64,
    /// Largest tolerated number of rank mismatches.
    pub max_rank_mismatches: u64,
}

impl Default for ParityThresholds {
    fn default() -> Self {
        Self {
            max_abs_percentile_diff: 0.5,
            max_rank_mismatches: 0,
        }
    }
}

/// Correctness comparison between old and new ranking outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityReport {
    /// Largest absolute percentile difference observed.
    pub max_abs_percentile_diff: f64,
    /// Number of users whose rank ordering differed.
    pub rank_mismatch_count: u64,
    /// Whether the comparison stayed within thresholds.
    pub passed: bool,
    /// When the comparison ran.
    pub computed_at: Timestamp,
}

impl ParityReport {
    /// Build a report, deriving `passed` from the thresholds.
    #[must_use]
    pub fn new(
        max_abs_percentile_diff: f64,
        rank_mismatch_count: u64,
        thresholds: &ParityThresholds,
    ) -> Self {
        let passed = max_abs_percentile_diff <= thresholds.max_abs_percentile_diff
            && rank_mismatch_count <= thresholds.max_rank_mismatches;
        Self {
            max_abs_percentile_diff,
            rank_mismatch_count,
            passed,
            computed_at: Timestamp::now(),
        }
    }
}
