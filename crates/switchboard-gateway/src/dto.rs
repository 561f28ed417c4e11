//! Gateway response shapes.
//!
//! Thin, serializable types a transport (HTTP handler, CLI, dashboard RPC)
//! returns verbatim. Core outcome types (`SwitchReport`, `RuntimeStatus`,
//! `ApprovalRequest`, `SwitchEvent`) are reused directly; this module only
//! adds the shapes specific to gateway operations.

use serde::{Deserialize, Serialize};

use switchboard_approval::ApprovalRequest;
use switchboard_core::{ActionKind, ErrorCode, StagedActionId, Subsystem, Timestamp};
use switchboard_runtime::SwitchReport;

/// What happened to one staged action during submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Disposition {
    /// Applied directly through the switch engine (possibly blocked by a
    /// runtime gate — see the report's `blocking_reasons`).
    Applied {
        /// The switch engine's outcome.
        report: SwitchReport,
    },
    /// Filed as an approval request for a second administrator.
    AwaitingApproval {
        /// The pending request.
        request: ApprovalRequest,
    },
    /// Rejected before reaching the engine.
    Invalid {
        /// Machine-readable error code.
        code: ErrorCode,
        /// What was wrong.
        message: String,
    },
}

/// Per-action outcome of one submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitItem {
    /// The staged action this outcome belongs to.
    pub staged_id: StagedActionId,
    /// Kind of action submitted.
    pub action: ActionKind,
    /// What happened to it.
    pub disposition: Disposition,
}

/// Outcome of submitting a staged queue: one entry per staged action, in
/// staging order. Submit is not transactional across actions — each entry
/// stands on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// Per-action outcomes.
    pub items: Vec<SubmitItem>,
}

impl SubmitOutcome {
    /// Count of actions applied directly.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.disposition, Disposition::Applied { .. }))
            .count()
    }

    /// Count of actions now awaiting approval.
    #[must_use]
    pub fn awaiting_approval(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.disposition, Disposition::AwaitingApproval { .. }))
            .count()
    }
}

/// Outcome of a warehouse export trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReceipt {
    /// The subsystem exported (always the warehouse).
    pub subsystem: Subsystem,
    /// Whether the export actually started.
    pub triggered: bool,
    /// Why it did not, when it did not.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocking_reasons: Vec<String>,
    /// When the trigger was handled.
    pub handled_at: Timestamp,
}
