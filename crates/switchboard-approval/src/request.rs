//! Approval request types.
//!
//! An [`ApprovalRequest`] is the durable record of a high-risk action
//! waiting for a second administrator. The payload is captured verbatim at
//! request time; what was approved is exactly what gets applied, even if
//! defaults or phrases change in between.

use std::fmt;

use serde::{Deserialize, Serialize};

use switchboard_core::{Actor, ControlAction, RequestId, RiskLevel, Timestamp};
use switchboard_staging::StagedAction;

/// Lifecycle state of an approval request. Decisions are write-once:
/// `Pending` is the only state that can transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting a second administrator.
    Pending,
    /// Approved and applied (possibly blocked by a runtime gate).
    Approved,
    /// Rejected; the action was discarded.
    Rejected,
}

impl ApprovalStatus {
    /// Stable string label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// True iff the request can still be decided.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A high-risk action awaiting a second administrator's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Unique identifier.
    pub id: RequestId,
    /// The action to apply on approval, captured verbatim.
    pub action: ControlAction,
    /// Human-readable description of what would change.
    pub diff_summary: String,
    /// Risk classification at request time.
    pub risk_level: RiskLevel,
    /// The exact phrase the approver must type back.
    pub required_phrase: String,
    /// Who asked for the change.
    pub requested_by: Actor,
    /// Free-text reason given by the requester.
    pub reason: Option<String>,
    /// Current lifecycle state.
    pub status: ApprovalStatus,
    /// When the request was created.
    pub created_at: Timestamp,
    /// When the request was decided (`None` while pending).
    pub decided_at: Option<Timestamp>,
    /// Who decided it (`None` while pending).
    pub decided_by: Option<Actor>,
    /// Free-text note attached to the decision.
    pub decision_note: Option<String>,
}

impl ApprovalRequest {
    /// Create a pending request for an action, deriving summary and risk.
    #[must_use]
    pub fn new(
        action: ControlAction,
        required_phrase: String,
        requested_by: Actor,
        reason: Option<String>,
    ) -> Self {
        let diff_summary = action.describe();
        let risk_level = action.risk_level();
        Self {
            id: RequestId::new(),
            action,
            diff_summary,
            risk_level,
            required_phrase,
            requested_by,
            reason,
            status: ApprovalStatus::Pending,
            created_at: Timestamp::now(),
            decided_at: None,
            decided_by: None,
            decision_note: None,
        }
    }

    /// Create a pending request from a staged action, keeping its
    /// already-computed summary, risk, and phrase.
    #[must_use]
    pub fn from_staged(staged: StagedAction, requested_by: Actor, reason: Option<String>) -> Self {
        Self {
            id: RequestId::new(),
            action: staged.action,
            diff_summary: staged.diff_summary,
            risk_level: staged.risk_level,
            required_phrase: staged.required_phrase,
            requested_by,
            reason,
            status: ApprovalStatus::Pending,
            created_at: Timestamp::now(),
            decided_at: None,
            decided_by: None,
            decision_note: None,
        }
    }

    /// True iff the request can still be decided.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}
