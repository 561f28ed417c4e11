//! Approval request storage.
//!
//! The store owns the compare-and-set on request status: a decision only
//! lands if the request is still pending at the moment the write lock is
//! held. Pre-checks outside the lock can race; the CAS inside cannot.

use std::collections::HashMap;
use std::sync::RwLock;

use switchboard_core::{Actor, RequestId, Timestamp};

use crate::error::{ApprovalError, ApprovalResult};
use crate::request::{ApprovalRequest, ApprovalStatus};

/// A terminal decision to record against a pending request.
#[derive(Debug, Clone)]
pub struct Decision {
    /// The terminal status (`Approved` or `Rejected`).
    pub status: ApprovalStatus,
    /// Who made the decision.
    pub decided_by: Actor,
    /// Free-text note attached to the decision.
    pub note: Option<String>,
}

impl Decision {
    /// An approval decision.
    #[must_use]
    pub fn approved(decided_by: Actor) -> Self {
        Self {
            status: ApprovalStatus::Approved,
            decided_by,
            note: None,
        }
    }

    /// A rejection decision with an optional note.
    #[must_use]
    pub fn rejected(decided_by: Actor, note: Option<String>) -> Self {
        Self {
            status: ApprovalStatus::Rejected,
            decided_by,
            note,
        }
    }
}

/// Storage backend for approval requests.
pub trait ApprovalStore: Send + Sync {
    /// Persist a new request.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend is unavailable.
    fn insert(&self, request: ApprovalRequest) -> ApprovalResult<()>;

    /// Fetch a request by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend is unavailable.
    fn get(&self, id: &RequestId) -> ApprovalResult<Option<ApprovalRequest>>;

    /// All pending requests, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend is unavailable.
    fn list_pending(&self) -> ApprovalResult<Vec<ApprovalRequest>>;

    /// Atomically record a decision against a pending request.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] if no such request exists and
    /// [`ApprovalError::AlreadyDecided`] if it is no longer pending.
    fn decide(&self, id: &RequestId, decision: Decision) -> ApprovalResult<ApprovalRequest>;
}

/// In-memory approval store backed by a `HashMap` under a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryApprovalStore {
    requests: RwLock<HashMap<RequestId, ApprovalRequest>>,
}

impl MemoryApprovalStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApprovalStore for MemoryApprovalStore {
    fn insert(&self, request: ApprovalRequest) -> ApprovalResult<()> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| ApprovalError::Storage(e.to_string()))?;
        requests.insert(request.id.clone(), request);
        Ok(())
    }

    fn get(&self, id: &RequestId) -> ApprovalResult<Option<ApprovalRequest>> {
        let requests = self
            .requests
            .read()
            .map_err(|e| ApprovalError::Storage(e.to_string()))?;
        Ok(requests.get(id).cloned())
    }

    fn list_pending(&self) -> ApprovalResult<Vec<ApprovalRequest>> {
        let requests = self
            .requests
            .read()
            .map_err(|e| ApprovalError::Storage(e.to_string()))?;
        let mut pending: Vec<ApprovalRequest> = requests
            .values()
            .filter(|r| r.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    fn decide(&self, id: &RequestId, decision: Decision) -> ApprovalResult<ApprovalRequest> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| ApprovalError::Storage(e.to_string()))?;
        let request = requests
            .get_mut(id)
            .ok_or_else(|| ApprovalError::NotFound { id: id.clone() })?;
        if !request.is_pending() {
            return Err(ApprovalError::AlreadyDecided {
                id: id.clone(),
                status: request.status,
            });
        }
        request.status = decision.status;
        request.decided_at = Some(Timestamp::now());
        request.decided_by = Some(decision.decided_by);
        request.decision_note = decision.note;
        Ok(request.clone())
    }
}
