//! The approval engine.
//!
//! Ties the request store, the phrase book, and the switch engine
//! together. Checks on approval run in a fixed order so callers always get
//! the most specific failure:
//!
//! 1. the request exists,
//! 2. it is still pending,
//! 3. the approver is not the requester,
//! 4. the typed phrase matches exactly.
//!
//! The status flip itself is a compare-and-set inside the store, so a
//! concurrent approve and reject cannot both land. Once a request flips to
//! approved, the action is applied through the switch engine; a runtime
//! gate blocking the application does not un-approve the request — the
//! blocked attempt is audited like any other.

use std::sync::Arc;

use switchboard_core::{Actor, RequestId};
use switchboard_runtime::{SwitchEngine, SwitchReport};
use switchboard_staging::StagedAction;

use crate::error::{ApprovalError, ApprovalResult};
use crate::phrase::PhraseBook;
use crate::request::ApprovalRequest;
use crate::store::{ApprovalStore, Decision, MemoryApprovalStore};

/// Result of a successful approval: the decided request plus the runtime
/// outcome of applying its action.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    /// The request, now approved.
    pub request: ApprovalRequest,
    /// What the switch engine did with the action.
    pub report: SwitchReport,
}

/// Coordinates the two-person approval workflow.
pub struct ApprovalEngine {
    store: Arc<dyn ApprovalStore>,
    phrases: PhraseBook,
    switch: Arc<SwitchEngine>,
}

impl ApprovalEngine {
    /// Create an engine with an in-memory store and built-in phrases.
    #[must_use]
    pub fn new(switch: Arc<SwitchEngine>) -> Self {
        Self {
            store: Arc::new(MemoryApprovalStore::new()),
            phrases: PhraseBook::new(),
            switch,
        }
    }

    /// Replace the request store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ApprovalStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace the phrase book.
    #[must_use]
    pub fn with_phrases(mut self, phrases: PhraseBook) -> Self {
        self.phrases = phrases;
        self
    }

    /// File an approval request for a staged action. The requester must
    /// type back the action's confirmation phrase to file it; the approver
    /// will type it again to decide.
    ///
    /// The request keeps the staged summary and risk but re-resolves the
    /// confirmation phrase through the phrase book, so configured
    /// overrides apply even to actions staged before the override landed.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::PhraseMismatch`] if the typed phrase
    /// differs, and a storage error if the request cannot be persisted.
    pub fn request(
        &self,
        staged: StagedAction,
        requested_by: &Actor,
        reason: Option<String>,
        typed_phrase: &str,
    ) -> ApprovalResult<ApprovalRequest> {
        let mut request = ApprovalRequest::from_staged(staged, requested_by.clone(), reason);
        request.required_phrase = self.phrases.required_phrase(request.action.kind());
        if typed_phrase != request.required_phrase {
            return Err(ApprovalError::PhraseMismatch {
                expected: request.required_phrase,
            });
        }
        self.store.insert(request.clone())?;
        tracing::info!(
            request = %request.id,
            action = %request.action.kind(),
            requested_by = %requested_by.id,
            "approval requested"
        );
        Ok(request)
    }

    /// Approve a pending request and apply its action.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for an unknown id,
    /// [`ApprovalError::AlreadyDecided`] if it is no longer pending,
    /// [`ApprovalError::SelfApproval`] if the approver filed the request,
    /// [`ApprovalError::PhraseMismatch`] if the typed phrase differs, and
    /// a switch error if the approved action fails to apply.
    pub async fn approve(
        &self,
        id: &RequestId,
        approver: &Actor,
        typed_phrase: &str,
    ) -> ApprovalResult<ApprovalOutcome> {
        let request = self
            .store
            .get(id)?
            .ok_or_else(|| ApprovalError::NotFound { id: id.clone() })?;
        if !request.is_pending() {
            return Err(ApprovalError::AlreadyDecided {
                id: id.clone(),
                status: request.status,
            });
        }
        if request.requested_by.id == approver.id {
            return Err(ApprovalError::SelfApproval { id: id.clone() });
        }
        if typed_phrase != request.required_phrase {
            return Err(ApprovalError::PhraseMismatch {
                expected: request.required_phrase,
            });
        }

        // The store re-checks pending under its write lock; a concurrent
        // decision that got there first wins.
        let decided = self.store.decide(id, Decision::approved(approver.clone()))?;

        let report = self
            .switch
            .apply(approver, &decided.action, decided.reason.clone())
            .await?;

        tracing::info!(
            request = %decided.id,
            action = %decided.action.kind(),
            approved_by = %approver.id,
            blocked = report.was_blocked(),
            "approval granted and applied"
        );
        Ok(ApprovalOutcome {
            request: decided,
            report,
        })
    }

    /// Reject a pending request. No phrase is needed, and requesters may
    /// reject their own requests — withdrawing a mistake must stay easy.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for an unknown id and
    /// [`ApprovalError::AlreadyDecided`] if it is no longer pending.
    pub fn reject(
        &self,
        id: &RequestId,
        decider: &Actor,
        note: Option<String>,
    ) -> ApprovalResult<ApprovalRequest> {
        let decided = self
            .store
            .decide(id, Decision::rejected(decider.clone(), note))?;
        tracing::info!(
            request = %decided.id,
            action = %decided.action.kind(),
            rejected_by = %decider.id,
            "approval rejected"
        );
        Ok(decided)
    }

    /// All pending requests, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn pending(&self) -> ApprovalResult<Vec<ApprovalRequest>> {
        self.store.list_pending()
    }

    /// Fetch a request by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store is unavailable.
    pub fn get(&self, id: &RequestId) -> ApprovalResult<Option<ApprovalRequest>> {
        self.store.get(id)
    }
}

impl std::fmt::Debug for ApprovalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalEngine")
            .field("phrases", &self.phrases)
            .finish_non_exhaustive()
    }
}
