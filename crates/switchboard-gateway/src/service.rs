//! The `ControlPlane` service.
//!
//! Wires staging, approval, the switch engine, and the audit log into the
//! operation surface a transport exposes. Routing policy lives here:
//! high-risk actions always become approval requests; everything else
//! applies directly (still gated by freeze, readiness, and parity). Every
//! mutation requires the actor to type back the action's confirmation
//! phrase.

use std::sync::Arc;

use switchboard_approval::{
    ApprovalEngine, ApprovalError, ApprovalOutcome, ApprovalRequest, ApprovalStore, PhraseBook,
};
use switchboard_audit::{AuditLog, EventScope, MemoryAuditLog, SwitchEvent};
use switchboard_core::{
    Actor, ControlAction, ErrorCode, RequestId, StagedActionId, Subsystem,
};
use switchboard_config::Settings;
use switchboard_runtime::{
    ParityReport, ParityThresholds, ReadinessProbe, RuntimeStatus, SwitchEngine,
};
use switchboard_staging::{StagedAction, StagedQueue};

use crate::dto::{Disposition, ExportReceipt, SubmitItem, SubmitOutcome};
use crate::error::GatewayResult;

/// Phrases the submitting admin typed back, keyed by staged action id.
pub type TypedPhrases = std::collections::HashMap<StagedActionId, String>;

/// The control-plane service: every operation a dashboard or CLI needs.
pub struct ControlPlane {
    switch: Arc<SwitchEngine>,
    approvals: ApprovalEngine,
    audit: Arc<dyn AuditLog>,
    phrases: PhraseBook,
    settings: Settings,
}

impl ControlPlane {
    /// Build a control plane with an in-memory audit log.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_audit(settings, Arc::new(MemoryAuditLog::new()))
    }

    /// Build a control plane over an explicit audit backend.
    #[must_use]
    pub fn with_audit(settings: Settings, audit: Arc<dyn AuditLog>) -> Self {
        let thresholds = ParityThresholds {
            max_abs_percentile_diff: settings.parity.max_abs_percentile_diff,
            max_rank_mismatches: settings.parity.max_rank_mismatches,
        };
        let switch = Arc::new(
            SwitchEngine::new(Arc::clone(&audit)).with_parity_thresholds(thresholds),
        );
        let phrases = PhraseBook::with_overrides(settings.approval.phrases.clone());
        let approvals =
            ApprovalEngine::new(Arc::clone(&switch)).with_phrases(phrases.clone());
        Self {
            switch,
            approvals,
            audit,
            phrases,
            settings,
        }
    }

    /// Replace the approval request store.
    #[must_use]
    pub fn with_approval_store(mut self, store: Arc<dyn ApprovalStore>) -> Self {
        self.approvals = self.approvals.with_store(store);
        self
    }

    /// Register a readiness probe for a subsystem.
    pub fn register_probe(&self, subsystem: Subsystem, probe: Arc<dyn ReadinessProbe>) {
        self.switch.register_probe(subsystem, probe);
    }

    /// The underlying switch engine, for parity recording and flag reads.
    #[must_use]
    pub fn switch_engine(&self) -> &Arc<SwitchEngine> {
        &self.switch
    }

    /// The loaded settings this plane was built from.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Authoritative status of one subsystem.
    ///
    /// # Errors
    ///
    /// Returns an error only on store failure.
    pub async fn runtime_status(&self, subsystem: Subsystem) -> GatewayResult<RuntimeStatus> {
        Ok(self.switch.status(subsystem).await?)
    }

    /// Switch a subsystem's mode.
    ///
    /// Mode switches are high-risk, so this files an approval request
    /// rather than applying directly. The caller types back the
    /// confirmation phrase to file it.
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_ERROR` on a phrase mismatch and an error on
    /// store failure.
    pub async fn switch(
        &self,
        actor: &Actor,
        subsystem: Subsystem,
        mode: impl Into<String>,
        reason: Option<String>,
        typed_phrase: &str,
    ) -> GatewayResult<Disposition> {
        let action = ControlAction::RuntimeSwitch {
            subsystem,
            mode: mode.into(),
        };
        self.route(actor, action, reason, typed_phrase).await
    }

    /// Raise or lower the global freeze.
    ///
    /// Freezing applies immediately (incident response must not wait for
    /// a second admin); unfreezing is high-risk and goes to approval.
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_ERROR` on a phrase mismatch and an error on
    /// store or audit failure.
    pub async fn set_freeze_updates(
        &self,
        actor: &Actor,
        enabled: bool,
        reason: Option<String>,
        typed_phrase: &str,
    ) -> GatewayResult<Disposition> {
        let action = if enabled {
            ControlAction::Freeze
        } else {
            ControlAction::Unfreeze
        };
        self.route(actor, action, reason, typed_phrase).await
    }

    /// Toggle exam mode.
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_ERROR` on a phrase mismatch and an error on
    /// store or audit failure.
    pub async fn set_exam_mode(
        &self,
        actor: &Actor,
        enabled: bool,
        reason: Option<String>,
        typed_phrase: &str,
    ) -> GatewayResult<Disposition> {
        self.route(
            actor,
            ControlAction::ExamModeSet { enabled },
            reason,
            typed_phrase,
        )
        .await
    }

    /// File an approval request for an arbitrary action, regardless of its
    /// risk level.
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_ERROR` if the typed phrase does not match and
    /// an error if the request cannot be persisted.
    pub fn request_approval(
        &self,
        actor: &Actor,
        action: ControlAction,
        reason: Option<String>,
        typed_phrase: &str,
    ) -> GatewayResult<ApprovalRequest> {
        Ok(self
            .approvals
            .request(StagedAction::new(action), actor, reason, typed_phrase)?)
    }

    /// Approve a pending request by typing back its phrase.
    ///
    /// # Errors
    ///
    /// Propagates the approval workflow errors: `NOT_FOUND`, `CONFLICT`,
    /// `FORBIDDEN` (self-approval), `VALIDATION_ERROR` (phrase).
    pub async fn approve(
        &self,
        actor: &Actor,
        id: &RequestId,
        typed_phrase: &str,
    ) -> GatewayResult<ApprovalOutcome> {
        Ok(self.approvals.approve(id, actor, typed_phrase).await?)
    }

    /// Reject a pending request.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for an unknown id and `CONFLICT` if already
    /// decided.
    pub fn reject(
        &self,
        actor: &Actor,
        id: &RequestId,
        note: Option<String>,
    ) -> GatewayResult<ApprovalRequest> {
        Ok(self.approvals.reject(id, actor, note)?)
    }

    /// All pending approval requests, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error on store failure.
    pub fn pending_approvals(&self) -> GatewayResult<Vec<ApprovalRequest>> {
        Ok(self.approvals.pending()?)
    }

    /// Recent audit events for a scope, newest first. `limit` defaults to
    /// the configured `audit.recent_limit`.
    ///
    /// # Errors
    ///
    /// Returns an error on store failure.
    pub fn events(
        &self,
        scope: EventScope,
        limit: Option<usize>,
    ) -> GatewayResult<Vec<SwitchEvent>> {
        let limit = limit.unwrap_or(self.settings.audit.recent_limit);
        Ok(self.audit.list_recent(scope, limit)?)
    }

    /// Record a fresh ranking parity comparison.
    ///
    /// # Errors
    ///
    /// Returns an error on store failure.
    pub fn record_parity(
        &self,
        max_abs_percentile_diff: f64,
        rank_mismatch_count: u64,
    ) -> GatewayResult<ParityReport> {
        Ok(self
            .switch
            .record_parity(max_abs_percentile_diff, rank_mismatch_count)?)
    }

    /// Submit a session's staged queue.
    ///
    /// Each staged action stands on its own: high-risk actions become
    /// approval requests; the rest apply directly, provided the submitting
    /// admin typed back the action's confirmation phrase. Per-action
    /// failures are reported in the outcome, never as an error for the
    /// whole submit.
    ///
    /// # Errors
    ///
    /// Returns an error only on store failure.
    pub async fn submit(
        &self,
        queue: StagedQueue,
        actor: &Actor,
        reason: Option<String>,
        typed_phrases: &TypedPhrases,
    ) -> GatewayResult<SubmitOutcome> {
        let mut items = Vec::new();
        for staged in queue.into_actions() {
            let staged_id = staged.id.clone();
            let action_kind = staged.action.kind();
            let disposition = match self.check_typed_phrase(&staged, typed_phrases) {
                Err(message) => Disposition::Invalid {
                    code: ErrorCode::ValidationError,
                    message,
                },
                Ok(typed) if staged.risk_level.requires_approval() => {
                    let request = self
                        .approvals
                        .request(staged, actor, reason.clone(), &typed)?;
                    Disposition::AwaitingApproval { request }
                },
                Ok(_) => {
                    let report = self
                        .switch
                        .apply(actor, &staged.action, reason.clone())
                        .await?;
                    Disposition::Applied { report }
                },
            };
            items.push(SubmitItem {
                staged_id,
                action: action_kind,
                disposition,
            });
        }
        tracing::info!(
            actor = %actor.id,
            total = items.len(),
            "staged queue submitted"
        );
        Ok(SubmitOutcome { items })
    }

    /// Trigger an on-demand warehouse export. Suppressed while updates are
    /// frozen; suppression is a successful receipt, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag store is unreadable.
    pub fn trigger_warehouse_export(&self, actor: &Actor) -> GatewayResult<ExportReceipt> {
        let frozen = self.switch.freeze_gate().mutations_frozen()?;
        let blocking_reasons = if frozen {
            vec![switchboard_runtime::FROZEN_REASON.to_string()]
        } else {
            Vec::new()
        };
        if frozen {
            tracing::warn!(actor = %actor.id, "warehouse export suppressed while frozen");
        } else {
            tracing::info!(actor = %actor.id, "warehouse export triggered");
        }
        Ok(ExportReceipt {
            subsystem: Subsystem::Warehouse,
            triggered: !frozen,
            blocking_reasons,
            handled_at: switchboard_core::Timestamp::now(),
        })
    }

    async fn route(
        &self,
        actor: &Actor,
        action: ControlAction,
        reason: Option<String>,
        typed_phrase: &str,
    ) -> GatewayResult<Disposition> {
        if action.risk_level().requires_approval() {
            let request =
                self.approvals
                    .request(StagedAction::new(action), actor, reason, typed_phrase)?;
            Ok(Disposition::AwaitingApproval { request })
        } else {
            let required = self.phrases.required_phrase(action.kind());
            if typed_phrase != required {
                return Err(ApprovalError::PhraseMismatch { expected: required }.into());
            }
            let report = self.switch.apply(actor, &action, reason).await?;
            Ok(Disposition::Applied { report })
        }
    }

    fn check_typed_phrase(
        &self,
        staged: &StagedAction,
        typed_phrases: &TypedPhrases,
    ) -> Result<String, String> {
        let required = self.phrases.required_phrase(staged.action.kind());
        match typed_phrases.get(&staged.id) {
            None => Err(format!(
                "missing confirmation phrase for {}",
                staged.action.kind()
            )),
            Some(typed) if *typed != required => {
                Err(format!("confirmation phrase does not match; expected '{required}'"))
            },
            Some(typed) => Ok(typed.clone()),
        }
    }
}

impl std::fmt::Debug for ControlPlane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPlane")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
