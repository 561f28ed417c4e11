//! The switch engine — sole writer of runtime state.
//!
//! Every mutation of a [`RuntimeConfig`](crate::RuntimeConfig) or a global
//! flag funnels through [`SwitchEngine::apply`], which:
//!
//! 1. reads the current config and flags,
//! 2. consults the freeze gate (flag toggles of the freeze flag are exempt),
//! 3. evaluates subsystem readiness and, for ranking, the most recent
//!    parity comparison,
//! 4. sets `effective_mode = requested_mode` only when nothing blocked,
//!    otherwise keeps the prior effective mode but still records the
//!    requested mode so operators can see intent vs reality,
//! 5. persists the config and appends an audit event — blocked attempts
//!    are audited too.
//!
//! Steps run under a per-subsystem async mutex: switches on one subsystem
//! are serialized, switches on distinct subsystems proceed independently.
//! A blocked change is not an error; callers inspect
//! [`SwitchReport::was_blocked`].

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use switchboard_audit::{AuditLog, ConfigSnapshot, EventScope, FlagSnapshot, SwitchEvent};
use switchboard_core::{
    ActionKind, Actor, ControlAction, EventId, MODE_INACTIVE, Subsystem, Timestamp,
};

use crate::config::{RuntimeConfig, SafeMode};
use crate::error::{SwitchError, SwitchResult};
use crate::flags::{FlagStore, FreezeGate};
use crate::parity::{ParityReport, ParityThresholds};
use crate::readiness::{Readiness, ReadinessProbe};
use crate::store::ConfigStore;

/// Blocking reason recorded when the freeze gate holds back a change.
pub const FROZEN_REASON: &str = "updates are frozen (freeze_updates enabled)";

/// Outcome of one switch attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchReport {
    /// Scope the attempt ran against.
    pub scope: EventScope,
    /// Kind of action attempted.
    pub action: ActionKind,
    /// Post-attempt config record (absent for flag toggles).
    pub config: Option<RuntimeConfig>,
    /// Post-attempt flag snapshot.
    pub flags: FlagSnapshot,
    /// Readiness findings, when evaluated.
    pub readiness: Option<Readiness>,
    /// Parity report consulted, for ranking switches.
    pub recent_parity: Option<ParityReport>,
    /// Soft issues observed.
    pub warnings: Vec<String>,
    /// Reasons the effective change was held back, if any.
    pub blocking_reasons: Vec<String>,
    /// The audit event recorded for this attempt.
    pub event_id: EventId,
}

impl SwitchReport {
    /// Whether a gate held back the effective change.
    #[must_use]
    pub fn was_blocked(&self) -> bool {
        !self.blocking_reasons.is_empty()
    }
}

/// Authoritative status view of one subsystem, shaped for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeStatus {
    /// The subsystem described.
    pub subsystem: Subsystem,
    /// The mode an admin last asked for.
    pub requested_mode: String,
    /// The mode actually in force.
    pub effective_mode: String,
    /// Module key → version key overrides.
    pub overrides: BTreeMap<String, String>,
    /// Safe-mode view (global freeze + per-subsystem cache preference).
    pub freeze: SafeMode,
    /// Whether exam mode is on.
    pub exam_mode: bool,
    /// Soft issues (divergence, missing parity data, probe warnings).
    pub warnings: Vec<String>,
    /// Currently active blocking conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocking_reasons: Vec<String>,
    /// Live readiness self-report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness: Option<Readiness>,
    /// Most recent parity comparison (ranking only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_parity: Option<ParityReport>,
}

/// Computes and persists the effective state of every subsystem.
pub struct SwitchEngine {
    store: ConfigStore,
    flags: Arc<FlagStore>,
    gate: FreezeGate,
    audit: Arc<dyn AuditLog>,
    probes: DashMap<Subsystem, Arc<dyn ReadinessProbe>>,
    recent_parity: RwLock<Option<ParityReport>>,
    thresholds: ParityThresholds,
    subsystem_locks: DashMap<Subsystem, Arc<Mutex<()>>>,
    flags_lock: Mutex<()>,
}

impl SwitchEngine {
    /// Create an engine writing audit events to `audit`.
    #[must_use]
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        let flags = Arc::new(FlagStore::new());
        Self {
            store: ConfigStore::new(),
            gate: FreezeGate::new(Arc::clone(&flags)),
            flags,
            audit,
            probes: DashMap::new(),
            recent_parity: RwLock::new(None),
            thresholds: ParityThresholds::default(),
            subsystem_locks: DashMap::new(),
            flags_lock: Mutex::new(()),
        }
    }

    /// Replace the default parity thresholds.
    #[must_use]
    pub fn with_parity_thresholds(mut self, thresholds: ParityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Register a readiness probe for a subsystem, replacing any prior one.
    pub fn register_probe(&self, subsystem: Subsystem, probe: Arc<dyn ReadinessProbe>) {
        self.probes.insert(subsystem, probe);
    }

    /// The freeze gate, for direct mutation paths outside the engine
    /// (warehouse export triggers, import jobs).
    #[must_use]
    pub fn freeze_gate(&self) -> &FreezeGate {
        &self.gate
    }

    /// The global flag store (read-only access; mutation goes through
    /// [`apply`](Self::apply)).
    #[must_use]
    pub fn flags(&self) -> &Arc<FlagStore> {
        &self.flags
    }

    /// Last committed config record for a subsystem.
    #[must_use]
    pub fn config(&self, subsystem: Subsystem) -> RuntimeConfig {
        self.store.get(subsystem)
    }

    /// Record a fresh ranking parity comparison, deriving pass/fail from
    /// the engine's thresholds.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the parity slot is poisoned.
    pub fn record_parity(
        &self,
        max_abs_percentile_diff: f64,
        rank_mismatch_count: u64,
    ) -> SwitchResult<ParityReport> {
        let report = ParityReport::new(
            max_abs_percentile_diff,
            rank_mismatch_count,
            &self.thresholds,
        );
        let mut slot = self
            .recent_parity
            .write()
            .map_err(|e| SwitchError::Storage(e.to_string()))?;
        *slot = Some(report.clone());
        Ok(report)
    }

    /// The most recent parity comparison, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the parity slot is poisoned.
    pub fn recent_parity(&self) -> SwitchResult<Option<ParityReport>> {
        let slot = self
            .recent_parity
            .read()
            .map_err(|e| SwitchError::Storage(e.to_string()))?;
        Ok(slot.clone())
    }

    /// Apply an administrative action, returning the gated outcome.
    ///
    /// A blocked change is a successful call with
    /// `blocking_reasons` populated — the caller decides how to surface it.
    ///
    /// # Errors
    ///
    /// Returns an error only on store or audit failure; gate outcomes are
    /// never errors.
    pub async fn apply(
        &self,
        actor: &Actor,
        action: &ControlAction,
        reason: Option<String>,
    ) -> SwitchResult<SwitchReport> {
        if action.is_flag_toggle() {
            self.apply_flag_toggle(actor, action, reason).await
        } else {
            self.apply_subsystem_change(actor, action, reason).await
        }
    }

    /// Authoritative status for one subsystem, with live readiness.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag store or parity slot is unreadable.
    pub async fn status(&self, subsystem: Subsystem) -> SwitchResult<RuntimeStatus> {
        let config = self.store.get(subsystem);
        let flags = self.flags.snapshot()?;

        let mut warnings = Vec::new();
        let mut blocking_reasons = Vec::new();
        if flags.freeze_updates {
            blocking_reasons.push(FROZEN_REASON.to_string());
        }
        if config.is_diverged() {
            warnings.push(format!(
                "requested mode '{}' is not in effect",
                config.requested_mode
            ));
        }

        let readiness = self.probe_readiness(subsystem, &config.requested_mode).await;
        let recent_parity = if subsystem == Subsystem::Ranking {
            self.recent_parity()?
        } else {
            None
        };

        Ok(RuntimeStatus {
            subsystem,
            requested_mode: config.requested_mode.clone(),
            effective_mode: config.effective_mode.clone(),
            overrides: config.overrides.clone(),
            freeze: SafeMode {
                freeze_updates: flags.freeze_updates,
                prefer_cache: config.prefer_cache,
            },
            exam_mode: flags.exam_mode,
            warnings,
            blocking_reasons,
            readiness: Some(readiness),
            recent_parity,
        })
    }

    async fn probe_readiness(&self, subsystem: Subsystem, target_mode: &str) -> Readiness {
        let probe = self
            .probes
            .get(&subsystem)
            .map(|entry| Arc::clone(entry.value()));
        match probe {
            Some(probe) => probe.check(target_mode).await,
            None => Readiness::ready(),
        }
    }

    async fn apply_flag_toggle(
        &self,
        actor: &Actor,
        action: &ControlAction,
        reason: Option<String>,
    ) -> SwitchResult<SwitchReport> {
        let _guard = self.flags_lock.lock().await;

        let prev_flags = self.flags.snapshot()?;
        let (target_enabled, exam_toggle) = match action {
            ControlAction::Freeze => (true, false),
            ControlAction::Unfreeze => (false, false),
            ControlAction::ExamModeSet { enabled } => (*enabled, true),
            other => {
                return Err(SwitchError::Internal(format!(
                    "not a flag toggle: {}",
                    other.kind()
                )));
            },
        };

        let prev_mode = if exam_toggle {
            exam_mode_label(prev_flags.exam_mode)
        } else {
            freeze_label(prev_flags.freeze_updates)
        };
        let target_mode = if exam_toggle {
            exam_mode_label(target_enabled)
        } else {
            freeze_label(target_enabled)
        };

        let mut blocking_reasons = Vec::new();
        if self.gate.blocks(action)? {
            blocking_reasons.push(FROZEN_REASON.to_string());
        } else if exam_toggle {
            self.flags
                .set_exam_mode(target_enabled, actor, reason.clone())?;
        } else {
            self.flags
                .set_freeze_updates(target_enabled, actor, reason.clone())?;
        }

        let new_flags = self.flags.snapshot()?;
        let effective_mode = if exam_toggle {
            exam_mode_label(new_flags.exam_mode)
        } else {
            freeze_label(new_flags.freeze_updates)
        };

        let previous = ConfigSnapshot {
            requested_mode: prev_mode.to_string(),
            effective_mode: prev_mode.to_string(),
            overrides: BTreeMap::new(),
            flags: prev_flags,
        };
        let new = ConfigSnapshot {
            requested_mode: target_mode.to_string(),
            effective_mode: effective_mode.to_string(),
            overrides: BTreeMap::new(),
            flags: new_flags,
        };

        let event = SwitchEvent::new(
            EventScope::Flags,
            action.kind(),
            previous,
            new,
            reason,
            blocking_reasons.clone(),
            actor.clone(),
        );
        let event_id = event.id.clone();
        self.audit.append(event)?;

        tracing::info!(
            action = %action.kind(),
            actor = %actor.id,
            blocked = !blocking_reasons.is_empty(),
            "flag toggle processed"
        );

        Ok(SwitchReport {
            scope: EventScope::Flags,
            action: action.kind(),
            config: None,
            flags: new_flags,
            readiness: None,
            recent_parity: None,
            warnings: Vec::new(),
            blocking_reasons,
            event_id,
        })
    }

    async fn apply_subsystem_change(
        &self,
        actor: &Actor,
        action: &ControlAction,
        reason: Option<String>,
    ) -> SwitchResult<SwitchReport> {
        let Some(subsystem) = action.subsystem() else {
            return Err(SwitchError::Internal(format!(
                "action has no subsystem: {}",
                action.kind()
            )));
        };

        // Serialize switches per subsystem. The dashmap guard must drop
        // before awaiting the mutex.
        let lock = {
            let entry = self.subsystem_locks.entry(subsystem).or_default();
            Arc::clone(entry.value())
        };
        let _guard = lock.lock().await;

        let prev_config = self.store.get(subsystem);
        let flags = self.flags.snapshot()?;
        let target_mode = action.mode_change().map(|(_, mode)| mode.to_string());

        let mut blocking_reasons = Vec::new();
        let mut warnings = Vec::new();
        let mut readiness = None;
        let mut recent_parity = None;

        if self.gate.blocks(action)? {
            blocking_reasons.push(FROZEN_REASON.to_string());
        } else {
            let probe_target = target_mode
                .as_deref()
                .unwrap_or(prev_config.requested_mode.as_str());
            let report = self.probe_readiness(subsystem, probe_target).await;
            blocking_reasons.extend(report.blocking_reasons.iter().cloned());
            warnings.extend(report.warnings.iter().cloned());
            readiness = Some(report);

            if subsystem == Subsystem::Ranking {
                recent_parity = self.recent_parity()?;
                // Parity gates the forward direction only. Switching back
                // to inactive must stay available as the rollback path.
                let gated = target_mode.as_deref().is_some_and(|m| m != MODE_INACTIVE);
                if gated {
                    match &recent_parity {
                        Some(report) if !report.passed => {
                            blocking_reasons.push(format!(
                                "recent parity comparison failed (max percentile diff {}, {} rank mismatches)",
                                report.max_abs_percentile_diff, report.rank_mismatch_count
                            ));
                        },
                        Some(_) => {},
                        None => {
                            warnings.push("no recent parity comparison for ranking".to_string());
                        },
                    }
                }
            }
        }

        let blocked = !blocking_reasons.is_empty();
        let applies_overrides =
            matches!(action, ControlAction::OverridesApply { .. }) && !blocked;

        if target_mode.is_some() || applies_overrides {
            self.store.update(subsystem, |config| {
                if let Some(mode) = &target_mode {
                    config.requested_mode = mode.clone();
                    if !blocked {
                        config.effective_mode = mode.clone();
                    }
                }
                if applies_overrides
                    && let ControlAction::OverridesApply { overrides, .. } = action
                {
                    config.overrides.extend(overrides.clone());
                }
                config.updated_at = Timestamp::now();
                config.updated_by = Some(actor.clone());
            });
        }

        let new_config = self.store.get(subsystem);
        let event = SwitchEvent::new(
            EventScope::Subsystem { subsystem },
            action.kind(),
            snapshot_of(&prev_config, flags),
            snapshot_of(&new_config, flags),
            reason,
            blocking_reasons.clone(),
            actor.clone(),
        );
        let event_id = event.id.clone();
        self.audit.append(event)?;

        if blocked {
            tracing::warn!(
                subsystem = %subsystem,
                action = %action.kind(),
                actor = %actor.id,
                reasons = ?blocking_reasons,
                "switch blocked"
            );
        } else {
            tracing::info!(
                subsystem = %subsystem,
                action = %action.kind(),
                actor = %actor.id,
                effective_mode = %new_config.effective_mode,
                "switch applied"
            );
        }

        Ok(SwitchReport {
            scope: EventScope::Subsystem { subsystem },
            action: action.kind(),
            config: Some(new_config),
            flags,
            readiness,
            recent_parity,
            warnings,
            blocking_reasons,
            event_id,
        })
    }
}

impl std::fmt::Debug for SwitchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchEngine")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

fn freeze_label(enabled: bool) -> &'static str {
    if enabled { "frozen" } else { "unfrozen" }
}

fn exam_mode_label(enabled: bool) -> &'static str {
    if enabled { "exam_on" } else { "exam_off" }
}

fn snapshot_of(config: &RuntimeConfig, flags: FlagSnapshot) -> ConfigSnapshot {
    ConfigSnapshot {
        requested_mode: config.requested_mode.clone(),
        effective_mode: config.effective_mode.clone(),
        overrides: config.overrides.clone(),
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use switchboard_audit::MemoryAuditLog;
    use switchboard_core::MODE_ACTIVE;

    /// A probe that always reports one blocking reason.
    struct UnreachableStore;

    #[async_trait]
    impl ReadinessProbe for UnreachableStore {
        async fn check(&self, _target_mode: &str) -> Readiness {
            Readiness::from_findings(
                BTreeMap::from([("store_reachable".to_string(), false)]),
                vec!["store unreachable".to_string()],
                Vec::new(),
            )
        }
    }

    /// A probe that reports ready with a warning.
    struct SlowButReady;

    #[async_trait]
    impl ReadinessProbe for SlowButReady {
        async fn check(&self, _target_mode: &str) -> Readiness {
            Readiness::from_findings(
                BTreeMap::from([("latency_ok".to_string(), true)]),
                Vec::new(),
                vec!["elevated latency".to_string()],
            )
        }
    }

    fn make_engine() -> (Arc<MemoryAuditLog>, SwitchEngine) {
        let audit = Arc::new(MemoryAuditLog::new());
        let engine = SwitchEngine::new(Arc::clone(&audit) as Arc<dyn AuditLog>);
        (audit, engine)
    }

    fn switch(subsystem: Subsystem, mode: &str) -> ControlAction {
        ControlAction::RuntimeSwitch {
            subsystem,
            mode: mode.to_string(),
        }
    }

    #[tokio::test]
    async fn test_switch_applies_and_audits() {
        let (audit, engine) = make_engine();
        let actor = Actor::new("alice");

        let report = engine
            .apply(&actor, &switch(Subsystem::Email, "ses"), Some("migration".to_string()))
            .await
            .unwrap();

        assert!(!report.was_blocked());
        let config = report.config.unwrap();
        assert_eq!(config.requested_mode, "ses");
        assert_eq!(config.effective_mode, "ses");
        assert_eq!(audit.count().unwrap(), 1);

        let event = audit.get(&report.event_id).unwrap().unwrap();
        assert_eq!(event.previous.effective_mode, "smtp");
        assert_eq!(event.new.effective_mode, "ses");
        assert_eq!(event.reason.as_deref(), Some("migration"));
    }

    #[tokio::test]
    async fn test_freeze_blocks_but_records_intent() {
        let (audit, engine) = make_engine();
        let actor = Actor::new("alice");

        engine
            .apply(&actor, &ControlAction::Freeze, Some("incident".to_string()))
            .await
            .unwrap();

        let report = engine
            .apply(&actor, &switch(Subsystem::Search, "opensearch"), None)
            .await
            .unwrap();

        assert!(report.was_blocked());
        assert_eq!(report.blocking_reasons, vec![FROZEN_REASON.to_string()]);
        let config = report.config.unwrap();
        // Intent recorded, reality retained.
        assert_eq!(config.requested_mode, "opensearch");
        assert_eq!(config.effective_mode, "database");
        // Both the freeze and the blocked attempt are audited.
        assert_eq!(audit.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unfreeze_applies_while_frozen() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");

        engine
            .apply(&actor, &ControlAction::Freeze, None)
            .await
            .unwrap();
        let report = engine
            .apply(&actor, &ControlAction::Unfreeze, None)
            .await
            .unwrap();

        assert!(!report.was_blocked());
        assert!(!engine.flags().freeze_updates().unwrap().enabled);
    }

    #[tokio::test]
    async fn test_refreeze_while_frozen_is_audited_noop() {
        let (audit, engine) = make_engine();
        let actor = Actor::new("alice");

        engine.apply(&actor, &ControlAction::Freeze, None).await.unwrap();
        let report = engine.apply(&actor, &ControlAction::Freeze, None).await.unwrap();

        assert!(!report.was_blocked());
        assert!(engine.flags().freeze_updates().unwrap().enabled);
        assert_eq!(audit.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_exam_mode_is_freeze_gated() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");

        engine.apply(&actor, &ControlAction::Freeze, None).await.unwrap();
        let report = engine
            .apply(&actor, &ControlAction::ExamModeSet { enabled: true }, None)
            .await
            .unwrap();

        assert!(report.was_blocked());
        assert!(!engine.flags().exam_mode().unwrap().enabled);
    }

    #[tokio::test]
    async fn test_failed_readiness_blocks() {
        let (_, engine) = make_engine();
        engine.register_probe(Subsystem::Graph, Arc::new(UnreachableStore));
        let actor = Actor::new("alice");

        let report = engine
            .apply(&actor, &ControlAction::GraphActivate, None)
            .await
            .unwrap();

        assert!(report.was_blocked());
        assert_eq!(report.blocking_reasons, vec!["store unreachable".to_string()]);
        let config = report.config.unwrap();
        assert_eq!(config.requested_mode, MODE_ACTIVE);
        assert_eq!(config.effective_mode, MODE_INACTIVE);
    }

    #[tokio::test]
    async fn test_probe_warnings_do_not_block() {
        let (_, engine) = make_engine();
        engine.register_probe(Subsystem::Graph, Arc::new(SlowButReady));
        let actor = Actor::new("alice");

        let report = engine
            .apply(&actor, &ControlAction::GraphActivate, None)
            .await
            .unwrap();

        assert!(!report.was_blocked());
        assert_eq!(report.warnings, vec!["elevated latency".to_string()]);
        assert_eq!(report.config.unwrap().effective_mode, MODE_ACTIVE);
    }

    #[tokio::test]
    async fn test_missing_parity_warns_on_rank_activate() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");

        let report = engine
            .apply(&actor, &ControlAction::RankActivate, None)
            .await
            .unwrap();

        assert!(!report.was_blocked());
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.contains("no recent parity comparison"))
        );
    }

    #[tokio::test]
    async fn test_failed_parity_blocks_rank_activate() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");

        let parity = engine.record_parity(2.0, 4).unwrap();
        assert!(!parity.passed);

        let report = engine
            .apply(&actor, &ControlAction::RankActivate, None)
            .await
            .unwrap();

        assert!(report.was_blocked());
        assert_eq!(report.config.unwrap().effective_mode, "legacy");
    }

    #[tokio::test]
    async fn test_failed_parity_does_not_block_deactivation() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");
        engine.record_parity(2.0, 4).unwrap();

        // Get ranking into the active mode first, with a passing report.
        engine.record_parity(0.0, 0).unwrap();
        engine
            .apply(&actor, &ControlAction::RankActivate, None)
            .await
            .unwrap();
        engine.record_parity(2.0, 4).unwrap();

        let report = engine
            .apply(&actor, &ControlAction::RankDeactivate, None)
            .await
            .unwrap();
        assert!(!report.was_blocked());
        assert_eq!(report.config.unwrap().effective_mode, MODE_INACTIVE);
    }

    #[tokio::test]
    async fn test_passing_parity_lets_switch_through() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");
        engine.record_parity(0.1, 0).unwrap();

        let report = engine
            .apply(&actor, &switch(Subsystem::Ranking, "v2"), None)
            .await
            .unwrap();

        assert!(!report.was_blocked());
        assert_eq!(report.config.unwrap().effective_mode, "v2");
        assert!(report.recent_parity.is_some());
    }

    #[tokio::test]
    async fn test_overrides_merge() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");

        let apply = |overrides: BTreeMap<String, String>| ControlAction::OverridesApply {
            subsystem: Subsystem::Search,
            overrides,
        };

        engine
            .apply(
                &actor,
                &apply(BTreeMap::from([("tokenizer".to_string(), "v2".to_string())])),
                None,
            )
            .await
            .unwrap();
        engine
            .apply(
                &actor,
                &apply(BTreeMap::from([
                    ("tokenizer".to_string(), "v3".to_string()),
                    ("stemmer".to_string(), "en".to_string()),
                ])),
                None,
            )
            .await
            .unwrap();

        let config = engine.config(Subsystem::Search);
        assert_eq!(config.overrides.get("tokenizer").map(String::as_str), Some("v3"));
        assert_eq!(config.overrides.get("stemmer").map(String::as_str), Some("en"));
    }

    #[tokio::test]
    async fn test_blocked_overrides_do_not_apply() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");

        engine.apply(&actor, &ControlAction::Freeze, None).await.unwrap();
        let report = engine
            .apply(
                &actor,
                &ControlAction::OverridesApply {
                    subsystem: Subsystem::Search,
                    overrides: BTreeMap::from([("tokenizer".to_string(), "v3".to_string())]),
                },
                None,
            )
            .await
            .unwrap();

        assert!(report.was_blocked());
        assert!(engine.config(Subsystem::Search).overrides.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_switches_on_same_subsystem_serialize() {
        let (audit, engine) = make_engine();
        let engine = Arc::new(engine);
        let actor = Actor::new("alice");

        let a = {
            let engine = Arc::clone(&engine);
            let actor = actor.clone();
            tokio::spawn(
                async move { engine.apply(&actor, &switch(Subsystem::Email, "ses"), None).await },
            )
        };
        let b = {
            let engine = Arc::clone(&engine);
            let actor = actor.clone();
            tokio::spawn(async move {
                engine.apply(&actor, &switch(Subsystem::Email, "smtp"), None).await
            })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // Both attempts audited; last committed wins and is self-consistent.
        assert_eq!(audit.count().unwrap(), 2);
        let config = engine.config(Subsystem::Email);
        assert_eq!(config.requested_mode, config.effective_mode);
    }

    #[tokio::test]
    async fn test_status_is_stable_without_switches() {
        let (_, engine) = make_engine();
        let first = engine.status(Subsystem::Irt).await.unwrap();
        let second = engine.status(Subsystem::Irt).await.unwrap();
        assert_eq!(first.requested_mode, second.requested_mode);
        assert_eq!(first.effective_mode, second.effective_mode);
    }

    #[tokio::test]
    async fn test_status_reports_divergence_warning() {
        let (_, engine) = make_engine();
        let actor = Actor::new("alice");

        engine.apply(&actor, &ControlAction::Freeze, None).await.unwrap();
        engine
            .apply(&actor, &switch(Subsystem::Search, "opensearch"), None)
            .await
            .unwrap();

        let status = engine.status(Subsystem::Search).await.unwrap();
        assert_eq!(status.requested_mode, "opensearch");
        assert_eq!(status.effective_mode, "database");
        assert!(status.freeze.freeze_updates);
        assert!(!status.blocking_reasons.is_empty());
        assert!(
            status
                .warnings
                .iter()
                .any(|w| w.contains("not in effect"))
        );
    }
}
