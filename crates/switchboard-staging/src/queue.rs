//! The staged change queue.
//!
//! A session-scoped value object: no interior mutability, no global state.
//! The owning session mutates it directly and hands it to the gateway's
//! submit operation. Nothing in here is ever persisted.

use serde::{Deserialize, Serialize};

use switchboard_core::{ControlAction, RiskLevel, StagedActionId, Timestamp};

use crate::conflict::ConflictGroup;

/// An administrator's not-yet-committed intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAction {
    /// Opaque identifier, generated on insertion.
    pub id: StagedActionId,
    /// The typed action payload.
    pub action: ControlAction,
    /// Human-readable description, computed at staging time.
    pub diff_summary: String,
    /// Risk classification; decides whether approval is mandatory.
    pub risk_level: RiskLevel,
    /// The exact confirmation string the executing admin must type back.
    pub required_phrase: String,
    /// When the action was staged.
    pub staged_at: Timestamp,
}

impl StagedAction {
    /// Stage an action, computing its summary, risk, and phrase.
    #[must_use]
    pub fn new(action: ControlAction) -> Self {
        let diff_summary = action.describe();
        let risk_level = action.risk_level();
        let required_phrase = action.kind().default_phrase().to_string();
        Self {
            id: StagedActionId::new(),
            action,
            diff_summary,
            risk_level,
            required_phrase,
            staged_at: Timestamp::now(),
        }
    }

    /// The conflict group this staged action belongs to, if any.
    #[must_use]
    pub fn conflict_group(&self) -> Option<ConflictGroup> {
        ConflictGroup::of(self.action.kind())
    }
}

/// Zero or more staged actions pending submission.
///
/// Invariant: at most one staged action per non-`None` conflict group.
/// Staging an action evicts any earlier action from the same group, so an
/// admin who reconsiders a freeze before submitting never ends up
/// submitting both `freeze` and `unfreeze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedQueue {
    actions: Vec<StagedAction>,
}

impl StagedQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an action, evicting any earlier action in the same conflict
    /// group, and return the fresh id.
    pub fn stage(&mut self, action: ControlAction) -> StagedActionId {
        let staged = StagedAction::new(action);
        if let Some(group) = staged.conflict_group() {
            self.actions
                .retain(|existing| existing.conflict_group() != Some(group));
        }
        let id = staged.id.clone();
        self.actions.push(staged);
        id
    }

    /// Remove a staged action by id. No-op if absent.
    pub fn remove(&mut self, id: &StagedActionId) {
        self.actions.retain(|a| &a.id != id);
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// True iff anything is staged.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Number of staged actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True iff nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The staged actions, oldest first.
    #[must_use]
    pub fn actions(&self) -> &[StagedAction] {
        &self.actions
    }

    /// Consume the queue for submission, yielding the actions oldest first.
    #[must_use]
    pub fn into_actions(self) -> Vec<StagedAction> {
        self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::Subsystem;

    #[test]
    fn test_stage_and_summary() {
        let mut queue = StagedQueue::new();
        let id = queue.stage(ControlAction::IrtActivate);
        assert!(queue.has_changes());
        assert_eq!(queue.len(), 1);

        let staged = &queue.actions()[0];
        assert_eq!(staged.id, id);
        assert_eq!(staged.diff_summary, "activate IRT scoring");
        assert_eq!(staged.required_phrase, "ACTIVATE-IRT");
        assert_eq!(staged.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_same_group_evicts_earlier_intent() {
        let mut queue = StagedQueue::new();
        queue.stage(ControlAction::Freeze);
        let unfreeze_id = queue.stage(ControlAction::Unfreeze);

        // Only the latest intent in freeze_group survives.
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.actions()[0].id, unfreeze_id);
        assert_eq!(queue.actions()[0].action, ControlAction::Unfreeze);
    }

    #[test]
    fn test_restaging_same_kind_replaces() {
        let mut queue = StagedQueue::new();
        queue.stage(ControlAction::ExamModeSet { enabled: true });
        queue.stage(ControlAction::ExamModeSet { enabled: false });

        assert_eq!(queue.len(), 1);
        assert_eq!(
            queue.actions()[0].action,
            ControlAction::ExamModeSet { enabled: false }
        );
    }

    #[test]
    fn test_ungrouped_actions_never_evict_each_other() {
        let mut queue = StagedQueue::new();
        queue.stage(ControlAction::RuntimeSwitch {
            subsystem: Subsystem::Email,
            mode: "smtp".to_string(),
        });
        queue.stage(ControlAction::RuntimeSwitch {
            subsystem: Subsystem::Email,
            mode: "ses".to_string(),
        });
        queue.stage(ControlAction::OverridesApply {
            subsystem: Subsystem::Search,
            overrides: std::collections::BTreeMap::new(),
        });

        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_distinct_groups_coexist() {
        let mut queue = StagedQueue::new();
        queue.stage(ControlAction::Freeze);
        queue.stage(ControlAction::IrtActivate);
        queue.stage(ControlAction::GraphDeactivate);

        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut queue = StagedQueue::new();
        let id = queue.stage(ControlAction::Freeze);
        queue.remove(&StagedActionId::new());
        assert_eq!(queue.len(), 1);

        queue.remove(&id);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue = StagedQueue::new();
        queue.stage(ControlAction::Freeze);
        queue.stage(ControlAction::IrtActivate);
        queue.clear();
        assert!(!queue.has_changes());
    }
}
