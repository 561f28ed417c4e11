//! Conflict grouping of staged action kinds.
//!
//! Mutually exclusive action families (freeze/unfreeze, activate/deactivate
//! pairs) share a group so that only the latest staged intent per family
//! survives. Grouping is a pure function of the action kind.

use serde::{Deserialize, Serialize};
use std::fmt;

use switchboard_core::ActionKind;

/// A family of mutually exclusive staged actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictGroup {
    /// `freeze` / `unfreeze`.
    Freeze,
    /// `irt_activate` / `irt_deactivate`.
    Irt,
    /// `rank_activate` / `rank_deactivate`.
    Ranking,
    /// `graph_activate` / `graph_deactivate`.
    Graph,
    /// `exam_mode_set` (self-exclusive: restaging replaces the prior value).
    ExamMode,
}

impl ConflictGroup {
    /// Map an action kind to its conflict group.
    ///
    /// Kinds without a group (`runtime_switch`, `overrides_apply`) return
    /// `None` and are never deduplicated against each other.
    #[must_use]
    pub fn of(kind: ActionKind) -> Option<Self> {
        match kind {
            ActionKind::Freeze | ActionKind::Unfreeze => Some(Self::Freeze),
            ActionKind::IrtActivate | ActionKind::IrtDeactivate => Some(Self::Irt),
            ActionKind::RankActivate | ActionKind::RankDeactivate => Some(Self::Ranking),
            ActionKind::GraphActivate | ActionKind::GraphDeactivate => Some(Self::Graph),
            ActionKind::ExamModeSet => Some(Self::ExamMode),
            ActionKind::RuntimeSwitch | ActionKind::OverridesApply => None,
        }
    }
}

impl fmt::Display for ConflictGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Freeze => write!(f, "freeze_group"),
            Self::Irt => write!(f, "irt_group"),
            Self::Ranking => write!(f, "ranking_group"),
            Self::Graph => write!(f, "graph_group"),
            Self::ExamMode => write!(f, "exam_mode_group"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_pairs_share_a_group() {
        assert_eq!(
            ConflictGroup::of(ActionKind::Freeze),
            ConflictGroup::of(ActionKind::Unfreeze)
        );
        assert_eq!(
            ConflictGroup::of(ActionKind::IrtActivate),
            ConflictGroup::of(ActionKind::IrtDeactivate)
        );
        assert_eq!(
            ConflictGroup::of(ActionKind::RankActivate),
            ConflictGroup::of(ActionKind::RankDeactivate)
        );
        assert_eq!(
            ConflictGroup::of(ActionKind::GraphActivate),
            ConflictGroup::of(ActionKind::GraphDeactivate)
        );
    }

    #[test]
    fn test_distinct_families_do_not_collide() {
        assert_ne!(
            ConflictGroup::of(ActionKind::Freeze),
            ConflictGroup::of(ActionKind::IrtActivate)
        );
        assert_ne!(
            ConflictGroup::of(ActionKind::RankActivate),
            ConflictGroup::of(ActionKind::GraphActivate)
        );
    }

    #[test]
    fn test_unmapped_kinds_have_no_group() {
        assert_eq!(ConflictGroup::of(ActionKind::RuntimeSwitch), None);
        assert_eq!(ConflictGroup::of(ActionKind::OverridesApply), None);
    }
}
