//! Administrative action classification.
//!
//! [`ControlAction`] is the typed payload for every mutating control-plane
//! operation. Each variant captures exactly the data the switch engine
//! needs, so the engine pattern-matches exhaustively instead of trusting
//! untyped maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::{RiskLevel, Subsystem};

/// Mode key a subsystem runs in after an activation action.
pub const MODE_ACTIVE: &str = "active";
/// Mode key a subsystem runs in after a deactivation action.
pub const MODE_INACTIVE: &str = "inactive";

/// An administrative intent against the runtime control plane.
///
/// Every variant is a mutation: it either moves a subsystem to a new mode,
/// rewrites its overrides, or toggles a global flag. Reads never take this
/// shape and are never gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ControlAction {
    /// Switch a subsystem to a named mode (e.g. ranking `legacy` → `v2`).
    RuntimeSwitch {
        /// The subsystem being switched.
        subsystem: Subsystem,
        /// The mode being requested.
        mode: String,
    },

    /// Replace module-version overrides on a subsystem.
    OverridesApply {
        /// The subsystem whose overrides change.
        subsystem: Subsystem,
        /// Mapping of module key → version key.
        overrides: BTreeMap<String, String>,
    },

    /// Enable the global `freeze_updates` flag.
    Freeze,

    /// Disable the global `freeze_updates` flag.
    Unfreeze,

    /// Activate item-response-theory scoring.
    IrtActivate,

    /// Deactivate item-response-theory scoring.
    IrtDeactivate,

    /// Activate the percentile ranking engine.
    RankActivate,

    /// Deactivate the percentile ranking engine.
    RankDeactivate,

    /// Activate knowledge-graph sync.
    GraphActivate,

    /// Deactivate knowledge-graph sync.
    GraphDeactivate,

    /// Set the global `exam_mode` flag.
    ExamModeSet {
        /// Desired flag state.
        enabled: bool,
    },
}

/// Discriminant of a [`ControlAction`], used for phrase lookup and
/// conflict grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// `runtime_switch`
    RuntimeSwitch,
    /// `overrides_apply`
    OverridesApply,
    /// `freeze`
    Freeze,
    /// `unfreeze`
    Unfreeze,
    /// `irt_activate`
    IrtActivate,
    /// `irt_deactivate`
    IrtDeactivate,
    /// `rank_activate`
    RankActivate,
    /// `rank_deactivate`
    RankDeactivate,
    /// `graph_activate`
    GraphActivate,
    /// `graph_deactivate`
    GraphDeactivate,
    /// `exam_mode_set`
    ExamModeSet,
}

impl ActionKind {
    /// All action kinds, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::RuntimeSwitch,
        Self::OverridesApply,
        Self::Freeze,
        Self::Unfreeze,
        Self::IrtActivate,
        Self::IrtDeactivate,
        Self::RankActivate,
        Self::RankDeactivate,
        Self::GraphActivate,
        Self::GraphDeactivate,
        Self::ExamModeSet,
    ];

    /// Stable string label (matches the serde tag of [`ControlAction`]).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RuntimeSwitch => "runtime_switch",
            Self::OverridesApply => "overrides_apply",
            Self::Freeze => "freeze",
            Self::Unfreeze => "unfreeze",
            Self::IrtActivate => "irt_activate",
            Self::IrtDeactivate => "irt_deactivate",
            Self::RankActivate => "rank_activate",
            Self::RankDeactivate => "rank_deactivate",
            Self::GraphActivate => "graph_activate",
            Self::GraphDeactivate => "graph_deactivate",
            Self::ExamModeSet => "exam_mode_set",
        }
    }

    /// Default confirmation phrase the executing admin must type back.
    ///
    /// Overridable per deployment via `switchboard-config`.
    #[must_use]
    pub fn default_phrase(&self) -> &'static str {
        match self {
            Self::RuntimeSwitch => "SWITCH-RUNTIME",
            Self::OverridesApply => "APPLY-OVERRIDES",
            Self::Freeze => "FREEZE-UPDATES",
            Self::Unfreeze => "UNFREEZE-UPDATES",
            Self::IrtActivate => "ACTIVATE-IRT",
            Self::IrtDeactivate => "DEACTIVATE-IRT",
            Self::RankActivate => "ACTIVATE-RANKING",
            Self::RankDeactivate => "DEACTIVATE-RANKING",
            Self::GraphActivate => "ACTIVATE-GRAPH",
            Self::GraphDeactivate => "DEACTIVATE-GRAPH",
            Self::ExamModeSet => "SET-EXAM-MODE",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ControlAction {
    /// Get the discriminant of this action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::RuntimeSwitch { .. } => ActionKind::RuntimeSwitch,
            Self::OverridesApply { .. } => ActionKind::OverridesApply,
            Self::Freeze => ActionKind::Freeze,
            Self::Unfreeze => ActionKind::Unfreeze,
            Self::IrtActivate => ActionKind::IrtActivate,
            Self::IrtDeactivate => ActionKind::IrtDeactivate,
            Self::RankActivate => ActionKind::RankActivate,
            Self::RankDeactivate => ActionKind::RankDeactivate,
            Self::GraphActivate => ActionKind::GraphActivate,
            Self::GraphDeactivate => ActionKind::GraphDeactivate,
            Self::ExamModeSet { .. } => ActionKind::ExamModeSet,
        }
    }

    /// Default risk level, which decides whether a second administrator's
    /// approval is mandatory before this action is applied.
    ///
    /// `Freeze` is deliberately medium: raising the shield during an
    /// incident must not wait for a second admin. `Unfreeze` lifts the
    /// shield, which is the risky direction.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Self::RuntimeSwitch { .. } | Self::Unfreeze | Self::IrtActivate | Self::RankActivate => {
                RiskLevel::High
            },
            Self::OverridesApply { .. }
            | Self::Freeze
            | Self::IrtDeactivate
            | Self::RankDeactivate
            | Self::GraphActivate
            | Self::GraphDeactivate
            | Self::ExamModeSet { .. } => RiskLevel::Medium,
        }
    }

    /// Check if this action toggles the `freeze_updates` flag itself.
    ///
    /// The freeze gate never blocks these: blocking `unfreeze` would make
    /// a freeze permanent, and re-freezing while frozen is an idempotent
    /// no-op that still deserves an audit entry.
    #[must_use]
    pub fn is_freeze_toggle(&self) -> bool {
        matches!(self, Self::Freeze | Self::Unfreeze)
    }

    /// Check if this action toggles a global flag rather than a subsystem.
    #[must_use]
    pub fn is_flag_toggle(&self) -> bool {
        matches!(self, Self::Freeze | Self::Unfreeze | Self::ExamModeSet { .. })
    }

    /// The subsystem this action touches, if any.
    ///
    /// Flag toggles return `None`: they live in the global flag scope.
    #[must_use]
    pub fn subsystem(&self) -> Option<Subsystem> {
        match self {
            Self::RuntimeSwitch { subsystem, .. } | Self::OverridesApply { subsystem, .. } => {
                Some(*subsystem)
            },
            Self::IrtActivate | Self::IrtDeactivate => Some(Subsystem::Irt),
            Self::RankActivate | Self::RankDeactivate => Some(Subsystem::Ranking),
            Self::GraphActivate | Self::GraphDeactivate => Some(Subsystem::Graph),
            Self::Freeze | Self::Unfreeze | Self::ExamModeSet { .. } => None,
        }
    }

    /// The mode change this action requests, if it is a mode change.
    ///
    /// Activation pairs resolve to the `active`/`inactive` modes of their
    /// subsystem; `OverridesApply` and flag toggles are not mode changes.
    #[must_use]
    pub fn mode_change(&self) -> Option<(Subsystem, &str)> {
        match self {
            Self::RuntimeSwitch { subsystem, mode } => Some((*subsystem, mode.as_str())),
            Self::IrtActivate => Some((Subsystem::Irt, MODE_ACTIVE)),
            Self::IrtDeactivate => Some((Subsystem::Irt, MODE_INACTIVE)),
            Self::RankActivate => Some((Subsystem::Ranking, MODE_ACTIVE)),
            Self::RankDeactivate => Some((Subsystem::Ranking, MODE_INACTIVE)),
            Self::GraphActivate => Some((Subsystem::Graph, MODE_ACTIVE)),
            Self::GraphDeactivate => Some((Subsystem::Graph, MODE_INACTIVE)),
            Self::OverridesApply { .. }
            | Self::Freeze
            | Self::Unfreeze
            | Self::ExamModeSet { .. } => None,
        }
    }

    /// Human-readable description of the change, computed at staging time.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::RuntimeSwitch { subsystem, mode } => {
                format!("switch {subsystem} to mode {mode}")
            },
            Self::OverridesApply {
                subsystem,
                overrides,
            } => {
                format!("apply {} override(s) to {subsystem}", overrides.len())
            },
            Self::Freeze => "freeze all runtime updates".to_string(),
            Self::Unfreeze => "unfreeze runtime updates".to_string(),
            Self::IrtActivate => "activate IRT scoring".to_string(),
            Self::IrtDeactivate => "deactivate IRT scoring".to_string(),
            Self::RankActivate => "activate ranking engine".to_string(),
            Self::RankDeactivate => "deactivate ranking engine".to_string(),
            Self::GraphActivate => "activate graph sync".to_string(),
            Self::GraphDeactivate => "deactivate graph sync".to_string(),
            Self::ExamModeSet { enabled } => {
                if *enabled {
                    "enable exam mode".to_string()
                } else {
                    "disable exam mode".to_string()
                }
            },
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_match_serde_tags() {
        let action = ControlAction::RuntimeSwitch {
            subsystem: Subsystem::Ranking,
            mode: "v2".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], action.kind().as_str());

        let flag = ControlAction::ExamModeSet { enabled: true };
        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["type"], flag.kind().as_str());
    }

    #[test]
    fn test_serde_roundtrip() {
        let action = ControlAction::OverridesApply {
            subsystem: Subsystem::Search,
            overrides: BTreeMap::from([("tokenizer".to_string(), "v3".to_string())]),
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: ControlAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_activation_mode_changes() {
        assert_eq!(
            ControlAction::IrtActivate.mode_change(),
            Some((Subsystem::Irt, MODE_ACTIVE))
        );
        assert_eq!(
            ControlAction::RankDeactivate.mode_change(),
            Some((Subsystem::Ranking, MODE_INACTIVE))
        );
        assert_eq!(ControlAction::Freeze.mode_change(), None);
    }

    #[test]
    fn test_risk_defaults() {
        assert_eq!(ControlAction::IrtActivate.risk_level(), RiskLevel::High);
        assert_eq!(ControlAction::Unfreeze.risk_level(), RiskLevel::High);
        assert_eq!(ControlAction::Freeze.risk_level(), RiskLevel::Medium);
        assert_eq!(
            ControlAction::GraphDeactivate.risk_level(),
            RiskLevel::Medium
        );
    }

    #[test]
    fn test_freeze_toggles_are_gate_exempt() {
        assert!(ControlAction::Unfreeze.is_freeze_toggle());
        assert!(ControlAction::Freeze.is_freeze_toggle());
        assert!(!ControlAction::IrtActivate.is_freeze_toggle());
        assert!(!ControlAction::ExamModeSet { enabled: true }.is_freeze_toggle());
    }

    #[test]
    fn test_flag_toggles_have_no_subsystem() {
        assert_eq!(ControlAction::Freeze.subsystem(), None);
        assert_eq!(
            ControlAction::ExamModeSet { enabled: false }.subsystem(),
            None
        );
        assert_eq!(
            ControlAction::GraphActivate.subsystem(),
            Some(Subsystem::Graph)
        );
    }

    #[test]
    fn test_default_phrases_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for kind in ActionKind::ALL {
            assert!(seen.insert(kind.default_phrase()), "duplicate phrase");
        }
    }
}
