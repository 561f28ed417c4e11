//! Switch event types.
//!
//! Every committed transition — applied or blocked — is recorded as a
//! [`SwitchEvent`] with before/after snapshots. Events are immutable once
//! written; rollback is a new forward switch, never a log mutation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use switchboard_core::{ActionKind, Actor, EventId, Subsystem, Timestamp};

/// The scope an event was recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope")]
pub enum EventScope {
    /// A switch on one subsystem's runtime config.
    Subsystem {
        /// The subsystem that was switched.
        subsystem: Subsystem,
    },
    /// A global flag toggle (`freeze_updates`, `exam_mode`).
    Flags,
}

impl fmt::Display for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subsystem { subsystem } => write!(f, "{subsystem}"),
            Self::Flags => write!(f, "flags"),
        }
    }
}

/// Global flag state as recorded in a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSnapshot {
    /// Whether all mutating runtime changes were frozen.
    pub freeze_updates: bool,
    /// Whether exam mode was on.
    pub exam_mode: bool,
}

/// What was in force at one point in time, denormalized for the log.
///
/// For flag-toggle events the mode fields carry the flag scope's pseudo
/// modes and `overrides` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// The mode an admin last asked for.
    pub requested_mode: String,
    /// The mode actually in force after gating.
    pub effective_mode: String,
    /// Module key → version key overrides.
    pub overrides: BTreeMap<String, String>,
    /// Global flags at snapshot time.
    pub flags: FlagSnapshot,
}

/// An immutable audit record of one attempted transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// Scope the transition ran against.
    pub scope: EventScope,
    /// Kind of action that drove the transition.
    pub action: ActionKind,
    /// State before the transition.
    pub previous: ConfigSnapshot,
    /// State after the transition.
    pub new: ConfigSnapshot,
    /// Free-text reason supplied by the actor.
    pub reason: Option<String>,
    /// Gate reasons that held back the effective change, if any.
    pub blocking_reasons: Vec<String>,
    /// Who drove the transition.
    pub created_by: Actor,
    /// When the event was recorded.
    pub created_at: Timestamp,
}

impl SwitchEvent {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(
        scope: EventScope,
        action: ActionKind,
        previous: ConfigSnapshot,
        new: ConfigSnapshot,
        reason: Option<String>,
        blocking_reasons: Vec<String>,
        created_by: Actor,
    ) -> Self {
        Self {
            id: EventId::new(),
            scope,
            action,
            previous,
            new,
            reason,
            blocking_reasons,
            created_by,
            created_at: Timestamp::now(),
        }
    }

    /// Whether the transition was held back by a gate.
    #[must_use]
    pub fn was_blocked(&self) -> bool {
        !self.blocking_reasons.is_empty()
    }

    /// One-line description for event list views.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.was_blocked() {
            format!(
                "{}: {} blocked ({})",
                self.scope,
                self.action,
                self.blocking_reasons.join("; ")
            )
        } else {
            format!(
                "{}: {} {} -> {}",
                self.scope, self.action, self.previous.effective_mode, self.new.effective_mode
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(mode: &str) -> ConfigSnapshot {
        ConfigSnapshot {
            requested_mode: mode.to_string(),
            effective_mode: mode.to_string(),
            overrides: BTreeMap::new(),
            flags: FlagSnapshot::default(),
        }
    }

    #[test]
    fn test_describe_applied() {
        let event = SwitchEvent::new(
            EventScope::Subsystem {
                subsystem: Subsystem::Ranking,
            },
            ActionKind::RuntimeSwitch,
            snapshot("legacy"),
            snapshot("v2"),
            Some("cutover".to_string()),
            Vec::new(),
            Actor::new("alice"),
        );
        assert!(!event.was_blocked());
        assert_eq!(event.describe(), "ranking: runtime_switch legacy -> v2");
    }

    #[test]
    fn test_describe_blocked() {
        let event = SwitchEvent::new(
            EventScope::Subsystem {
                subsystem: Subsystem::Irt,
            },
            ActionKind::IrtActivate,
            snapshot("inactive"),
            snapshot("inactive"),
            None,
            vec!["updates are frozen".to_string()],
            Actor::new("bob"),
        );
        assert!(event.was_blocked());
        assert!(event.describe().contains("blocked"));
        assert!(event.describe().contains("updates are frozen"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let event = SwitchEvent::new(
            EventScope::Flags,
            ActionKind::Freeze,
            ConfigSnapshot::default(),
            ConfigSnapshot {
                flags: FlagSnapshot {
                    freeze_updates: true,
                    exam_mode: false,
                },
                ..ConfigSnapshot::default()
            },
            Some("incident".to_string()),
            Vec::new(),
            Actor::new("alice"),
        );
        let json = serde_json::to_string(&event).unwrap();
        let back: SwitchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
