//! Audit log storage trait and in-memory implementation.
//!
//! The trait is deliberately append-only: no update or delete operation
//! exists, at any backend. "Last switch events" views and rollback
//! investigations read from here; rollback itself is a new forward switch.

use std::sync::RwLock;

use switchboard_core::EventId;

use crate::error::{AuditError, AuditResult};
use crate::event::{EventScope, SwitchEvent};

/// Storage backend for the switch event log.
///
/// Implementations must be thread-safe and accept concurrent appends; the
/// only ordering requirement is the timestamp each entry carries.
pub trait AuditLog: Send + Sync {
    /// Append an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be persisted.
    fn append(&self, event: SwitchEvent) -> AuditResult<()>;

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    fn get(&self, id: &EventId) -> AuditResult<Option<SwitchEvent>>;

    /// Events for a scope, most recent first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    fn list_recent(&self, scope: EventScope, limit: usize) -> AuditResult<Vec<SwitchEvent>>;

    /// Total number of recorded events.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn count(&self) -> AuditResult<usize>;
}

/// In-memory audit log.
///
/// Keeps insertion order; `list_recent` sorts by timestamp descending and
/// lists the latest append first among same-instant entries, so concurrent
/// appends still list deterministically.
#[derive(Default)]
pub struct MemoryAuditLog {
    events: RwLock<Vec<SwitchEvent>>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, event: SwitchEvent) -> AuditResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|e| AuditError::Storage(e.to_string()))?;
        tracing::debug!(event = %event.id, scope = %event.scope, "audit event appended");
        events.push(event);
        Ok(())
    }

    fn get(&self, id: &EventId) -> AuditResult<Option<SwitchEvent>> {
        let events = self
            .events
            .read()
            .map_err(|e| AuditError::Storage(e.to_string()))?;
        Ok(events.iter().find(|e| &e.id == id).cloned())
    }

    fn list_recent(&self, scope: EventScope, limit: usize) -> AuditResult<Vec<SwitchEvent>> {
        let events = self
            .events
            .read()
            .map_err(|e| AuditError::Storage(e.to_string()))?;
        // Walk latest-append-first so the stable sort breaks timestamp
        // ties toward the most recent append.
        let mut matching: Vec<SwitchEvent> = events
            .iter()
            .rev()
            .filter(|e| e.scope == scope)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    fn count(&self) -> AuditResult<usize> {
        let events = self
            .events
            .read()
            .map_err(|e| AuditError::Storage(e.to_string()))?;
        Ok(events.len())
    }
}

impl std::fmt::Debug for MemoryAuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.events.read().map(|e| e.len()).unwrap_or(0);
        f.debug_struct("MemoryAuditLog")
            .field("count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ConfigSnapshot;
    use switchboard_core::{ActionKind, Actor, Subsystem};

    fn event_for(subsystem: Subsystem, mode: &str) -> SwitchEvent {
        SwitchEvent::new(
            EventScope::Subsystem { subsystem },
            ActionKind::RuntimeSwitch,
            ConfigSnapshot::default(),
            ConfigSnapshot {
                requested_mode: mode.to_string(),
                effective_mode: mode.to_string(),
                ..ConfigSnapshot::default()
            },
            None,
            Vec::new(),
            Actor::new("alice"),
        )
    }

    #[test]
    fn test_append_and_get() {
        let log = MemoryAuditLog::new();
        let event = event_for(Subsystem::Search, "opensearch");
        let id = event.id.clone();

        log.append(event).unwrap();
        assert_eq!(log.count().unwrap(), 1);

        let fetched = log.get(&id).unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.new.effective_mode, "opensearch");
    }

    #[test]
    fn test_get_unknown_is_none() {
        let log = MemoryAuditLog::new();
        assert!(log.get(&EventId::new()).unwrap().is_none());
    }

    #[test]
    fn test_list_recent_is_scoped_and_newest_first() {
        let log = MemoryAuditLog::new();
        log.append(event_for(Subsystem::Ranking, "legacy")).unwrap();
        log.append(event_for(Subsystem::Email, "ses")).unwrap();
        log.append(event_for(Subsystem::Ranking, "v2")).unwrap();

        let recent = log
            .list_recent(
                EventScope::Subsystem {
                    subsystem: Subsystem::Ranking,
                },
                10,
            )
            .unwrap();
        assert_eq!(recent.len(), 2);
        // Most recent first.
        assert_eq!(recent[0].new.effective_mode, "v2");
        assert_eq!(recent[1].new.effective_mode, "legacy");
    }

    #[test]
    fn test_list_recent_respects_limit() {
        let log = MemoryAuditLog::new();
        for i in 0..5 {
            log.append(event_for(Subsystem::Graph, &format!("m{i}")))
                .unwrap();
        }
        let recent = log
            .list_recent(
                EventScope::Subsystem {
                    subsystem: Subsystem::Graph,
                },
                3,
            )
            .unwrap();
        assert_eq!(recent.len(), 3);
    }

    #[test]
    fn test_equal_timestamps_list_latest_append_first() {
        let log = MemoryAuditLog::new();
        let first = event_for(Subsystem::Graph, "m1");
        let mut second = event_for(Subsystem::Graph, "m2");
        second.created_at = first.created_at;
        log.append(first).unwrap();
        log.append(second).unwrap();

        let recent = log
            .list_recent(
                EventScope::Subsystem {
                    subsystem: Subsystem::Graph,
                },
                10,
            )
            .unwrap();
        assert_eq!(recent[0].new.effective_mode, "m2");
        assert_eq!(recent[1].new.effective_mode, "m1");
    }

    #[test]
    fn test_flag_scope_separate_from_subsystems() {
        let log = MemoryAuditLog::new();
        log.append(event_for(Subsystem::Ranking, "v2")).unwrap();

        let flags = log.list_recent(EventScope::Flags, 10).unwrap();
        assert!(flags.is_empty());
    }
}
