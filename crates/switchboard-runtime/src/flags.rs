//! Global flags and the freeze gate.
//!
//! Two singleton flags exist: `freeze_updates` (suppresses all mutating
//! runtime changes) and `exam_mode`. Setters are crate-private so that the
//! switch engine is the only writer — every flag change flows through the
//! same audit path as any other runtime change.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use switchboard_audit::FlagSnapshot;
use switchboard_core::{Actor, ControlAction, Timestamp};

use crate::error::{SwitchError, SwitchResult};

/// Where a flag value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    /// Initial seed value, never explicitly set.
    Default,
    /// Set through the switch engine.
    SwitchEngine,
}

/// One global flag with its change metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Current value.
    pub enabled: bool,
    /// When the flag last changed.
    pub updated_at: Timestamp,
    /// Who last changed it (`None` for the seed value).
    pub updated_by: Option<Actor>,
    /// Free-text reason given on the last change.
    pub reason: Option<String>,
    /// Where the current value came from.
    pub source: FlagSource,
}

impl Flag {
    fn seed() -> Self {
        Self {
            enabled: false,
            updated_at: Timestamp::now(),
            updated_by: None,
            reason: None,
            source: FlagSource::Default,
        }
    }

    fn set(&mut self, enabled: bool, actor: &Actor, reason: Option<String>) {
        self.enabled = enabled;
        self.updated_at = Timestamp::now();
        self.updated_by = Some(actor.clone());
        self.reason = reason;
        self.source = FlagSource::SwitchEngine;
    }
}

#[derive(Debug, Clone)]
struct FlagsInner {
    freeze_updates: Flag,
    exam_mode: Flag,
}

/// Thread-safe store of the global flags.
///
/// Readers never block writers for long: all reads take a snapshot under a
/// short read lock.
#[derive(Debug)]
pub struct FlagStore {
    inner: RwLock<FlagsInner>,
}

impl FlagStore {
    /// Create a store with both flags off.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(FlagsInner {
                freeze_updates: Flag::seed(),
                exam_mode: Flag::seed(),
            }),
        }
    }

    /// Current `freeze_updates` flag.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the internal lock is poisoned.
    pub fn freeze_updates(&self) -> SwitchResult<Flag> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SwitchError::Storage(e.to_string()))?;
        Ok(inner.freeze_updates.clone())
    }

    /// Current `exam_mode` flag.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the internal lock is poisoned.
    pub fn exam_mode(&self) -> SwitchResult<Flag> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SwitchError::Storage(e.to_string()))?;
        Ok(inner.exam_mode.clone())
    }

    /// Boolean snapshot of both flags, for audit records and status views.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the internal lock is poisoned.
    pub fn snapshot(&self) -> SwitchResult<FlagSnapshot> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SwitchError::Storage(e.to_string()))?;
        Ok(FlagSnapshot {
            freeze_updates: inner.freeze_updates.enabled,
            exam_mode: inner.exam_mode.enabled,
        })
    }

    pub(crate) fn set_freeze_updates(
        &self,
        enabled: bool,
        actor: &Actor,
        reason: Option<String>,
    ) -> SwitchResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| SwitchError::Storage(e.to_string()))?;
        inner.freeze_updates.set(enabled, actor, reason);
        Ok(())
    }

    pub(crate) fn set_exam_mode(
        &self,
        enabled: bool,
        actor: &Actor,
        reason: Option<String>,
    ) -> SwitchResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| SwitchError::Storage(e.to_string()))?;
        inner.exam_mode.set(enabled, actor, reason);
        Ok(())
    }
}

impl Default for FlagStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure predicate over the freeze flag, consulted by the switch engine and
/// by every direct mutation path (warehouse export triggers, import jobs).
#[derive(Debug, Clone)]
pub struct FreezeGate {
    flags: Arc<FlagStore>,
}

impl FreezeGate {
    /// Create a gate over a flag store.
    #[must_use]
    pub fn new(flags: Arc<FlagStore>) -> Self {
        Self { flags }
    }

    /// Whether mutating runtime operations are currently suppressed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the flag store is unreadable.
    pub fn mutations_frozen(&self) -> SwitchResult<bool> {
        Ok(self.flags.freeze_updates()?.enabled)
    }

    /// Whether the gate blocks this particular action.
    ///
    /// Toggles of the freeze flag itself are exempt; everything else is
    /// blocked while `freeze_updates` is enabled. Reads never take a
    /// [`ControlAction`] shape and are never blocked.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the flag store is unreadable.
    pub fn blocks(&self, action: &ControlAction) -> SwitchResult<bool> {
        if action.is_freeze_toggle() {
            return Ok(false);
        }
        self.mutations_frozen()
    }
}
