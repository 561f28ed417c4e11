//! In-memory runtime config store.
//!
//! One record per subsystem, seeded on construction so reads never miss.
//! Mutation is crate-private: the switch engine is the sole writer, and it
//! serializes writers per subsystem before touching this map.

use dashmap::DashMap;

use switchboard_core::Subsystem;

use crate::config::RuntimeConfig;

/// Keyed store of [`RuntimeConfig`] records, one per subsystem.
///
/// Readers always observe the last committed record; the map is sharded so
/// reads on one subsystem never contend with writes on another.
#[derive(Debug)]
pub struct ConfigStore {
    configs: DashMap<Subsystem, RuntimeConfig>,
}

impl ConfigStore {
    /// Create a store seeded with every subsystem's initial mode.
    #[must_use]
    pub fn new() -> Self {
        let configs = DashMap::new();
        for subsystem in Subsystem::ALL {
            configs.insert(subsystem, RuntimeConfig::seed(subsystem));
        }
        Self { configs }
    }

    /// Last committed record for a subsystem.
    #[must_use]
    pub fn get(&self, subsystem: Subsystem) -> RuntimeConfig {
        self.configs
            .get(&subsystem)
            .map(|r| r.clone())
            .unwrap_or_else(|| RuntimeConfig::seed(subsystem))
    }

    /// Mutate a subsystem's record in place.
    pub(crate) fn update(&self, subsystem: Subsystem, f: impl FnOnce(&mut RuntimeConfig)) {
        let mut entry = self
            .configs
            .entry(subsystem)
            .or_insert_with(|| RuntimeConfig::seed(subsystem));
        f(entry.value_mut());
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
