//! Config loading with layered precedence.
//!
//! Implements the `Settings::load()` algorithm:
//! 1. Parse embedded `defaults.toml` → base
//! 2. Deep-merge the overlay file, when one is given and exists
//! 3. Apply `SWITCHBOARD_*` environment variable overrides
//! 4. Deserialize the merged tree → `Settings`
//! 5. Validate

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::Settings;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Environment variables recognized as overrides, with the dotted field
/// path each one targets.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SWITCHBOARD_APPROVAL_POLL_INTERVAL_SECS", "approval.poll_interval_secs"),
    ("SWITCHBOARD_PARITY_MAX_PERCENTILE_DIFF", "parity.max_abs_percentile_diff"),
    ("SWITCHBOARD_PARITY_MAX_RANK_MISMATCHES", "parity.max_rank_mismatches"),
    ("SWITCHBOARD_AUDIT_RECENT_LIMIT", "audit.recent_limit"),
    ("SWITCHBOARD_LOG_LEVEL", "logging.level"),
    ("SWITCHBOARD_LOG_FORMAT", "logging.format"),
];

/// Load settings: embedded defaults, then `overlay` (if given and present),
/// then `SWITCHBOARD_*` environment overrides, then validation.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the overlay is malformed, an environment
/// override has an unparseable value, or the merged settings fail
/// validation.
pub fn load(overlay: Option<&Path>) -> ConfigResult<Settings> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::Parse {
            path: "<embedded defaults>".to_string(),
            source: e,
        })?;

    if let Some(path) = overlay {
        if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            let value: toml::Value = toml::from_str(&text).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                source: e,
            })?;
            deep_merge(&mut merged, value);
            info!(path = %path.display(), "loaded config overlay");
        } else {
            debug!(path = %path.display(), "config overlay absent, using defaults");
        }
    }

    apply_env_overrides(&mut merged)?;

    let settings: Settings = merged.try_into().map_err(|e| ConfigError::Parse {
        path: "<merged config>".to_string(),
        source: e,
    })?;
    validate::validate(&settings)?;
    Ok(settings)
}

/// Recursively merge `overlay` into `base`. Tables merge key by key;
/// any other value replaces the base wholesale.
fn deep_merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_table.insert(key, value);
                    },
                }
            }
        },
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}

fn apply_env_overrides(merged: &mut toml::Value) -> ConfigResult<()> {
    apply_env_overrides_from(merged, |var| std::env::var(var).ok())
}

/// Override application with an injectable variable lookup, so precedence
/// is testable without mutating the process environment.
fn apply_env_overrides_from(
    merged: &mut toml::Value,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    for (var, field) in ENV_OVERRIDES {
        let Some(raw) = lookup(var) else {
            continue;
        };
        let value = parse_override(var, field, &raw)?;
        set_path(merged, field, value);
        debug!(var, field, "applied environment override");
    }
    Ok(())
}

/// Parse an override string into the TOML type the target field expects.
fn parse_override(var: &str, field: &str, raw: &str) -> ConfigResult<toml::Value> {
    let invalid = |message: String| ConfigError::EnvOverride {
        var: var.to_string(),
        message,
    };
    match field {
        "approval.poll_interval_secs" | "parity.max_rank_mismatches" | "audit.recent_limit" => raw
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|_| invalid(format!("'{raw}' is not an integer"))),
        "parity.max_abs_percentile_diff" => raw
            .parse::<f64>()
            .map(toml::Value::Float)
            .map_err(|_| invalid(format!("'{raw}' is not a number"))),
        _ => Ok(toml::Value::String(raw.to_string())),
    }
}

fn set_path(root: &mut toml::Value, dotted: &str, value: toml::Value) {
    let mut current = root;
    let mut parts = dotted.split('.').peekable();
    while let Some(part) = parts.next() {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        if parts.peek().is_none() {
            table.insert(part.to_string(), value);
            return;
        }
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults_parse_and_validate() {
        let settings = load(None).unwrap();
        assert_eq!(settings.approval.poll_interval_secs, 30);
        assert_eq!(settings.audit.recent_limit, 50);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.approval.phrases.is_empty());
    }

    #[test]
    fn test_missing_overlay_falls_back_to_defaults() {
        let settings = load(Some(Path::new("/nonexistent/switchboard.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overlay_merges_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[approval]\npoll_interval_secs = 5\n\n[approval.phrases]\nfreeze = \"HALT-UPDATES\"\n"
        )
        .unwrap();

        let settings = load(Some(file.path())).unwrap();
        assert_eq!(settings.approval.poll_interval_secs, 5);
        assert_eq!(
            settings.approval.phrases.get("freeze").map(String::as_str),
            Some("HALT-UPDATES")
        );
        // Untouched sections keep defaults.
        assert_eq!(settings.audit.recent_limit, 50);
    }

    #[test]
    fn test_malformed_overlay_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[approval\npoll_interval_secs = 5").unwrap();
        assert!(matches!(
            load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_deep_merge_replaces_scalars_and_merges_tables() {
        let mut base: toml::Value =
            toml::from_str("[a]\nx = 1\ny = 2\n[b]\nz = 3").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 9\n[c]\nw = 4").unwrap();
        deep_merge(&mut base, overlay);

        assert_eq!(base["a"]["x"].as_integer(), Some(1));
        assert_eq!(base["a"]["y"].as_integer(), Some(9));
        assert_eq!(base["b"]["z"].as_integer(), Some(3));
        assert_eq!(base["c"]["w"].as_integer(), Some(4));
    }

    #[test]
    fn test_env_override_wins_over_overlay() {
        let mut merged: toml::Value = toml::from_str(DEFAULTS_TOML).unwrap();
        let overlay: toml::Value =
            toml::from_str("[audit]\nrecent_limit = 10\n\n[logging]\nlevel = \"warn\"").unwrap();
        deep_merge(&mut merged, overlay);

        let env = std::collections::HashMap::from([(
            "SWITCHBOARD_AUDIT_RECENT_LIMIT".to_string(),
            "25".to_string(),
        )]);
        apply_env_overrides_from(&mut merged, |var| env.get(var).cloned()).unwrap();

        let settings: Settings = merged.try_into().unwrap();
        assert_eq!(settings.audit.recent_limit, 25);
        // Overlay values with no environment override stand.
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_unparseable_env_override_is_rejected() {
        let mut merged: toml::Value = toml::from_str(DEFAULTS_TOML).unwrap();
        let err = apply_env_overrides_from(&mut merged, |var| {
            (var == "SWITCHBOARD_PARITY_MAX_RANK_MISMATCHES").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::EnvOverride { .. }));
    }

    #[test]
    fn test_parse_override_types() {
        assert_eq!(
            parse_override("V", "audit.recent_limit", "25").unwrap(),
            toml::Value::Integer(25)
        );
        assert!(parse_override("V", "audit.recent_limit", "lots").is_err());
        assert_eq!(
            parse_override("V", "parity.max_abs_percentile_diff", "0.25").unwrap(),
            toml::Value::Float(0.25)
        );
        assert_eq!(
            parse_override("V", "logging.level", "debug").unwrap(),
            toml::Value::String("debug".to_string())
        );
    }
}
