//! Post-merge validation.
//!
//! Checks that deserialized [`Settings`] values are within acceptable
//! ranges. Runs after all layers merged, so overlay files and environment
//! overrides are validated the same way as defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Settings;

/// Upper bound on `audit.recent_limit`; larger queries should page.
const RECENT_LIMIT_UPPER_BOUND: usize = 1_000;

/// Validate fully-merged settings.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(settings: &Settings) -> ConfigResult<()> {
    validate_approval(settings)?;
    validate_parity(settings)?;
    validate_audit(settings)?;
    validate_logging(settings)?;
    Ok(())
}

fn validate_approval(settings: &Settings) -> ConfigResult<()> {
    if settings.approval.poll_interval_secs == 0 {
        return Err(ConfigError::Validation {
            field: "approval.poll_interval_secs".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    for (kind, phrase) in &settings.approval.phrases {
        let well_formed = !phrase.is_empty()
            && phrase
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-');
        if !well_formed {
            return Err(ConfigError::Validation {
                field: format!("approval.phrases.{kind}"),
                message: format!(
                    "'{phrase}' is not a valid confirmation phrase; use uppercase letters, digits, and dashes"
                ),
            });
        }
    }
    Ok(())
}

fn validate_parity(settings: &Settings) -> ConfigResult<()> {
    let diff = settings.parity.max_abs_percentile_diff;
    if !diff.is_finite() || diff < 0.0 {
        return Err(ConfigError::Validation {
            field: "parity.max_abs_percentile_diff".to_string(),
            message: format!("{diff} is not a non-negative number"),
        });
    }
    Ok(())
}

fn validate_audit(settings: &Settings) -> ConfigResult<()> {
    let limit = settings.audit.recent_limit;
    if limit == 0 || limit > RECENT_LIMIT_UPPER_BOUND {
        return Err(ConfigError::Validation {
            field: "audit.recent_limit".to_string(),
            message: format!("{limit} is out of range; must be 1..={RECENT_LIMIT_UPPER_BOUND}"),
        });
    }
    Ok(())
}

fn validate_logging(settings: &Settings) -> ConfigResult<()> {
    let level = settings.logging.level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        return Err(ConfigError::Validation {
            field: "logging.level".to_string(),
            message: format!(
                "unsupported level '{level}'; expected one of: trace, debug, info, warn, error"
            ),
        });
    }
    let format = settings.logging.format.as_str();
    if !matches!(format, "pretty" | "json") {
        return Err(ConfigError::Validation {
            field: "logging.format".to_string(),
            message: format!("unsupported format '{format}'; expected 'pretty' or 'json'"),
        });
    }
    Ok(())
}
