//! Shared error taxonomy for control-plane operations.
//!
//! Every error surfaced by the gateway carries one of these codes; HTTP
//! status codes map 1:1. `Blocked` is special: a freeze/readiness/parity
//! gate holding back a change is *not* a failed request — it is reported as
//! a successful response with `blocking_reasons` populated, so the code
//! only appears inside status payloads, never in error envelopes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code taxonomy shared by every control-plane surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Bad or missing confirmation phrase, malformed payload.
    ValidationError,
    /// Approval already decided, or a concurrent decision lost the race.
    Conflict,
    /// Self-approval or insufficient role.
    Forbidden,
    /// Unknown request or subsystem.
    NotFound,
    /// A gate held back the effective change (not a request failure).
    Blocked,
    /// Unexpected store or transport failure.
    InternalError,
}

impl ErrorCode {
    /// Stable wire label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Blocked => "blocked",
            Self::InternalError => "internal_error",
        }
    }

    /// HTTP status this code maps to.
    ///
    /// `Blocked` maps to 200: the request succeeded, the gate result is in
    /// the body.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ValidationError => 400,
            Self::Conflict => 409,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Blocked => 200,
            Self::InternalError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
