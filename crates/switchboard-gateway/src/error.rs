//! Gateway error types and the wire envelope.

use serde::{Deserialize, Serialize};

use switchboard_core::{ErrorCode, RequestId};

/// Errors surfaced by gateway operations.
///
/// Blocked changes never appear here: a gate holding back a change is a
/// successful response with `blocking_reasons` populated.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// An approval workflow failure.
    #[error(transparent)]
    Approval(#[from] switchboard_approval::ApprovalError),

    /// A switch engine failure.
    #[error(transparent)]
    Switch(#[from] switchboard_runtime::SwitchError),

    /// An audit log failure.
    #[error(transparent)]
    Audit(#[from] switchboard_audit::AuditError),
}

impl GatewayError {
    /// The wire-level error code this error maps to.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Approval(e) => e.error_code(),
            Self::Switch(_) | Self::Audit(_) => ErrorCode::InternalError,
        }
    }

    /// Shape this error into the wire envelope.
    #[must_use]
    pub fn to_api_error(&self) -> ApiError {
        let request_id = match self {
            Self::Approval(e) => match e {
                switchboard_approval::ApprovalError::NotFound { id }
                | switchboard_approval::ApprovalError::AlreadyDecided { id, .. }
                | switchboard_approval::ApprovalError::SelfApproval { id } => Some(id.clone()),
                _ => None,
            },
            _ => None,
        };
        ApiError {
            code: self.error_code(),
            message: self.to_string(),
            request_id,
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// The error envelope every transport serializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// The approval request involved, when one was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl ApiError {
    /// The HTTP status an HTTP transport should use for this envelope.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}
