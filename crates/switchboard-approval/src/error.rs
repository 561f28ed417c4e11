//! Approval workflow error types.

use switchboard_core::{ErrorCode, RequestId};

use crate::request::ApprovalStatus;

/// Errors that can occur during the approval workflow.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    /// No approval request exists with this id.
    #[error("approval request {id} not found")]
    NotFound {
        /// The id looked up.
        id: RequestId,
    },

    /// The request was already decided; decisions are write-once.
    #[error("approval request {id} is already {status}")]
    AlreadyDecided {
        /// The id of the decided request.
        id: RequestId,
        /// Its current status.
        status: ApprovalStatus,
    },

    /// The requester tried to approve their own request.
    #[error("approval request {id} cannot be approved by its requester")]
    SelfApproval {
        /// The id of the request.
        id: RequestId,
    },

    /// The typed confirmation phrase does not match. Comparison is exact
    /// and case-sensitive.
    #[error("confirmation phrase does not match; expected '{expected}'")]
    PhraseMismatch {
        /// The phrase the approver must type.
        expected: String,
    },

    /// Storage backend error (lock poisoned, persistence failed, etc.).
    #[error("approval storage error: {0}")]
    Storage(String),

    /// The approved action failed to apply.
    #[error(transparent)]
    Switch(#[from] switchboard_runtime::SwitchError),
}

impl ApprovalError {
    /// The wire-level error code this error maps to.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::AlreadyDecided { .. } => ErrorCode::Conflict,
            Self::SelfApproval { .. } => ErrorCode::Forbidden,
            Self::PhraseMismatch { .. } => ErrorCode::ValidationError,
            Self::Storage(_) | Self::Switch(_) => ErrorCode::InternalError,
        }
    }
}

/// Result type for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;
