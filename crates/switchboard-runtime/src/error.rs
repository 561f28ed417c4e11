/// Errors that can occur while reading or switching runtime state.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// Storage backend error (lock poisoned, persistence failed, etc.).
    #[error("runtime storage error: {0}")]
    Storage(String),

    /// The audit log rejected the event for this transition.
    #[error("audit append failed: {0}")]
    Audit(#[from] switchboard_audit::AuditError),

    /// Internal switch engine error.
    #[error("internal switch error: {0}")]
    Internal(String),
}

/// Result type for switch engine operations.
pub type SwitchResult<T> = Result<T, SwitchError>;
