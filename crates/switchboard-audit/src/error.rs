/// Errors that can occur while recording or reading audit events.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Storage backend error (lock poisoned, persistence failed, etc.).
    #[error("audit storage error: {0}")]
    Storage(String),

    /// Entry could not be serialized or deserialized.
    #[error("audit serialization error: {0}")]
    Serialization(String),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
