//! Convenience re-exports for downstream crates.

pub use crate::action::{ActionKind, ControlAction, MODE_ACTIVE, MODE_INACTIVE};
pub use crate::error::ErrorCode;
pub use crate::types::{
    Actor, AdminId, EventId, RequestId, RiskLevel, StagedActionId, Subsystem, Timestamp,
    UnknownSubsystem,
};
