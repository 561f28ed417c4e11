//! Switchboard Core - shared types for the runtime control plane.
//!
//! This crate defines the vocabulary every other Switchboard crate speaks:
//!
//! - **Identifiers**: [`AdminId`], [`RequestId`], [`EventId`],
//!   [`StagedActionId`] — uuid newtypes with prefixed display forms.
//! - **Actions**: [`ControlAction`] — the tagged union of every
//!   administrative intent, with default risk levels and confirmation
//!   phrases per [`ActionKind`].
//! - **Taxonomy**: [`ErrorCode`] — the shared error codes with their HTTP
//!   mapping.
//!
//! # Example
//!
//! ```
//! use switchboard_core::{ControlAction, RiskLevel, Subsystem};
//!
//! let action = ControlAction::RuntimeSwitch {
//!     subsystem: Subsystem::Ranking,
//!     mode: "v2".to_string(),
//! };
//!
//! // High-risk actions require a second administrator's approval.
//! assert_eq!(action.risk_level(), RiskLevel::High);
//! assert_eq!(action.kind().default_phrase(), "SWITCH-RUNTIME");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod action;
pub mod error;
pub mod prelude;
pub mod types;

pub use action::{ActionKind, ControlAction, MODE_ACTIVE, MODE_INACTIVE};
pub use error::ErrorCode;
pub use types::{
    Actor, AdminId, EventId, RequestId, RiskLevel, StagedActionId, Subsystem, Timestamp,
    UnknownSubsystem,
};
