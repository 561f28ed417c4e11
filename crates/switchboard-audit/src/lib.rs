//! Switchboard Audit - append-only record of every runtime transition.
//!
//! The switch engine writes one [`SwitchEvent`] per attempted change,
//! applied or blocked, with before/after [`ConfigSnapshot`]s, the acting
//! admin, and any gate reasons. There is no update or delete surface:
//! rollback is a new forward switch that itself gets audited.
//!
//! [`AuditLog`] is the storage seam; [`MemoryAuditLog`] is the in-process
//! implementation. Persistence backends slot in behind the trait.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Error types and results for the audit module.
pub mod error;
pub mod event;
pub mod log;

pub use error::{AuditError, AuditResult};
pub use event::{ConfigSnapshot, EventScope, FlagSnapshot, SwitchEvent};
pub use log::{AuditLog, MemoryAuditLog};
