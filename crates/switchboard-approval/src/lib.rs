//! Two-person approval workflow for high-risk control-plane actions.
//!
//! High-risk actions (runtime switches, unfreezing, activating scoring
//! engines) are not applied directly: the requesting administrator files
//! an [`ApprovalRequest`], and a *different* administrator approves it by
//! typing back the action's confirmation phrase, exactly. Approval flips
//! the request to its terminal state with a compare-and-set and applies
//! the action through the switch engine.
//!
//! Decisions are write-once. Self-approval is forbidden; self-rejection
//! is allowed, so a requester can withdraw a mistake without waiting for
//! a colleague.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod engine;
mod error;
mod phrase;
mod request;
mod store;

pub use engine::{ApprovalEngine, ApprovalOutcome};
pub use error::{ApprovalError, ApprovalResult};
pub use phrase::PhraseBook;
pub use request::{ApprovalRequest, ApprovalStatus};
pub use store::{ApprovalStore, Decision, MemoryApprovalStore};
