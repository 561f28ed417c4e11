//! Switchboard Staging - the staged change queue.
//!
//! Administrators build up a set of pending intents before submitting them
//! to the control plane. The queue lives with the staging session, never on
//! the server: submission hands the whole value to the gateway, discard is
//! free, and nothing here survives a page reload.
//!
//! Mutually exclusive intents (staging `freeze` then `unfreeze`) are
//! resolved at staging time via [`ConflictGroup`]: only the latest intent
//! per group is kept.
//!
//! # Example
//!
//! ```
//! use switchboard_core::ControlAction;
//! use switchboard_staging::StagedQueue;
//!
//! let mut queue = StagedQueue::new();
//! queue.stage(ControlAction::Freeze);
//! queue.stage(ControlAction::Unfreeze); // evicts the staged freeze
//!
//! assert_eq!(queue.len(), 1);
//! assert_eq!(queue.actions()[0].action, ControlAction::Unfreeze);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod conflict;
pub mod queue;

pub use conflict::ConflictGroup;
pub use queue::{StagedAction, StagedQueue};
