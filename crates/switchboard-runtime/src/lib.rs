//! Runtime state for the Switchboard control plane.
//!
//! This crate owns the live state of every controllable subsystem and the
//! single code path that may change it:
//!
//! - [`RuntimeConfig`] / [`ConfigStore`] — per-subsystem mode records,
//!   separating the mode an admin *requested* from the mode actually in
//!   *effect*.
//! - [`FlagStore`] / [`FreezeGate`] — the global `freeze_updates` and
//!   `exam_mode` flags, and the gate that suppresses mutations while
//!   updates are frozen.
//! - [`ReadinessProbe`] — per-subsystem health checks consulted before a
//!   switch becomes effective.
//! - [`ParityReport`] — the ranking old-vs-new comparison gate.
//! - [`SwitchEngine`] — applies [`ControlAction`]s, evaluates every gate,
//!   and appends an audit event for each attempt, blocked or not.
//!
//! A blocked change is not an error here: [`SwitchEngine::apply`] returns
//! a [`SwitchReport`] whose `blocking_reasons` explain what held the
//! change back, while the requested mode is still recorded.
//!
//! [`ControlAction`]: switchboard_core::ControlAction

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod engine;
mod error;
mod flags;
mod parity;
mod readiness;
mod store;

pub use config::{RuntimeConfig, SafeMode};
pub use engine::{FROZEN_REASON, RuntimeStatus, SwitchEngine, SwitchReport};
pub use error::{SwitchError, SwitchResult};
pub use flags::{Flag, FlagSource, FlagStore, FreezeGate};
pub use parity::{ParityReport, ParityThresholds};
pub use readiness::{AlwaysReady, Readiness, ReadinessProbe};
pub use store::ConfigStore;
