//! Transport-agnostic operation surface for the Switchboard control plane.
//!
//! [`ControlPlane`] is the one service a dashboard, CLI, or HTTP layer
//! talks to. It owns the wiring: staged queues submit into the approval
//! workflow or straight into the switch engine depending on risk, every
//! attempt lands in the audit log, and errors come back as the
//! [`ApiError`] envelope with stable codes.
//!
//! A gate holding back a change is never an error here. Callers get a
//! successful [`Disposition`] or [`SwitchReport`](switchboard_runtime::SwitchReport)
//! with `blocking_reasons` populated and decide how to render it.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod dto;
mod error;
mod service;
mod telemetry;

pub use dto::{Disposition, ExportReceipt, SubmitItem, SubmitOutcome};
pub use error::{ApiError, GatewayError, GatewayResult};
pub use service::{ControlPlane, TypedPhrases};
pub use telemetry::init_tracing;
