//! Power-state orchestration for Wellspring trackpads.
//!
//! The orchestrator is the top of the control plane: it sequences mode
//! negotiation against the streaming pipe across power transitions so the
//! device is always left in a known, recoverable state.
//!
//! The ordering is deliberately asymmetric and is the key correctness
//! property here:
//!
//! - **power up**: enter raw mode *before* starting the stream, so the
//!   first streamed packets already use the raw format;
//! - **power down**: stop the stream *before* exiting raw mode, so no
//!   in-flight packet is misinterpreted against an already-changed mode.
//!
//! Failure handling is a per-step policy declared once (see
//! [`Step::policy`]): mode negotiation is best-effort (raw mode is a
//! precision enhancement, not a requirement for basic operation; and a
//! power-down must never be blocked on a dying device), while a streaming
//! pipe that will not start is fatal; upstream treats it as a removal
//! trigger.
//!
//! All operations run synchronously on the calling thread; the lifecycle
//! framework serializes triggers per device, and exclusive ownership of the
//! [`PowerSequencer`] is what enforces that here.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod orchestrator;
pub mod pipe;

pub use orchestrator::*;
pub use pipe::*;

use opentrackpad_capabilities::CapabilityError;
use opentrackpad_mode_protocol::{ModeError, TransportError};
use thiserror::Error;

/// Errors surfaced by power transitions and recovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowerError {
    /// The streaming pipe failed to start during power-up. Fatal: the
    /// device is reported as failed-to-power-up and upstream will
    /// typically remove it.
    #[error("streaming pipe failed to start: {0}")]
    PipeStart(#[source] TransportError),

    /// The re-entry step of emergency recovery failed; the device was not
    /// restored to raw mode.
    #[error("emergency recovery failed: {0}")]
    Recovery(#[source] ModeError),

    /// Capability lookup found no descriptor at attach. Fatal to attach.
    #[error(transparent)]
    UnsupportedDevice(#[from] CapabilityError),
}

/// Convenience result alias for power operations.
pub type PowerResult<T> = Result<T, PowerError>;
