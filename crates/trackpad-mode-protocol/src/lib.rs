//! Raw-multitouch mode negotiation for Wellspring trackpads.
//!
//! Legacy Wellspring hardware boots in a compatibility mode that emulates a
//! single pointer. Entering raw multitouch ("wellspring") reporting takes a
//! two-phase vendor handshake over class control transfers: read the mode
//! register, flip the single mode flag byte, write the whole register back.
//! Bytes other than the flag are opaque device state and must round-trip
//! unchanged.
//!
//! Newer hardware (the `NativeMultitouch` family) self-reports multitouch
//! frames; for it, set/get are pure local state updates with no wire
//! traffic.
//!
//! The transport seam is the [`ControlTransport`] trait: a blocking
//! request/response primitive whose queuing, retries, and timeouts are the
//! transport's own business. One known device quirk is honored here: the
//! byte count returned by the read phase does not reliably equal the
//! register size, so a short read is logged and otherwise ignored. Only an
//! outright transport error aborts the handshake.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod negotiator;
pub mod transport;

pub use negotiator::*;
pub use transport::*;

use thiserror::Error;

/// Errors returned by mode negotiation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// The read phase of the handshake failed at the transport layer.
    #[error("mode register read failed: {0}")]
    Read(#[source] TransportError),

    /// The write phase failed; the requested mode was not committed.
    #[error("mode register write failed: {0}")]
    Write(#[source] TransportError),

    /// Descriptor declares a flag offset outside its own register.
    #[error("switch index {index} out of range for {len}-byte mode register")]
    SwitchIndexOutOfRange {
        /// Declared byte offset of the mode flag.
        index: usize,
        /// Declared register length.
        len: usize,
    },
}

/// Convenience result alias for mode-negotiation operations.
pub type ModeResult<T> = Result<T, ModeError>;
