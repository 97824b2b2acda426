//! Capability table and axis calibration for Apple "Wellspring" trackpads.
//!
//! This crate is the attach-time leaf of the trackpad control plane. Given a
//! USB identity (vendor/product pair) it resolves an immutable
//! [`DeviceDescriptor`] describing the hardware variant: axis calibration,
//! the vendor mode-switch protocol parameters, and the device family tag
//! that decides whether a mode switch is needed at all.
//!
//! From the descriptor it derives the per-axis noise tolerances
//! ([`AxisFuzz`]) and the [`TrackerInit`] record consumed by the downstream
//! contact-tracking state machine.
//!
//! Everything here is pure and I/O-free: lookups over a static table plus
//! arithmetic. The only failure mode is "unsupported hardware", which is
//! fatal to device attach.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod descriptor;
pub mod fuzz;
pub mod ids;

pub use descriptor::*;
pub use fuzz::*;
pub use ids::*;

use thiserror::Error;

/// Errors returned by capability lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// No descriptor table entry matches the given USB identity. Fatal to
    /// attach; the caller must abandon device initialization.
    #[error("unsupported trackpad: vendor={vendor_id:#06x}, product={product_id:#06x}")]
    UnsupportedDevice {
        /// USB vendor ID
        vendor_id: u16,
        /// USB product ID
        product_id: u16,
    },
}

/// Convenience result alias for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
