//! Per-axis noise tolerance ("fuzz") derivation.
//!
//! Fuzz is the tolerance the downstream contact tracker uses to suppress
//! sensor noise when matching contacts frame-to-frame. It is derived once
//! per attach from the resolved descriptor: `(max - min) / snratio` per
//! axis, `0.0` for axes with no signal-to-noise ratio (exact matching).
//!
//! The zero-ratio guard is explicit; the tracker treats fuzz as a finite
//! tolerance, so relying on float division-by-zero semantics is not an
//! option.

use crate::descriptor::{AxisCaps, DeviceDescriptor};
use serde::{Deserialize, Serialize};

/// Computed noise tolerances for the five reported axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisFuzz {
    /// Horizontal position tolerance.
    pub x: f64,
    /// Vertical position tolerance.
    pub y: f64,
    /// Pressure tolerance.
    pub pressure: f64,
    /// Contact width tolerance.
    pub width: f64,
    /// Orientation tolerance.
    pub orientation: f64,
}

impl AxisFuzz {
    /// Derive the fuzz record from a descriptor's axis calibration.
    pub fn compute(descriptor: &DeviceDescriptor) -> Self {
        Self {
            x: axis_fuzz(&descriptor.x),
            y: axis_fuzz(&descriptor.y),
            pressure: axis_fuzz(&descriptor.pressure),
            width: axis_fuzz(&descriptor.width),
            orientation: axis_fuzz(&descriptor.orientation),
        }
    }
}

/// Fuzz for one axis. Zero ratio means exact matching, tolerance `0.0`.
fn axis_fuzz(caps: &AxisCaps) -> f64 {
    if caps.snratio == 0 {
        0.0
    } else {
        f64::from(caps.max - caps.min) / f64::from(caps.snratio)
    }
}

/// Initialization record handed to the external contact tracker at attach
/// time and whenever the descriptor is re-resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerInit {
    /// Per-axis noise tolerances.
    pub fuzz: AxisFuzz,
    /// Single-contact size qualification threshold.
    pub contact_size_qual: u16,
    /// Lower "maybe" contact size threshold.
    pub contact_size_maybe: u16,
    /// Pressure qualification threshold.
    pub pressure_qual: u16,
}

impl TrackerInit {
    /// Build the tracker contract for a resolved descriptor.
    pub fn for_descriptor(descriptor: &DeviceDescriptor) -> Self {
        Self {
            fuzz: AxisFuzz::compute(descriptor),
            contact_size_qual: descriptor.contact_size_qual,
            contact_size_maybe: descriptor.contact_size_maybe,
            pressure_qual: descriptor.pressure_qual,
        }
    }
}
