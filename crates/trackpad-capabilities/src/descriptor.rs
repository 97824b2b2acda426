//! Static descriptor table and capability lookup.
//!
//! One [`DeviceDescriptor`] per hardware generation, resolved once at attach
//! time and immutable for the attached lifetime of the device. The table is
//! ordered and constructed so that at most one entry matches any product ID;
//! the regional layout variants (ANSI/ISO/JIS) of a generation are identity
//! keys of the same entry.

use crate::ids::{APPLE_VENDOR_ID, product_ids};
use crate::{CapabilityError, CapabilityResult};
use serde::Serialize;

/// Signal-to-noise ratio for finger pressure readings.
pub const SN_PRESSURE: i32 = 45;
/// Signal-to-noise ratio for contact width readings.
pub const SN_WIDTH: i32 = 25;
/// Signal-to-noise ratio for position coordinates.
pub const SN_COORD: i32 = 250;
/// Signal-to-noise ratio for finger orientation readings.
pub const SN_ORIENT: i32 = 10;

/// Largest absolute finger orientation value reported by the sensor.
pub const MAX_FINGER_ORIENTATION: i32 = 16384;

/// Contact size above which a touch qualifies as an intentional contact.
pub const SIZE_QUALIFICATION_THRESHOLD: u16 = 25;
/// Lower "maybe" contact size bound for multi-finger qualification.
pub const SIZE_MU_LOWER_THRESHOLD: u16 = 16;
/// Minimum pressure for a touch to qualify as a contact.
pub const PRESSURE_QUALIFICATION_THRESHOLD: u16 = 4;

/// Calibration for a single reported axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisCaps {
    /// Lowest device-reported value.
    pub min: i32,
    /// Highest device-reported value.
    pub max: i32,
    /// Signal-to-noise ratio; `0` means exact matching, no tolerance.
    pub snratio: i32,
}

impl AxisCaps {
    pub const fn new(min: i32, max: i32, snratio: i32) -> Self {
        Self { min, max, snratio }
    }
}

/// Wire parameters of the vendor mode-switch handshake.
///
/// The mode register is `buffer_len` bytes, addressed by the class-scoped
/// control request `(request_value, request_index)`. Only the byte at
/// `switch_index` carries the raw-mode flag; everything else in the register
/// is opaque device state that must round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeSwitchParams {
    /// Mode register size in bytes.
    pub buffer_len: usize,
    /// wValue of the mode-register control request.
    pub request_value: u16,
    /// wIndex of the mode-register control request.
    pub request_index: u16,
    /// Byte offset of the mode flag within the register.
    pub switch_index: usize,
    /// Sentinel byte meaning "raw multitouch mode on".
    pub switch_on: u8,
    /// Sentinel byte meaning "raw multitouch mode off".
    pub switch_off: u8,
}

/// Mode-switch parameters shared by the 8-byte-register generations
/// (Wellspring 1 through 8).
pub const WELLSPRING_MODE_SWITCH: ModeSwitchParams = ModeSwitchParams {
    buffer_len: 8,
    request_value: 0x0300,
    request_index: 0,
    switch_index: 0,
    switch_on: 0x01,
    switch_off: 0x08,
};

/// Mode-switch parameters for the Force Touch generation (Wellspring 9),
/// which moved to a compact 2-byte register.
pub const FORCE_TOUCH_MODE_SWITCH: ModeSwitchParams = ModeSwitchParams {
    buffer_len: 2,
    request_value: 0x0302,
    request_index: 2,
    switch_index: 1,
    switch_on: 0x01,
    switch_off: 0x00,
};

/// Device family tag, selected once per descriptor.
///
/// The two variants are the two mode-negotiation strategies: legacy hardware
/// must be switched into raw reporting over the wire, native hardware
/// self-reports multitouch frames and needs no wire traffic at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceFamily {
    /// Raw mode entered via the read-modify-write register handshake.
    LegacyModeSwitch(ModeSwitchParams),
    /// Always in raw mode; mode set/get are pure local state updates.
    NativeMultitouch,
}

impl DeviceFamily {
    /// Whether entering or exiting raw mode requires wire traffic.
    pub const fn needs_mode_switch(&self) -> bool {
        matches!(self, DeviceFamily::LegacyModeSwitch(_))
    }
}

/// Immutable per-generation hardware description.
///
/// Resolved once at attach, lives for the attached lifetime of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    /// Human-readable generation name for logs.
    pub name: &'static str,
    /// Product ID of the ANSI layout variant.
    pub ansi: u16,
    /// Product ID of the ISO layout variant.
    pub iso: u16,
    /// Product ID of the JIS layout variant.
    pub jis: u16,
    /// Mode-negotiation strategy for this generation.
    pub family: DeviceFamily,
    /// Finger pressure calibration.
    pub pressure: AxisCaps,
    /// Contact width calibration.
    pub width: AxisCaps,
    /// Horizontal position calibration.
    pub x: AxisCaps,
    /// Vertical position calibration.
    pub y: AxisCaps,
    /// Finger orientation calibration.
    pub orientation: AxisCaps,
    /// Single-contact size qualification threshold.
    pub contact_size_qual: u16,
    /// Lower "maybe" contact size threshold.
    pub contact_size_maybe: u16,
    /// Pressure qualification threshold.
    pub pressure_qual: u16,
}

impl DeviceDescriptor {
    /// Whether any of this entry's identity keys equals `product_id`.
    pub fn matches(&self, product_id: u16) -> bool {
        self.ansi == product_id || self.iso == product_id || self.jis == product_id
    }

    /// The identity keys of this entry.
    pub fn identity_keys(&self) -> [u16; 3] {
        [self.ansi, self.iso, self.jis]
    }
}

const ORIENTATION_CAPS: AxisCaps =
    AxisCaps::new(-MAX_FINGER_ORIENTATION, MAX_FINGER_ORIENTATION, SN_ORIENT);

pub(crate) const fn descriptor(
    name: &'static str,
    ansi: u16,
    iso: u16,
    jis: u16,
    family: DeviceFamily,
    pressure: AxisCaps,
    width: AxisCaps,
    x: AxisCaps,
    y: AxisCaps,
) -> DeviceDescriptor {
    DeviceDescriptor {
        name,
        ansi,
        iso,
        jis,
        family,
        pressure,
        width,
        x,
        y,
        orientation: ORIENTATION_CAPS,
        contact_size_qual: SIZE_QUALIFICATION_THRESHOLD,
        contact_size_maybe: SIZE_MU_LOWER_THRESHOLD,
        pressure_qual: PRESSURE_QUALIFICATION_THRESHOLD,
    }
}

/// The ordered capability table. At most one entry matches any product ID.
pub static DESCRIPTORS: &[DeviceDescriptor] = &[
    descriptor(
        "Wellspring 1",
        product_ids::WELLSPRING1_ANSI,
        product_ids::WELLSPRING1_ISO,
        product_ids::WELLSPRING1_JIS,
        DeviceFamily::LegacyModeSwitch(WELLSPRING_MODE_SWITCH),
        AxisCaps::new(0, 256, SN_PRESSURE),
        AxisCaps::new(0, 2048, SN_WIDTH),
        AxisCaps::new(-4824, 5342, SN_COORD),
        AxisCaps::new(-172, 5820, SN_COORD),
    ),
    descriptor(
        "Wellspring 2",
        product_ids::WELLSPRING2_ANSI,
        product_ids::WELLSPRING2_ISO,
        product_ids::WELLSPRING2_JIS,
        DeviceFamily::LegacyModeSwitch(WELLSPRING_MODE_SWITCH),
        AxisCaps::new(0, 256, SN_PRESSURE),
        AxisCaps::new(0, 2048, SN_WIDTH),
        AxisCaps::new(-4824, 4824, SN_COORD),
        AxisCaps::new(-172, 4290, SN_COORD),
    ),
    descriptor(
        "Wellspring 3",
        product_ids::WELLSPRING3_ANSI,
        product_ids::WELLSPRING3_ISO,
        product_ids::WELLSPRING3_JIS,
        DeviceFamily::LegacyModeSwitch(WELLSPRING_MODE_SWITCH),
        AxisCaps::new(0, 300, SN_PRESSURE),
        AxisCaps::new(0, 2048, SN_WIDTH),
        AxisCaps::new(-4460, 5166, SN_COORD),
        AxisCaps::new(-75, 6700, SN_COORD),
    ),
    descriptor(
        "Wellspring 8",
        product_ids::WELLSPRING8_ANSI,
        product_ids::WELLSPRING8_ISO,
        product_ids::WELLSPRING8_JIS,
        DeviceFamily::LegacyModeSwitch(WELLSPRING_MODE_SWITCH),
        AxisCaps::new(0, 300, SN_PRESSURE),
        AxisCaps::new(0, 2048, SN_WIDTH),
        AxisCaps::new(-4620, 5140, SN_COORD),
        AxisCaps::new(-150, 6600, SN_COORD),
    ),
    descriptor(
        "Wellspring 9",
        product_ids::WELLSPRING9_ANSI,
        product_ids::WELLSPRING9_ISO,
        product_ids::WELLSPRING9_JIS,
        DeviceFamily::LegacyModeSwitch(FORCE_TOUCH_MODE_SWITCH),
        AxisCaps::new(0, 308, SN_PRESSURE),
        AxisCaps::new(0, 2048, SN_WIDTH),
        AxisCaps::new(-4828, 5345, SN_COORD),
        AxisCaps::new(-203, 6803, SN_COORD),
    ),
    descriptor(
        "Magic Trackpad 2",
        product_ids::MAGIC_TRACKPAD_2,
        product_ids::MAGIC_TRACKPAD_2,
        product_ids::MAGIC_TRACKPAD_2,
        DeviceFamily::NativeMultitouch,
        AxisCaps::new(0, 306, SN_PRESSURE),
        AxisCaps::new(0, 2048, SN_WIDTH),
        AxisCaps::new(-3678, 3934, SN_COORD),
        AxisCaps::new(-2478, 2587, SN_COORD),
    ),
];

/// Resolve a USB identity to its capability descriptor.
///
/// First table entry matching any identity key wins. Returns
/// [`CapabilityError::UnsupportedDevice`] when nothing matches; the caller
/// must abandon attach.
///
/// # Errors
///
/// `UnsupportedDevice` when the vendor is not Apple or no table entry
/// carries the product ID.
pub fn resolve(vendor_id: u16, product_id: u16) -> CapabilityResult<&'static DeviceDescriptor> {
    let not_found = CapabilityError::UnsupportedDevice {
        vendor_id,
        product_id,
    };
    if vendor_id != APPLE_VENDOR_ID {
        return Err(not_found);
    }
    DESCRIPTORS
        .iter()
        .find(|d| d.matches(product_id))
        .ok_or(not_found)
}
