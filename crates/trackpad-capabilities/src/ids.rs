//! Apple vendor ID and Wellspring-family product ID constants.
//!
//! # Sources
//!
//! - **Linux kernel `bcm5974.c`** (mainline): the canonical catalogue of
//!   Wellspring USB product IDs. Each hardware generation registers three
//!   PIDs, one per keyboard layout region (ANSI / ISO / JIS); all three share
//!   one trackpad configuration.
//!   <https://github.com/torvalds/linux/blob/master/drivers/input/mouse/bcm5974.c>
//! - **Linux kernel `hid-ids.h`**: `USB_VENDOR_ID_APPLE = 0x05ac` and the
//!   Magic Trackpad 2 ID.
//!
//! Only generations with verified mode-switch parameters are catalogued
//! here; the descriptor table in [`crate::descriptor`] is ordered and must
//! keep at most one entry per PID.

#![deny(static_mut_refs)]

/// Apple Inc. USB Vendor ID.
pub const APPLE_VENDOR_ID: u16 = 0x05AC;

/// Known Wellspring-family product IDs, grouped per hardware generation.
///
/// The `_ANSI` / `_ISO` / `_JIS` triplets are regional keyboard-layout
/// variants of the same trackpad hardware and map to a single descriptor.
pub mod product_ids {
    // ── Wellspring 1 (MacBook Air, 2008) ────────────────────────────
    pub const WELLSPRING1_ANSI: u16 = 0x0223;
    pub const WELLSPRING1_ISO: u16 = 0x0224;
    pub const WELLSPRING1_JIS: u16 = 0x0225;

    // ── Wellspring 2 (MacBook Pro Penryn) ───────────────────────────
    pub const WELLSPRING2_ANSI: u16 = 0x0230;
    pub const WELLSPRING2_ISO: u16 = 0x0231;
    pub const WELLSPRING2_JIS: u16 = 0x0232;

    // ── Wellspring 3 (MacBook 5,1 / unibody MacBook Pro) ────────────
    pub const WELLSPRING3_ANSI: u16 = 0x0236;
    pub const WELLSPRING3_ISO: u16 = 0x0237;
    pub const WELLSPRING3_JIS: u16 = 0x0238;

    // ── Wellspring 8 (MacBook Pro Retina, late models) ──────────────
    pub const WELLSPRING8_ANSI: u16 = 0x0290;
    pub const WELLSPRING8_ISO: u16 = 0x0291;
    pub const WELLSPRING8_JIS: u16 = 0x0292;

    // ── Wellspring 9 (MacBook 12", Force Touch) ─────────────────────
    pub const WELLSPRING9_ANSI: u16 = 0x0272;
    pub const WELLSPRING9_ISO: u16 = 0x0273;
    pub const WELLSPRING9_JIS: u16 = 0x0274;

    // ── Magic Trackpad 2 (external, USB) ────────────────────────────
    // Self-reports multitouch frames without a mode switch.
    pub const MAGIC_TRACKPAD_2: u16 = 0x0265;
}
