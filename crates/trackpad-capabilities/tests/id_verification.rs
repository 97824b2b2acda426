//! Verifies the descriptor table against the catalogued product IDs: every
//! identity key resolves, resolves to its own entry, and the table stays
//! unambiguous.

use opentrackpad_capabilities::{APPLE_VENDOR_ID, DESCRIPTORS, product_ids, resolve};

#[test]
fn every_identity_key_resolves_to_its_entry() {
    for desc in DESCRIPTORS {
        for key in desc.identity_keys() {
            let resolved = resolve(APPLE_VENDOR_ID, key)
                .unwrap_or_else(|_| panic!("{} key {key:#06x} must resolve", desc.name));
            assert_eq!(resolved.name, desc.name);
        }
    }
}

#[test]
fn layout_variants_share_one_descriptor() {
    let ansi = resolve(APPLE_VENDOR_ID, product_ids::WELLSPRING1_ANSI).expect("ansi");
    let iso = resolve(APPLE_VENDOR_ID, product_ids::WELLSPRING1_ISO).expect("iso");
    let jis = resolve(APPLE_VENDOR_ID, product_ids::WELLSPRING1_JIS).expect("jis");
    assert_eq!(ansi, iso);
    assert_eq!(iso, jis);
}

#[test]
fn generations_do_not_alias() {
    let w1 = resolve(APPLE_VENDOR_ID, product_ids::WELLSPRING1_ANSI).expect("w1");
    let w9 = resolve(APPLE_VENDOR_ID, product_ids::WELLSPRING9_ANSI).expect("w9");
    assert_ne!(w1.name, w9.name);
}
