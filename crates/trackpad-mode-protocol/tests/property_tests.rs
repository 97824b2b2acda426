use opentrackpad_capabilities::{
    AxisCaps, DeviceDescriptor, DeviceFamily, MAX_FINGER_ORIENTATION, ModeSwitchParams,
    PRESSURE_QUALIFICATION_THRESHOLD, SIZE_MU_LOWER_THRESHOLD, SIZE_QUALIFICATION_THRESHOLD,
    SN_COORD, SN_ORIENT, SN_PRESSURE, SN_WIDTH,
};
use opentrackpad_mode_protocol::mock::{ControlCall, MockControlTransport};
use opentrackpad_mode_protocol::{ModeNegotiator, TransportError};
use proptest::prelude::*;

fn legacy_descriptor(params: ModeSwitchParams) -> DeviceDescriptor {
    DeviceDescriptor {
        name: "synthetic",
        ansi: 0x0001,
        iso: 0x0002,
        jis: 0x0003,
        family: DeviceFamily::LegacyModeSwitch(params),
        pressure: AxisCaps::new(0, 256, SN_PRESSURE),
        width: AxisCaps::new(0, 2048, SN_WIDTH),
        x: AxisCaps::new(-4824, 5342, SN_COORD),
        y: AxisCaps::new(-172, 5820, SN_COORD),
        orientation: AxisCaps::new(-MAX_FINGER_ORIENTATION, MAX_FINGER_ORIENTATION, SN_ORIENT),
        contact_size_qual: SIZE_QUALIFICATION_THRESHOLD,
        contact_size_maybe: SIZE_MU_LOWER_THRESHOLD,
        pressure_qual: PRESSURE_QUALIFICATION_THRESHOLD,
    }
}

fn arb_params_and_register() -> impl Strategy<Value = (ModeSwitchParams, Vec<u8>)> {
    (1usize..32)
        .prop_flat_map(|len| {
            (
                Just(len),
                0..len,
                proptest::collection::vec(any::<u8>(), len),
                any::<u16>(),
                any::<u16>(),
                any::<u8>(),
                any::<u8>(),
            )
        })
        .prop_map(
            |(len, switch_index, register, request_value, request_index, on, off)| {
                (
                    ModeSwitchParams {
                        buffer_len: len,
                        request_value,
                        request_index,
                        switch_index,
                        switch_on: on,
                        switch_off: if off == on { off.wrapping_add(1) } else { off },
                    },
                    register,
                )
            },
        )
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    /// Whatever the device-side register holds, entering or exiting mode
    /// rewrites only the flag byte; every other byte round-trips verbatim.
    #[test]
    fn prop_unrelated_register_bytes_preserved(
        (params, register) in arb_params_and_register(),
        on in any::<bool>(),
    ) {
        let desc = legacy_descriptor(params);
        let mut negotiator = ModeNegotiator::new(&desc);
        let mut transport = MockControlTransport::with_register(register.clone());

        negotiator.set(&mut transport, on).expect("handshake should succeed");

        let mut expected = register;
        if let Some(slot) = expected.get_mut(params.switch_index) {
            *slot = if on { params.switch_on } else { params.switch_off };
        }
        prop_assert_eq!(transport.register(), expected.as_slice());
    }

    /// The handshake is always exactly one read followed by one write, both
    /// addressed at the descriptor's value/index pair.
    #[test]
    fn prop_exactly_one_read_then_one_write(
        (params, register) in arb_params_and_register(),
        on in any::<bool>(),
    ) {
        let desc = legacy_descriptor(params);
        let mut negotiator = ModeNegotiator::new(&desc);
        let mut transport = MockControlTransport::with_register(register);

        negotiator.set(&mut transport, on).expect("handshake should succeed");

        let calls = transport.calls();
        prop_assert_eq!(calls.len(), 2);
        match (calls.first(), calls.get(1)) {
            (
                Some(ControlCall::Read { request: 0x01, value: rv, index: ri, len }),
                Some(ControlCall::Write { request: 0x09, value: wv, index: wi, data }),
            ) => {
                prop_assert_eq!(*rv, params.request_value);
                prop_assert_eq!(*ri, params.request_index);
                prop_assert_eq!(*wv, params.request_value);
                prop_assert_eq!(*wi, params.request_index);
                prop_assert_eq!(*len, params.buffer_len);
                prop_assert_eq!(data.len(), params.buffer_len);
            }
            other => prop_assert!(false, "unexpected call sequence: {other:?}"),
        }
    }

    /// A failed write never commits: the recorded state equals whatever it
    /// was before the call.
    #[test]
    fn prop_write_failure_never_commits(
        (params, register) in arb_params_and_register(),
        engage_first in any::<bool>(),
        on in any::<bool>(),
    ) {
        let desc = legacy_descriptor(params);
        let mut negotiator = ModeNegotiator::new(&desc);
        let mut transport = MockControlTransport::with_register(register);

        if engage_first {
            negotiator.set(&mut transport, true).expect("setup engage should succeed");
        }
        let before = negotiator.is_engaged();

        transport.fail_writes_with(TransportError::Disconnected);
        prop_assert!(negotiator.set(&mut transport, on).is_err());
        prop_assert_eq!(negotiator.is_engaged(), before);
    }
}
