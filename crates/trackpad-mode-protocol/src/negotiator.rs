//! The mode negotiator: per-call handshake state machine.
//!
//! One negotiator exists per attached device, built once from the resolved
//! descriptor. The strategy split (legacy register handshake vs native
//! bypass) is decided at construction and never re-derived; the engaged
//! flag is the device's mode state and is committed only after the write
//! phase succeeds, so a failed handshake leaves the recorded state exactly
//! as it was.

use crate::transport::{ControlTransport, MODE_READ_REQUEST, MODE_WRITE_REQUEST};
use crate::{ModeError, ModeResult};
use opentrackpad_capabilities::{DeviceDescriptor, DeviceFamily, ModeSwitchParams};
use tracing::{debug, warn};

/// Drives the device into or out of raw multitouch reporting.
///
/// The orchestrator owns the negotiator exclusively; `&mut self` on every
/// mutating path is what enforces the one-operation-at-a-time model; there
/// is no interior locking and none is needed.
#[derive(Debug)]
pub struct ModeNegotiator {
    family: DeviceFamily,
    engaged: bool,
}

impl ModeNegotiator {
    /// Build the negotiator for a resolved descriptor. The device is assumed
    /// to start out of raw mode; native-family hardware is always raw on the
    /// wire, but the recorded state still starts "off" until requested.
    pub fn new(descriptor: &DeviceDescriptor) -> Self {
        Self {
            family: descriptor.family,
            engaged: false,
        }
    }

    /// The mode state as last committed by a successful `set`.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Enter (`on = true`) or exit raw multitouch mode.
    ///
    /// Legacy family: read the mode register, flip the flag byte, write the
    /// register back. The write reuses the buffer produced by the read so
    /// every unrelated byte round-trips verbatim. Native family: no wire
    /// traffic, the requested state is recorded locally.
    ///
    /// # Errors
    ///
    /// The failed phase's transport error, wrapped in [`ModeError::Read`] or
    /// [`ModeError::Write`]. On error the engaged flag is unchanged.
    pub fn set(&mut self, transport: &mut dyn ControlTransport, on: bool) -> ModeResult<()> {
        match self.family {
            DeviceFamily::NativeMultitouch => {
                debug!(on, "native multitouch family, recording mode locally");
            }
            DeviceFamily::LegacyModeSwitch(params) => {
                let mut register = self.read_register(transport, &params)?;
                let flag = register
                    .get_mut(params.switch_index)
                    .ok_or(ModeError::SwitchIndexOutOfRange {
                        index: params.switch_index,
                        len: params.buffer_len,
                    })?;
                *flag = if on { params.switch_on } else { params.switch_off };

                transport
                    .control_write(
                        MODE_WRITE_REQUEST,
                        params.request_value,
                        params.request_index,
                        &register,
                    )
                    .map_err(|err| {
                        warn!(%err, on, "mode register write failed, mode not committed");
                        ModeError::Write(err)
                    })?;
                debug!(on, "mode switch committed");
            }
        }
        self.engaged = on;
        Ok(())
    }

    /// Query the device's current mode without mutating recorded state.
    ///
    /// Performs only the read phase and interprets the flag byte; the native
    /// family always reports "on" without wire traffic.
    ///
    /// # Errors
    ///
    /// [`ModeError::Read`] when the read phase fails at the transport layer.
    pub fn get(&self, transport: &mut dyn ControlTransport) -> ModeResult<bool> {
        match self.family {
            DeviceFamily::NativeMultitouch => Ok(true),
            DeviceFamily::LegacyModeSwitch(params) => {
                let register = self.read_register(transport, &params)?;
                let flag =
                    register
                        .get(params.switch_index)
                        .ok_or(ModeError::SwitchIndexOutOfRange {
                            index: params.switch_index,
                            len: params.buffer_len,
                        })?;
                Ok(*flag == params.switch_on)
            }
        }
    }

    /// Read phase: zeroed register buffer filled by a class GET_REPORT.
    ///
    /// The transferred byte count is not validated against the register
    /// size; real hardware under-reports it (known quirk), so only an
    /// outright transport error aborts.
    fn read_register(
        &self,
        transport: &mut dyn ControlTransport,
        params: &ModeSwitchParams,
    ) -> ModeResult<Vec<u8>> {
        let mut register = vec![0u8; params.buffer_len];
        let transferred = transport
            .control_read(
                MODE_READ_REQUEST,
                params.request_value,
                params.request_index,
                &mut register,
            )
            .map_err(|err| {
                warn!(%err, "mode register read failed");
                ModeError::Read(err)
            })?;
        if transferred != params.buffer_len {
            debug!(
                transferred,
                expected = params.buffer_len,
                "mode register short read, tolerated"
            );
        }
        Ok(register)
    }
}
