//! Control-transfer transport seam and its instrumented mock.

use thiserror::Error;

/// HID GET_REPORT; reads the mode register (device-to-host).
pub const MODE_READ_REQUEST: u8 = 0x01;
/// HID SET_REPORT; writes the mode register (host-to-device).
pub const MODE_WRITE_REQUEST: u8 = 0x09;

/// Status outcomes of the transport collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Endpoint stalled the request.
    #[error("endpoint stalled")]
    Stall,

    /// The transfer did not complete within the transport's deadline.
    #[error("transfer timed out")]
    Timeout,

    /// Device is gone (surprise removal).
    #[error("device disconnected")]
    Disconnected,

    /// Any other host-side transport failure.
    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Blocking class control-transfer execution against the device's HID
/// interface.
///
/// Both requests are class-scoped and interface-targeted; direction is
/// implied by the method. Implementations block the calling thread until
/// the transfer completes or fails; timeout policy belongs to the
/// implementation, not to callers.
///
/// Implementations must be `Send`; they are driven from exactly one thread
/// per device instance, so `Sync` is not required.
pub trait ControlTransport: Send {
    /// Device-to-host request; fills `buf` and returns the transferred byte
    /// count. Callers must not treat a count short of `buf.len()` as an
    /// error.
    fn control_read(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> Result<usize, TransportError>;

    /// Host-to-device request carrying the full `buf`.
    fn control_write(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
    ) -> Result<usize, TransportError>;
}

pub mod mock {
    use super::*;

    /// One recorded control transfer.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ControlCall {
        Read {
            request: u8,
            value: u16,
            index: u16,
            len: usize,
        },
        Write {
            request: u8,
            value: u16,
            index: u16,
            data: Vec<u8>,
        },
    }

    /// Instrumented transport double.
    ///
    /// Keeps a persistent device-side "mode register": reads copy it out,
    /// writes replace it, so set-then-get sequences behave like real
    /// hardware. Failures and the short-read quirk are programmable per
    /// direction.
    pub struct MockControlTransport {
        register: Vec<u8>,
        calls: Vec<ControlCall>,
        fail_read: Option<TransportError>,
        fail_next_read: Option<TransportError>,
        fail_write: Option<TransportError>,
        short_read: Option<usize>,
    }

    impl MockControlTransport {
        /// Mock with the given initial register contents.
        pub fn with_register(register: Vec<u8>) -> Self {
            Self {
                register,
                calls: Vec::new(),
                fail_read: None,
                fail_next_read: None,
                fail_write: None,
                short_read: None,
            }
        }

        /// Mock with a zeroed register of `len` bytes.
        pub fn zeroed(len: usize) -> Self {
            Self::with_register(vec![0; len])
        }

        /// Fail every subsequent read with `err`.
        pub fn fail_reads_with(&mut self, err: TransportError) {
            self.fail_read = Some(err);
        }

        /// Fail only the next read with `err`; later reads succeed again.
        pub fn fail_next_read_with(&mut self, err: TransportError) {
            self.fail_next_read = Some(err);
        }

        /// Fail every subsequent write with `err`.
        pub fn fail_writes_with(&mut self, err: TransportError) {
            self.fail_write = Some(err);
        }

        /// Report `count` transferred bytes from reads regardless of the
        /// register size (the device byte-count quirk).
        pub fn report_short_reads(&mut self, count: usize) {
            self.short_read = Some(count);
        }

        /// Every transfer seen so far, in order.
        pub fn calls(&self) -> &[ControlCall] {
            &self.calls
        }

        /// Current device-side register contents.
        pub fn register(&self) -> &[u8] {
            &self.register
        }

        /// Overwrite the device-side register (device state injection).
        pub fn set_register(&mut self, register: Vec<u8>) {
            self.register = register;
        }
    }

    impl ControlTransport for MockControlTransport {
        fn control_read(
            &mut self,
            request: u8,
            value: u16,
            index: u16,
            buf: &mut [u8],
        ) -> Result<usize, TransportError> {
            self.calls.push(ControlCall::Read {
                request,
                value,
                index,
                len: buf.len(),
            });
            if let Some(err) = self.fail_next_read.take() {
                return Err(err);
            }
            if let Some(err) = &self.fail_read {
                return Err(err.clone());
            }
            let n = buf.len().min(self.register.len());
            if let (Some(dst), Some(src)) = (buf.get_mut(..n), self.register.get(..n)) {
                dst.copy_from_slice(src);
            }
            Ok(self.short_read.unwrap_or(n))
        }

        fn control_write(
            &mut self,
            request: u8,
            value: u16,
            index: u16,
            buf: &[u8],
        ) -> Result<usize, TransportError> {
            self.calls.push(ControlCall::Write {
                request,
                value,
                index,
                data: buf.to_vec(),
            });
            if let Some(err) = &self.fail_write {
                return Err(err.clone());
            }
            self.register = buf.to_vec();
            Ok(buf.len())
        }
    }
}
