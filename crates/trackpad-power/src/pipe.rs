//! Streaming-pipe seam and its instrumented mock.

use opentrackpad_mode_protocol::TransportError;

/// Tri-state of the streaming resource, owned by the orchestrator and used
/// to decide rollback scope on partial power-up failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipeState {
    /// Not delivering packets. The safe resting state.
    #[default]
    Stopped,
    /// Continuous reader active.
    Started,
    /// Last start attempt failed. Cleared to `Stopped` once the rollback
    /// stop completes; stays in place when that stop also fails.
    StartFailed,
}

/// The continuously-polled channel delivering touch-event packets.
///
/// Start/stop block the calling thread until the transport completes or
/// fails. `stop` must be idempotent: the orchestrator invokes it during
/// rollback without knowing whether the start half-completed.
pub trait StreamingPipe: Send {
    /// Begin posting read requests on the interrupt pipe.
    fn start(&mut self) -> Result<(), TransportError>;

    /// Stop the continuous reader and cancel in-flight I/O. Idempotent.
    fn stop(&mut self) -> Result<(), TransportError>;
}

pub mod mock {
    use super::*;

    /// Recorded pipe operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PipeCall {
        Start,
        Stop,
    }

    /// Instrumented pipe double with programmable start failure.
    #[derive(Default)]
    pub struct MockStreamingPipe {
        calls: Vec<PipeCall>,
        fail_start: Option<TransportError>,
        fail_stop: Option<TransportError>,
        running: bool,
    }

    impl MockStreamingPipe {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail every subsequent start with `err`.
        pub fn fail_start_with(&mut self, err: TransportError) {
            self.fail_start = Some(err);
        }

        /// Fail every subsequent stop with `err`.
        pub fn fail_stop_with(&mut self, err: TransportError) {
            self.fail_stop = Some(err);
        }

        /// Every start/stop seen so far, in order.
        pub fn calls(&self) -> &[PipeCall] {
            &self.calls
        }

        /// Whether the continuous reader is currently running.
        pub fn is_running(&self) -> bool {
            self.running
        }
    }

    impl StreamingPipe for MockStreamingPipe {
        fn start(&mut self) -> Result<(), TransportError> {
            self.calls.push(PipeCall::Start);
            if let Some(err) = &self.fail_start {
                return Err(err.clone());
            }
            self.running = true;
            Ok(())
        }

        fn stop(&mut self) -> Result<(), TransportError> {
            self.calls.push(PipeCall::Stop);
            if let Some(err) = &self.fail_stop {
                return Err(err.clone());
            }
            self.running = false;
            Ok(())
        }
    }
}
