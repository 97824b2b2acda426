//! Cross-resource ordering of the power transitions, observed through a
//! shared event log: the mode handshake and the pipe operations record into
//! one timeline so the asymmetric ordering is directly assertable.

use std::sync::{Arc, Mutex};

use opentrackpad_capabilities::{APPLE_VENDOR_ID, product_ids};
use opentrackpad_mode_protocol::{ControlTransport, TransportError};
use opentrackpad_power::{PipeState, PowerError, PowerSequencer, PowerState, StreamingPipe};

type EventLog = Arc<Mutex<Vec<&'static str>>>;

fn log(events: &EventLog, event: &'static str) {
    events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
}

fn snapshot(events: &EventLog) -> Vec<&'static str> {
    events.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

struct LoggingTransport {
    events: EventLog,
    register: Vec<u8>,
    fail: bool,
}

impl ControlTransport for LoggingTransport {
    fn control_read(
        &mut self,
        _request: u8,
        _value: u16,
        _index: u16,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        log(&self.events, "control-read");
        if self.fail {
            return Err(TransportError::Stall);
        }
        let n = buf.len().min(self.register.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), self.register.get(..n)) {
            dst.copy_from_slice(src);
        }
        Ok(n)
    }

    fn control_write(
        &mut self,
        _request: u8,
        _value: u16,
        _index: u16,
        buf: &[u8],
    ) -> Result<usize, TransportError> {
        log(&self.events, "control-write");
        if self.fail {
            return Err(TransportError::Stall);
        }
        self.register = buf.to_vec();
        Ok(buf.len())
    }
}

struct LoggingPipe {
    events: EventLog,
    fail_start: bool,
}

impl StreamingPipe for LoggingPipe {
    fn start(&mut self) -> Result<(), TransportError> {
        log(&self.events, "pipe-start");
        if self.fail_start {
            return Err(TransportError::Io("start refused".into()));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        log(&self.events, "pipe-stop");
        Ok(())
    }
}

fn harness(
    mode_fail: bool,
    pipe_fail: bool,
) -> (PowerSequencer<LoggingTransport, LoggingPipe>, EventLog) {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let transport = LoggingTransport {
        events: Arc::clone(&events),
        register: vec![0; 8],
        fail: mode_fail,
    };
    let pipe = LoggingPipe {
        events: Arc::clone(&events),
        fail_start: pipe_fail,
    };
    let (seq, _) = PowerSequencer::attach(
        APPLE_VENDOR_ID,
        product_ids::WELLSPRING1_ANSI,
        transport,
        pipe,
    )
    .expect("attach should succeed");
    (seq, events)
}

#[test]
fn power_up_negotiates_mode_before_starting_stream() {
    let (mut seq, events) = harness(false, false);
    seq.power_up().expect("power-up should succeed");
    assert_eq!(
        snapshot(&events),
        vec!["control-read", "control-write", "pipe-start"]
    );
}

#[test]
fn power_down_stops_stream_before_exiting_mode() {
    let (mut seq, events) = harness(false, false);
    seq.power_up().expect("power-up should succeed");
    events.lock().unwrap_or_else(|e| e.into_inner()).clear();

    seq.power_down().expect("power-down should succeed");
    assert_eq!(
        snapshot(&events),
        vec!["pipe-stop", "control-read", "control-write"]
    );
}

#[test]
fn failed_pipe_start_is_rolled_back_with_idempotent_stop() {
    let (mut seq, events) = harness(false, true);
    let err = seq.power_up().expect_err("pipe-start failure is fatal");
    assert!(matches!(err, PowerError::PipeStart(_)));
    assert_eq!(seq.power_state(), PowerState::Off);
    assert_eq!(seq.pipe_state(), PipeState::Stopped);
    assert_eq!(
        snapshot(&events),
        vec!["control-read", "control-write", "pipe-start", "pipe-stop"]
    );
}

#[test]
fn mode_failure_during_power_up_still_starts_stream() {
    let (mut seq, events) = harness(true, false);
    seq.power_up()
        .expect("mode failure is tolerated during power-up");
    assert_eq!(seq.power_state(), PowerState::On);
    // Read attempted, write never reached, stream started anyway.
    assert_eq!(snapshot(&events), vec!["control-read", "pipe-start"]);
}

#[test]
fn kick_runs_exit_then_enter_even_when_both_fail() {
    let (mut seq, events) = harness(true, false);
    let err = seq.kick().expect_err("kick must surface the failure");
    assert!(matches!(err, PowerError::Recovery(_)));
    // Two read attempts: one per handshake, both aborted before the write.
    assert_eq!(snapshot(&events), vec!["control-read", "control-read"]);
}

#[test]
fn full_cycle_leaves_device_recoverable() {
    let (mut seq, _) = harness(false, false);
    for _ in 0..3 {
        seq.power_up().expect("power-up should succeed");
        assert_eq!(seq.power_state(), PowerState::On);
        assert!(seq.is_mode_engaged());
        seq.power_down().expect("power-down should succeed");
        assert_eq!(seq.power_state(), PowerState::Off);
        assert!(!seq.is_mode_engaged());
    }
}
