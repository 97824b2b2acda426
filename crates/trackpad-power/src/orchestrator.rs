//! The power orchestrator and emergency recovery.

use crate::pipe::{PipeState, StreamingPipe};
use crate::{PowerError, PowerResult};
use opentrackpad_capabilities::{DeviceDescriptor, TrackerInit, resolve};
use opentrackpad_mode_protocol::{ControlTransport, ModeNegotiator};
use tracing::{debug, error, info, warn};

/// Host power state of the device instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    /// Powered down; streaming stopped.
    #[default]
    Off,
    /// Power-up transition in progress.
    Entering,
    /// Fully powered; streaming active.
    On,
    /// Power-down transition in progress.
    Exiting,
}

/// Whether a step failure aborts the enclosing transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Failure aborts the transition and is surfaced to the caller.
    Fatal,
    /// Failure is logged; the transition continues.
    Tolerated,
}

/// The individually policed steps of the power transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Mode entry during power-up.
    ModeEnter,
    /// Streaming pipe start during power-up.
    PipeStart,
    /// Streaming pipe stop during power-down.
    PipeStop,
    /// Mode exit during power-down.
    ModeExit,
}

impl Step {
    /// The tolerate/fatal classification, declared once.
    ///
    /// Raw mode is an enhancement: failing to enter it degrades reporting
    /// precision but keeps the device usable, and failing to exit it must
    /// never block a mandatory power-down. A pipe that will not start means
    /// no input at all; that is the one fatal step.
    pub const fn policy(self) -> StepPolicy {
        match self {
            Step::PipeStart => StepPolicy::Fatal,
            Step::ModeEnter | Step::PipeStop | Step::ModeExit => StepPolicy::Tolerated,
        }
    }
}

/// Top-level per-device control handle.
///
/// Owns the mode negotiator, the transport, the streaming pipe, and all
/// mutable power state. Exclusive ownership plus `&mut self` triggers is
/// the single-owner handle the serialized-delivery contract requires: no
/// locks, no shared state between device instances.
pub struct PowerSequencer<T, P> {
    descriptor: &'static DeviceDescriptor,
    negotiator: ModeNegotiator,
    transport: T,
    pipe: P,
    power_state: PowerState,
    pipe_state: PipeState,
    button_report_on: bool,
    surface_report_on: bool,
}

impl<T, P> PowerSequencer<T, P>
where
    T: ControlTransport,
    P: StreamingPipe,
{
    /// Attach-time construction: resolve the capability descriptor (fatal
    /// when unsupported), derive the tracker contract, and build the
    /// sequencer with both reporting flags defaulted on.
    ///
    /// # Errors
    ///
    /// [`PowerError::UnsupportedDevice`] when no descriptor matches; the
    /// caller must abandon attach.
    pub fn attach(
        vendor_id: u16,
        product_id: u16,
        transport: T,
        pipe: P,
    ) -> PowerResult<(Self, TrackerInit)> {
        let descriptor = resolve(vendor_id, product_id).inspect_err(|err| {
            error!(%err, "abandoning attach");
        })?;
        let tracker_init = TrackerInit::for_descriptor(descriptor);
        info!(
            device = descriptor.name,
            x_fuzz = tracker_init.fuzz.x,
            y_fuzz = tracker_init.fuzz.y,
            pressure_fuzz = tracker_init.fuzz.pressure,
            width_fuzz = tracker_init.fuzz.width,
            orientation_fuzz = tracker_init.fuzz.orientation,
            "resolved trackpad capabilities"
        );
        Ok((Self::new(descriptor, transport, pipe), tracker_init))
    }

    /// Build a sequencer for an already-resolved descriptor.
    pub fn new(descriptor: &'static DeviceDescriptor, transport: T, pipe: P) -> Self {
        Self {
            descriptor,
            negotiator: ModeNegotiator::new(descriptor),
            transport,
            pipe,
            power_state: PowerState::Off,
            pipe_state: PipeState::Stopped,
            button_report_on: true,
            surface_report_on: true,
        }
    }

    /// Current host power state.
    pub fn power_state(&self) -> PowerState {
        self.power_state
    }

    /// Current streaming-pipe state.
    pub fn pipe_state(&self) -> PipeState {
        self.pipe_state
    }

    /// Whether raw multitouch mode was last committed on.
    pub fn is_mode_engaged(&self) -> bool {
        self.negotiator.is_engaged()
    }

    /// The resolved capability descriptor.
    pub fn descriptor(&self) -> &'static DeviceDescriptor {
        self.descriptor
    }

    /// Direct access to the owned transport, for harnesses that inject
    /// faults mid-lifecycle.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Direct access to the owned streaming pipe.
    pub fn pipe_mut(&mut self) -> &mut P {
        &mut self.pipe
    }

    /// Persisted button-reporting flag (defaults on at attach).
    pub fn set_button_report(&mut self, on: bool) {
        self.button_report_on = on;
    }

    /// Persisted surface-reporting flag (defaults on at attach).
    pub fn set_surface_report(&mut self, on: bool) {
        self.surface_report_on = on;
    }

    /// Power-up transition (`Off -> On`).
    ///
    /// Enters raw mode first (best-effort), then starts the streaming pipe.
    /// A pipe-start failure rolls the pipe back to `Stopped` via the
    /// idempotent stop and aborts the transition; when the rollback stop
    /// itself fails the pipe is left observably `StartFailed`.
    ///
    /// # Errors
    ///
    /// [`PowerError::PipeStart`] when the streaming pipe will not start;
    /// the device should be treated as failed and removed.
    pub fn power_up(&mut self) -> PowerResult<()> {
        self.power_state = PowerState::Entering;
        debug!(device = self.descriptor.name, "power-up entry");

        // Mode first, so the first streamed packets already use the raw
        // format. Wanted whenever reporting is enabled or the device was
        // previously in raw mode.
        if self.button_report_on || self.surface_report_on || self.negotiator.is_engaged() {
            if let Err(err) = self.negotiator.set(&mut self.transport, true) {
                self.tolerated(Step::ModeEnter, &err);
            }
        }

        match self.pipe.start() {
            Ok(()) => self.pipe_state = PipeState::Started,
            Err(err) => match Step::PipeStart.policy() {
                StepPolicy::Tolerated => self.tolerated(Step::PipeStart, &err),
                StepPolicy::Fatal => {
                    self.pipe_state = PipeState::StartFailed;
                    error!(
                        device = self.descriptor.name,
                        %err,
                        "streaming pipe failed to start, rolling back"
                    );
                    // Never leave a half-started reader behind; upstream
                    // responds to this failure by removing the device.
                    match self.pipe.stop() {
                        Ok(()) => self.pipe_state = PipeState::Stopped,
                        Err(stop_err) => warn!(%stop_err, "rollback stop failed"),
                    }
                    self.power_state = PowerState::Off;
                    return Err(PowerError::PipeStart(err));
                }
            },
        }

        self.power_state = PowerState::On;
        debug!(device = self.descriptor.name, "power-up complete");
        Ok(())
    }

    /// Power-down transition (`On -> Off`).
    ///
    /// Stops the streaming pipe first, then exits raw mode (best-effort).
    /// Always completes: leaving the device in a stale mode is preferable
    /// to blocking a mandatory sleep or hibernate.
    ///
    /// # Errors
    ///
    /// None currently; the signature matches the trigger contract so the
    /// lifecycle glue can treat all transitions uniformly.
    pub fn power_down(&mut self) -> PowerResult<()> {
        self.power_state = PowerState::Exiting;
        debug!(device = self.descriptor.name, "power-down entry");

        // Stream off before the mode changes underneath it.
        if let Err(err) = self.pipe.stop() {
            self.tolerated(Step::PipeStop, &err);
        }
        self.pipe_state = PipeState::Stopped;

        if let Err(err) = self.negotiator.set(&mut self.transport, false) {
            self.tolerated(Step::ModeExit, &err);
        }

        self.power_state = PowerState::Off;
        debug!(device = self.descriptor.name, "power-down complete");
        Ok(())
    }

    /// Emergency recovery for a device believed to be in a desynchronized
    /// protocol state: exit raw mode, then re-enter it, independent of the
    /// recorded state and of individual step failures.
    ///
    /// Idempotent; converges to raw mode on as long as the device is
    /// reachable.
    ///
    /// # Errors
    ///
    /// [`PowerError::Recovery`] when the final re-entry handshake fails.
    /// The outcome is the re-entry's alone: a failed exit is logged but
    /// does not fail the reset, since the device still converged to raw
    /// mode on. Both steps are always attempted.
    pub fn kick(&mut self) -> PowerResult<()> {
        info!(device = self.descriptor.name, "emergency mode reset");

        if let Err(err) = self.negotiator.set(&mut self.transport, false) {
            // Exit is preparatory; convergence is decided by the re-entry.
            warn!(%err, "recovery mode exit failed");
        }
        self.negotiator.set(&mut self.transport, true).map_err(|err| {
            error!(%err, "recovery mode entry failed");
            PowerError::Recovery(err)
        })
    }

    /// Log a step failure that policy says to ride through.
    fn tolerated(&self, step: Step, err: &dyn std::error::Error) {
        debug_assert_eq!(step.policy(), StepPolicy::Tolerated);
        warn!(
            device = self.descriptor.name,
            ?step,
            %err,
            "step failed, transition continues"
        );
    }
}
