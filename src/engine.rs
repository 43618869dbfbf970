//! Gesture state machine.
//!
//! [`GestureEngine`] is the synchronous core: it classifies one touch dispatch at a time and
//! returns the gestures it produced. Double-tap disambiguation needs a deadline, which the engine
//! keeps as a [`ScheduledTask`]; whoever drives the engine polls it through
//! [`GestureEngine::expire_timers`] from the same context that dispatches touches.

use heapless::Vec;
use statig::blocking::IntoStateMachineExt as _;

mod hsm;
mod timer;

use hsm::GestureHsm;
pub use timer::{ScheduledTask, TimerToken};

use crate::{
    config::GestureConfig,
    pinch::PinchGesture,
    types::{FingerId, GestureEvent, RecognitionState, TouchPhase, TouchSample},
};

/// Upper bound on gestures produced by a single dispatch.
pub const MAX_EVENTS_PER_DISPATCH: usize = 4;

pub type GestureEvents = Vec<GestureEvent, MAX_EVENTS_PER_DISPATCH>;

#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    Touch {
        now_ms: u64,
        phase: TouchPhase,
        sample: TouchSample,
    },
    TapTimerExpired {
        now_ms: u64,
    },
    CancelPendingTaps,
    SyncFrame,
}

/// Why a dispatch produced nothing, when it was rejected or dropped on purpose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DropReason {
    #[default]
    None = 0,
    TouchDisabled = 1,
    NoListener = 2,
    FingerOutOfRange = 3,
    EmptyReport = 4,
    StaleMove = 5,
    SyncedPanningDisabled = 6,
    NoTrackedTouch = 7,
    TapPairRejected = 8,
    EventOverflow = 9,
}

impl DropReason {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureTraceSample {
    pub now_ms: u64,
    /// Recognition state after the dispatch.
    pub state: RecognitionState,
    pub phase: Option<TouchPhase>,
    pub finger: Option<FingerId>,
    pub drop_reason: DropReason,
    pub tap_pending: bool,
    pub event_count: u8,
}

#[derive(Clone, Debug, Default)]
pub struct GestureOutput {
    pub events: GestureEvents,
    pub trace: GestureTraceSample,
}

struct DispatchContext {
    config: GestureConfig,
    events: GestureEvents,
    trace: GestureTraceSample,
}

impl DispatchContext {
    fn new(config: GestureConfig, trace: GestureTraceSample) -> Self {
        Self {
            config,
            events: Vec::new(),
            trace,
        }
    }

    fn emit(&mut self, event: GestureEvent) {
        if self.events.push(event).is_err() {
            log::warn!("gesture: event buffer full, dropped {}", event.kind().label());
            self.trace.drop_reason = DropReason::EventOverflow;
        }
    }

    fn drop_input(&mut self, reason: DropReason) {
        self.trace.drop_reason = reason;
    }
}

pub struct GestureEngine {
    machine: statig::blocking::StateMachine<GestureHsm>,
    config: GestureConfig,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureEngine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            machine: GestureHsm::new().state_machine(),
            config,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GestureConfig {
        &mut self.config
    }

    pub fn state(&self) -> RecognitionState {
        self.machine.inner().recognition
    }

    pub fn pinch(&self) -> Option<&PinchGesture> {
        self.machine.inner().pinch.as_ref()
    }

    /// Deadline of the pending single-tap decision, on the `now_ms` clock.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.machine.inner().tap_timer.deadline_ms()
    }

    pub fn tap_pending(&self) -> bool {
        self.machine.inner().tap_timer.is_armed()
    }

    /// Classifies one touch report. `now_ms` is the local clock the tap timer runs on;
    /// thresholds between samples use `sample.t_ms`.
    pub fn handle(&mut self, now_ms: u64, phase: TouchPhase, sample: TouchSample) -> GestureOutput {
        if !self.config.touch_enabled {
            return self.rejected_output(now_ms, phase, sample, DropReason::TouchDisabled);
        }
        if !self.config.accepts_finger(sample.finger) {
            log::debug!(
                "gesture: ignored finger={} max_touches={}",
                sample.finger.as_u8(),
                self.config.max_touches
            );
            return self.rejected_output(now_ms, phase, sample, DropReason::FingerOutOfRange);
        }

        let mut trace = self.trace_base(now_ms);
        trace.phase = Some(phase);
        trace.finger = Some(sample.finger);
        self.run(
            GestureHsmEvent::Touch {
                now_ms,
                phase,
                sample,
            },
            trace,
        )
    }

    /// Fires the single-tap decision if its deadline has passed.
    pub fn expire_timers(&mut self, now_ms: u64) -> GestureOutput {
        let trace = self.trace_base(now_ms);
        self.run(GestureHsmEvent::TapTimerExpired { now_ms }, trace)
    }

    /// Drops a pending tap without reporting it.
    pub fn cancel_pending_touches(&mut self) -> GestureOutput {
        let trace = self.trace_base(0);
        self.run(GestureHsmEvent::CancelPendingTaps, trace)
    }

    /// Runs the frame synchronizer outside of a touch dispatch, for hosts that tie notifications
    /// to their own frame clock.
    pub fn sync_frame(&mut self) -> GestureOutput {
        let trace = self.trace_base(0);
        self.run(GestureHsmEvent::SyncFrame, trace)
    }

    /// Forgets all tracked touches and any pending tap.
    pub fn reset(&mut self) {
        self.machine = GestureHsm::new().state_machine();
    }

    /// Trace for an input refused before it reached the state machine.
    pub fn rejected(
        &self,
        now_ms: u64,
        phase: Option<TouchPhase>,
        finger: Option<FingerId>,
        reason: DropReason,
    ) -> GestureTraceSample {
        GestureTraceSample {
            phase,
            finger,
            drop_reason: reason,
            ..self.trace_base(now_ms)
        }
    }

    fn rejected_output(
        &self,
        now_ms: u64,
        phase: TouchPhase,
        sample: TouchSample,
        reason: DropReason,
    ) -> GestureOutput {
        GestureOutput {
            events: Vec::new(),
            trace: self.rejected(now_ms, Some(phase), Some(sample.finger), reason),
        }
    }

    fn trace_base(&self, now_ms: u64) -> GestureTraceSample {
        GestureTraceSample {
            now_ms,
            state: self.state(),
            tap_pending: self.tap_pending(),
            ..GestureTraceSample::default()
        }
    }

    fn run(&mut self, event: GestureHsmEvent, trace: GestureTraceSample) -> GestureOutput {
        let mut context = DispatchContext::new(self.config, trace);
        self.machine.handle_with_context(&event, &mut context);

        let mut trace = context.trace;
        trace.state = self.state();
        trace.tap_pending = self.tap_pending();
        trace.event_count = context.events.len() as u8;
        GestureOutput {
            events: context.events,
            trace,
        }
    }
}
