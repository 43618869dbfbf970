use statig::prelude::*;

use super::{DispatchContext, DropReason, GestureHsmEvent, ScheduledTask};
use crate::{
    pinch::PinchGesture,
    types::{FingerId, Fx, GestureEvent, RecognitionState, TouchPhase, TouchPoint, TouchSample},
};

mod sync;
mod tap;

pub(super) struct GestureHsm {
    pub(super) recognition: RecognitionState,
    /// Latest position of finger 0 while it is the only contact.
    first_touch: Option<TouchPoint>,
    /// Last accepted sample of the current gesture; MOVE staleness is measured against it.
    previous_sample: Option<TouchSample>,
    /// Latest pan position and the last one reported to the listener.
    last_stored: Option<TouchPoint>,
    last_notified: Option<TouchPoint>,
    pub(super) pinch: Option<PinchGesture>,
    pinch_baseline: Option<Fx>,
    pinch_last_distance: Option<Fx>,
    /// First tap of a possible double tap.
    pub(super) tap_timer: ScheduledTask<TouchSample>,
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state(superstate = "recognizing")]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            GestureHsmEvent::Touch {
                phase: TouchPhase::End,
                ..
            } => {
                // Trailing END of a finger whose gesture already finished.
                self.clear_tracking();
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "recognizing")]
    fn single_touch(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Touch {
                phase: TouchPhase::Move,
                sample,
                ..
            } => {
                if !self.accept_move(context, sample) {
                    return Handled;
                }
                self.track_first_finger(sample);
                self.last_stored = Some(sample.point);
                self.last_notified = Some(sample.point);
                context.emit(GestureEvent::PanStart {
                    point: sample.point,
                });
                self.enter(RecognitionState::Panning)
            }
            GestureHsmEvent::Touch {
                now_ms,
                phase: TouchPhase::End,
                sample,
            } => {
                self.resolve_tap(context, *now_ms, sample);
                self.clear_tracking();
                self.enter(RecognitionState::None)
            }
            _ => Super,
        }
    }

    #[state(superstate = "recognizing")]
    fn panning(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Touch {
                phase: TouchPhase::Begin,
                sample,
                ..
            } if sample.finger == FingerId::SECOND => {
                // A second contact turns the pan into a pinch without closing the pan.
                self.begin_pinch(context, sample)
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::Move,
                sample,
                ..
            } => {
                if self.accept_move(context, sample) {
                    self.track_first_finger(sample);
                    self.last_stored = Some(sample.point);
                    self.sync_pan(context);
                }
                Handled
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::End,
                sample,
                ..
            } => {
                context.emit(GestureEvent::PanEnd {
                    point: sample.point,
                });
                self.clear_tracking();
                self.enter(RecognitionState::None)
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::Cancel,
                sample,
                ..
            } => {
                self.cancel_pending_tap();
                context.emit(GestureEvent::PanCanceled {
                    point: sample.point,
                });
                self.clear_tracking();
                self.enter(RecognitionState::None)
            }
            GestureHsmEvent::SyncFrame => {
                self.sync_pan(context);
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "recognizing")]
    fn multi_touch(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Touch {
                phase: TouchPhase::Move,
                sample,
                ..
            } => {
                if self.accept_move(context, sample) {
                    if let Some(pinch) = self.pinch.as_mut() {
                        pinch.set_touch(sample.finger, sample.point);
                    }
                    self.sync_pinch(context);
                }
                Handled
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::End,
                sample,
                ..
            } => {
                if let Some(center) = self.finish_pinch(context, sample) {
                    context.emit(GestureEvent::PinchEnd { center });
                }
                self.clear_tracking();
                self.enter(RecognitionState::None)
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::Cancel,
                sample,
                ..
            } => {
                self.cancel_pending_tap();
                if let Some(center) = self.finish_pinch(context, sample) {
                    context.emit(GestureEvent::PinchCanceled { center });
                }
                self.clear_tracking();
                self.enter(RecognitionState::None)
            }
            GestureHsmEvent::SyncFrame => {
                self.sync_pinch(context);
                Handled
            }
            _ => Super,
        }
    }

    #[superstate]
    fn recognizing(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Touch {
                phase: TouchPhase::Begin,
                sample,
                ..
            } => {
                if sample.finger == FingerId::FIRST {
                    self.clear_tracking();
                    self.first_touch = Some(sample.point);
                    self.previous_sample = Some(*sample);
                    self.enter(RecognitionState::SingleTouch)
                } else {
                    self.begin_pinch(context, sample)
                }
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::Move,
                ..
            } => {
                context.drop_input(DropReason::NoTrackedTouch);
                Handled
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::End,
                ..
            } => {
                self.clear_tracking();
                self.enter(RecognitionState::None)
            }
            GestureHsmEvent::Touch {
                phase: TouchPhase::Cancel,
                ..
            } => {
                // Taps are cancelled without notification.
                self.cancel_pending_tap();
                self.clear_tracking();
                self.enter(RecognitionState::None)
            }
            GestureHsmEvent::TapTimerExpired { now_ms } => {
                self.fire_single_tap(context, *now_ms);
                Handled
            }
            GestureHsmEvent::CancelPendingTaps => {
                self.cancel_pending_tap();
                Handled
            }
            GestureHsmEvent::SyncFrame => Handled,
        }
    }
}

impl GestureHsm {
    pub(super) fn new() -> Self {
        Self {
            recognition: RecognitionState::None,
            first_touch: None,
            previous_sample: None,
            last_stored: None,
            last_notified: None,
            pinch: None,
            pinch_baseline: None,
            pinch_last_distance: None,
            tap_timer: ScheduledTask::new(),
        }
    }

    fn enter(&mut self, next: RecognitionState) -> Outcome<State> {
        if self.recognition != next {
            log::trace!("gesture: state {:?} -> {:?}", self.recognition, next);
        }
        self.recognition = next;
        Transition(match next {
            RecognitionState::None => State::idle(),
            RecognitionState::SingleTouch => State::single_touch(),
            RecognitionState::MultiTouch => State::multi_touch(),
            RecognitionState::Panning => State::panning(),
        })
    }

    /// Everything tied to the current gesture. The pending tap outlives it on purpose: the
    /// second tap of a double tap is a new gesture.
    fn clear_tracking(&mut self) {
        self.first_touch = None;
        self.previous_sample = None;
        self.last_stored = None;
        self.last_notified = None;
        self.pinch = None;
        self.pinch_baseline = None;
        self.pinch_last_distance = None;
    }

    fn accept_move(&mut self, context: &mut DispatchContext, sample: &TouchSample) -> bool {
        if !context.config.synced_panning_enabled {
            context.drop_input(DropReason::SyncedPanningDisabled);
            return false;
        }
        let Some(previous) = self.previous_sample else {
            context.drop_input(DropReason::NoTrackedTouch);
            return false;
        };
        let elapsed_ms = sample.t_ms.saturating_sub(previous.t_ms);
        if elapsed_ms > context.config.movement_time_threshold_ms {
            log::trace!(
                "gesture: stale move finger={} elapsed_ms={}",
                sample.finger.as_u8(),
                elapsed_ms
            );
            context.drop_input(DropReason::StaleMove);
            return false;
        }
        self.previous_sample = Some(*sample);
        true
    }

    fn track_first_finger(&mut self, sample: &TouchSample) {
        if sample.finger == FingerId::FIRST {
            self.first_touch = Some(sample.point);
        }
    }

    fn begin_pinch(
        &mut self,
        context: &mut DispatchContext,
        sample: &TouchSample,
    ) -> Outcome<State> {
        // Restarting a pinch keeps the first finger where the old pinch last saw it.
        let first = self
            .pinch
            .as_ref()
            .and_then(PinchGesture::first_touch)
            .or(self.first_touch);
        self.clear_tracking();

        let pinch = PinchGesture::new(first, Some(sample.point));
        self.pinch_baseline = pinch.distance();
        self.pinch_last_distance = self.pinch_baseline;
        match pinch.center() {
            Some(center) => context.emit(GestureEvent::PinchStart { center }),
            None => log::debug!("gesture: second finger without a first, pinch start deferred"),
        }
        self.pinch = Some(pinch);
        self.previous_sample = Some(*sample);
        self.enter(RecognitionState::MultiTouch)
    }

    /// Applies the final sample of a pinch and returns its center when both fingers are known.
    fn finish_pinch(
        &mut self,
        context: &mut DispatchContext,
        sample: &TouchSample,
    ) -> Option<TouchPoint> {
        let mut pinch = self.pinch.take()?;
        pinch.set_touch(sample.finger, sample.point);
        if !pinch.is_valid() {
            context.drop_input(DropReason::NoTrackedTouch);
            return None;
        }
        pinch.center()
    }
}
