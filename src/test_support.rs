use std::vec::Vec;

use crate::{
    listener::{GestureListener, ViewId},
    types::{FingerId, Fx, GestureEvent, TouchPoint, TouchSample},
};

/// Listener that records every notification as the event that caused it.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) events: Vec<GestureEvent>,
    pub(crate) targets: Vec<Option<ViewId>>,
}

impl Recorder {
    fn record(&mut self, target: Option<ViewId>, event: GestureEvent) {
        self.targets.push(target);
        self.events.push(event);
    }
}

impl GestureListener for Recorder {
    fn single_tap(&mut self, target: Option<ViewId>, point: TouchPoint) {
        self.record(target, GestureEvent::SingleTap { point });
    }

    fn double_tap(&mut self, target: Option<ViewId>, point: TouchPoint) {
        self.record(target, GestureEvent::DoubleTap { point });
    }

    fn pan_start(&mut self, target: Option<ViewId>, point: TouchPoint) {
        self.record(target, GestureEvent::PanStart { point });
    }

    fn pan_move(&mut self, target: Option<ViewId>, from: TouchPoint, to: TouchPoint) {
        self.record(target, GestureEvent::PanMove { from, to });
    }

    fn pan_end(&mut self, target: Option<ViewId>, point: TouchPoint) {
        self.record(target, GestureEvent::PanEnd { point });
    }

    fn pan_canceled(&mut self, target: Option<ViewId>, point: TouchPoint) {
        self.record(target, GestureEvent::PanCanceled { point });
    }

    fn pinch_start(&mut self, target: Option<ViewId>, center: TouchPoint) {
        self.record(target, GestureEvent::PinchStart { center });
    }

    fn pinch_move(&mut self, target: Option<ViewId>, center: TouchPoint, scale: Fx) {
        self.record(target, GestureEvent::PinchMove { center, scale });
    }

    fn pinch_end(&mut self, target: Option<ViewId>, center: TouchPoint) {
        self.record(target, GestureEvent::PinchEnd { center });
    }

    fn pinch_canceled(&mut self, target: Option<ViewId>, center: TouchPoint) {
        self.record(target, GestureEvent::PinchCanceled { center });
    }
}

pub(crate) fn finger0(x: u16, y: u16, t_ms: u64) -> TouchSample {
    TouchSample::new(FingerId::FIRST, x, y, t_ms)
}

pub(crate) fn finger1(x: u16, y: u16, t_ms: u64) -> TouchSample {
    TouchSample::new(FingerId::SECOND, x, y, t_ms)
}

pub(crate) fn pt(x: u16, y: u16) -> TouchPoint {
    TouchPoint::new(x, y)
}
