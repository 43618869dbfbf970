//! What the engine notifies, and the hit-testing collaborator that picks a target for it.

use crate::types::{Fx, GestureEvent, TouchPoint};

/// Opaque handle of a UI element resolved by a [`HitTester`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(pub u32);

pub trait HitTester {
    fn hit_test(&self, point: TouchPoint) -> Option<ViewId>;
}

/// Hit tester for hosts without a view hierarchy; never resolves a target.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHitTester;

impl HitTester for NoHitTester {
    fn hit_test(&self, _point: TouchPoint) -> Option<ViewId> {
        None
    }
}

/// Receiver of recognized gestures. Every notification carries the hit-test target for its
/// anchor point. Unused notifications can be left at their no-op defaults.
pub trait GestureListener {
    fn single_tap(&mut self, target: Option<ViewId>, point: TouchPoint) {
        let _ = (target, point);
    }

    /// `point` is the midpoint of both taps.
    fn double_tap(&mut self, target: Option<ViewId>, point: TouchPoint) {
        let _ = (target, point);
    }

    fn pan_start(&mut self, target: Option<ViewId>, point: TouchPoint) {
        let _ = (target, point);
    }

    /// `from` is the last position already reported, `to` the newest one.
    fn pan_move(&mut self, target: Option<ViewId>, from: TouchPoint, to: TouchPoint) {
        let _ = (target, from, to);
    }

    fn pan_end(&mut self, target: Option<ViewId>, point: TouchPoint) {
        let _ = (target, point);
    }

    fn pan_canceled(&mut self, target: Option<ViewId>, point: TouchPoint) {
        let _ = (target, point);
    }

    fn pinch_start(&mut self, target: Option<ViewId>, center: TouchPoint) {
        let _ = (target, center);
    }

    /// `scale` is the current finger distance over the distance at pinch start.
    fn pinch_move(&mut self, target: Option<ViewId>, center: TouchPoint, scale: Fx) {
        let _ = (target, center, scale);
    }

    fn pinch_end(&mut self, target: Option<ViewId>, center: TouchPoint) {
        let _ = (target, center);
    }

    fn pinch_canceled(&mut self, target: Option<ViewId>, center: TouchPoint) {
        let _ = (target, center);
    }
}

impl GestureEvent {
    pub fn deliver<L: GestureListener + ?Sized>(&self, target: Option<ViewId>, listener: &mut L) {
        match *self {
            GestureEvent::SingleTap { point } => listener.single_tap(target, point),
            GestureEvent::DoubleTap { point } => listener.double_tap(target, point),
            GestureEvent::PanStart { point } => listener.pan_start(target, point),
            GestureEvent::PanMove { from, to } => listener.pan_move(target, from, to),
            GestureEvent::PanEnd { point } => listener.pan_end(target, point),
            GestureEvent::PanCanceled { point } => listener.pan_canceled(target, point),
            GestureEvent::PinchStart { center } => listener.pinch_start(target, center),
            GestureEvent::PinchMove { center, scale } => {
                listener.pinch_move(target, center, scale)
            }
            GestureEvent::PinchEnd { center } => listener.pinch_end(target, center),
            GestureEvent::PinchCanceled { center } => listener.pinch_canceled(target, center),
        }
    }
}
