//! Touch gesture recognition.
//!
//! Turns a stream of per-finger touch samples (begin/move/end/cancel) into taps, double taps,
//! pans and two-finger pinches. [`TouchManager`] is the entry point; [`pipeline`] shows how to
//! drive it from an embassy executor so that touch input and the double-tap timer share one
//! serialization point.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod engine;
pub mod listener;
mod manager;
pub mod pinch;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::{active_config, GestureConfig};
pub use engine::{
    DropReason, GestureEngine, GestureOutput, GestureTraceSample, ScheduledTask, TimerToken,
};
pub use listener::{GestureListener, HitTester, NoHitTester, ViewId};
pub use manager::TouchManager;
pub use pinch::PinchGesture;
pub use pipeline::{run_gesture_pipeline, GestureInput};
pub use types::{
    FingerId, Fx, GestureEvent, GestureKind, RecognitionState, TouchPhase, TouchPoint,
    TouchReport, TouchSample,
};
