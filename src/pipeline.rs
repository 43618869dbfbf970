//! Async driver for [`TouchManager`].
//!
//! Transport producers push [`GestureInput`]s into a channel; one task owns the manager and
//! waits on either the next input or the pending tap deadline. Timer expiry and touch dispatch
//! therefore run on the same task and can never interleave.

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embassy_time::{Instant, Timer};

use crate::{
    listener::{GestureListener, HitTester},
    manager::TouchManager,
    types::TouchReport,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureInput {
    Report(TouchReport),
    /// Drops any pending tap without reporting it.
    CancelPendingTouches,
    /// Flushes pan/pinch changes, for hosts driving notifications from a frame clock.
    SyncFrame,
    /// Forgets all gesture state.
    Reset,
}

pub async fn run_gesture_pipeline<M, L, H, const N: usize>(
    inputs: &Channel<M, GestureInput, N>,
    manager: &mut TouchManager<L, H>,
) where
    M: RawMutex,
    L: GestureListener,
    H: HitTester,
{
    loop {
        pump_once(inputs, manager).await;
    }
}

/// Waits for one input or the tap deadline, whichever comes first, and applies it.
pub async fn pump_once<M, L, H, const N: usize>(
    inputs: &Channel<M, GestureInput, N>,
    manager: &mut TouchManager<L, H>,
) where
    M: RawMutex,
    L: GestureListener,
    H: HitTester,
{
    let input = match manager.next_deadline_ms() {
        Some(deadline_ms) => {
            match select(
                inputs.receive(),
                Timer::at(Instant::from_millis(deadline_ms)),
            )
            .await
            {
                Either::First(input) => Some(input),
                Either::Second(()) => None,
            }
        }
        None => Some(inputs.receive().await),
    };

    let now_ms = Instant::now().as_millis();
    // A deadline that passed while the input was queued still fires before the input is seen.
    manager.expire_timers(now_ms);

    match input {
        Some(GestureInput::Report(report)) => {
            let trace = manager.on_touch_report(now_ms, &report);
            log::trace!(
                "gesture: report phase={:?} state={:?} drop={:?} events={}",
                report.phase,
                trace.state,
                trace.drop_reason,
                trace.event_count
            );
        }
        Some(GestureInput::CancelPendingTouches) => {
            manager.cancel_pending_touches();
        }
        Some(GestureInput::SyncFrame) => {
            manager.sync_frame();
        }
        Some(GestureInput::Reset) => {
            log::debug!("gesture: pipeline reset");
            manager.reset();
        }
        None => {}
    }
}
