use super::*;
use crate::config::GestureConfig;

impl GestureHsm {
    /// Handles the END of a single touch. The first tap only arms the timer; a second END while
    /// it is armed settles the pair right away.
    pub(super) fn resolve_tap(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
        sample: &TouchSample,
    ) {
        // A candidate whose deadline already passed is a single tap, never half of a pair.
        self.fire_single_tap(context, now_ms);

        let Some(first) = self.tap_timer.cancel() else {
            self.tap_timer
                .arm(now_ms, context.config.tap_time_threshold_ms, *sample);
            log::trace!(
                "gesture: tap candidate x={} y={} deadline_ms={:?}",
                sample.point.x,
                sample.point.y,
                self.tap_timer.deadline_ms()
            );
            return;
        };

        if is_double_tap(&context.config, &first, sample) {
            context.emit(GestureEvent::DoubleTap {
                point: first.point.midpoint(sample.point),
            });
        } else {
            // Neither tap of a failed pair is reported as a single tap.
            log::debug!(
                "gesture: tap pair rejected dt_ms={} dx={} dy={}",
                sample.t_ms.abs_diff(first.t_ms),
                sample.point.x.abs_diff(first.point.x),
                sample.point.y.abs_diff(first.point.y)
            );
            context.drop_input(DropReason::TapPairRejected);
        }
    }

    pub(super) fn fire_single_tap(&mut self, context: &mut DispatchContext, now_ms: u64) {
        if let Some(first) = self.tap_timer.take_expired(now_ms) {
            context.emit(GestureEvent::SingleTap { point: first.point });
        }
    }

    pub(super) fn cancel_pending_tap(&mut self) {
        if self.tap_timer.cancel().is_some() {
            log::trace!("gesture: pending tap cancelled");
        }
    }
}

fn is_double_tap(config: &GestureConfig, first: &TouchSample, second: &TouchSample) -> bool {
    second.t_ms.abs_diff(first.t_ms) <= config.tap_time_threshold_ms
        && second.point.x.abs_diff(first.point.x) <= config.tap_distance_threshold
        && second.point.y.abs_diff(first.point.y) <= config.tap_distance_threshold
}
