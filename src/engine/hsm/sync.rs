//! Frame synchronizer: collapses geometrically identical updates into nothing, so the listener
//! hears about pans and pinches only when they actually change.

use super::*;

impl GestureHsm {
    pub(super) fn sync_pan(&mut self, context: &mut DispatchContext) {
        let (Some(stored), Some(notified)) = (self.last_stored, self.last_notified) else {
            return;
        };
        if stored == notified {
            return;
        }
        context.emit(GestureEvent::PanMove {
            from: notified,
            to: stored,
        });
        self.last_notified = Some(stored);
    }

    pub(super) fn sync_pinch(&mut self, context: &mut DispatchContext) {
        let Some((distance, center)) = self
            .pinch
            .as_ref()
            .and_then(|pinch| Some((pinch.distance()?, pinch.center()?)))
        else {
            return;
        };

        let Some(baseline) = self.pinch_baseline else {
            // Both fingers are known only now; this is where the pinch really starts.
            self.pinch_baseline = Some(distance);
            self.pinch_last_distance = Some(distance);
            context.emit(GestureEvent::PinchStart { center });
            return;
        };

        // Nothing to report at the starting span or at the span already reported.
        if distance == baseline || self.pinch_last_distance == Some(distance) {
            return;
        }
        let Some(scale) = distance.checked_div(baseline) else {
            log::trace!("gesture: pinch started with coincident fingers, no scale");
            return;
        };
        self.pinch_last_distance = Some(distance);
        context.emit(GestureEvent::PinchMove { center, scale });
    }
}
