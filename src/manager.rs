use crate::{
    config::GestureConfig,
    engine::{DropReason, GestureEngine, GestureOutput, GestureTraceSample},
    listener::{GestureListener, HitTester, NoHitTester},
    types::{RecognitionState, TouchPhase, TouchReport, TouchSample},
};

/// Listener-facing front of the [`GestureEngine`]. Calls must be serialized by the caller:
/// touch dispatch and timer expiry are expected to run on one executor (see
/// [`crate::pipeline`]).
pub struct TouchManager<L, H = NoHitTester> {
    engine: GestureEngine,
    listener: Option<L>,
    hit_tester: H,
}

impl<L: GestureListener> TouchManager<L, NoHitTester> {
    pub fn new(config: GestureConfig) -> Self {
        Self::with_hit_tester(config, NoHitTester)
    }
}

impl<L: GestureListener> Default for TouchManager<L, NoHitTester> {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl<L: GestureListener, H: HitTester> TouchManager<L, H> {
    pub fn with_hit_tester(config: GestureConfig, hit_tester: H) -> Self {
        Self {
            engine: GestureEngine::new(config),
            listener: None,
            hit_tester,
        }
    }

    /// Registers `listener`, returning the one it replaces.
    pub fn set_listener(&mut self, listener: L) -> Option<L> {
        self.listener.replace(listener)
    }

    pub fn take_listener(&mut self) -> Option<L> {
        self.listener.take()
    }

    pub fn listener(&self) -> Option<&L> {
        self.listener.as_ref()
    }

    pub fn listener_mut(&mut self) -> Option<&mut L> {
        self.listener.as_mut()
    }

    pub fn config(&self) -> &GestureConfig {
        self.engine.config()
    }

    pub fn config_mut(&mut self) -> &mut GestureConfig {
        self.engine.config_mut()
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn state(&self) -> RecognitionState {
        self.engine.state()
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.engine.next_deadline_ms()
    }

    /// Single entry point for touch input. Disabled processing, a missing listener and finger
    /// ids beyond `max_touches` are ignored; the returned trace says which.
    pub fn dispatch(
        &mut self,
        now_ms: u64,
        phase: TouchPhase,
        sample: TouchSample,
    ) -> GestureTraceSample {
        if self.listener.is_none() {
            return self.engine.rejected(
                now_ms,
                Some(phase),
                Some(sample.finger),
                DropReason::NoListener,
            );
        }
        let output = self.engine.handle(now_ms, phase, sample);
        self.deliver(&output)
    }

    /// Dispatches the first sample of a transport notification.
    pub fn on_touch_report(&mut self, now_ms: u64, report: &TouchReport) -> GestureTraceSample {
        match report.primary() {
            Some(sample) => self.dispatch(now_ms, report.phase, sample),
            None => self
                .engine
                .rejected(now_ms, Some(report.phase), None, DropReason::EmptyReport),
        }
    }

    pub fn expire_timers(&mut self, now_ms: u64) -> GestureTraceSample {
        let output = self.engine.expire_timers(now_ms);
        self.deliver(&output)
    }

    pub fn cancel_pending_touches(&mut self) -> GestureTraceSample {
        let output = self.engine.cancel_pending_touches();
        self.deliver(&output)
    }

    pub fn sync_frame(&mut self) -> GestureTraceSample {
        let output = self.engine.sync_frame();
        self.deliver(&output)
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    fn deliver(&mut self, output: &GestureOutput) -> GestureTraceSample {
        let Some(listener) = self.listener.as_mut() else {
            if !output.events.is_empty() {
                log::debug!(
                    "gesture: {} event(s) dropped, no listener",
                    output.events.len()
                );
            }
            return output.trace;
        };
        for event in &output.events {
            let target = self.hit_tester.hit_test(event.anchor());
            event.deliver(target, listener);
        }
        output.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        listener::ViewId,
        test_support::{finger0, finger1, pt, Recorder},
        types::{GestureEvent, TouchPoint},
    };

    /// Left half of the screen is one view, everything else has no target.
    struct SplitScreen;

    impl HitTester for SplitScreen {
        fn hit_test(&self, point: TouchPoint) -> Option<ViewId> {
            (point.x < 100).then_some(ViewId(7))
        }
    }

    fn manager() -> TouchManager<Recorder> {
        let mut manager = TouchManager::default();
        manager.set_listener(Recorder::default());
        manager
    }

    fn recorded<H: HitTester>(manager: &TouchManager<Recorder, H>) -> &Recorder {
        manager.listener().expect("listener registered")
    }

    #[test]
    fn input_without_listener_is_ignored() {
        let mut manager: TouchManager<Recorder> = TouchManager::default();

        let trace = manager.dispatch(0, TouchPhase::Begin, finger0(1, 1, 0));

        assert_eq!(trace.drop_reason, DropReason::NoListener);
        assert_eq!(manager.state(), RecognitionState::None);
    }

    #[test]
    fn empty_report_is_rejected() {
        let mut manager = manager();
        let report = TouchReport {
            phase: TouchPhase::Begin,
            samples: heapless::Vec::new(),
        };

        let trace = manager.on_touch_report(0, &report);

        assert_eq!(trace.drop_reason, DropReason::EmptyReport);
        assert_eq!(manager.state(), RecognitionState::None);
    }

    #[test]
    fn report_uses_first_sample_only() {
        let mut manager = manager();
        let mut samples = heapless::Vec::new();
        samples.push(finger0(10, 10, 0)).expect("capacity");
        samples.push(finger1(90, 90, 0)).expect("capacity");
        let report = TouchReport {
            phase: TouchPhase::Begin,
            samples,
        };

        manager.on_touch_report(0, &report);

        assert_eq!(manager.state(), RecognitionState::SingleTouch);
    }

    #[test]
    fn listener_receives_pan_sequence() {
        let mut manager = manager();

        manager.dispatch(0, TouchPhase::Begin, finger0(0, 0, 0));
        manager.dispatch(10, TouchPhase::Move, finger0(4, 0, 10));
        manager.dispatch(20, TouchPhase::Move, finger0(8, 0, 20));
        manager.dispatch(30, TouchPhase::End, finger0(8, 0, 30));

        let recorder = recorded(&manager);
        assert_eq!(
            recorder.events,
            std::vec![
                GestureEvent::PanStart { point: pt(4, 0) },
                GestureEvent::PanMove {
                    from: pt(4, 0),
                    to: pt(8, 0)
                },
                GestureEvent::PanEnd { point: pt(8, 0) },
            ]
        );
        assert!(recorder.targets.iter().all(Option::is_none));
    }

    #[test]
    fn hit_tester_resolves_target_per_event() {
        let mut manager = TouchManager::with_hit_tester(GestureConfig::default(), SplitScreen);
        manager.set_listener(Recorder::default());

        manager.dispatch(0, TouchPhase::Begin, finger0(50, 0, 0));
        manager.dispatch(10, TouchPhase::Move, finger0(60, 0, 10));
        manager.dispatch(20, TouchPhase::Move, finger0(160, 0, 20));

        let recorder = recorded(&manager);
        assert_eq!(recorder.targets, std::vec![Some(ViewId(7)), None]);
    }

    #[test]
    fn timer_expiry_reaches_listener() {
        let mut manager = manager();

        manager.dispatch(0, TouchPhase::Begin, finger0(5, 6, 0));
        manager.dispatch(20, TouchPhase::End, finger0(5, 6, 20));
        assert_eq!(manager.next_deadline_ms(), Some(420));
        manager.expire_timers(420);

        assert_eq!(
            recorded(&manager).events,
            std::vec![GestureEvent::SingleTap { point: pt(5, 6) }]
        );
    }

    #[test]
    fn replacing_listener_returns_previous() {
        let mut manager = manager();

        manager.dispatch(0, TouchPhase::Begin, finger0(0, 0, 0));
        manager.dispatch(10, TouchPhase::Move, finger0(3, 0, 10));
        let previous = manager.set_listener(Recorder::default()).expect("had listener");

        assert_eq!(previous.events.len(), 1);
        assert!(recorded(&manager).events.is_empty());
        assert!(manager.take_listener().is_some());
        assert!(manager.listener().is_none());
    }
}
