//! Two-finger geometry with lazily memoized distance and center.

use core::cell::Cell;

use fixed_sqrt::FixedSqrt;

use crate::types::{FingerId, Fx, TouchPoint};

#[derive(Clone, Debug, Default)]
pub struct PinchGesture {
    first: Option<TouchPoint>,
    second: Option<TouchPoint>,
    distance: Cell<Option<Fx>>,
    center: Cell<Option<TouchPoint>>,
}

impl PinchGesture {
    pub fn new(first: Option<TouchPoint>, second: Option<TouchPoint>) -> Self {
        Self {
            first,
            second,
            distance: Cell::new(None),
            center: Cell::new(None),
        }
    }

    pub fn first_touch(&self) -> Option<TouchPoint> {
        self.first
    }

    pub fn second_touch(&self) -> Option<TouchPoint> {
        self.second
    }

    pub fn set_first_touch(&mut self, point: TouchPoint) {
        self.first = Some(point);
        self.invalidate();
    }

    pub fn set_second_touch(&mut self, point: TouchPoint) {
        self.second = Some(point);
        self.invalidate();
    }

    /// Routes `point` to the slot for `finger`. Returns `false` for fingers a pinch does not
    /// track.
    pub fn set_touch(&mut self, finger: FingerId, point: TouchPoint) -> bool {
        match finger {
            FingerId::FIRST => self.set_first_touch(point),
            FingerId::SECOND => self.set_second_touch(point),
            _ => return false,
        }
        true
    }

    pub fn is_valid(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    pub fn distance(&self) -> Option<Fx> {
        if let Some(distance) = self.distance.get() {
            return Some(distance);
        }
        let (a, b) = self.points()?;
        let dx = i64::from(a.x) - i64::from(b.x);
        let dy = i64::from(a.y) - i64::from(b.y);
        // Largest possible value (2 * 65535^2) fits comfortably in the integer range of Fx.
        let distance = FixedSqrt::sqrt(Fx::from_num(dx * dx + dy * dy));
        self.distance.set(Some(distance));
        Some(distance)
    }

    pub fn center(&self) -> Option<TouchPoint> {
        if let Some(center) = self.center.get() {
            return Some(center);
        }
        let (a, b) = self.points()?;
        let center = a.midpoint(b);
        self.center.set(Some(center));
        Some(center)
    }

    fn points(&self) -> Option<(TouchPoint, TouchPoint)> {
        Some((self.first?, self.second?))
    }

    fn invalidate(&mut self) {
        self.distance.set(None);
        self.center.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinch(x0: u16, y0: u16, x1: u16, y1: u16) -> PinchGesture {
        PinchGesture::new(Some(TouchPoint::new(x0, y0)), Some(TouchPoint::new(x1, y1)))
    }

    #[test]
    fn horizontal_pair_has_exact_distance_and_center() {
        let gesture = pinch(10, 10, 20, 10);
        assert_eq!(gesture.distance(), Some(Fx::from_num(10)));
        assert_eq!(gesture.center(), Some(TouchPoint::new(15, 10)));
    }

    #[test]
    fn distance_is_symmetric() {
        let forward = pinch(3, 4, 100, 200);
        let backward = pinch(100, 200, 3, 4);
        assert_eq!(forward.distance(), backward.distance());
    }

    #[test]
    fn pythagorean_triple_is_exact() {
        assert_eq!(pinch(0, 0, 30, 40).distance(), Some(Fx::from_num(50)));
    }

    #[test]
    fn center_truncates_per_axis() {
        assert_eq!(pinch(0, 0, 5, 7).center(), Some(TouchPoint::new(2, 3)));
    }

    #[test]
    fn replacing_a_point_invalidates_the_cache() {
        let mut gesture = pinch(0, 0, 10, 0);
        assert_eq!(gesture.distance(), Some(Fx::from_num(10)));
        assert_eq!(gesture.center(), Some(TouchPoint::new(5, 0)));

        gesture.set_second_touch(TouchPoint::new(20, 0));
        assert_eq!(gesture.distance(), Some(Fx::from_num(20)));
        assert_eq!(gesture.center(), Some(TouchPoint::new(10, 0)));
    }

    #[test]
    fn rewriting_the_same_point_keeps_results() {
        let mut gesture = pinch(7, 9, 40, 50);
        let distance = gesture.distance();
        let center = gesture.center();

        gesture.set_first_touch(TouchPoint::new(7, 9));
        assert_eq!(gesture.distance(), distance);
        assert_eq!(gesture.center(), center);
    }

    #[test]
    fn missing_point_is_invalid_and_has_no_geometry() {
        let mut gesture = PinchGesture::new(None, Some(TouchPoint::new(1, 1)));
        assert!(!gesture.is_valid());
        assert_eq!(gesture.distance(), None);
        assert_eq!(gesture.center(), None);

        assert!(gesture.set_touch(FingerId::FIRST, TouchPoint::new(1, 5)));
        assert!(gesture.is_valid());
        assert_eq!(gesture.distance(), Some(Fx::from_num(4)));
    }

    #[test]
    fn unknown_finger_is_not_routed() {
        let mut gesture = pinch(0, 0, 1, 1);
        assert!(!gesture.set_touch(FingerId(2), TouchPoint::new(9, 9)));
        assert_eq!(gesture.first_touch(), Some(TouchPoint::new(0, 0)));
        assert_eq!(gesture.second_touch(), Some(TouchPoint::new(1, 1)));
    }
}
