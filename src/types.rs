use fixed::types::I48F16;
use heapless::Vec;

/// Fixed-point scalar for distances and pinch scale.
pub type Fx = I48F16;

/// Samples carried by one transport notification.
pub const MAX_REPORT_SAMPLES: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
}

impl TouchPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Per-axis midpoint, truncated toward zero.
    pub fn midpoint(self, other: TouchPoint) -> TouchPoint {
        TouchPoint {
            x: ((u32::from(self.x) + u32::from(other.x)) / 2) as u16,
            y: ((u32::from(self.y) + u32::from(other.y)) / 2) as u16,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FingerId(pub u8);

impl FingerId {
    pub const FIRST: FingerId = FingerId(0);
    pub const SECOND: FingerId = FingerId(1);

    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

/// One finger's reading as delivered by the transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub finger: FingerId,
    pub point: TouchPoint,
    /// Head-unit timestamp of the reading.
    pub t_ms: u64,
}

impl TouchSample {
    pub const fn new(finger: FingerId, x: u16, y: u16, t_ms: u64) -> Self {
        Self {
            finger,
            point: TouchPoint { x, y },
            t_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Begin,
    Move,
    End,
    Cancel,
}

impl TouchPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Move => "move",
            Self::End => "end",
            Self::Cancel => "cancel",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "begin" => Some(Self::Begin),
            "move" => Some(Self::Move),
            "end" => Some(Self::End),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Touch notification as decoded by the transport. Only the first sample is consumed; batched
/// delivery of further fingers is the transport's concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TouchReport {
    pub phase: TouchPhase,
    pub samples: Vec<TouchSample, MAX_REPORT_SAMPLES>,
}

impl TouchReport {
    pub fn single(phase: TouchPhase, sample: TouchSample) -> Self {
        let mut samples = Vec::new();
        // Capacity is at least one.
        let _ = samples.push(sample);
        Self { phase, samples }
    }

    pub fn primary(&self) -> Option<TouchSample> {
        self.samples.first().copied()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum RecognitionState {
    #[default]
    None = 0,
    SingleTouch = 1,
    MultiTouch = 2,
    Panning = 3,
}

impl RecognitionState {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    SingleTap,
    DoubleTap,
    PanStart,
    PanMove,
    PanEnd,
    PanCanceled,
    PinchStart,
    PinchMove,
    PinchEnd,
    PinchCanceled,
}

impl GestureKind {
    pub const ALL: [Self; 10] = [
        Self::SingleTap,
        Self::DoubleTap,
        Self::PanStart,
        Self::PanMove,
        Self::PanEnd,
        Self::PanCanceled,
        Self::PinchStart,
        Self::PinchMove,
        Self::PinchEnd,
        Self::PinchCanceled,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleTap => "single_tap",
            Self::DoubleTap => "double_tap",
            Self::PanStart => "pan_start",
            Self::PanMove => "pan_move",
            Self::PanEnd => "pan_end",
            Self::PanCanceled => "pan_canceled",
            Self::PinchStart => "pinch_start",
            Self::PinchMove => "pinch_move",
            Self::PinchEnd => "pinch_end",
            Self::PinchCanceled => "pinch_canceled",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    SingleTap { point: TouchPoint },
    /// `point` is the midpoint of the two taps.
    DoubleTap { point: TouchPoint },
    PanStart { point: TouchPoint },
    PanMove { from: TouchPoint, to: TouchPoint },
    PanEnd { point: TouchPoint },
    PanCanceled { point: TouchPoint },
    PinchStart { center: TouchPoint },
    /// `scale` is relative to the distance at pinch start.
    PinchMove { center: TouchPoint, scale: Fx },
    PinchEnd { center: TouchPoint },
    PinchCanceled { center: TouchPoint },
}

impl GestureEvent {
    pub const fn kind(&self) -> GestureKind {
        match self {
            Self::SingleTap { .. } => GestureKind::SingleTap,
            Self::DoubleTap { .. } => GestureKind::DoubleTap,
            Self::PanStart { .. } => GestureKind::PanStart,
            Self::PanMove { .. } => GestureKind::PanMove,
            Self::PanEnd { .. } => GestureKind::PanEnd,
            Self::PanCanceled { .. } => GestureKind::PanCanceled,
            Self::PinchStart { .. } => GestureKind::PinchStart,
            Self::PinchMove { .. } => GestureKind::PinchMove,
            Self::PinchEnd { .. } => GestureKind::PinchEnd,
            Self::PinchCanceled { .. } => GestureKind::PinchCanceled,
        }
    }

    /// Point handed to the hit tester for this event.
    pub const fn anchor(&self) -> TouchPoint {
        match *self {
            Self::SingleTap { point }
            | Self::DoubleTap { point }
            | Self::PanStart { point }
            | Self::PanEnd { point }
            | Self::PanCanceled { point } => point,
            Self::PanMove { to, .. } => to,
            Self::PinchStart { center }
            | Self::PinchMove { center, .. }
            | Self::PinchEnd { center }
            | Self::PinchCanceled { center } => center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_truncates_toward_origin() {
        let a = TouchPoint::new(100, 100);
        let b = TouchPoint::new(103, 100);
        assert_eq!(a.midpoint(b), TouchPoint::new(101, 100));
        assert_eq!(b.midpoint(a), TouchPoint::new(101, 100));
        assert_eq!(
            TouchPoint::new(u16::MAX, 0).midpoint(TouchPoint::new(u16::MAX, 2)),
            TouchPoint::new(u16::MAX, 1)
        );
    }

    #[test]
    fn gesture_kind_labels_are_unique_and_parse_back() {
        for kind in GestureKind::ALL {
            assert_eq!(GestureKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(GestureKind::from_label("tap"), None);
    }

    #[test]
    fn report_primary_is_first_sample() {
        let sample = TouchSample::new(FingerId::SECOND, 1, 2, 3);
        let report = TouchReport::single(TouchPhase::Move, sample);
        assert_eq!(report.primary().map(|s| s.finger), Some(FingerId::SECOND));
    }
}
