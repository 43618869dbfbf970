use crate::types::FingerId;

/// Recognition thresholds and switches. Defaults come from `config/gestures.toml`; fields may be
/// mutated directly at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    pub max_touches: u8,
    pub movement_time_threshold_ms: u64,
    pub tap_time_threshold_ms: u64,
    pub tap_distance_threshold: u16,
    pub synced_panning_enabled: bool,
    pub touch_enabled: bool,
}

include!(concat!(env!("OUT_DIR"), "/gesture_config.rs"));

pub fn active_config() -> &'static GestureConfig {
    &GESTURE_CONFIG
}

impl Default for GestureConfig {
    fn default() -> Self {
        *active_config()
    }
}

impl GestureConfig {
    pub fn accepts_finger(&self, finger: FingerId) -> bool {
        finger.as_u8() < self.max_touches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_defaults_match_gestures_toml() {
        let config = GestureConfig::default();
        assert_eq!(config.max_touches, 2);
        assert_eq!(config.movement_time_threshold_ms, 50);
        assert_eq!(config.tap_time_threshold_ms, 400);
        assert_eq!(config.tap_distance_threshold, 50);
        assert!(config.synced_panning_enabled);
        assert!(config.touch_enabled);
    }

    #[test]
    fn finger_ids_at_or_above_limit_are_rejected() {
        let config = GestureConfig::default();
        assert!(config.accepts_finger(FingerId::FIRST));
        assert!(config.accepts_finger(FingerId::SECOND));
        assert!(!config.accepts_finger(FingerId(2)));
    }
}
