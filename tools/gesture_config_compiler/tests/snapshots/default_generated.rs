// @generated by gesture_config_compiler; edit config/gestures.toml instead.
pub static GESTURE_CONFIG: GestureConfig = GestureConfig {
    max_touches: 2,
    movement_time_threshold_ms: 50,
    tap_time_threshold_ms: 400,
    tap_distance_threshold: 50,
    synced_panning_enabled: true,
    touch_enabled: true,
};
