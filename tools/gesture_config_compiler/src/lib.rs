//! Build-time compiler for `config/gestures.toml`.
//!
//! The gesture engine is `no_std` and carries its defaults as a `static`. This crate parses the
//! TOML source, checks the values against what the engine can honor, and renders the Rust
//! initializer that the root crate's `build.rs` drops into `OUT_DIR`.

use std::{
    fmt::{self, Write as _},
    fs,
    path::Path,
};

use serde::Deserialize;

const GENERATED_HEADER: &str =
    "// @generated by gesture_config_compiler; edit config/gestures.toml instead.";

/// Highest number of concurrent contacts the engine tracks.
pub const MAX_SUPPORTED_TOUCHES: u8 = 2;

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GesturesFile {
    pub touch: TouchSection,
    pub thresholds: ThresholdSection,
    pub panning: PanningSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TouchSection {
    pub enabled: bool,
    pub max_touches: u8,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdSection {
    pub movement_time_ms: u64,
    pub tap_time_ms: u64,
    pub tap_distance: u16,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PanningSection {
    pub synced: bool,
}

pub fn parse_gestures_str(source: &str) -> Result<GesturesFile, ConfigCompilerError> {
    toml::from_str(source).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn parse_gestures_file(path: &Path) -> Result<GesturesFile, ConfigCompilerError> {
    let source = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_gestures_str(&source)
}

pub fn validate_config(config: &GesturesFile) -> Result<(), ConfigCompilerError> {
    let mut problems: Vec<String> = Vec::new();

    if config.touch.max_touches == 0 || config.touch.max_touches > MAX_SUPPORTED_TOUCHES {
        problems.push(format!("touch.max_touches must be in 1..={MAX_SUPPORTED_TOUCHES}"));
    }

    let thresholds = &config.thresholds;
    if thresholds.movement_time_ms == 0 {
        problems.push("thresholds.movement_time_ms must be > 0".into());
    }
    if thresholds.tap_time_ms == 0 {
        problems.push("thresholds.tap_time_ms must be > 0".into());
    }
    if thresholds.tap_distance == 0 {
        problems.push("thresholds.tap_distance must be > 0".into());
    }
    if thresholds.movement_time_ms > thresholds.tap_time_ms {
        problems.push("thresholds.movement_time_ms must be <= thresholds.tap_time_ms".into());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigCompilerError::Validation(problems.join("; ")))
    }
}

pub fn render_generated_config(config: &GesturesFile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{GENERATED_HEADER}");
    let _ = writeln!(out, "pub static GESTURE_CONFIG: GestureConfig = GestureConfig {{");
    let _ = writeln!(out, "    max_touches: {},", config.touch.max_touches);
    let _ = writeln!(
        out,
        "    movement_time_threshold_ms: {},",
        config.thresholds.movement_time_ms
    );
    let _ = writeln!(
        out,
        "    tap_time_threshold_ms: {},",
        config.thresholds.tap_time_ms
    );
    let _ = writeln!(
        out,
        "    tap_distance_threshold: {},",
        config.thresholds.tap_distance
    );
    let _ = writeln!(out, "    synced_panning_enabled: {},", config.panning.synced);
    let _ = writeln!(out, "    touch_enabled: {},", config.touch.enabled);
    let _ = writeln!(out, "}};");
    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_gestures_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}
