use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use touch_gestures::{
    FingerId, GestureConfig, GestureEngine, GestureEvent, GestureKind, GestureOutput,
    GestureTraceSample, TouchPhase, TouchSample,
};

const TRACE_HEADER: &str = "touch,ms,phase,finger,x,y";

#[derive(Debug, Parser)]
#[command(name = "touch_replay")]
#[command(about = "Replays a recorded touch trace through the gesture engine")]
struct Cli {
    /// CSV trace with `touch,ms,phase,finger,x,y` rows.
    trace: PathBuf,
    /// File with one expected gesture kind per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Gesture TOML to use instead of the compiled-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also print one `trace,...` row per input.
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ReplaySample {
    ms: u64,
    phase: TouchPhase,
    sample: TouchSample,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ReplayedGesture {
    ms: u64,
    event: GestureEvent,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GestureConfig::default(),
    };
    let samples = parse_trace(&cli.trace)?;
    let mut traces = Vec::new();
    let gestures = replay(config, &samples, &mut traces);

    if cli.verbose {
        println!("trace,ms,phase,finger,state,drop_reason,tap_pending,events");
        for trace in &traces {
            println!("{}", format_trace(trace));
        }
    }
    println!("gesture,ms,kind,x,y,scale");
    for gesture in &gestures {
        println!("{}", format_gesture(gesture));
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<GestureKind> = gestures.iter().map(|g| g.event.kind()).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", join_labels(&expected));
            eprintln!("actual kinds:   {}", join_labels(&actual));
            bail!("gesture sequence mismatch");
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<GestureConfig> {
    let file = gesture_config_compiler::parse_gestures_file(path)?;
    gesture_config_compiler::validate_config(&file)
        .with_context(|| format!("invalid gesture config {}", path.display()))?;
    Ok(GestureConfig {
        max_touches: file.touch.max_touches,
        movement_time_threshold_ms: file.thresholds.movement_time_ms,
        tap_time_threshold_ms: file.thresholds.tap_time_ms,
        tap_distance_threshold: file.thresholds.tap_distance,
        synced_panning_enabled: file.panning.synced,
        touch_enabled: file.touch.enabled,
    })
}

/// Feeds every sample at its own timestamp, expiring the tap timer first, then lets a pending
/// tap run out after the last sample.
fn replay(
    config: GestureConfig,
    samples: &[ReplaySample],
    traces: &mut Vec<GestureTraceSample>,
) -> Vec<ReplayedGesture> {
    let mut engine = GestureEngine::new(config);
    let mut gestures = Vec::new();

    for replay in samples {
        collect(engine.expire_timers(replay.ms), replay.ms, &mut gestures);
        let output = engine.handle(replay.ms, replay.phase, replay.sample);
        traces.push(output.trace);
        collect(output, replay.ms, &mut gestures);
    }

    if let Some(deadline_ms) = engine.next_deadline_ms() {
        collect(engine.expire_timers(deadline_ms), deadline_ms, &mut gestures);
    }

    gestures
}

fn collect(output: GestureOutput, ms: u64, out: &mut Vec<ReplayedGesture>) {
    out.extend(
        output
            .events
            .into_iter()
            .map(|event| ReplayedGesture { ms, event }),
    );
}

fn format_gesture(gesture: &ReplayedGesture) -> String {
    let anchor = gesture.event.anchor();
    let scale = match gesture.event {
        GestureEvent::PinchMove { scale, .. } => scale.to_string(),
        _ => String::new(),
    };
    format!(
        "gesture,{},{},{},{},{}",
        gesture.ms,
        gesture.event.kind().label(),
        anchor.x,
        anchor.y,
        scale
    )
}

fn format_trace(trace: &GestureTraceSample) -> String {
    format!(
        "trace,{},{},{},{:?},{:?},{},{}",
        trace.now_ms,
        trace.phase.map(TouchPhase::label).unwrap_or("-"),
        trace
            .finger
            .map(|f| f.as_u8().to_string())
            .unwrap_or_else(|| "-".into()),
        trace.state,
        trace.drop_reason,
        trace.tap_pending as u8,
        trace.event_count
    )
}

fn join_labels(kinds: &[GestureKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_trace(path: &Path) -> Result<Vec<ReplaySample>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_trace_str(&source).with_context(|| format!("invalid trace {}", path.display()))
}

fn parse_trace_str(source: &str) -> Result<Vec<ReplaySample>> {
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts[0] != "touch" {
            continue;
        }
        if parts.len() != 6 {
            bail!("line {line_no}: expected 6 columns, got {}", parts.len());
        }

        let ms = parse_field::<u64>(parts[1], line_no, "ms")?;
        let phase = TouchPhase::from_label(parts[2])
            .with_context(|| format!("line {line_no}: unknown phase '{}'", parts[2]))?;
        let finger = parse_field::<u8>(parts[3], line_no, "finger")?;
        let x = parse_field::<u16>(parts[4], line_no, "x")?;
        let y = parse_field::<u16>(parts[5], line_no, "y")?;

        out.push(ReplaySample {
            ms,
            phase,
            sample: TouchSample::new(FingerId(finger), x, y, ms),
        });
    }
    Ok(out)
}

fn parse_field<T>(raw: &str, line_no: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("line {line_no}: invalid {field} '{raw}'"))
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<GestureKind>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut kinds = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let kind = GestureKind::from_label(&token.to_ascii_lowercase()).with_context(|| {
            format!(
                "{}:{} invalid expected gesture kind: {token}",
                path.display(),
                idx + 1
            )
        })?;
        kinds.push(kind);
    }
    Ok(kinds)
}
