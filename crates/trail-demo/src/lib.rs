#![forbid(unsafe_code)]

//! Scripted pointer sessions for cursortrail.
//!
//! Mounts a controller on a [`WebHost`], walks the pointer around a circle
//! (crossing a button on the right half), fires one frame per step and prints
//! what each frame wrote. With `--verify` the session is recorded and
//! replayed against a fresh controller.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use thiserror::Error;
use trail_core::config::{CursorConfig, HoverBoost};
use trail_core::error::ConfigError;
use trail_core::event::{Event, PointerMove};
use trail_core::geometry::{Point, Viewport};
use trail_core::selector::ElementDescriptor;
use trail_runtime::{
    ControllerError, CursorBehavior, CursorController, FrameOutcome, FrameOutput,
};
use trail_web::session::{ReplayError, ReplayResult, SessionRecorder, replay};
use trail_web::{WebController, WebHost, WebHostError};

/// Errors surfaced by the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("controller error: {0}")]
    Controller(#[from] ControllerError<WebHostError>),

    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DemoError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;

/// Built-in configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Preset {
    /// Red ring over a red dot, waits for the pointer to enter.
    #[default]
    Kit,
    /// Faint orange disc, active from mount.
    Follow,
}

impl Preset {
    #[must_use]
    pub fn config(self) -> CursorConfig {
        match self {
            Self::Kit => CursorConfig::kit(),
            Self::Follow => CursorConfig::follow(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "trail-demo",
    about = "Drive cursortrail through a scripted pointer session",
    version
)]
pub struct Cli {
    /// Configuration file (`.json` is read as JSON, anything else as TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Preset used when no configuration file is given.
    #[arg(long, value_enum, default_value_t = Preset::Kit)]
    pub preset: Preset,

    /// Number of frames to run.
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1440.0)]
    pub width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 900.0)]
    pub height: f64,

    /// Enable hover feedback with default boost values.
    #[arg(long)]
    pub hover: bool,

    /// Print one JSON object per rendered frame.
    #[arg(long)]
    pub jsonl: bool,

    /// Record the session and replay it against a fresh controller.
    #[arg(long)]
    pub verify: bool,
}

/// What a session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames_rendered: u64,
    pub last_frame: Option<FrameOutput>,
    pub appearance_changes: usize,
    pub replay: Option<ReplayResult>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out).map(|_| ())
}

/// Load the configuration named by `cli`.
pub fn load_config(cli: &Cli) -> Result<CursorConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => cli.preset.config(),
    };
    if cli.hover && config.hover.is_none() {
        config.hover = Some(HoverBoost::default());
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<CursorConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        CursorConfig::from_json_file(path)?
    } else {
        CursorConfig::from_toml_file(path)?
    };
    Ok(config)
}

/// Run a full session and write per-frame output to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<RunSummary> {
    let settings = load_config(cli)?.validate()?;
    let viewport = Viewport::new(cli.width, cli.height);
    tracing::info!(
        target: "cursortrail.demo",
        frames = cli.frames,
        width = viewport.width,
        height = viewport.height,
        hover = settings.hover().is_some(),
        "starting session"
    );

    if settings.hover().is_some() {
        session(cli, viewport, out, |host| {
            CursorController::mount_hover(host, settings.clone())
        })
    } else {
        session(cli, viewport, out, |host| {
            CursorController::mount(host, settings.clone())
        })
    }
}

fn session<B, F>(cli: &Cli, viewport: Viewport, out: &mut dyn Write, mount: F) -> Result<RunSummary>
where
    B: CursorBehavior,
    F: Fn(WebHost) -> std::result::Result<WebController<B>, ControllerError<WebHostError>>,
{
    let mut recorder = SessionRecorder::new(mount(WebHost::new(viewport))?);
    recorder.push_event(Event::PointerEnter)?;

    let mut frames_rendered = 0;
    let mut last_frame = None;
    for (index, event) in scripted_moves(viewport, cli.frames).into_iter().enumerate() {
        recorder.push_event(event)?;
        if let Some(FrameOutcome::Rendered(output)) = recorder.step() {
            frames_rendered += 1;
            last_frame = Some(output);
            write_frame(out, index, &output, cli.jsonl)?;
        }
    }
    recorder.push_event(Event::PointerLeave)?;

    let appearance_changes = recorder.controller().host().outputs().appearances.len();
    let stats = recorder.controller().stats();
    tracing::info!(
        target: "cursortrail.demo",
        rendered = stats.frames_rendered,
        deferred = stats.frames_deferred,
        activations = stats.activations,
        "session finished"
    );

    let trace = recorder.finish();
    let replayed = if cli.verify {
        let result = replay(&mount, &trace)?;
        writeln!(
            out,
            "replay: {} frames, {}",
            result.total_frames,
            if result.ok() { "identical" } else { "DIVERGED" }
        )?;
        Some(result)
    } else {
        None
    };

    Ok(RunSummary {
        frames_rendered,
        last_frame,
        appearance_changes,
        replay: replayed,
    })
}

fn write_frame(out: &mut dyn Write, index: usize, frame: &FrameOutput, jsonl: bool) -> Result<()> {
    if jsonl {
        let line = serde_json::json!({
            "frame": index,
            "inner": [frame.inner.x, frame.inner.y],
            "outer": [frame.outer.x, frame.outer.y],
            "outer_scale": frame.outer.scale,
            "outer_target": [frame.outer_target.x, frame.outer_target.y],
        });
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "frame {index:>4}  inner {}  outer {}",
            frame.inner.to_css(),
            frame.outer.to_css()
        )?;
    }
    Ok(())
}

/// One pointer move per frame along a circle around the viewport center.
///
/// Points right of center land on a `<button>`, the rest on a `<div>`.
#[must_use]
pub fn scripted_moves(viewport: Viewport, frames: u32) -> Vec<Event> {
    let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
    let radius = viewport.width.min(viewport.height) / 3.0;
    let steps = f64::from(frames.max(1));
    (0..frames)
        .map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / steps;
            let x = center.x + radius * angle.cos();
            let y = center.y + radius * angle.sin();
            let tag = if x > center.x { "button" } else { "div" };
            Event::PointerMove(PointerMove::new(x, y).with_target(ElementDescriptor::new(tag)))
        })
        .collect()
}
