#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] wraps a mounted [`WebController`] and records every
//! dispatched event together with a checksum of each rendered frame.
//! [`replay`] feeds the same events through a freshly mounted controller and
//! compares the checksums frame by frame.
//!
//! # Trace layout
//!
//! - **Header**: initial viewport.
//! - **Input**: one dispatched [`Event`] (resizes included).
//! - **Frame**: checkpoint with an FNV-1a checksum of both transforms and a
//!   running checksum chain.
//! - **Summary**: total frames and final chain.
//!
//! # Determinism contract
//!
//! The controller has no clock and no source of randomness: positions depend
//! only on the event sequence and on how many frames fired between events.
//! Replay steps exactly where the recording stepped, so identical settings
//! must produce identical checksums. Deferred frames write nothing and are
//! not checkpointed.

use thiserror::Error;
use trail_backend::{Host, RenderSurface};
use trail_core::event::Event;
use trail_core::geometry::{Transform, Viewport};
use trail_runtime::{
    ControllerError, CursorBehavior, FrameOutcome, FrameOutput, LifecycleLogEntry,
};

use crate::{WebController, WebHost, WebHostError, dispatch, step_frame};

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_u64(hash: u64, v: u64) -> u64 {
    fnv1a64_bytes(hash, &v.to_le_bytes())
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = FNV_OFFSET_BASIS;
    let hash = fnv1a64_u64(hash, prev);
    fnv1a64_u64(hash, next)
}

fn checksum_transform(hash: u64, t: &Transform) -> u64 {
    let hash = fnv1a64_u64(hash, t.x.to_bits());
    let hash = fnv1a64_u64(hash, t.y.to_bits());
    fnv1a64_u64(hash, t.scale.to_bits())
}

/// Checksum of everything one frame wrote.
#[must_use]
pub fn checksum_frame(output: &FrameOutput) -> u64 {
    let hash = checksum_transform(FNV_OFFSET_BASIS, &output.inner);
    checksum_transform(hash, &output.outer)
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    /// Session header (must be first).
    Header { width: f64, height: f64 },
    /// A dispatched event.
    Input { event: Event },
    /// Rendered frame checkpoint.
    Frame {
        frame_idx: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    Summary {
        total_frames: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded session trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Number of frame checkpoints in the trace.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Frame { .. }))
            .count() as u64
    }

    /// Final checksum chain from the summary record.
    #[must_use]
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }

    /// Viewport from the header record.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        match self.records.first() {
            Some(TraceRecord::Header { width, height }) => Some(Viewport::new(*width, *height)),
            _ => None,
        }
    }
}

/// Records a session for deterministic replay.
pub struct SessionRecorder<B: CursorBehavior> {
    controller: WebController<B>,
    records: Vec<TraceRecord>,
    frames: u64,
    checksum_chain: u64,
}

impl<B: CursorBehavior> SessionRecorder<B> {
    /// Start recording on a mounted controller.
    #[must_use]
    pub fn new(controller: WebController<B>) -> Self {
        let viewport = controller.host().surface_ref().viewport();
        Self {
            controller,
            records: vec![TraceRecord::Header {
                width: viewport.width,
                height: viewport.height,
            }],
            frames: 0,
            checksum_chain: 0,
        }
    }

    /// Record and dispatch one event.
    pub fn push_event(
        &mut self,
        event: Event,
    ) -> Result<Option<LifecycleLogEntry>, ControllerError<WebHostError>> {
        let entry = dispatch(&mut self.controller, &event)?;
        self.records.push(TraceRecord::Input { event });
        Ok(entry)
    }

    /// Fire pending frames and checkpoint a rendered one.
    pub fn step(&mut self) -> Option<FrameOutcome> {
        let outcome = step_frame(&mut self.controller);
        if let Some(FrameOutcome::Rendered(output)) = &outcome {
            let checksum = checksum_frame(output);
            let chain = fnv1a64_pair(self.checksum_chain, checksum);
            self.records.push(TraceRecord::Frame {
                frame_idx: self.frames,
                checksum,
                checksum_chain: chain,
            });
            self.frames += 1;
            self.checksum_chain = chain;
        }
        outcome
    }

    /// Finish recording and return the completed trace.
    ///
    /// The controller is dropped, which tears it down.
    #[must_use]
    pub fn finish(mut self) -> SessionTrace {
        self.records.push(TraceRecord::Summary {
            total_frames: self.frames,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: self.records,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &WebController<B> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut WebController<B> {
        &mut self.controller
    }
}

/// Result of replaying a session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Frame checkpoints replayed.
    pub total_frames: u64,
    /// Final checksum chain from replay.
    pub final_checksum_chain: u64,
    /// First checkpoint that did not match, if any.
    pub first_mismatch: Option<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether the replay produced identical checksums.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// A checkpoint that did not match during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayMismatch {
    pub frame_idx: u64,
    pub expected: u64,
    /// `None` when the replayed controller did not render at this point.
    pub actual: Option<u64>,
}

/// Errors that can occur during replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("trace missing header record")]
    MissingHeader,

    #[error("controller error: {0}")]
    Controller(#[from] ControllerError<WebHostError>),
}

/// Replay `trace` through a controller built by `mount`.
///
/// `mount` receives a fresh [`WebHost`] sized from the trace header and
/// must return a mounted controller, typically with the settings the
/// recording used.
pub fn replay<B, F>(mount: F, trace: &SessionTrace) -> Result<ReplayResult, ReplayError>
where
    B: CursorBehavior,
    F: FnOnce(WebHost) -> Result<WebController<B>, ControllerError<WebHostError>>,
{
    let viewport = trace.viewport().ok_or(ReplayError::MissingHeader)?;
    let mut controller = mount(WebHost::new(viewport))?;

    let mut total_frames = 0;
    let mut checksum_chain = 0;
    let mut first_mismatch = None;

    for record in &trace.records {
        match record {
            TraceRecord::Input { event } => {
                dispatch(&mut controller, event)?;
            }
            TraceRecord::Frame {
                frame_idx,
                checksum: expected,
                ..
            } => {
                let actual = match step_frame(&mut controller) {
                    Some(FrameOutcome::Rendered(output)) => Some(checksum_frame(&output)),
                    _ => None,
                };
                if let Some(actual) = actual {
                    checksum_chain = fnv1a64_pair(checksum_chain, actual);
                }
                if actual != Some(*expected) && first_mismatch.is_none() {
                    tracing::debug!(
                        target: "cursortrail.replay",
                        frame_idx,
                        expected,
                        "replay checksum mismatch"
                    );
                    first_mismatch = Some(ReplayMismatch {
                        frame_idx: *frame_idx,
                        expected: *expected,
                        actual,
                    });
                }
                total_frames += 1;
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_frames,
        final_checksum_chain: checksum_chain,
        first_mismatch,
    })
}
