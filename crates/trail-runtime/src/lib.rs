#![forbid(unsafe_code)]

//! Runtime: trailing motion, hover feedback, and the lifecycle controller.
//!
//! # Role in cursortrail
//! `trail-runtime` turns raw pointer samples into per-frame marker placements
//! and decides when frames run at all. It is host-agnostic: everything it
//! touches goes through the `trail-backend` traits.
//!
//! # Primary responsibilities
//! - **Motion**: [`TrailingMotion`] computes the clamped inner placement and
//!   the exponentially smoothed outer placement each frame.
//! - **Behavior seam**: [`CursorBehavior`] with the [`HoverResponsive`]
//!   decorator for interactive-element feedback.
//! - **Lifecycle**: [`CursorController`] runs the Idle/Active state machine,
//!   keeps at most one frame outstanding, and releases every host resource on
//!   teardown.
//! - **Native cursor**: [`NativeCursorToggle`] reference-counts suppression of
//!   the host pointer across controllers.
//!
//! # How it fits in the system
//! A host (for example `trail-web`) implements `trail_backend::Host`, mounts a
//! controller, forwards events to [`CursorController::handle_event`], and
//! calls [`CursorController::on_frame`] when a requested frame fires.

pub mod behavior;
pub mod controller;
pub mod frame_loop;
pub mod hover;
pub mod lease;
pub mod motion;
pub mod system_cursor;

pub use behavior::CursorBehavior;
pub use controller::{
    ControllerError, ControllerStats, CursorController, FrameOutcome, IgnoredReason,
    LifecycleLogEntry, LifecycleOutcome, LifecyclePhase, LifecycleState, PRESENCE_INTEREST,
};
pub use frame_loop::{FrameLoop, FrameLoopStats};
pub use hover::HoverResponsive;
pub use lease::ListenerLease;
pub use motion::{FrameOutput, TrailingMotion, smooth_toward};
pub use system_cursor::{NativeCursorLease, NativeCursorToggle};
