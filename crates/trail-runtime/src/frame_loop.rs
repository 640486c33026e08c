#![forbid(unsafe_code)]

//! Single-outstanding-request frame loop.
//!
//! Wraps a [`FrameScheduler`] so that at most one frame request exists at any
//! time. Starting while a request is outstanding is a no-op, cancelling is
//! synchronous, and a fired handle is only honored if it is the outstanding
//! one.

use trail_backend::{FrameHandle, FrameScheduler};

/// Request counters, monotonically increasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameLoopStats {
    /// Calls that reached [`FrameScheduler::request_frame`].
    pub requested: u64,
    /// Outstanding requests cancelled.
    pub cancelled: u64,
    /// Fired handles accepted.
    pub accepted: u64,
    /// Fired handles rejected as stale.
    pub rejected: u64,
}

/// At-most-one frame request tracker.
#[derive(Debug, Default)]
pub struct FrameLoop {
    outstanding: Option<FrameHandle>,
    stats: FrameLoopStats,
}

impl FrameLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.outstanding.is_some()
    }

    /// The outstanding request, if any.
    #[must_use]
    pub fn outstanding(&self) -> Option<FrameHandle> {
        self.outstanding
    }

    #[must_use]
    pub fn stats(&self) -> FrameLoopStats {
        self.stats
    }

    /// Request a frame unless one is already outstanding.
    ///
    /// Returns the new handle, or `None` if nothing was requested.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> Option<FrameHandle> {
        if self.outstanding.is_some() {
            return None;
        }
        let handle = scheduler.request_frame();
        self.outstanding = Some(handle);
        self.stats.requested += 1;
        Some(handle)
    }

    /// Cancel the outstanding request, if any.
    pub fn cancel<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> Option<FrameHandle> {
        let handle = self.outstanding.take()?;
        scheduler.cancel_frame(handle);
        self.stats.cancelled += 1;
        Some(handle)
    }

    /// Consume a fired handle.
    ///
    /// Returns `true` if `handle` was the outstanding request; the loop is
    /// then idle until the next [`start`](Self::start).
    pub fn accept(&mut self, handle: FrameHandle) -> bool {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
            self.stats.accepted += 1;
            true
        } else {
            self.stats.rejected += 1;
            false
        }
    }
}
