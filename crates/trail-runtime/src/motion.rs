#![forbid(unsafe_code)]

//! Trailing motion engine.
//!
//! Each tick reads the latest pointer position once and produces two
//! placements:
//!
//! ```text
//! inner_target = clamp(pointer, inner)
//! outer_target = clamp(pointer, outer)
//! smoothed    += (outer_target - smoothed) / speed
//! ```
//!
//! The inner marker lands on its target every frame; the outer marker closes
//! `1 / speed` of the remaining gap, so with a fixed target the gap shrinks by
//! `1 - 1/speed` per tick.
//!
//! # Invariants
//!
//! - `smoothed` is written only by [`TrailingMotion::tick`].
//! - The pointer is last-writer-wins: any number of moves between two ticks
//!   collapse to the most recent one.
//! - The viewport is cached; it changes only through
//!   [`TrailingMotion::set_viewport`].

use trail_core::clamp::bounded_position;
use trail_core::config::{CursorSettings, TrailingSpeed};
use trail_core::geometry::{ElementSpec, Point, Transform, Viewport};

/// One exponential-smoothing step from `current` toward `target`.
#[inline]
#[must_use]
pub fn smooth_toward(current: Point, target: Point, speed: TrailingSpeed) -> Point {
    current + (target - current) / speed.get()
}

/// Everything one tick wrote, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Transform written to the inner marker.
    pub inner: Transform,
    /// Transform written to the outer marker.
    pub outer: Transform,
    /// Where the outer marker is heading.
    pub outer_target: Point,
}

/// Per-frame motion state for both markers.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingMotion {
    inner: ElementSpec,
    outer: ElementSpec,
    speed: TrailingSpeed,
    viewport: Viewport,
    pointer: Point,
    smoothed: Point,
}

impl TrailingMotion {
    /// Build from explicit parts. Pointer and smoothed position start at the
    /// origin.
    #[must_use]
    pub fn new(inner: ElementSpec, outer: ElementSpec, speed: TrailingSpeed, viewport: Viewport) -> Self {
        Self {
            inner,
            outer,
            speed,
            viewport,
            pointer: Point::ORIGIN,
            smoothed: Point::ORIGIN,
        }
    }

    /// Build from validated settings. The viewport is filled in at mount.
    #[must_use]
    pub fn from_settings(settings: &CursorSettings) -> Self {
        Self::new(
            settings.inner(),
            settings.outer(),
            settings.trailing_speed(),
            Viewport::default(),
        )
    }

    /// Start the outer marker somewhere other than the origin (builder pattern).
    #[must_use]
    pub fn with_smoothed(mut self, smoothed: Point) -> Self {
        self.smoothed = smoothed;
        self
    }

    /// Record the latest pointer position. Never writes output.
    #[inline]
    pub fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    #[inline]
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Current outer marker position.
    #[inline]
    #[must_use]
    pub fn smoothed(&self) -> Point {
        self.smoothed
    }

    /// Replace the cached viewport.
    #[inline]
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn speed(&self) -> TrailingSpeed {
        self.speed
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameOutput {
        let pointer = self.pointer;
        let inner_target = bounded_position(pointer, self.inner, self.viewport);
        let outer_target = bounded_position(pointer, self.outer, self.viewport);
        self.smoothed = smooth_toward(self.smoothed, outer_target, self.speed);

        FrameOutput {
            inner: Transform::at(inner_target),
            outer: Transform::at(self.smoothed).with_scale(self.outer.scale()),
            outer_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HD: Viewport = Viewport::new(1920.0, 1080.0);

    fn speed(s: f64) -> TrailingSpeed {
        TrailingSpeed::new(s).unwrap()
    }

    fn engine(inner: f64, outer: f64, s: f64) -> TrailingMotion {
        TrailingMotion::new(ElementSpec::new(inner), ElementSpec::new(outer), speed(s), FULL_HD)
    }

    #[test]
    fn inner_tracks_pointer_exactly() {
        let mut motion = engine(6.0, 50.0, 10.0);
        motion.set_pointer(Point::new(100.0, 100.0));
        let out = motion.tick();
        assert_eq!(out.inner, Transform::at(Point::new(97.0, 97.0)));
    }

    #[test]
    fn outer_trails_by_one_tenth() {
        let mut motion = engine(7.0, 50.0, 10.0);
        // Pointer at (75, 75) puts the 50px outer target at (50, 50).
        motion.set_pointer(Point::new(75.0, 75.0));

        let first = motion.tick();
        assert_eq!(first.outer_target, Point::new(50.0, 50.0));
        assert_eq!(first.outer.position(), Point::new(5.0, 5.0));

        let second = motion.tick();
        assert!((second.outer.x - 9.5).abs() < 1e-12);
        assert!((second.outer.y - 9.5).abs() < 1e-12);
    }

    #[test]
    fn instant_speed_snaps() {
        let mut motion = engine(7.0, 50.0, 1.0);
        motion.set_pointer(Point::new(500.0, 400.0));
        let out = motion.tick();
        assert_eq!(out.outer.position(), out.outer_target);
    }

    #[test]
    fn last_pointer_write_wins() {
        let mut motion = engine(10.0, 50.0, 10.0);
        motion.set_pointer(Point::new(10.0, 10.0));
        motion.set_pointer(Point::new(300.0, 200.0));
        let out = motion.tick();
        assert_eq!(out.inner.position(), Point::new(295.0, 195.0));
    }

    #[test]
    fn outer_scale_reapplied_and_clamped() {
        let mut motion = TrailingMotion::new(
            ElementSpec::new(7.0),
            ElementSpec::new(50.0).with_scale(2.0),
            TrailingSpeed::INSTANT,
            FULL_HD,
        );
        motion.set_pointer(Point::new(1919.0, 500.0));
        let out = motion.tick();
        assert_eq!(out.outer, Transform::at(Point::new(1820.0, 450.0)).with_scale(2.0));
        assert_eq!(out.inner.scale, 1.0);
    }

    #[test]
    fn viewport_is_cached_until_set() {
        let mut motion = engine(10.0, 10.0, 1.0);
        motion.set_pointer(Point::new(5000.0, 5000.0));
        assert_eq!(motion.tick().inner.position(), Point::new(1910.0, 1070.0));

        motion.set_viewport(Viewport::new(800.0, 600.0));
        assert_eq!(motion.tick().inner.position(), Point::new(790.0, 590.0));
    }

    #[test]
    fn smooth_toward_single_step() {
        let p = smooth_toward(Point::new(10.0, 0.0), Point::new(20.0, 40.0), speed(4.0));
        assert_eq!(p, Point::new(12.5, 10.0));
    }

    #[test]
    fn from_settings_uses_validated_values() {
        let motion = TrailingMotion::from_settings(&CursorSettings::default());
        assert_eq!(motion.speed().get(), 10.0);
        assert_eq!(motion.smoothed(), Point::ORIGIN);
        assert!(motion.viewport().is_empty());
    }

    #[test]
    fn with_smoothed_sets_start() {
        let motion = engine(7.0, 50.0, 10.0).with_smoothed(Point::new(3.0, 4.0));
        assert_eq!(motion.smoothed(), Point::new(3.0, 4.0));
        assert_eq!(motion.pointer(), Point::ORIGIN);
    }
}
