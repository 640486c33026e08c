#![forbid(unsafe_code)]

//! Boundary clamping.
//!
//! Maps a target center coordinate to the top-left placement that keeps an
//! element fully inside `[0, width] x [0, height]`:
//!
//!   x = clamp(target.x - effective / 2, 0, width - effective)
//!
//! and symmetrically for `y`, where `effective = size * scale`.
//!
//! # Failure Modes
//!
//! None. When the element is larger than the viewport the valid range is
//! empty and the lower bound wins, pinning the element to `0` on that axis.
//! That degenerate clamp is accepted behavior, not an error.

use crate::geometry::{ElementSpec, Point, Viewport};

/// Top-left position that keeps an element centered on `target` while
/// staying inside `viewport`.
#[inline]
#[must_use]
pub fn bounded_position(target: Point, spec: ElementSpec, viewport: Viewport) -> Point {
    let size = spec.effective_size();
    Point::new(
        bound_axis(target.x, size, viewport.width),
        bound_axis(target.y, size, viewport.height),
    )
}

#[inline]
fn bound_axis(center: f64, size: f64, extent: f64) -> f64 {
    // min before max: the lower bound must win when `size > extent`.
    (center - size / 2.0).min(extent - size).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HD: Viewport = Viewport::new(1920.0, 1080.0);

    #[test]
    fn centers_element_on_target() {
        let p = bounded_position(Point::new(100.0, 100.0), ElementSpec::new(6.0), FULL_HD);
        assert_eq!(p, Point::new(97.0, 97.0));
    }

    #[test]
    fn clamps_at_top_left() {
        let p = bounded_position(Point::new(2.0, 0.0), ElementSpec::new(50.0), FULL_HD);
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn clamps_at_bottom_right() {
        let p = bounded_position(Point::new(1919.0, 1079.0), ElementSpec::new(50.0), FULL_HD);
        assert_eq!(p, Point::new(1870.0, 1030.0));
    }

    #[test]
    fn scale_grows_effective_size() {
        let spec = ElementSpec::new(50.0).with_scale(2.0);
        let p = bounded_position(Point::new(1919.0, 500.0), spec, FULL_HD);
        assert_eq!(p, Point::new(1820.0, 450.0));
    }

    #[test]
    fn degenerate_element_larger_than_viewport_pins_to_zero() {
        let tiny = Viewport::new(20.0, 20.0);
        let p = bounded_position(Point::new(15.0, 5.0), ElementSpec::new(50.0), tiny);
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn negative_pointer_clamps_to_zero() {
        let p = bounded_position(Point::new(-40.0, -1.0), ElementSpec::new(7.0), FULL_HD);
        assert_eq!(p, Point::ORIGIN);
    }
}
