#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Uses viewport coordinates (pixels, origin at top-left, `f64` so the
//! smoothed outer position can hold sub-pixel values between frames).

use std::fmt;
use std::ops::{Add, Div, Sub};

/// A point in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f64,
    /// Vertical offset from the top edge.
    pub y: f64,
}

impl Point {
    /// The viewport origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if the viewport has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Static sizing for one visual element.
///
/// Immutable once built: it is derived from configuration, never from
/// runtime state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSpec {
    size: f64,
    scale: f64,
}

impl ElementSpec {
    /// An element of natural `size` with a scale of 1.
    #[inline]
    pub const fn new(size: f64) -> Self {
        Self { size, scale: 1.0 }
    }

    /// Set the uniform scale factor (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Natural diameter.
    #[inline]
    pub const fn size(&self) -> f64 {
        self.size
    }

    /// Uniform scale factor.
    #[inline]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Diameter after scaling; this is what the clamper keeps on screen.
    #[inline]
    pub fn effective_size(&self) -> f64 {
        self.size * self.scale
    }
}

/// Which of the two markers a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// Marker that tracks the pointer with no lag.
    Inner,
    /// Marker that trails the pointer with smoothed motion.
    Outer,
}

impl ElementId {
    /// Both elements, outer first (paint order).
    pub const ALL: [ElementId; 2] = [ElementId::Outer, ElementId::Inner];

    /// Stable lowercase name, also used as the host-side `data-cursor` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Outer => "outer",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame placement written to the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Left edge of the element.
    pub x: f64,
    /// Top edge of the element.
    pub y: f64,
    /// Uniform scale applied around the element's origin.
    pub scale: f64,
}

impl Transform {
    /// Place an element's top-left corner at `position` with no scaling.
    #[inline]
    pub const fn at(position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            scale: 1.0,
        }
    }

    /// Set the scale factor (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Translation part as a point.
    #[inline]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// CSS `transform` value for DOM hosts.
    ///
    /// Unit scale is omitted so the common case stays a plain `translate3d`.
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.scale == 1.0 {
            format!("translate3d({}px, {}px, 0)", self.x, self.y)
        } else {
            format!(
                "translate3d({}px, {}px, 0) scale({})",
                self.x, self.y, self.scale
            )
        }
    }
}
