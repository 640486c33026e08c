#![forbid(unsafe_code)]

//! Cosmetic parameters passed through to the render surface.
//!
//! None of these values influence motion. The runtime hands [`ElementStyle`]
//! to the surface once on mount and [`OuterAppearance`] whenever the hover
//! state changes; the surface decides how to paint them.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

/// Corner rounding for an element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "snake_case"))]
pub enum Radius {
    /// Percentage of the element size (`50` makes a circle).
    Percent(f64),
    /// Absolute radius in pixels.
    Pixels(f64),
}

impl Radius {
    /// A fully round element.
    pub const CIRCLE: Self = Self::Percent(50.0);

    /// CSS `border-radius` value.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::Percent(p) => format!("{p}%"),
            Self::Pixels(px) => format!("{px}px"),
        }
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::CIRCLE
    }
}

/// Static paint parameters for one element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct ElementStyle {
    /// Fill color, any host-understood color string.
    pub color: String,
    /// Element opacity in `[0, 1]`.
    pub opacity: f64,
    /// Border width in pixels. Zero means no border.
    pub border_width: f64,
    /// Border line style (`solid`, `dashed`, ...).
    pub border_style: String,
    /// Border color.
    pub border_color: String,
    /// Corner rounding.
    pub radius: Radius,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            color: "transparent".to_owned(),
            opacity: 1.0,
            border_width: 0.0,
            border_style: "solid".to_owned(),
            border_color: "transparent".to_owned(),
            radius: Radius::CIRCLE,
        }
    }
}

impl ElementStyle {
    /// A solid fill with no border.
    #[must_use]
    pub fn filled(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }

    /// Add a solid border (builder pattern).
    #[must_use]
    pub fn with_border(mut self, width: f64, color: impl Into<String>) -> Self {
        self.border_width = width;
        self.border_color = color.into();
        self
    }

    /// Set the opacity (builder pattern).
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// CSS `border` shorthand, or `none` when the width is zero.
    #[must_use]
    pub fn border_css(&self) -> String {
        if self.border_width <= 0.0 {
            "none".to_owned()
        } else {
            format!(
                "{}px {} {}",
                self.border_width, self.border_style, self.border_color
            )
        }
    }
}

/// Timing curve for appearance transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "kebab-case"))]
pub enum Easing {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// CSS timing-function keyword.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css())
    }
}

/// Hover-dependent visual parameters of the outer element.
///
/// Pushed to the surface together with the transition the surface should
/// animate over. Position is never part of this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuterAppearance {
    /// Diameter in pixels.
    pub size: f64,
    /// Border width in pixels.
    pub border_width: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// How long the surface should take to reach these values.
    pub transition: Duration,
    /// Transition curve.
    pub easing: Easing,
}

impl OuterAppearance {
    /// CSS `transition` value covering the animated properties.
    #[must_use]
    pub fn transition_css(&self) -> String {
        let ms = self.transition.as_millis();
        let easing = self.easing.css();
        ["width", "height", "border-width", "opacity"]
            .iter()
            .map(|prop| format!("{prop} {ms}ms {easing}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
