#![forbid(unsafe_code)]

//! Cursor configuration.
//!
//! [`CursorConfig`] is the raw, user-facing record: every field optional in
//! files, every field defaulted in code. [`CursorConfig::validate`] turns it
//! into [`CursorSettings`], the immutable value the runtime is built from.
//!
//! # Presets
//!
//! - [`CursorConfig::default`] / [`CursorConfig::kit`]: thin red ring,
//!   desktop-only, activates on the first pointer enter.
//! - [`CursorConfig::follow`]: translucent orange disc that runs on every
//!   device and activates immediately on mount.
//!
//! # Loading
//!
//! With the `config-file` feature:
//!
//! ```toml
//! # cursortrail.toml
//! trailing_speed = 6
//! outer_size = 40
//!
//! [outer_style]
//! border_color = "#00aaff"
//!
//! [hover]
//! size_offset = 16
//! ```
//!
//! ```rust,ignore
//! let settings = CursorConfig::from_toml_file("cursortrail.toml")?.validate()?;
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::geometry::ElementSpec;
use crate::selector::{DEFAULT_INTERACTIVE_SELECTORS, SelectorList};
use crate::style::{Easing, ElementStyle, OuterAppearance};

// ---------------------------------------------------------------------------
// TrailingSpeed
// ---------------------------------------------------------------------------

/// Smoothing divisor for the outer element.
///
/// Each frame closes `1 / speed` of the remaining distance, so `1` tracks the
/// pointer exactly and larger values trail further behind. Values below `1`
/// would overshoot and are rejected, as are NaN and infinities.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TrailingSpeed(f64);

impl TrailingSpeed {
    /// No trailing at all.
    pub const INSTANT: Self = Self(1.0);

    /// Validate a raw speed.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value >= 1.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::TrailingSpeed { value })
        }
    }

    /// The divisor.
    #[inline]
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Fraction of the remaining distance left after one tick: `1 - 1/speed`.
    #[inline]
    #[must_use]
    pub fn retention(self) -> f64 {
        1.0 - 1.0 / self.0
    }
}

impl TryFrom<f64> for TrailingSpeed {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

// ---------------------------------------------------------------------------
// HoverBoost
// ---------------------------------------------------------------------------

/// How the outer element changes while the pointer is over an interactive
/// element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct HoverBoost {
    /// Added to the outer diameter.
    pub size_offset: f64,
    /// Added to the outer border width.
    pub border_width_offset: f64,
    /// Added to the outer opacity (result capped at 1).
    pub opacity_boost: f64,
    /// Transition duration in milliseconds.
    pub transition_ms: u64,
    /// Transition curve.
    pub easing: Easing,
}

impl Default for HoverBoost {
    fn default() -> Self {
        Self {
            size_offset: 20.0,
            border_width_offset: 1.0,
            opacity_boost: 0.2,
            transition_ms: 200,
            easing: Easing::Ease,
        }
    }
}

impl HoverBoost {
    /// Transition duration.
    #[must_use]
    pub const fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Outer appearance for the given hover state, starting from the
    /// configured `outer_size` and `base` style.
    #[must_use]
    pub fn appearance(&self, outer_size: f64, base: &ElementStyle, hovering: bool) -> OuterAppearance {
        let (size, border_width, opacity) = if hovering {
            (
                outer_size + self.size_offset,
                base.border_width + self.border_width_offset,
                (base.opacity + self.opacity_boost).min(1.0),
            )
        } else {
            (outer_size, base.border_width, base.opacity)
        };
        OuterAppearance {
            size,
            border_width,
            opacity,
            transition: self.transition(),
            easing: self.easing,
        }
    }
}

// ---------------------------------------------------------------------------
// CursorConfig
// ---------------------------------------------------------------------------

/// User-facing cursor configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct CursorConfig {
    /// Inner marker diameter in pixels.
    pub inner_size: f64,
    /// Outer marker diameter in pixels.
    pub outer_size: f64,
    /// Uniform scale of the outer marker; also enlarges its clamp box.
    pub outer_scale: f64,
    /// Smoothing divisor, see [`TrailingSpeed`].
    pub trailing_speed: f64,
    /// Inner marker paint.
    pub inner_style: ElementStyle,
    /// Outer marker paint.
    pub outer_style: ElementStyle,
    /// Keep the host's own pointer visible.
    pub show_system_cursor: bool,
    /// Selectors for interactive elements (comma lists allowed per entry).
    pub clickables: Vec<String>,
    /// Hover response; `None` disables hover tracking.
    pub hover: Option<HoverBoost>,
    /// Only activate on desktop-class hosts.
    pub desktop_only: bool,
    /// Behave as if the pointer entered immediately on mount.
    pub activate_on_mount: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self::kit()
    }
}

impl CursorConfig {
    /// Thin red ring over a red dot.
    #[must_use]
    pub fn kit() -> Self {
        Self {
            inner_size: KIT_INNER_SIZE,
            outer_size: KIT_OUTER_SIZE,
            outer_scale: 1.0,
            trailing_speed: KIT_TRAILING_SPEED,
            inner_style: kit_inner_style(),
            outer_style: kit_outer_style(),
            show_system_cursor: false,
            clickables: default_clickables(),
            hover: None,
            desktop_only: true,
            activate_on_mount: false,
        }
    }

    /// Faint orange disc that follows closely and starts on mount.
    #[must_use]
    pub fn follow() -> Self {
        Self {
            inner_size: 7.0,
            outer_size: 50.0,
            outer_scale: 1.0,
            trailing_speed: 4.0,
            inner_style: ElementStyle::filled("#FF2D00"),
            outer_style: ElementStyle::default()
                .with_border(2.0, "#FF2D00")
                .with_opacity(0.1),
            show_system_cursor: false,
            clickables: default_clickables(),
            hover: None,
            desktop_only: false,
            activate_on_mount: true,
        }
    }

    /// Enable hover response (builder pattern).
    #[must_use]
    pub fn with_hover(mut self, boost: HoverBoost) -> Self {
        self.hover = Some(boost);
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every field and build the immutable settings.
    ///
    /// Reports the first invalid field.
    pub fn validate(&self) -> Result<CursorSettings> {
        let trailing_speed = TrailingSpeed::new(self.trailing_speed)?;
        check_size("inner", self.inner_size)?;
        check_size("outer", self.outer_size)?;
        if !(self.outer_scale.is_finite() && self.outer_scale > 0.0) {
            return Err(ConfigError::Scale {
                value: self.outer_scale,
            });
        }
        check_opacity("inner_style.opacity", self.inner_style.opacity)?;
        check_opacity("outer_style.opacity", self.outer_style.opacity)?;

        if let Some(boost) = &self.hover {
            check_opacity("hover.opacity_boost", boost.opacity_boost)?;
            check_size("hovered outer", self.outer_size + boost.size_offset)?;
            check_border_width(
                "hovered outer",
                self.outer_style.border_width + boost.border_width_offset,
            )?;
        }

        let mut clickables = SelectorList::empty();
        for entry in &self.clickables {
            clickables
                .extend_parsed(entry)
                .map_err(|reason| ConfigError::Selector {
                    selector: entry.clone(),
                    reason,
                })?;
        }

        Ok(CursorSettings {
            inner: ElementSpec::new(self.inner_size),
            outer: ElementSpec::new(self.outer_size).with_scale(self.outer_scale),
            trailing_speed,
            inner_style: self.inner_style.clone(),
            outer_style: self.outer_style.clone(),
            show_system_cursor: self.show_system_cursor,
            clickables,
            hover: self.hover,
            desktop_only: self.desktop_only,
            activate_on_mount: self.activate_on_mount,
        })
    }
}

const KIT_INNER_SIZE: f64 = 7.0;
const KIT_OUTER_SIZE: f64 = 50.0;
const KIT_TRAILING_SPEED: f64 = 10.0;
const KIT_COLOR: &str = "#ff0000";

fn kit_inner_style() -> ElementStyle {
    ElementStyle::filled(KIT_COLOR).with_border(1.0, KIT_COLOR)
}

fn kit_outer_style() -> ElementStyle {
    ElementStyle::default()
        .with_border(1.0, KIT_COLOR)
        .with_opacity(0.8)
}

fn default_clickables() -> Vec<String> {
    DEFAULT_INTERACTIVE_SELECTORS
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

fn check_size(element: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ElementSize { element, value })
    }
}

fn check_border_width(element: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::BorderWidth { element, value })
    }
}

fn check_opacity(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Opacity { field, value })
    }
}

// ---------------------------------------------------------------------------
// CursorSettings
// ---------------------------------------------------------------------------

/// Validated, immutable cursor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSettings {
    inner: ElementSpec,
    outer: ElementSpec,
    trailing_speed: TrailingSpeed,
    inner_style: ElementStyle,
    outer_style: ElementStyle,
    show_system_cursor: bool,
    clickables: SelectorList,
    hover: Option<HoverBoost>,
    desktop_only: bool,
    activate_on_mount: bool,
}

impl Default for CursorSettings {
    /// The kit preset, already validated.
    fn default() -> Self {
        Self {
            inner: ElementSpec::new(KIT_INNER_SIZE),
            outer: ElementSpec::new(KIT_OUTER_SIZE),
            trailing_speed: TrailingSpeed(KIT_TRAILING_SPEED),
            inner_style: kit_inner_style(),
            outer_style: kit_outer_style(),
            show_system_cursor: false,
            clickables: SelectorList::interactive_defaults(),
            hover: None,
            desktop_only: true,
            activate_on_mount: false,
        }
    }
}

impl CursorSettings {
    /// Inner marker sizing.
    #[must_use]
    pub const fn inner(&self) -> ElementSpec {
        self.inner
    }

    /// Outer marker sizing, scale included.
    #[must_use]
    pub const fn outer(&self) -> ElementSpec {
        self.outer
    }

    #[must_use]
    pub const fn trailing_speed(&self) -> TrailingSpeed {
        self.trailing_speed
    }

    #[must_use]
    pub fn inner_style(&self) -> &ElementStyle {
        &self.inner_style
    }

    #[must_use]
    pub fn outer_style(&self) -> &ElementStyle {
        &self.outer_style
    }

    #[must_use]
    pub const fn show_system_cursor(&self) -> bool {
        self.show_system_cursor
    }

    /// Parsed interactive selectors.
    #[must_use]
    pub fn clickables(&self) -> &SelectorList {
        &self.clickables
    }

    #[must_use]
    pub const fn hover(&self) -> Option<&HoverBoost> {
        self.hover.as_ref()
    }

    #[must_use]
    pub const fn desktop_only(&self) -> bool {
        self.desktop_only
    }

    #[must_use]
    pub const fn activate_on_mount(&self) -> bool {
        self.activate_on_mount
    }
}
