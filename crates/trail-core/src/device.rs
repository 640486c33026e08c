#![forbid(unsafe_code)]

//! Desktop classification.
//!
//! A trailing pointer indicator only makes sense with a hovering pointer, so
//! touch-first devices are excluded. The host reports raw traits and this
//! module decides.

/// Minimum viewport width, in pixels, for a desktop classification.
pub const DESKTOP_MIN_WIDTH: f64 = 1024.0;

/// User-agent fragments that identify a mobile browser (matched lowercase).
pub const MOBILE_UA_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Raw device traits as reported by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceTraits {
    /// Host exposes touch events (`ontouchstart` on DOM hosts).
    pub has_touch: bool,
    /// Maximum simultaneous touch points.
    pub max_touch_points: u32,
    /// User-agent string.
    pub user_agent: String,
    /// Current viewport width in pixels.
    pub viewport_width: f64,
}

impl DeviceTraits {
    /// A mouse-driven desktop host with the given viewport width.
    #[must_use]
    pub fn desktop(viewport_width: f64) -> Self {
        Self {
            has_touch: false,
            max_touch_points: 0,
            user_agent: String::new(),
            viewport_width,
        }
    }

    /// Override the user agent (builder pattern).
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Mark the host as touch-capable (builder pattern).
    #[must_use]
    pub fn with_touch_points(mut self, points: u32) -> Self {
        self.has_touch = points > 0;
        self.max_touch_points = points;
        self
    }

    /// Whether any touch input is available.
    #[must_use]
    pub fn is_touch_capable(&self) -> bool {
        self.has_touch || self.max_touch_points > 0
    }

    /// Whether the user agent names a mobile platform.
    #[must_use]
    pub fn is_mobile_agent(&self) -> bool {
        let ua = self.user_agent.to_ascii_lowercase();
        MOBILE_UA_TOKENS.iter().any(|token| ua.contains(token))
    }

    /// Wide viewport, no touch, and a non-mobile user agent.
    #[must_use]
    pub fn is_desktop(&self) -> bool {
        self.viewport_width >= DESKTOP_MIN_WIDTH
            && !self.is_touch_capable()
            && !self.is_mobile_agent()
    }
}
