#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Hosts translate their native pointer and page-visibility notifications
//! into [`Event`] values and push them into the runtime.
//!
//! # Design Notes
//!
//! - Pointer coordinates are viewport-relative (`clientX`/`clientY` on DOM hosts).
//! - A move event may carry the element under the pointer; hover detection
//!   only ever looks at that descriptor, never at layout.
//! - There is a single pointer. Multi-touch ids are not modelled.

use bitflags::bitflags;

use crate::geometry::Point;
use crate::selector::ElementDescriptor;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The pointer moved.
    PointerMove(PointerMove),

    /// The pointer entered the document.
    PointerEnter,

    /// The pointer left the document.
    PointerLeave,

    /// Page visibility changed.
    ///
    /// `true` = the tab is hidden, `false` = visible again.
    Visibility {
        /// Whether the host reports the page as hidden.
        hidden: bool,
    },

    /// The viewport was resized.
    Resize {
        /// New viewport width in pixels.
        width: f64,
        /// New viewport height in pixels.
        height: f64,
    },
}

impl Event {
    /// Shorthand for a pointer move with no hit-test information.
    #[must_use]
    pub const fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove(PointerMove::new(x, y))
    }

    /// The subscription interest this event is delivered under.
    #[must_use]
    pub const fn interest(&self) -> EventInterest {
        match self {
            Self::PointerMove(_) => EventInterest::MOVE,
            Self::PointerEnter => EventInterest::ENTER,
            Self::PointerLeave => EventInterest::LEAVE,
            Self::Visibility { .. } => EventInterest::VISIBILITY,
            Self::Resize { .. } => EventInterest::RESIZE,
        }
    }
}

/// A pointer-move sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerMove {
    /// Raw pointer position in viewport space.
    pub position: Point,

    /// Element directly under the pointer, if the host performed a hit test.
    pub target: Option<ElementDescriptor>,
}

impl PointerMove {
    /// A move to `(x, y)` with no hit-test target.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            target: None,
        }
    }

    /// Attach the element under the pointer.
    #[must_use]
    pub fn with_target(mut self, target: ElementDescriptor) -> Self {
        self.target = Some(target);
        self
    }
}

impl From<PointerMove> for Event {
    fn from(value: PointerMove) -> Self {
        Self::PointerMove(value)
    }
}

bitflags! {
    /// Event kinds a host subscription listens for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventInterest: u8 {
        /// Pointer-move samples.
        const MOVE       = 0b0000_0001;
        /// Pointer entering the document.
        const ENTER      = 0b0000_0010;
        /// Pointer leaving the document.
        const LEAVE      = 0b0000_0100;
        /// Page visibility changes.
        const VISIBILITY = 0b0000_1000;
        /// Viewport resizes.
        const RESIZE     = 0b0001_0000;
    }
}

impl EventInterest {
    /// Everything the lifecycle controller needs.
    pub const CURSOR: Self = Self::all();
}
