#![forbid(unsafe_code)]

//! Interactive-element hover feedback.
//!
//! [`HoverResponsive`] wraps another [`CursorBehavior`] and, on pointer
//! moves only, checks whether the element under the pointer (or one of its
//! ancestors) matches the configured selectors. When that answer changes it
//! pushes a new [`OuterAppearance`] to the surface, which animates the change.
//! Positions are left entirely to the wrapped behavior.

use trail_backend::RenderSurface;
use trail_core::config::{CursorSettings, HoverBoost};
use trail_core::geometry::{Point, Viewport};
use trail_core::selector::{ElementDescriptor, SelectorList};
use trail_core::style::{ElementStyle, OuterAppearance};

use crate::behavior::CursorBehavior;
use crate::motion::{FrameOutput, TrailingMotion};

/// Hover-aware decorator over a base behavior.
#[derive(Debug, Clone)]
pub struct HoverResponsive<B> {
    inner: B,
    selectors: SelectorList,
    boost: HoverBoost,
    outer_size: f64,
    outer_style: ElementStyle,
    hovering: bool,
}

impl<B: CursorBehavior> HoverResponsive<B> {
    /// Wrap `inner` with an explicit selector list and boost.
    #[must_use]
    pub fn new(
        inner: B,
        selectors: SelectorList,
        boost: HoverBoost,
        outer_size: f64,
        outer_style: ElementStyle,
    ) -> Self {
        Self {
            inner,
            selectors,
            boost,
            outer_size,
            outer_style,
            hovering: false,
        }
    }

    /// Wrap `inner` using the hover section of `settings`.
    ///
    /// Returns `None` when hover is not configured.
    #[must_use]
    pub fn from_settings(inner: B, settings: &CursorSettings) -> Option<Self> {
        let boost = *settings.hover()?;
        Some(Self::new(
            inner,
            settings.clickables().clone(),
            boost,
            settings.outer().size(),
            settings.outer_style().clone(),
        ))
    }

    /// Whether the pointer is currently over an interactive element.
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Appearance for the current hover state.
    #[must_use]
    pub fn appearance(&self) -> OuterAppearance {
        self.boost
            .appearance(self.outer_size, &self.outer_style, self.hovering)
    }

    /// The wrapped behavior.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn set_hovering<S: RenderSurface + ?Sized>(&mut self, hovering: bool, surface: &mut S) {
        if self.hovering == hovering {
            return;
        }
        self.hovering = hovering;
        tracing::debug!(target: "cursortrail.hover", hovering, "hover changed");
        surface.set_outer_appearance(&self.appearance());
    }
}

impl<B: CursorBehavior> CursorBehavior for HoverResponsive<B> {
    fn pointer_moved(&mut self, position: Point) {
        self.inner.pointer_moved(position);
    }

    fn pointer_target<S: RenderSurface + ?Sized>(
        &mut self,
        target: Option<&ElementDescriptor>,
        surface: &mut S,
    ) {
        let hovering = target.is_some_and(|el| self.selectors.closest(el).is_some());
        self.set_hovering(hovering, surface);
        self.inner.pointer_target(target, surface);
    }

    fn viewport_changed(&mut self, viewport: Viewport) {
        self.inner.viewport_changed(viewport);
    }

    fn render_frame<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> FrameOutput {
        self.inner.render_frame(surface)
    }

    fn on_activate<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        self.inner.on_activate(surface);
    }

    fn on_deactivate<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        self.set_hovering(false, surface);
        self.inner.on_deactivate(surface);
    }

    fn motion(&self) -> &TrailingMotion {
        self.inner.motion()
    }
}
