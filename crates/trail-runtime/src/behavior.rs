#![forbid(unsafe_code)]

//! The seam between the lifecycle controller and per-frame behavior.
//!
//! The controller decides *when* things happen; a [`CursorBehavior`] decides
//! *what* happens. [`TrailingMotion`] is the base behavior, and
//! [`HoverResponsive`](crate::hover::HoverResponsive) decorates any behavior
//! with interactive-element feedback.

use trail_backend::RenderSurface;
use trail_core::geometry::{ElementId, Point, Viewport};
use trail_core::selector::ElementDescriptor;

use crate::motion::{FrameOutput, TrailingMotion};

/// Per-frame and per-event behavior driven by the lifecycle controller.
pub trait CursorBehavior {
    /// Record the latest pointer position. Must not write to any surface.
    fn pointer_moved(&mut self, position: Point);

    /// The element under the pointer changed (or was re-reported).
    ///
    /// Only called while active. `None` means the host reported no element.
    fn pointer_target<S: RenderSurface + ?Sized>(
        &mut self,
        _target: Option<&ElementDescriptor>,
        _surface: &mut S,
    ) {
    }

    /// Replace the cached viewport.
    fn viewport_changed(&mut self, viewport: Viewport);

    /// Advance one frame and write both transforms.
    fn render_frame<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> FrameOutput;

    /// The markers were just shown.
    fn on_activate<S: RenderSurface + ?Sized>(&mut self, _surface: &mut S) {}

    /// The markers were just hidden.
    fn on_deactivate<S: RenderSurface + ?Sized>(&mut self, _surface: &mut S) {}

    /// Underlying motion state.
    fn motion(&self) -> &TrailingMotion;
}

impl CursorBehavior for TrailingMotion {
    fn pointer_moved(&mut self, position: Point) {
        self.set_pointer(position);
    }

    fn viewport_changed(&mut self, viewport: Viewport) {
        self.set_viewport(viewport);
    }

    fn render_frame<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> FrameOutput {
        let output = self.tick();
        surface.set_transform(ElementId::Inner, output.inner);
        surface.set_transform(ElementId::Outer, output.outer);
        output
    }

    fn motion(&self) -> &TrailingMotion {
        self
    }
}
