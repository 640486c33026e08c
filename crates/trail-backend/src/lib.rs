#![forbid(unsafe_code)]
#![doc = "Host traits for cursortrail: frame scheduling, pointer events, and the render surface."]
#![doc = ""]
#![doc = "This crate defines the boundary between the cursortrail runtime and whatever"]
#![doc = "actually owns the screen (a browser page via `trail-web`, a test double, a"]
#![doc = "compositor overlay). The runtime never touches a platform API directly."]

use core::fmt;

use trail_core::device::DeviceTraits;
use trail_core::event::EventInterest;
use trail_core::geometry::{ElementId, Transform, Viewport};
use trail_core::style::{ElementStyle, OuterAppearance};

/// Opaque id of a requested frame callback.
///
/// Hosts hand these out from [`FrameScheduler::request_frame`] and pass the
/// same value back when the frame fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wrap a host-native id (`requestAnimationFrame` return value, counter, ...).
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-native id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Opaque id of an event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a host-native listener id.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-native id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Whether the two markers are mounted on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    /// Markers removed (or hidden); no transform writes are expected.
    #[default]
    Hidden,
    /// Markers shown and being driven every frame.
    Visible,
}

impl VisibilityState {
    /// Returns `true` for [`VisibilityState::Visible`].
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Per-frame callback scheduling.
///
/// Models `requestAnimationFrame` / `cancelAnimationFrame`. Requests are
/// one-shot: a handle fires at most once, and only if it was not cancelled.
pub trait FrameScheduler {
    /// Request a callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending request. Cancelling a fired or unknown handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Pointer and page-visibility event subscriptions.
///
/// The host delivers matching events by calling the runtime; this trait only
/// manages registration.
pub trait PointerEventSource {
    /// Platform-specific error type.
    type Error: fmt::Debug + fmt::Display;

    /// Start delivering events covered by `interest`.
    fn subscribe(&mut self, interest: EventInterest) -> Result<ListenerId, Self::Error>;

    /// Stop delivering events for `id`.
    fn unsubscribe(&mut self, id: ListenerId) -> Result<(), Self::Error>;
}

/// Output half of the host boundary: two positionable markers plus global
/// pointer styling.
///
/// Writes are infallible. A surface that cannot apply a write (for example
/// because its elements are gone) drops it.
pub trait RenderSurface {
    /// Current viewport size. Queried at mount and on resize only.
    fn viewport(&self) -> Viewport;

    /// Device classification inputs.
    fn device_traits(&self) -> DeviceTraits;

    /// Whether both marker elements exist and can receive writes.
    fn elements_attached(&self) -> bool;

    /// Position one marker.
    fn set_transform(&mut self, element: ElementId, transform: Transform);

    /// Show or hide both markers.
    fn set_visibility(&mut self, state: VisibilityState);

    /// Apply static paint to one marker.
    fn apply_style(&mut self, element: ElementId, style: &ElementStyle);

    /// Apply hover-dependent outer parameters, animated by the surface.
    fn set_outer_appearance(&mut self, appearance: &OuterAppearance);

    /// Hide or restore the host's own pointer.
    fn set_native_cursor_hidden(&mut self, hidden: bool);
}

/// Unified host combining scheduler, event source, and surface.
///
/// The lifecycle controller is generic over this trait. Concrete
/// implementations:
/// - `trail-web`: host-driven recording backend for browsers, tests, and replay.
pub trait Host {
    /// Platform-specific error type shared across sub-traits.
    type Error: fmt::Debug + fmt::Display;

    /// Frame scheduler implementation.
    type Scheduler: FrameScheduler;

    /// Event source implementation.
    type Events: PointerEventSource<Error = Self::Error>;

    /// Surface implementation.
    type Surface: RenderSurface;

    /// Access the frame scheduler.
    fn scheduler(&mut self) -> &mut Self::Scheduler;

    /// Access the event source.
    fn events(&mut self) -> &mut Self::Events;

    /// Access the surface for writes.
    fn surface(&mut self) -> &mut Self::Surface;

    /// Access the surface for queries.
    fn surface_ref(&self) -> &Self::Surface;
}
