#![forbid(unsafe_code)]

//! `trail-web` provides a host-driven backend for cursortrail.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (a browser shim, a test, a
//!   replay) pushes events and fires frames explicitly.
//! - **Recorded output**: every surface write lands in [`WebOutputs`] so it
//!   can be forwarded to the DOM or asserted on.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! Events are only delivered while some listener covers them, matching how a
//! page without a `mousemove` handler simply never sees moves.

pub mod session;

use std::collections::VecDeque;

use thiserror::Error;
use trail_backend::{
    FrameHandle, FrameScheduler, Host, ListenerId, PointerEventSource, RenderSurface,
    VisibilityState,
};
use trail_core::device::DeviceTraits;
use trail_core::event::{Event, EventInterest};
use trail_core::geometry::{ElementId, Transform, Viewport};
use trail_core::style::{ElementStyle, OuterAppearance};
use trail_runtime::{
    ControllerError, CursorBehavior, CursorController, FrameOutcome, LifecycleLogEntry,
};

/// Web host error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebHostError {
    /// Unsubscribe for an id that is not registered.
    #[error("unknown listener {0}")]
    UnknownListener(ListenerId),
}

/// Controller mounted on a [`WebHost`].
pub type WebController<B> = CursorController<WebHost, B>;

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Frame scheduler whose frames fire only when the host says so.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    next: u64,
    pending: Vec<FrameHandle>,
    requests: u64,
    cancels: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet fired or cancelled.
    #[must_use]
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Remove and return every pending request, oldest first.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    /// Total `request_frame` calls.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    /// Total `cancel_frame` calls that hit a pending request.
    #[must_use]
    pub fn cancel_count(&self) -> u64 {
        self.cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requests += 1;
        let handle = FrameHandle::new(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancels += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Event source
// ---------------------------------------------------------------------------

/// Host-driven event source with listener bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct WebEventSource {
    next: u64,
    listeners: Vec<(ListenerId, EventInterest)>,
    subscribe_calls: u64,
    unsubscribe_calls: u64,
    queue: VecDeque<Event>,
}

impl WebEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a canonical event into the queue.
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Take the oldest pending event.
    pub fn pop_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Number of pending events.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    /// Registered listeners.
    #[must_use]
    pub fn listeners(&self) -> &[(ListenerId, EventInterest)] {
        &self.listeners
    }

    /// Union of all registered interests.
    #[must_use]
    pub fn interest(&self) -> EventInterest {
        self.listeners
            .iter()
            .fold(EventInterest::empty(), |acc, (_, i)| acc | *i)
    }

    /// Whether any listener would receive `event`.
    #[must_use]
    pub fn wants(&self, event: &Event) -> bool {
        self.interest().contains(event.interest())
    }

    #[must_use]
    pub fn subscribe_calls(&self) -> u64 {
        self.subscribe_calls
    }

    #[must_use]
    pub fn unsubscribe_calls(&self) -> u64 {
        self.unsubscribe_calls
    }
}

impl PointerEventSource for WebEventSource {
    type Error = WebHostError;

    fn subscribe(&mut self, interest: EventInterest) -> Result<ListenerId, WebHostError> {
        self.next += 1;
        self.subscribe_calls += 1;
        let id = ListenerId::new(self.next);
        self.listeners.push((id, interest));
        Ok(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> Result<(), WebHostError> {
        self.unsubscribe_calls += 1;
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        if self.listeners.len() == before {
            return Err(WebHostError::UnknownListener(id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// One recorded transform write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformWrite {
    pub element: ElementId,
    pub transform: Transform,
}

/// Captured surface writes for host consumption.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WebOutputs {
    /// Transform writes in order.
    pub transforms: Vec<TransformWrite>,
    /// Visibility changes in order.
    pub visibility: Vec<VisibilityState>,
    /// Static styles applied.
    pub styles: Vec<(ElementId, ElementStyle)>,
    /// Hover appearance changes.
    pub appearances: Vec<OuterAppearance>,
    /// Native cursor hide (`true`) / restore (`false`) requests.
    pub native_cursor: Vec<bool>,
}

impl WebOutputs {
    /// Most recent transform written to `element`.
    #[must_use]
    pub fn last_transform(&self, element: ElementId) -> Option<Transform> {
        self.transforms
            .iter()
            .rev()
            .find(|w| w.element == element)
            .map(|w| w.transform)
    }

    /// Number of transform writes to `element`.
    #[must_use]
    pub fn transform_count(&self, element: ElementId) -> usize {
        self.transforms.iter().filter(|w| w.element == element).count()
    }

    /// Visibility after the last change (hidden if never set).
    #[must_use]
    pub fn current_visibility(&self) -> VisibilityState {
        self.visibility.last().copied().unwrap_or_default()
    }

    /// Whether the native cursor is currently hidden.
    #[must_use]
    pub fn native_cursor_hidden(&self) -> bool {
        self.native_cursor.last().copied().unwrap_or(false)
    }
}

/// Surface that records writes instead of painting.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    traits: DeviceTraits,
    attached: bool,
    outputs: WebOutputs,
}

impl RecordingSurface {
    /// A desktop surface of the given size with elements attached.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            traits: DeviceTraits::desktop(viewport.width),
            attached: true,
            outputs: WebOutputs::default(),
        }
    }

    /// Change the reported viewport; device traits follow the width.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.traits.viewport_width = viewport.width;
    }

    /// Replace the reported device traits. The viewport width is kept.
    pub fn set_device_traits(&mut self, traits: DeviceTraits) {
        self.traits = DeviceTraits {
            viewport_width: self.viewport.width,
            ..traits
        };
    }

    /// Simulate marker elements being (de)attached.
    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    #[must_use]
    pub fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Take the recorded outputs, leaving an empty record.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }
}

impl RenderSurface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn device_traits(&self) -> DeviceTraits {
        self.traits.clone()
    }

    fn elements_attached(&self) -> bool {
        self.attached
    }

    fn set_transform(&mut self, element: ElementId, transform: Transform) {
        if self.attached {
            self.outputs
                .transforms
                .push(TransformWrite { element, transform });
        }
    }

    fn set_visibility(&mut self, state: VisibilityState) {
        self.outputs.visibility.push(state);
    }

    fn apply_style(&mut self, element: ElementId, style: &ElementStyle) {
        self.outputs.styles.push((element, style.clone()));
    }

    fn set_outer_appearance(&mut self, appearance: &OuterAppearance) {
        self.outputs.appearances.push(*appearance);
    }

    fn set_native_cursor_hidden(&mut self, hidden: bool) {
        self.outputs.native_cursor.push(hidden);
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// A minimal, host-driven backend.
///
/// Intended to be driven from outside:
/// - push events with [`dispatch`] or [`WebEventSource::push_event`] + [`pump`]
/// - fire frames with [`step_frame`]
/// - read writes via [`RecordingSurface::outputs`]
#[derive(Debug, Clone)]
pub struct WebHost {
    scheduler: ManualScheduler,
    events: WebEventSource,
    surface: RecordingSurface,
}

impl WebHost {
    /// A desktop host with the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            scheduler: ManualScheduler::new(),
            events: WebEventSource::new(),
            surface: RecordingSurface::new(viewport),
        }
    }

    /// Report different device traits (builder pattern).
    #[must_use]
    pub fn with_device_traits(mut self, traits: DeviceTraits) -> Self {
        self.surface.set_device_traits(traits);
        self
    }

    #[must_use]
    pub fn scheduler_ref(&self) -> &ManualScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut ManualScheduler {
        &mut self.scheduler
    }

    #[must_use]
    pub fn events_ref(&self) -> &WebEventSource {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut WebEventSource {
        &mut self.events
    }

    pub fn surface_mut(&mut self) -> &mut RecordingSurface {
        &mut self.surface
    }

    /// Shorthand for the surface's recorded writes.
    #[must_use]
    pub fn outputs(&self) -> &WebOutputs {
        self.surface.outputs()
    }
}

impl Host for WebHost {
    type Error = WebHostError;
    type Scheduler = ManualScheduler;
    type Events = WebEventSource;
    type Surface = RecordingSurface;

    fn scheduler(&mut self) -> &mut ManualScheduler {
        &mut self.scheduler
    }

    fn events(&mut self) -> &mut WebEventSource {
        &mut self.events
    }

    fn surface(&mut self) -> &mut RecordingSurface {
        &mut self.surface
    }

    fn surface_ref(&self) -> &RecordingSurface {
        &self.surface
    }
}

// ---------------------------------------------------------------------------
// Driving helpers
// ---------------------------------------------------------------------------

/// Deliver `event` the way a page would.
///
/// Returns `Ok(None)` when no listener covers the event. Resizes update the
/// surface's viewport before delivery, since the page has already resized
/// by the time the event fires.
pub fn dispatch<B: CursorBehavior>(
    controller: &mut WebController<B>,
    event: &Event,
) -> Result<Option<LifecycleLogEntry>, ControllerError<WebHostError>> {
    if let Event::Resize { width, height } = event {
        controller
            .host_mut()
            .surface_mut()
            .set_viewport(Viewport::new(*width, *height));
    }
    if !controller.host().events_ref().wants(event) {
        tracing::trace!(target: "cursortrail.web", event = ?event, "no listener, event dropped");
        return Ok(None);
    }
    controller.handle_event(event).map(Some)
}

/// Dispatch queued events in order until the queue is empty.
///
/// Stops at the first error; events queued after the failing one stay in
/// the queue.
pub fn pump<B: CursorBehavior>(
    controller: &mut WebController<B>,
) -> Result<Vec<LifecycleLogEntry>, ControllerError<WebHostError>> {
    let mut entries = Vec::with_capacity(controller.host().events_ref().queued_len());
    while let Some(event) = controller.host_mut().events_mut().pop_event() {
        if let Some(entry) = dispatch(controller, &event)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Fire every pending frame. Returns the outcome of the last one, or `None`
/// if no frame was pending.
pub fn step_frame<B: CursorBehavior>(controller: &mut WebController<B>) -> Option<FrameOutcome> {
    let due = controller.host_mut().scheduler_mut().take_due();
    let mut last = None;
    for handle in due {
        last = Some(controller.on_frame(handle));
    }
    last
}
