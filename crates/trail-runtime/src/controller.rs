#![forbid(unsafe_code)]

//! Visibility/lifecycle controller.
//!
//! Owns the Idle/Active state machine that starts and stops the frame loop
//! in response to pointer presence and page visibility:
//!
//! ```text
//!            enter (desktop)
//!   Idle ─────────────────────▶ Active
//!    ▲                            │
//!    └── leave | hidden | !desktop┘
//! ```
//!
//! Every path into Idle cancels the outstanding frame before returning, so no
//! frame callback can render after a leave or a teardown. Each dispatch yields
//! a [`LifecycleLogEntry`] and a `tracing` event on `cursortrail.lifecycle`.
//!
//! # Subscriptions
//!
//! - A presence listener (enter, leave, visibility, resize) is held from
//!   mount to teardown.
//! - A movement listener is held only while Active.
//!
//! Both are [`ListenerLease`]s, each released exactly once.
//!
//! # Failure Modes
//!
//! - The host refuses a subscription: mount or the enter transition fails
//!   with [`ControllerError::Subscribe`] and the state does not change.
//! - The host fails an unsubscribe: the state change still completes and the
//!   error is returned afterwards. On `Drop` it is logged instead.
//! - The surface has no elements yet: the frame is deferred, not failed.

use std::fmt;

use thiserror::Error;
use trail_backend::{FrameHandle, Host, RenderSurface, VisibilityState};
use trail_core::config::CursorSettings;
use trail_core::device::DeviceTraits;
use trail_core::event::{Event, EventInterest};
use trail_core::geometry::{ElementId, Viewport};

use crate::behavior::CursorBehavior;
use crate::frame_loop::{FrameLoop, FrameLoopStats};
use crate::hover::HoverResponsive;
use crate::lease::ListenerLease;
use crate::motion::{FrameOutput, TrailingMotion};
use crate::system_cursor::{NativeCursorLease, NativeCursorToggle};

/// Events the presence listener is registered for.
pub const PRESENCE_INTEREST: EventInterest = EventInterest::ENTER
    .union(EventInterest::LEAVE)
    .union(EventInterest::VISIBILITY)
    .union(EventInterest::RESIZE);

/// Errors surfaced by the controller.
#[derive(Debug, Error)]
pub enum ControllerError<E> {
    #[error("event subscription failed: {0}")]
    Subscribe(E),

    #[error("event unsubscription failed: {0}")]
    Unsubscribe(E),

    #[error("hover feedback requested but the settings carry no hover boost")]
    HoverNotConfigured,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Markers hidden, no frame outstanding.
    #[default]
    Idle,
    /// Markers shown, exactly one frame outstanding between frames.
    Active,
}

impl LifecycleState {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Surface visibility implied by this state.
    #[must_use]
    pub const fn visibility(self) -> VisibilityState {
        match self {
            Self::Idle => VisibilityState::Hidden,
            Self::Active => VisibilityState::Visible,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
        }
    }
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Mount,
    PointerMove,
    PointerEnter,
    PointerLeave,
    VisibilityHidden,
    VisibilityVisible,
    Resize,
    Teardown,
}

impl LifecyclePhase {
    /// Phase for an incoming event.
    #[must_use]
    pub const fn for_event(event: &Event) -> Self {
        match event {
            Event::PointerMove(_) => Self::PointerMove,
            Event::PointerEnter => Self::PointerEnter,
            Event::PointerLeave => Self::PointerLeave,
            Event::Visibility { hidden: true } => Self::VisibilityHidden,
            Event::Visibility { hidden: false } => Self::VisibilityVisible,
            Event::Resize { .. } => Self::Resize,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::PointerMove => "pointer_move",
            Self::PointerEnter => "pointer_enter",
            Self::PointerLeave => "pointer_leave",
            Self::VisibilityHidden => "visibility_hidden",
            Self::VisibilityVisible => "visibility_visible",
            Self::Resize => "resize",
            Self::Teardown => "teardown",
        }
    }
}

/// Why a lifecycle signal or frame was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredReason {
    /// Enter while already Active.
    AlreadyActive,
    /// Leave or hidden while already Idle.
    AlreadyIdle,
    /// Enter on a host that failed the desktop check.
    NotDesktop,
    /// Page became visible; activation waits for the next enter.
    PageVisible,
    /// Frame handle is not the outstanding request.
    StaleFrame,
    /// The controller has been torn down.
    TornDown,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Mounted,
    Activated,
    Deactivated,
    PointerUpdated,
    ViewportUpdated,
    TornDown,
    Ignored(IgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleLogEntry {
    pub phase: LifecyclePhase,
    pub outcome: LifecycleOutcome,
    /// State after the dispatch.
    pub state: LifecycleState,
    /// Outstanding frame after the dispatch.
    pub frame: Option<FrameHandle>,
}

impl LifecycleLogEntry {
    /// The ignore reason, if the dispatch was ignored.
    #[must_use]
    pub const fn ignored(&self) -> Option<IgnoredReason> {
        match self.outcome {
            LifecycleOutcome::Ignored(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Result of one frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Both transforms were written; the next frame is requested.
    Rendered(FrameOutput),
    /// The surface had no elements; nothing was written, the next frame is
    /// requested.
    Deferred,
    /// The callback was not honored.
    Ignored(IgnoredReason),
}

/// Controller counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub frames: FrameLoopStats,
    pub frames_rendered: u64,
    pub frames_deferred: u64,
    pub activations: u64,
    pub deactivations: u64,
    pub subscriptions: u64,
    pub unsubscriptions: u64,
}

/// Drives a [`CursorBehavior`] on a [`Host`].
pub struct CursorController<H: Host, B: CursorBehavior = TrailingMotion> {
    host: H,
    behavior: B,
    settings: CursorSettings,
    state: LifecycleState,
    frames: FrameLoop,
    presence: Option<ListenerLease>,
    movement: Option<ListenerLease>,
    cursor: NativeCursorToggle,
    cursor_lease: Option<NativeCursorLease>,
    desktop: bool,
    torn_down: bool,
    stats: ControllerStats,
}

impl<H: Host> CursorController<H, TrailingMotion> {
    /// Mount the plain trailing cursor with its own native-cursor toggle.
    ///
    /// Hover settings are not applied here; use
    /// [`CursorController::mount_hover`] for that.
    pub fn mount(host: H, settings: CursorSettings) -> Result<Self, ControllerError<H::Error>> {
        if settings.hover().is_some() {
            tracing::warn!(
                target: "cursortrail.lifecycle",
                "hover is configured but the plain trailing cursor ignores it"
            );
        }
        let motion = TrailingMotion::from_settings(&settings);
        Self::mount_with(host, motion, settings, NativeCursorToggle::new())
    }
}

impl<H: Host> CursorController<H, HoverResponsive<TrailingMotion>> {
    /// Mount the trailing cursor wrapped in hover feedback.
    ///
    /// Fails with [`ControllerError::HoverNotConfigured`] when `settings`
    /// has no hover section.
    pub fn mount_hover(
        host: H,
        settings: CursorSettings,
    ) -> Result<Self, ControllerError<H::Error>> {
        let motion = TrailingMotion::from_settings(&settings);
        let behavior = HoverResponsive::from_settings(motion, &settings)
            .ok_or(ControllerError::HoverNotConfigured)?;
        Self::mount_with(host, behavior, settings, NativeCursorToggle::new())
    }
}

impl<H: Host, B: CursorBehavior> CursorController<H, B> {
    /// Mount `behavior` on `host`.
    ///
    /// Caches the viewport, classifies the device, subscribes to presence
    /// events, pushes static styles, and claims native cursor suppression
    /// through `cursor`. With `activate_on_mount` the controller then
    /// activates as if the pointer had entered.
    pub fn mount_with(
        mut host: H,
        mut behavior: B,
        settings: CursorSettings,
        cursor: NativeCursorToggle,
    ) -> Result<Self, ControllerError<H::Error>> {
        let viewport = host.surface_ref().viewport();
        behavior.viewport_changed(viewport);
        let desktop = classify(&settings, &host.surface_ref().device_traits());

        let presence = ListenerLease::acquire(host.events(), PRESENCE_INTEREST)
            .map_err(ControllerError::Subscribe)?;

        let surface = host.surface();
        surface.apply_style(ElementId::Inner, settings.inner_style());
        surface.apply_style(ElementId::Outer, settings.outer_style());
        surface.set_visibility(VisibilityState::Hidden);

        let mut controller = Self {
            host,
            behavior,
            settings,
            state: LifecycleState::Idle,
            frames: FrameLoop::new(),
            presence: Some(presence),
            movement: None,
            cursor,
            cursor_lease: None,
            desktop,
            torn_down: false,
            stats: ControllerStats {
                subscriptions: 1,
                ..ControllerStats::default()
            },
        };
        controller.sync_native_cursor();
        controller.log(LifecyclePhase::Mount, LifecycleOutcome::Mounted);

        if controller.settings.activate_on_mount() {
            let outcome = controller.activate()?;
            controller.log(LifecyclePhase::Mount, outcome);
        }
        Ok(controller)
    }

    /// Dispatch one host event.
    pub fn handle_event(
        &mut self,
        event: &Event,
    ) -> Result<LifecycleLogEntry, ControllerError<H::Error>> {
        let phase = LifecyclePhase::for_event(event);
        if self.torn_down {
            return Ok(self.log(phase, LifecycleOutcome::Ignored(IgnoredReason::TornDown)));
        }

        let outcome = match event {
            Event::PointerMove(mv) => {
                self.behavior.pointer_moved(mv.position);
                if self.state.is_active() {
                    self.behavior
                        .pointer_target(mv.target.as_ref(), self.host.surface());
                }
                LifecycleOutcome::PointerUpdated
            }
            Event::PointerEnter => self.activate()?,
            Event::PointerLeave | Event::Visibility { hidden: true } => self.deactivate()?,
            Event::Visibility { hidden: false } => {
                LifecycleOutcome::Ignored(IgnoredReason::PageVisible)
            }
            Event::Resize { width, height } => self.resize(Viewport::new(*width, *height))?,
        };
        Ok(self.log(phase, outcome))
    }

    /// Run the frame callback for `handle`.
    pub fn on_frame(&mut self, handle: FrameHandle) -> FrameOutcome {
        if self.torn_down {
            return FrameOutcome::Ignored(IgnoredReason::TornDown);
        }
        if !self.frames.accept(handle) {
            tracing::trace!(
                target: "cursortrail.frame",
                frame = handle.get(),
                "stale frame ignored"
            );
            return FrameOutcome::Ignored(IgnoredReason::StaleFrame);
        }
        debug_assert!(self.state.is_active(), "frames are only outstanding while active");

        if !self.host.surface_ref().elements_attached() {
            self.frames.start(self.host.scheduler());
            self.stats.frames_deferred += 1;
            tracing::trace!(
                target: "cursortrail.frame",
                frame = handle.get(),
                "surface detached, frame deferred"
            );
            return FrameOutcome::Deferred;
        }

        let output = self.behavior.render_frame(self.host.surface());
        self.frames.start(self.host.scheduler());
        self.stats.frames_rendered += 1;
        tracing::trace!(
            target: "cursortrail.frame",
            frame = handle.get(),
            inner_x = output.inner.x,
            inner_y = output.inner.y,
            outer_x = output.outer.x,
            outer_y = output.outer.y,
            "frame rendered"
        );
        FrameOutcome::Rendered(output)
    }

    /// Stop everything and release every host resource.
    ///
    /// Idempotent. Cancels the outstanding frame, releases both listeners and
    /// the native cursor lease. The controller ignores all input afterwards.
    pub fn teardown(&mut self) -> Result<(), ControllerError<H::Error>> {
        if self.torn_down {
            self.log(
                LifecyclePhase::Teardown,
                LifecycleOutcome::Ignored(IgnoredReason::TornDown),
            );
            return Ok(());
        }

        let movement = if self.state.is_active() {
            self.enter_idle()
        } else {
            self.release_movement()
        };
        self.torn_down = true;
        self.sync_native_cursor();

        let presence = match self.presence.take() {
            Some(lease) => {
                self.stats.unsubscriptions += 1;
                lease
                    .release(self.host.events())
                    .map_err(ControllerError::Unsubscribe)
            }
            None => Ok(()),
        };

        self.log(LifecyclePhase::Teardown, LifecycleOutcome::TornDown);
        movement.and(presence)
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Result of the most recent desktop classification.
    #[must_use]
    pub fn is_desktop(&self) -> bool {
        self.desktop
    }

    /// The outstanding frame request, if any.
    #[must_use]
    pub fn outstanding_frame(&self) -> Option<FrameHandle> {
        self.frames.outstanding()
    }

    #[must_use]
    pub fn stats(&self) -> ControllerStats {
        ControllerStats {
            frames: self.frames.stats(),
            ..self.stats
        }
    }

    #[must_use]
    pub fn settings(&self) -> &CursorSettings {
        &self.settings
    }

    #[must_use]
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for hosts that are driven from outside (tests,
    /// replay).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn activate(&mut self) -> Result<LifecycleOutcome, ControllerError<H::Error>> {
        if self.state.is_active() {
            return Ok(LifecycleOutcome::Ignored(IgnoredReason::AlreadyActive));
        }
        if !self.desktop {
            return Ok(LifecycleOutcome::Ignored(IgnoredReason::NotDesktop));
        }

        let movement = ListenerLease::acquire(self.host.events(), EventInterest::MOVE)
            .map_err(ControllerError::Subscribe)?;
        self.movement = Some(movement);
        self.stats.subscriptions += 1;

        self.host.surface().set_visibility(VisibilityState::Visible);
        self.behavior.on_activate(self.host.surface());
        self.frames.start(self.host.scheduler());
        self.state = LifecycleState::Active;
        self.stats.activations += 1;
        Ok(LifecycleOutcome::Activated)
    }

    fn deactivate(&mut self) -> Result<LifecycleOutcome, ControllerError<H::Error>> {
        if !self.state.is_active() {
            return Ok(LifecycleOutcome::Ignored(IgnoredReason::AlreadyIdle));
        }
        self.enter_idle()?;
        Ok(LifecycleOutcome::Deactivated)
    }

    fn resize(&mut self, viewport: Viewport) -> Result<LifecycleOutcome, ControllerError<H::Error>> {
        self.behavior.viewport_changed(viewport);

        let traits = DeviceTraits {
            viewport_width: viewport.width,
            ..self.host.surface_ref().device_traits()
        };
        self.desktop = classify(&self.settings, &traits);

        let (outcome, released) = if !self.desktop && self.state.is_active() {
            (LifecycleOutcome::Deactivated, self.enter_idle())
        } else {
            (LifecycleOutcome::ViewportUpdated, Ok(()))
        };
        self.sync_native_cursor();
        released?;
        Ok(outcome)
    }

    /// Shared Active -> Idle path: cancel first, then hide, then unsubscribe.
    fn enter_idle(&mut self) -> Result<(), ControllerError<H::Error>> {
        self.frames.cancel(self.host.scheduler());
        self.state = LifecycleState::Idle;
        self.host.surface().set_visibility(VisibilityState::Hidden);
        self.behavior.on_deactivate(self.host.surface());
        self.stats.deactivations += 1;
        self.release_movement()
    }

    fn release_movement(&mut self) -> Result<(), ControllerError<H::Error>> {
        match self.movement.take() {
            Some(lease) => {
                self.stats.unsubscriptions += 1;
                lease
                    .release(self.host.events())
                    .map_err(ControllerError::Unsubscribe)
            }
            None => Ok(()),
        }
    }

    /// Hold a native cursor lease exactly while mounted on a desktop host
    /// with the system cursor disabled.
    fn sync_native_cursor(&mut self) {
        let wants = !self.torn_down && self.desktop && !self.settings.show_system_cursor();
        match (wants, self.cursor_lease.take()) {
            (true, None) => {
                let lease = self.cursor.acquire();
                if lease.is_first() {
                    self.host.surface().set_native_cursor_hidden(true);
                }
                self.cursor_lease = Some(lease);
            }
            (false, Some(lease)) => {
                if lease.release() {
                    self.host.surface().set_native_cursor_hidden(false);
                }
            }
            (_, kept) => self.cursor_lease = kept,
        }
    }

    fn log(&self, phase: LifecyclePhase, outcome: LifecycleOutcome) -> LifecycleLogEntry {
        let entry = LifecycleLogEntry {
            phase,
            outcome,
            state: self.state,
            frame: self.frames.outstanding(),
        };
        if outcome == LifecycleOutcome::PointerUpdated {
            tracing::trace!(
                target: "cursortrail.lifecycle",
                phase = phase.as_str(),
                "pointer updated"
            );
        } else {
            tracing::debug!(
                target: "cursortrail.lifecycle",
                phase = phase.as_str(),
                outcome = ?outcome,
                state = entry.state.as_str(),
                "lifecycle dispatch"
            );
        }
        entry
    }
}

impl<H: Host, B: CursorBehavior> Drop for CursorController<H, B> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            tracing::warn!(
                target: "cursortrail.lifecycle",
                error = %err,
                "teardown on drop failed"
            );
        }
    }
}

impl<H: Host, B: CursorBehavior> fmt::Debug for CursorController<H, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorController")
            .field("state", &self.state)
            .field("desktop", &self.desktop)
            .field("torn_down", &self.torn_down)
            .field("outstanding_frame", &self.frames.outstanding())
            .finish_non_exhaustive()
    }
}

fn classify(settings: &CursorSettings, traits: &DeviceTraits) -> bool {
    !settings.desktop_only() || traits.is_desktop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use trail_backend::{FrameScheduler, ListenerId, PointerEventSource};
    use trail_core::config::{CursorConfig, HoverBoost};
    use trail_core::event::PointerMove;
    use trail_core::geometry::{Point, Transform};
    use trail_core::selector::ElementDescriptor;
    use trail_core::style::{ElementStyle, OuterAppearance};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::registry::LookupSpan;

    // -----------------------------------------------------------------------
    // Mock host: one struct playing scheduler, event source and surface
    // -----------------------------------------------------------------------

    #[derive(Debug)]
    struct MockError(&'static str);

    impl fmt::Display for MockError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    struct MockHost {
        next_frame: u64,
        requests: u32,
        cancels: Vec<FrameHandle>,
        next_listener: u64,
        active: Vec<(ListenerId, EventInterest)>,
        unsubscribed: Vec<ListenerId>,
        refuse_move_subscribe: bool,
        fail_unsubscribe: bool,
        attached: bool,
        traits: DeviceTraits,
        viewport: Viewport,
        transforms: Vec<(ElementId, Transform)>,
        visibility: Vec<VisibilityState>,
        styles: Vec<ElementId>,
        cursor_hidden: Vec<bool>,
        appearances: Vec<OuterAppearance>,
    }

    impl MockHost {
        fn desktop() -> Self {
            Self {
                next_frame: 0,
                requests: 0,
                cancels: Vec::new(),
                next_listener: 0,
                active: Vec::new(),
                unsubscribed: Vec::new(),
                refuse_move_subscribe: false,
                fail_unsubscribe: false,
                attached: true,
                traits: DeviceTraits::desktop(1920.0),
                viewport: Viewport::new(1920.0, 1080.0),
                transforms: Vec::new(),
                visibility: Vec::new(),
                styles: Vec::new(),
                cursor_hidden: Vec::new(),
                appearances: Vec::new(),
            }
        }

        fn phone() -> Self {
            Self {
                traits: DeviceTraits::desktop(390.0)
                    .with_touch_points(5)
                    .with_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"),
                viewport: Viewport::new(390.0, 844.0),
                ..Self::desktop()
            }
        }

        fn move_listeners(&self) -> usize {
            self.active
                .iter()
                .filter(|(_, i)| i.contains(EventInterest::MOVE))
                .count()
        }
    }

    impl FrameScheduler for MockHost {
        fn request_frame(&mut self) -> FrameHandle {
            self.next_frame += 1;
            self.requests += 1;
            FrameHandle::new(self.next_frame)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancels.push(handle);
        }
    }

    impl PointerEventSource for MockHost {
        type Error = MockError;

        fn subscribe(&mut self, interest: EventInterest) -> Result<ListenerId, MockError> {
            if self.refuse_move_subscribe && interest.contains(EventInterest::MOVE) {
                return Err(MockError("move listener refused"));
            }
            self.next_listener += 1;
            let id = ListenerId::new(self.next_listener);
            self.active.push((id, interest));
            Ok(id)
        }

        fn unsubscribe(&mut self, id: ListenerId) -> Result<(), MockError> {
            self.active.retain(|(l, _)| *l != id);
            self.unsubscribed.push(id);
            if self.fail_unsubscribe {
                Err(MockError("unsubscribe failed"))
            } else {
                Ok(())
            }
        }
    }

    impl RenderSurface for MockHost {
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
            self.transforms.push((element, transform));
        }
        fn set_visibility(&mut self, state: VisibilityState) {
            self.visibility.push(state);
        }
        fn apply_style(&mut self, element: ElementId, _style: &ElementStyle) {
            self.styles.push(element);
        }
        fn set_outer_appearance(&mut self, appearance: &OuterAppearance) {
            self.appearances.push(*appearance);
        }
        fn set_native_cursor_hidden(&mut self, hidden: bool) {
            self.cursor_hidden.push(hidden);
        }
    }

    impl Host for MockHost {
        type Error = MockError;
        type Scheduler = Self;
        type Events = Self;
        type Surface = Self;

        fn scheduler(&mut self) -> &mut Self {
            self
        }
        fn events(&mut self) -> &mut Self {
            self
        }
        fn surface(&mut self) -> &mut Self {
            self
        }
        fn surface_ref(&self) -> &Self {
            self
        }
    }

    fn kit() -> CursorSettings {
        CursorSettings::default()
    }

    fn mounted() -> CursorController<MockHost> {
        CursorController::mount(MockHost::desktop(), kit()).unwrap()
    }

    fn fire(c: &mut CursorController<MockHost>) -> FrameOutcome {
        let handle = c.outstanding_frame().expect("a frame should be outstanding");
        c.on_frame(handle)
    }

    // -----------------------------------------------------------------------
    // Mount
    // -----------------------------------------------------------------------

    #[test]
    fn mount_starts_idle_with_presence_listener() {
        let c = mounted();
        assert_eq!(c.state(), LifecycleState::Idle);
        assert!(c.outstanding_frame().is_none());
        assert_eq!(c.host().active.len(), 1);
        assert_eq!(c.host().active[0].1, PRESENCE_INTEREST);
        assert_eq!(c.host().styles, vec![ElementId::Inner, ElementId::Outer]);
        assert_eq!(c.host().visibility, vec![VisibilityState::Hidden]);
        assert_eq!(c.host().cursor_hidden, vec![true]);
        assert_eq!(c.host().requests, 0);
    }

    #[test]
    fn mount_caches_viewport() {
        let c = mounted();
        assert_eq!(c.behavior().viewport(), Viewport::new(1920.0, 1080.0));
    }

    #[test]
    fn activate_on_mount_requests_frame() {
        let settings = CursorConfig::follow().validate().unwrap();
        let c = CursorController::mount(MockHost::desktop(), settings).unwrap();
        assert_eq!(c.state(), LifecycleState::Active);
        assert_eq!(c.host().requests, 1);
        assert_eq!(c.host().move_listeners(), 1);
    }

    #[test]
    fn show_system_cursor_leaves_pointer_alone() {
        let settings = CursorConfig {
            show_system_cursor: true,
            ..CursorConfig::kit()
        }
        .validate()
        .unwrap();
        let mut c = CursorController::mount(MockHost::desktop(), settings).unwrap();
        c.teardown().unwrap();
        assert!(c.host().cursor_hidden.is_empty());
    }

    // -----------------------------------------------------------------------
    // Enter / leave
    // -----------------------------------------------------------------------

    #[test]
    fn enter_twice_schedules_once() {
        let mut c = mounted();
        let first = c.handle_event(&Event::PointerEnter).unwrap();
        let second = c.handle_event(&Event::PointerEnter).unwrap();
        assert_eq!(first.outcome, LifecycleOutcome::Activated);
        assert_eq!(second.ignored(), Some(IgnoredReason::AlreadyActive));
        assert_eq!(c.host().requests, 1);
        assert_eq!(c.host().move_listeners(), 1);
        assert_eq!(c.stats().frames.requested, 1);
    }

    #[test]
    fn leave_cancels_outstanding_frame() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        let pending = c.outstanding_frame().unwrap();

        let entry = c.handle_event(&Event::PointerLeave).unwrap();
        assert_eq!(entry.outcome, LifecycleOutcome::Deactivated);
        assert_eq!(entry.state, LifecycleState::Idle);
        assert_eq!(entry.frame, None);
        assert_eq!(c.host().cancels, vec![pending]);
        assert_eq!(c.host().move_listeners(), 0);

        let writes = c.host().transforms.len();
        assert_eq!(
            c.on_frame(pending),
            FrameOutcome::Ignored(IgnoredReason::StaleFrame)
        );
        assert_eq!(c.host().transforms.len(), writes);
    }

    #[test]
    fn leave_while_idle_is_ignored() {
        let mut c = mounted();
        let entry = c.handle_event(&Event::PointerLeave).unwrap();
        assert_eq!(entry.ignored(), Some(IgnoredReason::AlreadyIdle));
        assert!(c.host().cancels.is_empty());
    }

    #[test]
    fn hidden_behaves_like_leave_and_visible_waits_for_enter() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        let hidden = c.handle_event(&Event::Visibility { hidden: true }).unwrap();
        assert_eq!(hidden.phase, LifecyclePhase::VisibilityHidden);
        assert_eq!(hidden.outcome, LifecycleOutcome::Deactivated);

        let visible = c.handle_event(&Event::Visibility { hidden: false }).unwrap();
        assert_eq!(visible.ignored(), Some(IgnoredReason::PageVisible));
        assert_eq!(c.state(), LifecycleState::Idle);
        assert_eq!(c.host().requests, 1);
    }

    #[test]
    fn enter_subscribe_failure_keeps_idle() {
        let mut host = MockHost::desktop();
        host.refuse_move_subscribe = true;
        let mut c = CursorController::mount(host, kit()).unwrap();
        let err = c.handle_event(&Event::PointerEnter).unwrap_err();
        assert!(matches!(err, ControllerError::Subscribe(_)));
        assert_eq!(c.state(), LifecycleState::Idle);
        assert_eq!(c.host().requests, 0);
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    #[test]
    fn frame_renders_and_reschedules() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        c.handle_event(&Event::pointer_move(100.0, 100.0)).unwrap();

        let FrameOutcome::Rendered(out) = fire(&mut c) else {
            panic!("expected a rendered frame");
        };
        assert_eq!(out.inner.position(), Point::new(96.5, 96.5));
        assert_eq!(c.host().transforms.len(), 2);
        assert_eq!(c.host().requests, 2);
        assert!(c.outstanding_frame().is_some());
    }

    #[test]
    fn move_never_writes_transforms() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        for i in 0..10 {
            let entry = c.handle_event(&Event::pointer_move(f64::from(i), 5.0)).unwrap();
            assert_eq!(entry.outcome, LifecycleOutcome::PointerUpdated);
        }
        assert!(c.host().transforms.is_empty());
        assert_eq!(c.behavior().pointer(), Point::new(9.0, 5.0));
    }

    #[test]
    fn detached_surface_defers() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        c.host_mut().attached = false;
        assert_eq!(fire(&mut c), FrameOutcome::Deferred);
        assert_eq!(fire(&mut c), FrameOutcome::Deferred);
        assert!(c.host().transforms.is_empty());
        assert_eq!(c.stats().frames_deferred, 2);

        c.host_mut().attached = true;
        assert!(matches!(fire(&mut c), FrameOutcome::Rendered(_)));
        assert_eq!(c.behavior().smoothed(), Point::ORIGIN);
    }

    #[test]
    fn unknown_handle_is_stale() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        assert_eq!(
            c.on_frame(FrameHandle::new(999)),
            FrameOutcome::Ignored(IgnoredReason::StaleFrame)
        );
        assert!(c.outstanding_frame().is_some());
    }

    // -----------------------------------------------------------------------
    // Resize and desktop gate
    // -----------------------------------------------------------------------

    #[test]
    fn resize_updates_cached_viewport() {
        let mut c = mounted();
        let entry = c
            .handle_event(&Event::Resize {
                width: 1280.0,
                height: 720.0,
            })
            .unwrap();
        assert_eq!(entry.outcome, LifecycleOutcome::ViewportUpdated);
        assert_eq!(c.behavior().viewport(), Viewport::new(1280.0, 720.0));
    }

    #[test]
    fn non_desktop_host_never_activates() {
        let mut c = CursorController::mount(MockHost::phone(), kit()).unwrap();
        assert!(!c.is_desktop());
        let entry = c.handle_event(&Event::PointerEnter).unwrap();
        assert_eq!(entry.ignored(), Some(IgnoredReason::NotDesktop));
        assert_eq!(c.host().requests, 0);
        assert!(c.host().cursor_hidden.is_empty());
    }

    #[test]
    fn desktop_only_off_runs_anywhere() {
        let settings = CursorConfig {
            desktop_only: false,
            ..CursorConfig::kit()
        }
        .validate()
        .unwrap();
        let mut c = CursorController::mount(MockHost::phone(), settings).unwrap();
        let entry = c.handle_event(&Event::PointerEnter).unwrap();
        assert_eq!(entry.outcome, LifecycleOutcome::Activated);
    }

    #[test]
    fn shrinking_below_desktop_width_deactivates_and_restores_cursor() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        let entry = c
            .handle_event(&Event::Resize {
                width: 800.0,
                height: 600.0,
            })
            .unwrap();
        assert_eq!(entry.outcome, LifecycleOutcome::Deactivated);
        assert_eq!(c.state(), LifecycleState::Idle);
        assert_eq!(c.host().cursor_hidden, vec![true, false]);

        c.handle_event(&Event::Resize {
            width: 1600.0,
            height: 900.0,
        })
        .unwrap();
        assert!(c.is_desktop());
        assert_eq!(c.host().cursor_hidden, vec![true, false, true]);
        assert_eq!(c.state(), LifecycleState::Idle);
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    #[test]
    fn teardown_while_active_releases_everything_once() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        let pending = c.outstanding_frame().unwrap();

        c.teardown().unwrap();
        c.teardown().unwrap();
        assert!(c.is_torn_down());
        assert_eq!(c.host().cancels, vec![pending]);
        assert_eq!(c.host().unsubscribed.len(), 2);
        assert!(c.host().active.is_empty());
        assert_eq!(c.host().cursor_hidden, vec![true, false]);
        assert_eq!(c.on_frame(pending), FrameOutcome::Ignored(IgnoredReason::TornDown));

        let entry = c.handle_event(&Event::PointerEnter).unwrap();
        assert_eq!(entry.ignored(), Some(IgnoredReason::TornDown));
        let stats = c.stats();
        assert_eq!(stats.subscriptions, stats.unsubscriptions);
    }

    #[test]
    fn teardown_while_idle_releases_presence_only() {
        let mut c = mounted();
        c.teardown().unwrap();
        assert_eq!(c.host().unsubscribed, vec![ListenerId::new(1)]);
        assert!(c.host().cancels.is_empty());
    }

    #[test]
    fn teardown_reports_unsubscribe_failure_after_cleanup() {
        let mut c = mounted();
        c.handle_event(&Event::PointerEnter).unwrap();
        c.host_mut().fail_unsubscribe = true;
        let err = c.teardown().unwrap_err();
        assert!(matches!(err, ControllerError::Unsubscribe(_)));
        assert!(c.is_torn_down());
        assert_eq!(c.state(), LifecycleState::Idle);
        assert_eq!(c.host().unsubscribed.len(), 2);
    }

    #[test]
    fn shared_toggle_restores_after_last_controller() {
        let toggle = NativeCursorToggle::new();
        let settings = kit();
        let mut a = CursorController::mount_with(
            MockHost::desktop(),
            TrailingMotion::from_settings(&settings),
            settings.clone(),
            toggle.clone(),
        )
        .unwrap();
        let mut b = CursorController::mount_with(
            MockHost::desktop(),
            TrailingMotion::from_settings(&settings),
            settings,
            toggle.clone(),
        )
        .unwrap();
        assert_eq!(toggle.holders(), 2);
        assert_eq!(a.host().cursor_hidden, vec![true]);
        assert!(b.host().cursor_hidden.is_empty());

        a.teardown().unwrap();
        assert!(toggle.is_suppressed());
        assert_eq!(a.host().cursor_hidden, vec![true]);

        b.teardown().unwrap();
        assert!(!toggle.is_suppressed());
        assert_eq!(b.host().cursor_hidden, vec![false]);
    }

    // -----------------------------------------------------------------------
    // Hover integration
    // -----------------------------------------------------------------------

    #[test]
    fn hover_only_while_active() {
        let settings = CursorConfig::kit()
            .with_hover(HoverBoost::default())
            .validate()
            .unwrap();
        let motion = TrailingMotion::from_settings(&settings);
        let behavior = HoverResponsive::from_settings(motion, &settings).unwrap();
        let mut c = CursorController::mount_with(
            MockHost::desktop(),
            behavior,
            settings,
            NativeCursorToggle::new(),
        )
        .unwrap();

        let over_link = Event::PointerMove(
            PointerMove::new(10.0, 10.0).with_target(ElementDescriptor::new("a")),
        );
        c.handle_event(&over_link).unwrap();
        assert!(c.host().appearances.is_empty());

        c.handle_event(&Event::PointerEnter).unwrap();
        c.handle_event(&over_link).unwrap();
        assert_eq!(c.host().appearances.len(), 1);
        assert!(c.behavior().is_hovering());

        c.handle_event(&Event::PointerLeave).unwrap();
        assert!(!c.behavior().is_hovering());
        assert_eq!(c.host().appearances.len(), 2);
    }

    #[test]
    fn mount_hover_applies_configured_boost() {
        let settings = CursorConfig::kit()
            .with_hover(HoverBoost::default())
            .validate()
            .unwrap();
        let mut c = CursorController::mount_hover(MockHost::desktop(), settings).unwrap();

        c.handle_event(&Event::PointerEnter).unwrap();
        c.handle_event(&Event::PointerMove(
            PointerMove::new(10.0, 10.0).with_target(ElementDescriptor::new("a")),
        ))
        .unwrap();
        assert_eq!(c.host().appearances.len(), 1);
        assert_eq!(c.host().appearances[0], c.behavior().appearance());
        assert!(c.behavior().is_hovering());
    }

    #[test]
    fn mount_hover_without_hover_section_fails() {
        let err = CursorController::mount_hover(MockHost::desktop(), CursorSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, ControllerError::HoverNotConfigured));
    }

    // -----------------------------------------------------------------------
    // Tracing
    // -----------------------------------------------------------------------

    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: tracing::Level,
        target: String,
        fields: HashMap<String, String>,
    }

    struct EventCapture {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    struct FieldVisitor(Vec<(String, String)>);

    impl tracing::field::Visit for FieldVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
        fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
    }

    impl<S> tracing_subscriber::Layer<S> for EventCapture
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = FieldVisitor(Vec::new());
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                fields: visitor.0.into_iter().collect(),
            });
        }
    }

    fn with_captured_tracing<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let layer = EventCapture {
            events: Arc::clone(&events),
        };
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        let captured = events.lock().unwrap().clone();
        captured
    }

    #[test]
    fn transitions_emit_lifecycle_events() {
        let events = with_captured_tracing(|| {
            let mut c = mounted();
            c.handle_event(&Event::PointerEnter).unwrap();
            c.handle_event(&Event::PointerLeave).unwrap();
        });

        let lifecycle: Vec<_> = events
            .iter()
            .filter(|e| e.target == "cursortrail.lifecycle" && e.level == tracing::Level::DEBUG)
            .collect();
        let phases: Vec<&str> = lifecycle
            .iter()
            .filter_map(|e| e.fields.get("phase").map(String::as_str))
            .collect();
        assert_eq!(
            phases,
            vec!["mount", "pointer_enter", "pointer_leave", "teardown"]
        );
        assert!(
            lifecycle
                .iter()
                .any(|e| e.fields.get("outcome").is_some_and(|o| o == "Activated"))
        );
    }

    #[test]
    fn drop_with_failing_unsubscribe_warns() {
        let events = with_captured_tracing(|| {
            let mut c = mounted();
            c.host_mut().fail_unsubscribe = true;
        });
        assert!(events.iter().any(|e| {
            e.level == tracing::Level::WARN
                && e.fields
                    .get("message")
                    .is_some_and(|m| m.contains("teardown on drop failed"))
        }));
    }

    #[test]
    fn plain_mount_warns_when_hover_is_configured() {
        let settings = CursorConfig::kit()
            .with_hover(HoverBoost::default())
            .validate()
            .unwrap();
        let events = with_captured_tracing(|| {
            let mut c = CursorController::mount(MockHost::desktop(), settings).unwrap();
            c.handle_event(&Event::PointerEnter).unwrap();
            assert!(c.host().appearances.is_empty());
        });
        assert!(events.iter().any(|e| {
            e.level == tracing::Level::WARN
                && e.target == "cursortrail.lifecycle"
                && e.fields
                    .get("message")
                    .is_some_and(|m| m.contains("hover is configured"))
        }));
    }

    #[test]
    fn plain_mount_without_hover_does_not_warn() {
        let events = with_captured_tracing(|| {
            let _c = mounted();
        });
        assert!(!events.iter().any(|e| e.level == tracing::Level::WARN));
    }
}
