#![forbid(unsafe_code)]

//! Core: geometry, boundary clamping, events, selectors, and configuration.
//!
//! # Role in cursortrail
//! `trail-core` is the host-independent layer. It owns the viewport geometry
//! the motion model works in, the pure boundary clamper, the canonical input
//! events a host pushes into the runtime, and the validated configuration
//! record every other crate consumes.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Point`], [`geometry::Viewport`],
//!   [`geometry::ElementSpec`] and the per-frame [`geometry::Transform`].
//! - **Boundary clamping**: [`clamp::bounded_position`] keeps an element fully
//!   inside the viewport.
//! - **Events**: [`event::Event`] and the [`event::EventInterest`] flags a
//!   host subscription is registered with.
//! - **Selectors**: a small CSS-like matcher for interactive-element hover.
//! - **Configuration**: [`config::CursorConfig`] and its validated form
//!   [`config::CursorSettings`].
//!
//! # How it fits in the system
//! `trail-backend` defines the host traits in terms of these types, and
//! `trail-runtime` drives the motion engine and lifecycle controller with
//! them. Nothing here knows how frames are scheduled or where pixels go.

pub mod clamp;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod geometry;
pub mod selector;
pub mod style;

pub use clamp::bounded_position;
pub use config::{CursorConfig, CursorSettings, HoverBoost, TrailingSpeed};
pub use device::DeviceTraits;
pub use error::{ConfigError, SelectorError};
pub use event::{Event, EventInterest, PointerMove};
pub use geometry::{ElementId, ElementSpec, Point, Transform, Viewport};
pub use selector::{ElementDescriptor, Selector, SelectorList};
pub use style::{Easing, ElementStyle, OuterAppearance, Radius};
