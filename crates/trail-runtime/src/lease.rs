#![forbid(unsafe_code)]

//! Scoped event subscriptions.
//!
//! A [`ListenerLease`] pairs one `subscribe` with exactly one `unsubscribe`.
//! Release consumes the lease, so a released subscription cannot be released
//! twice; a lease dropped without release is reported, since the host would
//! otherwise keep delivering events nobody handles.

use trail_backend::{ListenerId, PointerEventSource};
use trail_core::event::EventInterest;

/// An active host event subscription.
#[derive(Debug)]
pub struct ListenerLease {
    id: Option<ListenerId>,
    interest: EventInterest,
}

impl ListenerLease {
    /// Subscribe to `interest` on `events`.
    pub fn acquire<E: PointerEventSource>(
        events: &mut E,
        interest: EventInterest,
    ) -> Result<Self, E::Error> {
        let id = events.subscribe(interest)?;
        tracing::debug!(
            target: "cursortrail.lease",
            listener = id.get(),
            interest = ?interest,
            "listener acquired"
        );
        Ok(Self {
            id: Some(id),
            interest,
        })
    }

    /// Host id of the subscription.
    #[must_use]
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Event kinds covered.
    #[must_use]
    pub fn interest(&self) -> EventInterest {
        self.interest
    }

    /// Unsubscribe. The lease is spent even if the host reports an error.
    pub fn release<E: PointerEventSource>(mut self, events: &mut E) -> Result<(), E::Error> {
        match self.id.take() {
            Some(id) => {
                tracing::debug!(
                    target: "cursortrail.lease",
                    listener = id.get(),
                    "listener released"
                );
                events.unsubscribe(id)
            }
            None => Ok(()),
        }
    }
}

impl Drop for ListenerLease {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            tracing::warn!(
                target: "cursortrail.lease",
                listener = id.get(),
                "listener lease dropped without release"
            );
        }
    }
}
