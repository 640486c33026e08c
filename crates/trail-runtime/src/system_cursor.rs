#![forbid(unsafe_code)]

//! Reference-counted native cursor suppression.
//!
//! Hiding the host pointer is page-wide state, but several cursor controllers
//! may be mounted at once. Each one that wants the pointer hidden holds a
//! [`NativeCursorLease`] on a shared [`NativeCursorToggle`]: the first lease
//! hides, releasing the last lease restores.
//!
//! The toggle is `Rc`-based and not `Send`; it lives on the
//! single thread that owns the page.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared holder count for native cursor suppression.
#[derive(Clone, Default)]
pub struct NativeCursorToggle {
    holders: Rc<Cell<usize>>,
}

impl NativeCursorToggle {
    /// A toggle with no holders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of leases.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.holders.get()
    }

    /// Whether the native cursor should currently be hidden.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.holders.get() > 0
    }

    /// Take a lease. Check [`NativeCursorLease::is_first`] to know whether
    /// the caller must hide the pointer.
    #[must_use]
    pub fn acquire(&self) -> NativeCursorLease {
        let before = self.holders.get();
        self.holders.set(before + 1);
        NativeCursorLease {
            holders: Rc::clone(&self.holders),
            first: before == 0,
            released: false,
        }
    }
}

impl fmt::Debug for NativeCursorToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeCursorToggle")
            .field("holders", &self.holders.get())
            .finish()
    }
}

/// One holder's claim on native cursor suppression.
#[derive(Debug)]
pub struct NativeCursorLease {
    holders: Rc<Cell<usize>>,
    first: bool,
    released: bool,
}

impl NativeCursorLease {
    /// Whether this lease took the count from zero to one.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.first
    }

    /// Give the lease back. Returns `true` if it was the last one, in which
    /// case the caller must restore the pointer.
    pub fn release(mut self) -> bool {
        self.released = true;
        self.decrement()
    }

    fn decrement(&self) -> bool {
        let remaining = self.holders.get().saturating_sub(1);
        self.holders.set(remaining);
        remaining == 0
    }
}

impl Drop for NativeCursorLease {
    fn drop(&mut self) {
        if !self.released {
            self.decrement();
        }
    }
}
