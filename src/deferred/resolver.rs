//! The settlement handle.

use core::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use super::chain::{Step, Thenable};
use super::{settle, Shared};
use crate::runtime::Scheduler;
use crate::types::Settled;

/// Settles exactly one [`Deferred`](super::Deferred).
///
/// Cloneable; all clones settle the same deferred and the first effective
/// call wins. A resolver that has adopted a thenable is locked: direct
/// `fulfill`/`reject` calls are ignored from then on and only the adopted
/// outcome can settle the deferred.
pub struct Resolver<T, E> {
    shared: Shared<T, E>,
    scheduler: Scheduler,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(super) fn new(shared: Shared<T, E>, scheduler: Scheduler) -> Self {
        Self { shared, scheduler }
    }

    /// Returns false if the deferred is settled or locked.
    fn accepts_direct(&self) -> bool {
        let inner = self.shared.borrow();
        let open = inner.state.is_pending() && !inner.locked;
        if !open {
            trace!(deferred_id = %inner.id, locked = inner.locked, "settle call ignored");
        }
        open
    }

    /// Fulfills the deferred with `value`.
    pub fn fulfill(&self, value: T) {
        if self.accepts_direct() {
            settle(&self.shared, &self.scheduler, Settled::Fulfilled(value));
        }
    }

    /// Rejects the deferred with `reason`. The reason is stored as given.
    pub fn reject(&self, reason: E) {
        if self.accepts_direct() {
            settle(&self.shared, &self.scheduler, Settled::Rejected(reason));
        }
    }

    /// Locks the deferred and forwards the eventual outcome of `thenable`.
    ///
    /// Adopting the deferred this resolver settles is ignored with a warning:
    /// it could never settle and would keep itself alive.
    pub fn adopt<A>(&self, thenable: A)
    where
        A: Thenable<T, E> + 'static,
    {
        self.adopt_boxed(Box::new(thenable));
    }

    pub(super) fn adopt_boxed(&self, thenable: Box<dyn Thenable<T, E>>) {
        // Read before borrowing: the thenable may be this very deferred.
        let source_id = thenable.deferred_id();
        {
            let mut inner = self.shared.borrow_mut();
            if !inner.state.is_pending() || inner.locked {
                trace!(deferred_id = %inner.id, "adopt ignored");
                return;
            }
            if source_id == Some(inner.id) {
                warn!(deferred_id = %inner.id, "deferred cannot adopt itself; ignored");
                return;
            }
            inner.locked = true;
            trace!(
                deferred_id = %inner.id,
                source = ?source_id,
                "adopting thenable"
            );
        }

        // Foreign thenables may call back more than once or call both
        // branches; `settle` drops everything after the first outcome.
        let on_fulfilled = self.clone();
        let on_rejected = self.clone();
        thenable.subscribe(
            Box::new(move |v| {
                settle(
                    &on_fulfilled.shared,
                    &on_fulfilled.scheduler,
                    Settled::Fulfilled(v),
                );
            }),
            Box::new(move |e| {
                settle(
                    &on_rejected.shared,
                    &on_rejected.scheduler,
                    Settled::Rejected(e),
                );
            }),
        );
    }

    /// Applies a handler result: fulfill, reject, or adopt.
    pub fn settle(&self, step: Step<T, E>) {
        match step {
            Step::Value(v) => self.fulfill(v),
            Step::Raise(e) => self.reject(e),
            Step::Adopt(thenable) => self.adopt_boxed(thenable),
        }
    }

    /// Returns true once the deferred is settled or has adopted a thenable.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        let inner = self.shared.borrow();
        inner.locked || inner.state.is_settled()
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.borrow();
        f.debug_struct("Resolver")
            .field("deferred", &inner.id)
            .field("locked", &inner.locked)
            .finish()
    }
}
