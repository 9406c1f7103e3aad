//! The deferred state machine.
//!
//! A [`Deferred<T, E>`] is the eventual outcome of a computation: pending at
//! first, then settled exactly once as fulfilled with a `T` or rejected with
//! an `E`. Handles are cheap to clone; every clone observes the same state.
//!
//! # Settlement
//!
//! Only a [`Resolver`] can settle a deferred. The first successful
//! `fulfill`/`reject`/`adopt` wins and every later call is a no-op. Adopting
//! another deferred (or any [`Thenable`]) locks the resolver and forwards the
//! adopted outcome once it exists.
//!
//! # Observers
//!
//! [`Deferred::attach`] registers a `(on_fulfilled, on_rejected)` pair.
//! Observers registered while pending are kept in registration order and
//! dispatched together in one scheduled task when the deferred settles.
//! Observers registered after settlement get their own scheduled task
//! immediately. Either way, no observer ever runs inside the call that
//! registered it or inside the call that settled the deferred.
//!
//! Values and reasons are handed to each observer by clone. An observer that
//! panics does not stop the others in its batch; the panic resumes after the
//! batch.

mod chain;
mod resolver;

pub use chain::{Step, Thenable};
pub use resolver::Resolver;

use core::fmt;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::runtime::Scheduler;
use crate::types::{DeferredId, Settled, State};

/// An observer pair waiting for settlement.
struct Reaction<T, E> {
    on_fulfilled: Box<dyn FnOnce(T)>,
    on_rejected: Box<dyn FnOnce(E)>,
}

impl<T, E> Reaction<T, E> {
    fn run(self, outcome: Settled<T, E>) {
        match outcome {
            Settled::Fulfilled(v) => (self.on_fulfilled)(v),
            Settled::Rejected(e) => (self.on_rejected)(e),
        }
    }
}

struct Inner<T, E> {
    id: DeferredId,
    state: State<T, E>,
    /// Committed to adopting another thenable; direct settlement is ignored.
    locked: bool,
    observers: SmallVec<[Reaction<T, E>; 2]>,
}

type Shared<T, E> = Rc<RefCell<Inner<T, E>>>;

/// Moves a pending deferred to its final state and schedules its observers.
///
/// Returns false if the deferred had already settled.
fn settle<T, E>(shared: &Shared<T, E>, scheduler: &Scheduler, outcome: Settled<T, E>) -> bool
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (id, observers) = {
        let mut inner = shared.borrow_mut();
        if inner.state.is_settled() {
            trace!(deferred_id = %inner.id, "settle ignored: already settled");
            return false;
        }
        inner.state = outcome.clone().into();
        (inner.id, std::mem::take(&mut inner.observers))
    };
    trace!(
        deferred_id = %id,
        fulfilled = outcome.is_fulfilled(),
        observers = observers.len(),
        "deferred settled"
    );
    if !observers.is_empty() {
        scheduler.schedule_fn(move || run_batch(id, observers, &outcome));
    }
    true
}

/// Runs every observer of one settlement in registration order.
///
/// A panicking observer does not stop its siblings. The first panic is
/// re-raised once the whole batch has run.
fn run_batch<T, E>(
    id: DeferredId,
    observers: SmallVec<[Reaction<T, E>; 2]>,
    outcome: &Settled<T, E>,
) where
    T: Clone,
    E: Clone,
{
    let mut first_panic = None;
    for reaction in observers {
        let outcome = outcome.clone();
        let result = panic::catch_unwind(AssertUnwindSafe(move || reaction.run(outcome)));
        if let Err(payload) = result {
            warn!(deferred_id = %id, "observer panicked; running remaining observers");
            first_panic.get_or_insert(payload);
        }
    }
    if let Some(payload) = first_panic {
        panic::resume_unwind(payload);
    }
}

/// Handle to a deferred result.
///
/// # Example
///
/// ```
/// use deferred::runtime::TaskQueue;
/// use deferred::{Deferred, Step};
///
/// let queue = TaskQueue::new();
/// let d: Deferred<u32, String> = Deferred::new(&queue.scheduler(), |resolver| {
///     resolver.fulfill(20);
///     Ok(())
/// });
/// let answer = d
///     .and_then(|v| Step::Value(v + 1))
///     .map(|v| v * 2);
///
/// queue.run_until_idle().unwrap();
/// assert_eq!(answer.value(), Some(42));
/// ```
pub struct Deferred<T, E> {
    shared: Shared<T, E>,
    scheduler: Scheduler,
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T, E> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a deferred and runs `executor` synchronously with its resolver.
    ///
    /// Returning `Err(reason)` from the executor rejects the deferred with
    /// `reason`, unless the executor already settled or locked it.
    pub fn new<X>(scheduler: &Scheduler, executor: X) -> Self
    where
        X: FnOnce(Resolver<T, E>) -> Result<(), E>,
    {
        let (deferred, resolver) = Self::pending(scheduler);
        if let Err(reason) = executor(resolver.clone()) {
            trace!(deferred_id = %deferred.id(), "executor raised");
            resolver.reject(reason);
        }
        deferred
    }

    /// Creates a pending deferred and hands back its resolver.
    #[must_use]
    pub fn pending(scheduler: &Scheduler) -> (Self, Resolver<T, E>) {
        let shared = Rc::new(RefCell::new(Inner {
            id: DeferredId::next(),
            state: State::Pending,
            locked: false,
            observers: SmallVec::new(),
        }));
        let resolver = Resolver::new(Rc::clone(&shared), scheduler.clone());
        let deferred = Self {
            shared,
            scheduler: scheduler.clone(),
        };
        (deferred, resolver)
    }

    /// Registers an observer pair.
    ///
    /// While pending, the pair is queued behind earlier observers. Once
    /// settled, a task invoking the matching branch is scheduled right away.
    pub fn attach<F, G>(&self, on_fulfilled: F, on_rejected: G)
    where
        F: FnOnce(T) + 'static,
        G: FnOnce(E) + 'static,
    {
        let outcome = {
            let mut inner = self.shared.borrow_mut();
            let snapshot = inner.state.clone();
            match snapshot.into_settled() {
                Some(outcome) => outcome,
                None => {
                    inner.observers.push(Reaction {
                        on_fulfilled: Box::new(on_fulfilled),
                        on_rejected: Box::new(on_rejected),
                    });
                    trace!(
                        deferred_id = %inner.id,
                        observers = inner.observers.len(),
                        "observer queued"
                    );
                    return;
                }
            }
        };
        trace!(deferred_id = %self.id(), "observer on settled deferred scheduled");
        self.scheduler.schedule_fn(move || match outcome {
            Settled::Fulfilled(v) => on_fulfilled(v),
            Settled::Rejected(e) => on_rejected(e),
        });
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> State<T, E> {
        self.shared.borrow().state.clone()
    }

    /// Returns the outcome, or `None` while pending.
    #[must_use]
    pub fn settled(&self) -> Option<Settled<T, E>> {
        self.state().into_settled()
    }

    /// Returns the success value, if fulfilled.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        match &self.shared.borrow().state {
            State::Fulfilled(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Returns the rejection reason, if rejected.
    #[must_use]
    pub fn reason(&self) -> Option<E> {
        match &self.shared.borrow().state {
            State::Rejected(e) => Some(e.clone()),
            _ => None,
        }
    }
}

impl<T, E> Deferred<T, E> {
    /// Returns this deferred's id.
    #[must_use]
    pub fn id(&self) -> DeferredId {
        self.shared.borrow().id
    }

    /// Returns the scheduler observers are dispatched on.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns true while pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.shared.borrow().state.is_pending()
    }

    /// Returns true if fulfilled.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.shared.borrow().state.is_fulfilled()
    }

    /// Returns true if rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.shared.borrow().state.is_rejected()
    }

    /// Returns true if the resolver committed to adopting another thenable
    /// and the outcome has not arrived yet.
    #[must_use]
    pub fn is_adopting(&self) -> bool {
        let inner = self.shared.borrow();
        inner.locked && inner.state.is_pending()
    }

    /// Returns the number of observers waiting for settlement.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.shared.borrow().observers.len()
    }

    /// Returns true if both handles refer to the same deferred.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.borrow();
        f.debug_struct("Deferred")
            .field("id", &inner.id)
            .field("state", &format_args!("{}", inner.state))
            .field("locked", &inner.locked)
            .field("observers", &inner.observers.len())
            .finish()
    }
}
