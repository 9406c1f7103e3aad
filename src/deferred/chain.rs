//! Chaining: `then`, `catch` and friends.
//!
//! Every chaining call returns a fresh dependent deferred `D` immediately and
//! registers one observer pair on the source. When the source settles, the
//! matching handler runs from the task queue and its [`Step`] decides `D`:
//!
//! - `Step::Value(u)` fulfills `D` with `u`
//! - `Step::Raise(e)` rejects `D` with `e`
//! - `Step::Adopt(t)` makes `D` follow `t`, one level per link
//!
//! A missing success handler is the identity (`Step::Value`); a missing
//! failure handler re-raises (`Step::Raise`). That is what carries a
//! rejection down a chain untouched until some link catches it.

use core::fmt;
use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use super::Deferred;
use crate::types::{DeferredId, Settled};

/// Something a deferred can adopt.
///
/// This is the capability check used for flattening: any type that can
/// report its outcome through a pair of callbacks can be returned from a
/// handler and will be followed, not stored as a value. [`Deferred`]
/// implements it; foreign future-like types can too.
///
/// Implementations should call exactly one callback exactly once, but
/// adopters tolerate extra calls: everything after the first is ignored.
pub trait Thenable<T, E> {
    /// Registers the callbacks that receive the outcome.
    fn subscribe(
        self: Box<Self>,
        on_fulfilled: Box<dyn FnOnce(T)>,
        on_rejected: Box<dyn FnOnce(E)>,
    );

    /// Identity of the underlying deferred, when there is one.
    ///
    /// Used to refuse self-adoption.
    fn deferred_id(&self) -> Option<DeferredId> {
        None
    }
}

impl<T, E> Thenable<T, E> for Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn subscribe(
        self: Box<Self>,
        on_fulfilled: Box<dyn FnOnce(T)>,
        on_rejected: Box<dyn FnOnce(E)>,
    ) {
        self.attach(on_fulfilled, on_rejected);
    }

    fn deferred_id(&self) -> Option<DeferredId> {
        Some(self.id())
    }
}

/// What a handler produced.
pub enum Step<T, E> {
    /// Fulfill the dependent deferred with this value.
    Value(T),
    /// Reject the dependent deferred with this reason.
    Raise(E),
    /// Make the dependent deferred follow this thenable.
    Adopt(Box<dyn Thenable<T, E>>),
}

impl<T, E> Step<T, E> {
    /// Wraps a thenable for adoption.
    pub fn adopt<A>(thenable: A) -> Self
    where
        A: Thenable<T, E> + 'static,
    {
        Self::Adopt(Box::new(thenable))
    }

    /// Returns true for `Value`.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns true for `Raise`.
    #[must_use]
    pub const fn is_raise(&self) -> bool {
        matches!(self, Self::Raise(_))
    }

    /// Returns true for `Adopt`.
    #[must_use]
    pub const fn is_adopt(&self) -> bool {
        matches!(self, Self::Adopt(_))
    }
}

impl<T, E> From<Result<T, E>> for Step<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(e) => Self::Raise(e),
        }
    }
}

impl<T, E> From<Settled<T, E>> for Step<T, E> {
    fn from(settled: Settled<T, E>) -> Self {
        match settled {
            Settled::Fulfilled(v) => Self::Value(v),
            Settled::Rejected(e) => Self::Raise(e),
        }
    }
}

impl<T, E> From<Deferred<T, E>> for Step<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn from(deferred: Deferred<T, E>) -> Self {
        Self::Adopt(Box::new(deferred))
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Step<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Raise(e) => f.debug_tuple("Raise").field(e).finish(),
            Self::Adopt(t) => f.debug_tuple("Adopt").field(&t.deferred_id()).finish(),
        }
    }
}

impl<T, E> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Chains both handlers onto this deferred.
    ///
    /// Returns a fresh pending deferred without running either handler; the
    /// matching handler runs from the task queue after this deferred settles.
    pub fn then<U, F, G>(&self, on_fulfilled: F, on_rejected: G) -> Deferred<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Step<U, E> + 'static,
        G: FnOnce(E) -> Step<U, E> + 'static,
    {
        let (next, resolver) = Deferred::pending(self.scheduler());
        trace!(source = %self.id(), dependent = %next.id(), "chained");
        let on_err = resolver.clone();
        self.attach(
            move |v| resolver.settle(on_fulfilled(v)),
            move |e| on_err.settle(on_rejected(e)),
        );
        next
    }

    /// Chains a success handler; rejections pass through unchanged.
    pub fn and_then<U, F>(&self, on_fulfilled: F) -> Deferred<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Step<U, E> + 'static,
    {
        self.then(on_fulfilled, Step::Raise)
    }

    /// Chains a failure handler; values pass through unchanged.
    pub fn catch<G>(&self, on_rejected: G) -> Self
    where
        G: FnOnce(E) -> Step<T, E> + 'static,
    {
        self.then(Step::Value, on_rejected)
    }

    /// Chains with no handlers: the result settles exactly like `self`.
    #[must_use]
    pub fn forward(&self) -> Self {
        self.then(Step::Value, Step::Raise)
    }

    /// Chains a plain value transformation.
    pub fn map<U, F>(&self, f: F) -> Deferred<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> U + 'static,
    {
        self.then(move |v| Step::Value(f(v)), Step::Raise)
    }

    /// Runs `f` once this deferred settles either way, then passes the
    /// outcome through unchanged.
    pub fn finally<F>(&self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let on_ok = Rc::new(Cell::new(Some(f)));
        let on_err = Rc::clone(&on_ok);
        self.then(
            move |v| {
                if let Some(f) = on_ok.take() {
                    f();
                }
                Step::Value(v)
            },
            move |e| {
                if let Some(f) = on_err.take() {
                    f();
                }
                Step::Raise(e)
            },
        )
    }
}
