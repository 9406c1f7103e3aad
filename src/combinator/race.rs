//! Race combinators: the first input to settle decides.
//!
//! # Semantics
//!
//! `race(inputs)` settles exactly like whichever input settles first,
//! fulfilled or rejected. Losers keep running; their outcomes are observed
//! and dropped. There is no cancellation of the losers.
//!
//! `any(inputs)` only lets a fulfillment win. Rejections are collected in
//! input order and reported together as an [`AggregateError`] once every
//! input has rejected.
//!
//! "First" means first in task-queue order: observers attached to inputs
//! that are already settled are scheduled in input order, so the earliest
//! settled input in the list wins among those.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::deferred::Deferred;
use crate::error::AggregateError;
use crate::runtime::Scheduler;

/// Settles like the first input to settle.
///
/// An empty input never settles.
pub fn race<T, E, I>(scheduler: &Scheduler, inputs: I) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Deferred<T, E>>,
{
    let (winner, resolver) = Deferred::pending(scheduler);
    let mut count = 0usize;
    for input in inputs {
        count += 1;
        let on_ok = resolver.clone();
        let on_err = resolver.clone();
        input.attach(move |v| on_ok.fulfill(v), move |e| on_err.reject(e));
    }
    if count == 0 {
        debug!(race = %winner.id(), "race over no inputs will never settle");
    } else {
        debug!(race = %winner.id(), inputs = count, "race: waiting");
    }
    winner
}

struct AnyState<E> {
    reasons: Vec<Option<E>>,
    remaining: usize,
}

/// Fulfills with the first fulfillment; rejects with every reason, in input
/// order, once all inputs reject.
///
/// An empty input rejects immediately with an empty [`AggregateError`].
pub fn any<T, E, I>(scheduler: &Scheduler, inputs: I) -> Deferred<T, AggregateError<E>>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Deferred<T, E>>,
{
    let inputs: Vec<Deferred<T, E>> = inputs.into_iter().collect();
    let (winner, resolver) = Deferred::pending(scheduler);
    debug!(any = %winner.id(), inputs = inputs.len(), "any: waiting");
    if inputs.is_empty() {
        resolver.reject(AggregateError::new(Vec::new()));
        return winner;
    }

    let state = Rc::new(RefCell::new(AnyState {
        reasons: (0..inputs.len()).map(|_| None).collect(),
        remaining: inputs.len(),
    }));
    for (index, input) in inputs.iter().enumerate() {
        let on_ok = resolver.clone();
        let on_err = resolver.clone();
        let state = Rc::clone(&state);
        input.attach(
            move |v| on_ok.fulfill(v),
            move |e| {
                let exhausted = {
                    let mut state = state.borrow_mut();
                    state.reasons[index] = Some(e);
                    state.remaining -= 1;
                    if state.remaining == 0 {
                        Some(state.reasons.drain(..).flatten().collect())
                    } else {
                        None
                    }
                };
                if let Some(reasons) = exhausted {
                    on_err.reject(AggregateError::new(reasons));
                }
            },
        );
    }
    winner
}
