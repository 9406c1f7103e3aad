//! Join combinators: wait for every input.
//!
//! # Semantics
//!
//! `all(inputs)`:
//! 1. Attach one observer to every input
//! 2. Store each value in the slot of its input index
//! 3. Fulfill with all values once the last slot fills
//!
//! The first rejection rejects the result immediately. Later settlements of
//! the other inputs are still observed but have no effect: the inputs are not
//! cancelled, their results are simply discarded.
//!
//! `all_settled(inputs)` never rejects. It reports every outcome in input
//! order once the last input settles.
//!
//! Result order is input order, never completion order.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::deferred::{Deferred, Resolver};
use crate::runtime::Scheduler;
use crate::types::Settled;

/// Slots filled in completion order, read out in input order.
struct JoinSlots<V> {
    slots: Vec<Option<V>>,
    remaining: usize,
}

impl<V> JoinSlots<V> {
    fn new(len: usize) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            slots: (0..len).map(|_| None).collect(),
            remaining: len,
        }))
    }

    /// Fills `index`; returns every value once the last slot is filled.
    fn fill(&mut self, index: usize, value: V) -> Option<Vec<V>> {
        if self.slots[index].replace(value).is_none() {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            Some(self.slots.drain(..).flatten().collect())
        } else {
            None
        }
    }
}

/// Fulfills with every input value in input order, or rejects with the
/// first rejection.
///
/// An empty input fulfills immediately with an empty vector.
///
/// # Example
///
/// ```
/// use deferred::combinator::{all, resolved};
/// use deferred::runtime::TaskQueue;
///
/// let queue = TaskQueue::new();
/// let s = queue.scheduler();
/// let joined = all(&s, vec![resolved::<_, ()>(&s, 1), resolved(&s, 2)]);
/// queue.run_until_idle().unwrap();
/// assert_eq!(joined.value(), Some(vec![1, 2]));
/// ```
pub fn all<T, E, I>(scheduler: &Scheduler, inputs: I) -> Deferred<Vec<T>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Deferred<T, E>>,
{
    let inputs: Vec<Deferred<T, E>> = inputs.into_iter().collect();
    let (joined, resolver) = Deferred::pending(scheduler);
    debug!(joined = %joined.id(), inputs = inputs.len(), "all: waiting");
    if inputs.is_empty() {
        resolver.fulfill(Vec::new());
        return joined;
    }

    let slots = JoinSlots::new(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let slots = Rc::clone(&slots);
        let on_ok: Resolver<Vec<T>, E> = resolver.clone();
        let on_err = resolver.clone();
        input.attach(
            move |v| {
                let done = slots.borrow_mut().fill(index, v);
                if let Some(values) = done {
                    on_ok.fulfill(values);
                }
            },
            move |e| on_err.reject(e),
        );
    }
    joined
}

/// Fulfills with every input outcome in input order once all inputs settle.
///
/// Never rejects. An empty input fulfills immediately with an empty vector.
pub fn all_settled<T, E, I>(scheduler: &Scheduler, inputs: I) -> Deferred<Vec<Settled<T, E>>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Deferred<T, E>>,
{
    let inputs: Vec<Deferred<T, E>> = inputs.into_iter().collect();
    let (joined, resolver) = Deferred::pending(scheduler);
    debug!(joined = %joined.id(), inputs = inputs.len(), "all_settled: waiting");
    if inputs.is_empty() {
        resolver.fulfill(Vec::new());
        return joined;
    }

    let slots = JoinSlots::new(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let ok_slots = Rc::clone(&slots);
        let err_slots = Rc::clone(&slots);
        let on_ok = resolver.clone();
        let on_err = resolver.clone();
        input.attach(
            move |v| {
                let done = ok_slots.borrow_mut().fill(index, Settled::Fulfilled(v));
                if let Some(outcomes) = done {
                    on_ok.fulfill(outcomes);
                }
            },
            move |e| {
                let done = err_slots.borrow_mut().fill(index, Settled::Rejected(e));
                if let Some(outcomes) = done {
                    on_err.fulfill(outcomes);
                }
            },
        );
    }
    joined
}
