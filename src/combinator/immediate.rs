//! Already-settled deferreds.

use crate::deferred::Deferred;
use crate::runtime::Scheduler;

/// Returns a deferred already fulfilled with `value`.
pub fn resolved<T, E>(scheduler: &Scheduler, value: T) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (deferred, resolver) = Deferred::pending(scheduler);
    resolver.fulfill(value);
    deferred
}

/// Returns a deferred already rejected with `reason`, stored as given.
pub fn rejected<T, E>(scheduler: &Scheduler, reason: E) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (deferred, resolver) = Deferred::pending(scheduler);
    resolver.reject(reason);
    deferred
}

/// Returns a fresh deferred that adopts `source`.
///
/// This is `resolved` for an argument that is itself a deferred: the result
/// settles with `source`'s value or reason, never with `source` as a value.
pub fn resolved_from<T, E>(source: &Deferred<T, E>) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (deferred, resolver) = Deferred::pending(source.scheduler());
    resolver.adopt(source.clone());
    deferred
}
