//! The deferral capability.
//!
//! Deferreds never run observers inline. Every settlement callback is handed
//! to a [`Schedule`] implementation, which must run it after the current
//! synchronous turn has finished, in FIFO order among tasks scheduled during
//! the same turn. [`Scheduler`] is the cloneable handle every deferred
//! carries to reach that capability.

use core::fmt;
use std::rc::Rc;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Something that can run tasks later.
///
/// # Contract
///
/// - `schedule` must not run `task` before returning.
/// - Tasks scheduled in the same synchronous turn run in the order they were
///   scheduled.
///
/// [`TaskQueue`](super::TaskQueue) is the deterministic implementation used
/// by tests and single-threaded hosts. A host event loop can implement this
/// trait to feed its own microtask queue.
pub trait Schedule {
    /// Queues `task` to run after the current synchronous turn.
    fn schedule(&self, task: Task);
}

/// Cloneable handle to a [`Schedule`] implementation.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<dyn Schedule>,
}

impl Scheduler {
    /// Wraps a scheduler implementation.
    #[must_use]
    pub fn new<S: Schedule + 'static>(schedule: S) -> Self {
        Self {
            inner: Rc::new(schedule),
        }
    }

    /// Wraps an already shared scheduler implementation.
    #[must_use]
    pub fn from_rc(inner: Rc<dyn Schedule>) -> Self {
        Self { inner }
    }

    /// Queues a boxed task.
    pub fn schedule(&self, task: Task) {
        self.inner.schedule(task);
    }

    /// Queues a closure.
    pub fn schedule_fn<F>(&self, f: F)
    where
        F: FnOnce() + 'static,
    {
        self.inner.schedule(Box::new(f));
    }

    /// Returns true if both handles reach the same implementation.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.inner).cast::<u8>(),
            Rc::as_ptr(&other.inner).cast::<u8>(),
        )
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("ptr", &Rc::as_ptr(&self.inner).cast::<u8>())
            .finish()
    }
}
