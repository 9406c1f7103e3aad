//! Deterministic FIFO task queue.
//!
//! [`TaskQueue`] is the reference [`Schedule`] implementation. Tasks are run
//! strictly in the order they were scheduled, one at a time, on the calling
//! thread. Nothing runs until the host calls [`TaskQueue::run_one`] or
//! [`TaskQueue::run_until_idle`], which makes every interleaving in a test
//! reproducible.

use core::fmt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use super::config::QueueConfig;
use super::scheduler::{Schedule, Scheduler, Task};
use crate::error::{Error, Result};

#[derive(Default)]
struct QueueShared {
    tasks: RefCell<VecDeque<Task>>,
    total_enqueued: Cell<u64>,
    total_run: Cell<u64>,
    running: Cell<bool>,
}

impl Schedule for QueueShared {
    fn schedule(&self, task: Task) {
        let pending = {
            let mut tasks = self.tasks.borrow_mut();
            tasks.push_back(task);
            tasks.len()
        };
        self.total_enqueued.set(self.total_enqueued.get() + 1);
        trace!(pending, "task scheduled");
    }
}

/// Clears the running flag even if a task unwinds.
struct RunningGuard<'a>(&'a Cell<bool>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A single-threaded FIFO queue of deferred tasks.
///
/// # Example
///
/// ```
/// use deferred::runtime::TaskQueue;
/// use deferred::Deferred;
///
/// let queue = TaskQueue::new();
/// let d: Deferred<i32, String> = Deferred::new(&queue.scheduler(), |resolver| {
///     resolver.fulfill(1);
///     Ok(())
/// });
/// let doubled = d.map(|v| v * 2);
/// assert!(doubled.is_pending());
/// queue.run_until_idle().unwrap();
/// assert_eq!(doubled.value(), Some(2));
/// ```
pub struct TaskQueue {
    shared: Rc<QueueShared>,
    config: QueueConfig,
}

impl TaskQueue {
    /// Creates a queue with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates a queue with the given configuration.
    #[must_use]
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            shared: Rc::new(QueueShared::default()),
            config,
        }
    }

    /// Returns the queue configuration.
    #[must_use]
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Returns a scheduler handle feeding this queue.
    #[must_use]
    pub fn scheduler(&self) -> Scheduler {
        let shared: Rc<dyn Schedule> = self.shared.clone();
        Scheduler::from_rc(shared)
    }

    /// Runs the oldest queued task, if any.
    ///
    /// Returns false if the queue was empty. The queue is not borrowed while
    /// the task runs, so the task may schedule more work.
    pub fn run_one(&self) -> bool {
        let next = self.shared.tasks.borrow_mut().pop_front();
        match next {
            Some(task) => {
                task();
                self.shared.total_run.set(self.shared.total_run.get() + 1);
                true
            }
            None => false,
        }
    }

    /// Runs tasks until the queue is empty, including tasks scheduled by
    /// tasks run during this call.
    ///
    /// Returns the number of tasks run. Fails with
    /// [`ErrorKind::StepLimitExceeded`](crate::error::ErrorKind::StepLimitExceeded)
    /// once `max_steps` tasks have run and work remains, leaving the rest
    /// queued, and with
    /// [`ErrorKind::Reentrant`](crate::error::ErrorKind::Reentrant) if called
    /// from inside one of this queue's own tasks.
    ///
    /// The default budget is finite. Hosts that drive long chains either
    /// build the queue with [`QueueConfig::no_step_limit`] or keep calling
    /// while the error [`is_resumable`](Error::is_resumable):
    ///
    /// ```
    /// use deferred::runtime::{QueueConfig, TaskQueue};
    ///
    /// let queue = TaskQueue::with_config(QueueConfig::new().max_steps(2));
    /// for _ in 0..5 {
    ///     queue.scheduler().schedule_fn(|| {});
    /// }
    /// loop {
    ///     match queue.run_until_idle() {
    ///         Ok(_) => break,
    ///         Err(e) if e.is_resumable() => continue,
    ///         Err(e) => panic!("{e}"),
    ///     }
    /// }
    /// assert_eq!(queue.total_run(), 5);
    /// ```
    pub fn run_until_idle(&self) -> Result<u64> {
        if self.shared.running.replace(true) {
            return Err(Error::reentrant());
        }
        let _guard = RunningGuard(&self.shared.running);

        let mut ran: u64 = 0;
        loop {
            if let Some(limit) = self.config.max_steps {
                if ran >= limit && !self.is_idle() {
                    let still_queued = self.pending_count();
                    warn!(limit, still_queued, "task queue step limit exceeded");
                    return Err(Error::step_limit_exceeded(limit, still_queued));
                }
            }
            if !self.run_one() {
                break;
            }
            ran += 1;
        }
        debug!(ran, total_run = self.total_run(), "task queue idle");
        Ok(ran)
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.tasks.borrow().len()
    }

    /// Returns true if no task is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.shared.tasks.borrow().is_empty()
    }

    /// Returns the number of tasks ever scheduled on this queue.
    #[must_use]
    pub fn total_enqueued(&self) -> u64 {
        self.shared.total_enqueued.get()
    }

    /// Returns the number of tasks this queue has run.
    #[must_use]
    pub fn total_run(&self) -> u64 {
        self.shared.total_run.get()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending_count())
            .field("total_enqueued", &self.total_enqueued())
            .field("total_run", &self.total_run())
            .field("config", &self.config)
            .finish()
    }
}
