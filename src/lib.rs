//! Deferred: single-threaded deferred results with deterministic scheduling.
//!
//! # Overview
//!
//! A [`Deferred<T, E>`] stands for the eventual outcome of a computation. It
//! starts pending and settles exactly once, fulfilled with a `T` or rejected
//! with an `E`. Observers and chained handlers never run inline: every
//! callback goes through an injected [`Scheduler`] and runs after the current
//! synchronous turn, in FIFO order.
//!
//! # Core Guarantees
//!
//! - **Exactly-once settlement**: the first `fulfill`/`reject`/`adopt` wins,
//!   everything after it is a no-op
//! - **Deterministic ordering**: observers of one deferred run in
//!   registration order; tasks run in queue order
//! - **Transparent rejection**: a reason travels unchanged down a chain until
//!   a link handles it
//! - **Flattening**: a handler returning a deferred (or any [`Thenable`])
//!   makes the dependent deferred follow it instead of holding it as a value
//!
//! # Module Structure
//!
//! - [`deferred`]: the state machine, [`Resolver`], chaining and [`Step`]
//! - [`combinator`]: `resolved`, `rejected`, `all`, `race` and companions
//! - [`runtime`]: the [`Schedule`] capability and the deterministic
//!   [`TaskQueue`]
//! - [`types`]: ids and state types
//! - [`error`]: task queue errors and [`AggregateError`]
//!
//! # Example
//!
//! ```
//! use deferred::combinator::{all, resolved};
//! use deferred::runtime::TaskQueue;
//! use deferred::{Deferred, Step};
//!
//! let queue = TaskQueue::new();
//! let s = queue.scheduler();
//!
//! let d: Deferred<i32, String> = Deferred::new(&s, |resolver| {
//!     resolver.fulfill(1);
//!     Ok(())
//! });
//! let chained = d
//!     .and_then(|v| Step::Value(v + 1))
//!     .and_then(|_| Step::Raise("boom".to_string()))
//!     .forward()
//!     .catch(|reason| Step::Value(reason.len() as i32));
//! let joined = all(&s, vec![chained, resolved(&s, 10)]);
//!
//! queue.run_until_idle().unwrap();
//! assert_eq!(joined.value(), Some(vec![4, 10]));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod combinator;
pub mod deferred;
pub mod error;
pub mod runtime;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use combinator::{all, all_settled, any, race, rejected, resolved, resolved_from};
pub use deferred::{Deferred, Resolver, Step, Thenable};
pub use error::{AggregateError, Error, ErrorKind, Result};
pub use runtime::{QueueConfig, Schedule, Scheduler, TaskQueue};
pub use types::{DeferredId, Settled, State};
