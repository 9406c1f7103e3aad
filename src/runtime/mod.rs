//! Task scheduling for deferred callbacks.
//!
//! - [`scheduler`]: the [`Schedule`] capability and the [`Scheduler`] handle
//! - [`queue`]: deterministic FIFO [`TaskQueue`]
//! - [`config`]: [`QueueConfig`]
//! - [`env_config`]: `DEFERRED_*` environment overrides
//!
//! Deferreds only require "run this later, after the current synchronous
//! turn, in FIFO order". Hosts with their own event loop implement
//! [`Schedule`]; everyone else, including every test in this crate, drives a
//! [`TaskQueue`] by hand.

pub mod config;
pub mod env_config;
pub mod queue;
pub mod scheduler;

pub use config::QueueConfig;
pub use queue::TaskQueue;
pub use scheduler::{Schedule, Scheduler, Task};
