//! Core types shared by deferreds, combinators and the task queue.
//!
//! - [`id`]: `DeferredId`
//! - [`state`]: `State` and `Settled`

pub mod id;
pub mod state;

pub use id::DeferredId;
pub use state::{Settled, State};
