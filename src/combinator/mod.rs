//! Combinators over deferreds.
//!
//! All combinators are plain functions built on [`Deferred::attach`] and
//! [`Resolver`]; none of them needs access to deferred internals.
//!
//! - [`immediate`]: [`resolved`], [`rejected`], [`resolved_from`]
//! - [`join`]: [`all`], [`all_settled`]
//! - [`race`](mod@race): [`race()`], [`any`]
//!
//! [`Deferred::attach`]: crate::Deferred::attach
//! [`Resolver`]: crate::Resolver

pub mod immediate;
pub mod join;
pub mod race;

pub use immediate::{rejected, resolved, resolved_from};
pub use join::{all, all_settled};
pub use race::{any, race};
