//! Error types for the deferred crate.
//!
//! Two very different things can go wrong, and they are kept apart:
//!
//! - **Rejections** belong to the caller. A deferred is rejected with the
//!   caller's own reason type `E`, which this crate never inspects,
//!   restructures or wraps. Rejections travel through chains as values.
//! - **Queue failures** belong to the host driving the [`TaskQueue`]. They
//!   are reported as [`Error`] from the queue's run methods and never reach
//!   a deferred.
//!
//! [`AggregateError`] is the one place where the crate builds a reason of its
//! own: [`any`] rejects with every input reason when no input fulfills.
//!
//! [`TaskQueue`]: crate::runtime::TaskQueue
//! [`any`]: crate::combinator::any

use core::fmt;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A flush ran out of its step budget with tasks still queued.
    StepLimitExceeded,
    /// A flush was requested from inside a task run by the same queue.
    Reentrant,
    /// A configuration value could not be parsed.
    InvalidConfig,
}

impl ErrorKind {
    /// Returns true if retrying the same call later can succeed.
    ///
    /// A step-limited flush leaves the remaining tasks queued, so another
    /// flush picks up where the last one stopped.
    #[must_use]
    pub const fn is_resumable(&self) -> bool {
        matches!(self, Self::StepLimitExceeded)
    }
}

/// The main error type for task queue operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Adds a message description to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if this error is a step-limit exhaustion.
    #[must_use]
    pub const fn is_step_limit(&self) -> bool {
        matches!(self.kind, ErrorKind::StepLimitExceeded)
    }

    /// Returns true if retrying the call later can succeed.
    #[must_use]
    pub const fn is_resumable(&self) -> bool {
        self.kind.is_resumable()
    }

    /// Creates a step limit error.
    #[must_use]
    pub fn step_limit_exceeded(limit: u64, still_queued: usize) -> Self {
        Self::new(ErrorKind::StepLimitExceeded).with_message(format!(
            "ran {limit} tasks, {still_queued} still queued"
        ))
    }

    /// Creates a reentrant flush error.
    #[must_use]
    pub fn reentrant() -> Self {
        Self::new(ErrorKind::Reentrant).with_message("queue is already running")
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig).with_message(detail)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// Rejection reason produced by [`any`](crate::combinator::any) when every
/// input rejects.
///
/// Reasons are kept in input order, not settlement order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("all {} inputs rejected", .errors.len())]
pub struct AggregateError<E> {
    /// Input reasons, in input order.
    pub errors: Vec<E>,
}

impl<E> AggregateError<E> {
    /// Creates an aggregate from reasons already in input order.
    #[must_use]
    pub const fn new(errors: Vec<E>) -> Self {
        Self { errors }
    }

    /// Returns the number of aggregated reasons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there were no inputs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A specialized Result type for task queue operations.
pub type Result<T> = core::result::Result<T, Error>;
