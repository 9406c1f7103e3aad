//! Settlement state of a deferred.
//!
//! A deferred is in exactly one of three states:
//!
//! - `Pending`: no outcome yet
//! - `Fulfilled(T)`: settled with a success value
//! - `Rejected(E)`: settled with a rejection reason
//!
//! The only legal transitions are `Pending → Fulfilled` and
//! `Pending → Rejected`. [`Settled`] is the two-valued view of a
//! deferred that has left `Pending`.

use core::fmt;

/// The state of a deferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State<T, E> {
    /// Not settled yet.
    Pending,
    /// Settled with a success value.
    Fulfilled(T),
    /// Settled with a rejection reason.
    Rejected(E),
}

impl<T, E> State<T, E> {
    /// Returns true if this is `Pending`.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if this is `Fulfilled` or `Rejected`.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Returns true if this is `Fulfilled`.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    /// Returns true if this is `Rejected`.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Converts into the settled view, or `None` while pending.
    #[must_use]
    pub fn into_settled(self) -> Option<Settled<T, E>> {
        match self {
            Self::Pending => None,
            Self::Fulfilled(v) => Some(Settled::Fulfilled(v)),
            Self::Rejected(e) => Some(Settled::Rejected(e)),
        }
    }
}

impl<T, E> fmt::Display for State<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Fulfilled(_) => write!(f, "fulfilled"),
            Self::Rejected(_) => write!(f, "rejected"),
        }
    }
}

/// The outcome of a settled deferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T, E> {
    /// Success value.
    Fulfilled(T),
    /// Rejection reason.
    Rejected(E),
}

impl<T, E> Settled<T, E> {
    /// Returns true if this is `Fulfilled`.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    /// Returns true if this is `Rejected`.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Converts to a standard `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Fulfilled(v) => Ok(v),
            Self::Rejected(e) => Err(e),
        }
    }

    /// Maps the success value using the provided function.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Settled<U, E> {
        match self {
            Self::Fulfilled(v) => Settled::Fulfilled(f(v)),
            Self::Rejected(e) => Settled::Rejected(e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Self::Fulfilled(v),
            Err(e) => Self::Rejected(e),
        }
    }
}

impl<T, E> From<Settled<T, E>> for State<T, E> {
    fn from(settled: Settled<T, E>) -> Self {
        match settled {
            Settled::Fulfilled(v) => Self::Fulfilled(v),
            Settled::Rejected(e) => Self::Rejected(e),
        }
    }
}
