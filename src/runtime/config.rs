//! Configuration for the task queue.
//!
//! The queue configuration controls how a flush behaves:
//! - Step budget per `run_until_idle` call
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `max_steps` | `Some(100_000)` |

/// Default step budget for a single flush.
pub const DEFAULT_MAX_STEPS: u64 = 100_000;

/// Configuration for a [`TaskQueue`](super::TaskQueue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of tasks a single flush may run.
    ///
    /// `None` disables the limit. A handler that keeps returning fresh
    /// pending deferreds can otherwise keep a flush busy forever.
    pub max_steps: Option<u64>,
}

impl QueueConfig {
    /// Creates a configuration with the default step budget.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_steps: Some(DEFAULT_MAX_STEPS),
        }
    }

    /// Sets the maximum number of steps.
    #[must_use]
    pub const fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Disables the step limit.
    #[must_use]
    pub const fn no_step_limit(mut self) -> Self {
        self.max_steps = None;
        self
    }

    /// Creates a configuration from defaults plus environment overrides.
    ///
    /// See [`env_config`](super::env_config) for the recognized variables.
    pub fn from_env() -> crate::error::Result<Self> {
        let mut config = Self::new();
        super::env_config::apply_env_overrides(&mut config)?;
        Ok(config)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new()
    }
}
