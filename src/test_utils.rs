//! Test utilities for unit tests.
//!
//! - Consistent tracing-based logging initialization
//! - Environment lock for tests that touch `DEFERRED_*` variables
//! - Task queue constructors and a flush helper

use crate::runtime::{QueueConfig, TaskQueue};
use std::sync::{Mutex, Once};
use tracing_subscriber::fmt::format::FmtSpan;

static INIT_LOGGING: Once = Once::new();
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Step budget used by test queues.
pub const TEST_MAX_STEPS: u64 = 10_000;

/// Initialize test logging with trace-level output.
///
/// Safe to call multiple times; only initializes once.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level.
///
/// The first call wins; later calls are no-ops.
pub fn init_test_logging_with_level(level: tracing::Level) {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)
            .try_init();
    });
}

/// Acquire the global environment lock for tests that mutate env vars.
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Create a task queue with the test step budget.
#[must_use]
pub fn test_queue() -> TaskQueue {
    TaskQueue::with_config(QueueConfig::new().max_steps(TEST_MAX_STEPS))
}

/// Run every queued task, panicking if the step budget runs out.
pub fn flush(queue: &TaskQueue) -> u64 {
    queue
        .run_until_idle()
        .unwrap_or_else(|e| panic!("task queue did not drain: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_drains_queue() {
        init_test_logging();
        let queue = test_queue();
        queue.scheduler().schedule_fn(|| {});
        assert_eq!(flush(&queue), 1);
        assert!(queue.is_idle());
    }
}
