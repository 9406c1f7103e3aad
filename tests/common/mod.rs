#![allow(dead_code)]
#![allow(unused_imports)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```
//! mod common;
//! use common::*;
//! ```

use deferred::runtime::{QueueConfig, TaskQueue};
use deferred::Deferred;
use proptest::prelude::ProptestConfig;
use proptest::test_runner::RngSeed;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use tracing_subscriber::fmt::format::FmtSpan;

static INIT_LOGGING: Once = Once::new();

/// Step budget for integration test queues.
pub const TEST_MAX_STEPS: u64 = 10_000;
/// Default seed for property tests when running under CI.
pub const DEFAULT_PROPTEST_SEED: u64 = 0x5EED_5EED;

const PROPTEST_SEED_ENV: &str = "DEFERRED_PROPTEST_SEED";
const PROPTEST_MAX_SHRINK_ITERS_ENV: &str = "DEFERRED_PROPTEST_MAX_SHRINK_ITERS";

/// Configuration for property tests with optional deterministic seed support.
#[derive(Debug, Clone)]
pub struct PropertyTestConfig {
    /// Fixed seed for reproducibility (overrides CI default when set).
    pub seed: Option<u64>,
    /// Number of successful cases required.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl PropertyTestConfig {
    /// Build a config with defaults for property tests.
    #[must_use]
    pub fn new(cases: u32) -> Self {
        Self {
            seed: read_proptest_seed(),
            cases,
            max_shrink_iters: read_max_shrink_iters()
                .unwrap_or(ProptestConfig::default().max_shrink_iters),
        }
    }

    /// Convert into a ProptestConfig, applying deterministic seed rules.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        let mut config = ProptestConfig::with_cases(self.cases);

        // Honor existing PROPTEST_RNG_SEED, otherwise apply our own.
        if matches!(config.rng_seed, RngSeed::Random) {
            if let Some(seed) = self.seed {
                config.rng_seed = RngSeed::Fixed(seed);
            }
        }

        config.max_shrink_iters = self.max_shrink_iters;
        config
    }
}

/// Build a ProptestConfig with deterministic seed support for CI.
#[must_use]
pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    PropertyTestConfig::new(cases).to_proptest_config()
}

fn read_proptest_seed() -> Option<u64> {
    if let Ok(value) = std::env::var(PROPTEST_SEED_ENV) {
        return value.parse::<u64>().ok();
    }

    // If CI is set and no explicit seed is provided, use a fixed seed.
    if std::env::var("CI").is_ok() {
        return Some(DEFAULT_PROPTEST_SEED);
    }

    None
}

fn read_max_shrink_iters() -> Option<u32> {
    std::env::var(PROPTEST_MAX_SHRINK_ITERS_ENV)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
}

/// Initialize test logging with trace-level output.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level.
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

/// Create a task queue with the test step budget.
#[must_use]
pub fn test_queue() -> TaskQueue {
    TaskQueue::with_config(QueueConfig::new().max_steps(TEST_MAX_STEPS))
}

/// Run every queued task, panicking if the step budget runs out.
pub fn flush(queue: &TaskQueue) -> u64 {
    let ran = queue
        .run_until_idle()
        .unwrap_or_else(|e| panic!("task queue did not drain: {e}"));
    tracing::debug!(ran, "flushed");
    ran
}

/// Shared, append-only event log for ordering assertions.
#[derive(Debug, Clone)]
pub struct EventLog<T> {
    events: Rc<RefCell<Vec<T>>>,
}

impl<T: Clone> EventLog<T> {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Appends an event.
    pub fn push(&self, event: T) {
        self.events.borrow_mut().push(event);
    }

    /// Returns a copy of every event so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.events.borrow().clone()
    }

    /// Returns true if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// Log a test phase transition with a visual separator.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(phase = %$name, "========================================");
    };
}

/// Assert a deferred is fulfilled with the expected value.
#[macro_export]
macro_rules! assert_fulfilled {
    ($deferred:expr, $expected:expr) => {
        match $deferred.state() {
            deferred::State::Fulfilled(v) => assert_eq!(v, $expected),
            other => panic!("expected fulfilled deferred, got {other:?}"),
        }
    };
}

/// Assert a deferred is rejected with the expected reason.
#[macro_export]
macro_rules! assert_rejected {
    ($deferred:expr, $expected:expr) => {
        match $deferred.state() {
            deferred::State::Rejected(e) => assert_eq!(e, $expected),
            other => panic!("expected rejected deferred, got {other:?}"),
        }
    };
}

/// Returns a deferred that never settles.
///
/// The resolver is dropped; a deferred without a resolver or adoption
/// source stays pending forever.
pub fn never<T, E>(queue: &TaskQueue) -> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (d, _resolver) = Deferred::pending(&queue.scheduler());
    d
}
