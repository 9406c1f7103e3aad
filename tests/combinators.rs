//! Combinator tests: `all`, `race`, `all_settled`, `any`.

#[macro_use]
mod common;

use common::{flush, init_test_logging, never, test_queue, EventLog};
use deferred::{
    all, all_settled, any, race, rejected, resolved, AggregateError, Deferred, Settled, Step,
};

type D = Deferred<i32, String>;

#[test]
fn all_fulfills_with_values_in_input_order() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let (a, ra) = D::pending(&s);
    let (b, rb) = D::pending(&s);
    let (c, rc) = D::pending(&s);
    let joined = all(&s, vec![a, b, c]);

    test_phase!("settle in reverse order");
    rc.fulfill(3);
    flush(&queue);
    rb.fulfill(2);
    flush(&queue);
    assert!(joined.is_pending());
    ra.fulfill(1);
    flush(&queue);
    assert_fulfilled!(joined, vec![1, 2, 3]);
}

#[test]
fn all_of_resolved_inputs() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let joined = all(&s, (1..=3).map(|v| resolved::<i32, String>(&s, v)));
    flush(&queue);
    assert_fulfilled!(joined, vec![1, 2, 3]);
}

#[test]
fn all_rejects_with_first_rejection() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let (late, late_resolver) = D::pending(&s);
    let joined = all(
        &s,
        vec![
            resolved(&s, 1),
            rejected(&s, "x".to_string()),
            late,
        ],
    );
    flush(&queue);
    assert_rejected!(joined, "x".to_string());

    late_resolver.reject("y".to_string());
    flush(&queue);
    assert_rejected!(joined, "x".to_string());
}

#[test]
fn all_of_nothing_fulfills_with_empty_vec() {
    init_test_logging();
    let queue = test_queue();
    let joined = all(&queue.scheduler(), Vec::<D>::new());
    flush(&queue);
    assert_fulfilled!(joined, Vec::<i32>::new());
}

#[test]
fn all_output_can_be_chained() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let total = all(&s, vec![resolved::<i32, String>(&s, 20), resolved(&s, 22)])
        .map(|values| values.iter().sum::<i32>());
    flush(&queue);
    assert_fulfilled!(total, 42);
}

#[test]
fn race_takes_the_first_settlement() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let winner = race(&s, vec![never::<i32, String>(&queue), resolved(&s, 5)]);
    flush(&queue);
    assert_fulfilled!(winner, 5);
}

#[test]
fn race_ignores_losers() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let (first, first_resolver) = D::pending(&s);
    let (second, second_resolver) = D::pending(&s);
    let winner = race(&s, vec![first, second]);

    second_resolver.reject("second".to_string());
    first_resolver.fulfill(1);
    flush(&queue);
    assert_rejected!(winner, "second".to_string());
}

#[test]
fn race_of_nothing_stays_pending() {
    init_test_logging();
    let queue = test_queue();
    let winner = race(&queue.scheduler(), Vec::<D>::new());
    flush(&queue);
    assert!(winner.is_pending());
    assert!(queue.is_idle());
}

#[test]
fn all_settled_reports_every_outcome() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let outcomes = all_settled(
        &s,
        vec![
            resolved(&s, 1),
            rejected(&s, "no".to_string()),
            resolved(&s, 3),
        ],
    );
    flush(&queue);
    assert_fulfilled!(
        outcomes,
        vec![
            Settled::Fulfilled(1),
            Settled::Rejected("no".to_string()),
            Settled::Fulfilled(3),
        ]
    );
}

#[test]
fn all_settled_waits_for_the_slowest() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let (slow, slow_resolver) = D::pending(&s);
    let outcomes = all_settled(&s, vec![rejected(&s, "fast".to_string()), slow]);
    flush(&queue);
    assert!(outcomes.is_pending());

    slow_resolver.fulfill(9);
    flush(&queue);
    let values: Vec<Result<i32, String>> = outcomes
        .value()
        .expect("all_settled fulfilled")
        .into_iter()
        .map(Settled::into_result)
        .collect();
    assert_eq!(values, vec![Err("fast".to_string()), Ok(9)]);
}

#[test]
fn any_takes_first_fulfillment() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let first = any(
        &s,
        vec![
            rejected(&s, "a".to_string()),
            resolved(&s, 2),
            resolved(&s, 3),
        ],
    );
    flush(&queue);
    assert_fulfilled!(first, 2);
}

#[test]
fn any_aggregates_reasons_in_input_order() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let (a, ra) = D::pending(&s);
    let (b, rb) = D::pending(&s);
    let first = any(&s, vec![a, b]);

    rb.reject("b".to_string());
    ra.reject("a".to_string());
    flush(&queue);

    let reason = first.reason().expect("any rejected");
    assert_eq!(reason.errors, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(reason.to_string(), "all 2 inputs rejected");
}

#[test]
fn any_of_nothing_rejects_empty() {
    init_test_logging();
    let queue = test_queue();
    let first = any(&queue.scheduler(), Vec::<D>::new());
    flush(&queue);
    assert_rejected!(first, AggregateError::new(Vec::<String>::new()));
}

#[test]
fn combinators_compose_with_chaining() {
    init_test_logging();
    let queue = test_queue();
    let s = queue.scheduler();
    let log = EventLog::new();

    let inner_s = s.clone();
    let l = log.clone();
    let result = race(&s, vec![never::<i32, String>(&queue), resolved(&s, 1)])
        .and_then(move |v| {
            l.push(format!("race won with {v}"));
            Step::from(all(&inner_s, vec![resolved(&inner_s, v), resolved(&inner_s, v + 1)]))
        })
        .map(|values| values.len());

    flush(&queue);
    assert_fulfilled!(result, 2);
    assert_eq!(log.snapshot(), vec!["race won with 1".to_string()]);
}
