//! Settlement and chaining conformance tests.
//!
//! Every scenario builds its values through [`Deferred::new`] on a
//! [`LocalScheduler`], so initializers only run once the scheduler is driven,
//! exactly as they would under a host event loop.
//!
//! # Coverage
//!
//! - Continuation handlers: value delivery, pass-through, chaining, fan-out,
//!   adoption, single settlement, late registration
//! - Failure handlers: reason delivery, pass-through, propagation through
//!   continuations, rejection from adopted values, handler and initializer
//!   failures, recovery

mod common;

use common::*;
use deferred::{
    assert_fulfilled, assert_pending, assert_rejected, test_complete, test_section, Deferred,
    Handler, LocalScheduler, Resolution, Schedule, Task,
};

type D = Deferred<i32, String>;

fn resolved_with(sched: &LocalScheduler, value: i32) -> D {
    D::new(sched, move |resolver| {
        resolver.resolve(value);
        Ok(())
    })
}

fn rejected_with(sched: &LocalScheduler, reason: &'static str) -> D {
    D::new(sched, move |resolver| {
        resolver.reject(reason.to_string());
        Ok(())
    })
}

fn observe(
    log: &Observations,
    tag: &'static str,
) -> impl FnOnce(i32) -> Result<Resolution<i32, String>, String> {
    let log = log.clone();
    move |value| {
        log.push(format!("{tag}:{value}"));
        Ok(Resolution::Value(value))
    }
}

// ============================================================================
// Continuation handlers
// ============================================================================

#[test]
fn resolution_value_reaches_continuation() {
    init_test("resolution_value_reaches_continuation");
    let sched = test_scheduler();
    let log = Observations::new();

    let d = resolved_with(&sched, 9);
    d.then(observe(&log, "then"));
    assert!(log.is_empty(), "handler ran before the initializer");

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["then:9"]);
    test_complete!("resolution_value_reaches_continuation");
}

#[test]
fn pass_through_continuation_forwards_parent_value() {
    init_test("pass_through_continuation_forwards_parent_value");
    let sched = test_scheduler();
    let log = Observations::new();

    let d = resolved_with(&sched, 18);
    let forwarded = d.then_with(Handler::PassThrough);
    forwarded.then(observe(&log, "child"));

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["child:18"]);
    assert_fulfilled!(forwarded, 18);
    test_complete!("pass_through_continuation_forwards_parent_value");
}

#[test]
fn chained_continuations_accumulate_in_order() {
    init_test("chained_continuations_accumulate_in_order");
    let sched = test_scheduler();
    let log = Observations::new();

    let first = log.clone();
    let second = log.clone();
    let third = log.clone();
    let tail = resolved_with(&sched, 9)
        .then(move |v| {
            first.push(format!("a:{v}"));
            Ok(Resolution::Value(v + 1))
        })
        .then(move |v| {
            second.push(format!("b:{v}"));
            Ok(Resolution::Value(v + 2))
        })
        .then(move |v| {
            third.push(format!("c:{v}"));
            Ok(Resolution::Value(v))
        });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["a:9", "b:10", "c:12"]);
    assert_fulfilled!(tail, 12);
    test_complete!("chained_continuations_accumulate_in_order");
}

#[test]
fn multiple_continuations_see_the_same_value() {
    init_test("multiple_continuations_see_the_same_value");
    let sched = test_scheduler();
    let log = Observations::new();

    let d = resolved_with(&sched, 9);
    let branch = log.clone();
    d.then(move |v| {
        branch.push(format!("first:{v}"));
        Ok(Resolution::Value(v + 1))
    })
    .then(observe(&log, "first-child"));
    d.then(observe(&log, "second"));

    sched.run_until_quiescent().unwrap();
    assert_eq!(
        log.snapshot(),
        vec!["first:9", "first-child:10", "second:9"]
    );
    test_complete!("multiple_continuations_see_the_same_value");
}

#[test]
fn continuation_returning_deferred_is_adopted() {
    init_test("continuation_returning_deferred_is_adopted");
    let sched = test_scheduler();
    let log = Observations::new();

    let inner_sched = sched.clone();
    let tail = resolved_with(&sched, 9)
        .then(|v| Ok(Resolution::Value(v + 1)))
        .then(move |v| Ok(resolved_with(&inner_sched, v + 2).into()));
    tail.then(observe(&log, "adopted"));

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["adopted:12"]);
    assert_fulfilled!(tail, 12);
    test_complete!("continuation_returning_deferred_is_adopted");
}

#[test]
fn second_resolution_has_no_effect() {
    init_test("second_resolution_has_no_effect");
    let sched = test_scheduler();
    let log = Observations::new();

    let d = D::new(&sched, |resolver| {
        resolver.resolve(9);
        resolver.resolve(18);
        Ok(())
    });

    // Register again from a later turn, after settlement.
    let later = d.clone();
    let later_log = log.clone();
    let later_sched = sched.clone();
    let first = log.clone();
    d.then(move |v| {
        first.push(format!("first:{v}"));
        later_sched.schedule(Task::new("late-registration", move || {
            later.then(observe(&later_log, "late"));
        }));
        Ok(Resolution::Value(v))
    });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["first:9", "late:9"]);
    assert_fulfilled!(d, 9);
    test_complete!("second_resolution_has_no_effect");
}

#[test]
fn registration_after_settlement_still_runs() {
    init_test("registration_after_settlement_still_runs");
    let sched = test_scheduler();
    let log = Observations::new();

    let d = resolved_with(&sched, 9);
    d.then(observe(&log, "early"));
    sched.run_until_quiescent().unwrap();

    test_section!("late registration");
    let late = d.then(observe(&log, "late"));
    assert_eq!(log.snapshot(), vec!["early:9", "late:9"]);
    assert_fulfilled!(late, 9);
    test_complete!("registration_after_settlement_still_runs");
}

// ============================================================================
// Failure handlers
// ============================================================================

#[test]
fn rejection_reason_reaches_failure_handler() {
    init_test("rejection_reason_reaches_failure_handler");
    let sched = test_scheduler();
    let log = Observations::new();

    let sink = log.clone();
    rejected_with(&sched, "Error").catch(move |reason| {
        sink.push(reason);
        Ok(Resolution::Value(0))
    });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["Error"]);
    test_complete!("rejection_reason_reaches_failure_handler");
}

#[test]
fn pass_through_failure_handler_forwards_reason() {
    init_test("pass_through_failure_handler_forwards_reason");
    let sched = test_scheduler();
    let log = Observations::new();

    let forwarded = rejected_with(&sched, "Error").catch_with(Handler::PassThrough);
    let sink = log.clone();
    forwarded.catch(move |reason| {
        sink.push(reason);
        Ok(Resolution::Value(0))
    });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["Error"]);
    assert_rejected!(forwarded, "Error");
    test_complete!("pass_through_failure_handler_forwards_reason");
}

#[test]
fn rejection_skips_continuations_and_reaches_failure_handler() {
    init_test("rejection_skips_continuations_and_reaches_failure_handler");
    let sched = test_scheduler();
    let log = Observations::new();

    let sink = log.clone();
    rejected_with(&sched, "Something went wrong")
        .then(observe(&log, "skipped"))
        .catch(move |reason| {
            sink.push(reason);
            Ok(Resolution::Value(0))
        });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["Something went wrong"]);
    test_complete!("rejection_skips_continuations_and_reaches_failure_handler");
}

#[test]
fn adopted_rejection_reaches_failure_handler() {
    init_test("adopted_rejection_reaches_failure_handler");
    let sched = test_scheduler();
    let log = Observations::new();

    let inner_sched = sched.clone();
    let seen = log.clone();
    let sink = log.clone();
    resolved_with(&sched, 27)
        .then(move |v| {
            seen.push(format!("then:{v}"));
            Ok(rejected_with(&inner_sched, "Error").into())
        })
        .catch(move |reason| {
            sink.push(reason);
            Ok(Resolution::Value(0))
        });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["then:27", "Error"]);
    test_complete!("adopted_rejection_reaches_failure_handler");
}

#[test]
fn continuation_failure_becomes_rejection() {
    init_test("continuation_failure_becomes_rejection");
    let sched = test_scheduler();
    let log = Observations::new();

    let sink = log.clone();
    let failed = resolved_with(&sched, 0).then(|_| Err("Something went wrong".to_string()));
    failed.catch(move |reason| {
        sink.push(reason);
        Ok(Resolution::Value(0))
    });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["Something went wrong"]);
    assert_rejected!(failed, "Something went wrong");
    test_complete!("continuation_failure_becomes_rejection");
}

#[test]
fn initializer_failure_becomes_rejection() {
    init_test("initializer_failure_becomes_rejection");
    let sched = test_scheduler();
    let log = Observations::new();

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Failure {
        message: String,
    }

    let d: Deferred<&'static str, Failure> = Deferred::new(&sched, |_| {
        Err(Failure {
            message: "Something went wrong".into(),
        })
    });
    let sink = log.clone();
    d.then(|_| Ok(Resolution::Value("There goes nothing!")))
        .catch(move |reason| {
            sink.push(reason.message);
            Ok(Resolution::Value("recovered"))
        });

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["Something went wrong"]);
    assert_rejected!(d);
    test_complete!("initializer_failure_becomes_rejection");
}

#[test]
fn failure_handler_recovers_pipeline() {
    init_test("failure_handler_recovers_pipeline");
    let sched = test_scheduler();
    let log = Observations::new();

    let tail = rejected_with(&sched, "transient")
        .catch(|_| Ok(Resolution::Value(7)))
        .then(observe(&log, "recovered"));

    sched.run_until_quiescent().unwrap();
    assert_eq!(log.snapshot(), vec!["recovered:7"]);
    assert_fulfilled!(tail, 7);
    test_complete!("failure_handler_recovers_pipeline");
}

#[test]
fn late_failure_handler_on_rejected_value_runs() {
    init_test("late_failure_handler_on_rejected_value_runs");
    let sched = test_scheduler();
    let log = Observations::new();

    let d = rejected_with(&sched, "Something went wrong!");
    d.then(observe(&log, "never"));
    sched.run_until_quiescent().unwrap();
    assert!(log.is_empty());

    let sink = log.clone();
    let recovered = d.catch(move |reason| {
        sink.push(reason);
        Ok(Resolution::Value(1))
    });
    assert_eq!(log.snapshot(), vec!["Something went wrong!"]);
    assert_fulfilled!(recovered, 1);
    test_complete!("late_failure_handler_on_rejected_value_runs");
}

#[test]
fn failure_handler_on_fulfilled_value_never_settles() {
    init_test("failure_handler_on_fulfilled_value_never_settles");
    let sched = test_scheduler();

    let d = resolved_with(&sched, 1);
    let caught = d.then(|v| Ok(Resolution::Value(v))).catch(|_| Ok(Resolution::Value(0)));

    sched.run_until_quiescent().unwrap();
    assert_pending!(caught);
    test_complete!("failure_handler_on_fulfilled_value_never_settles");
}

#[test]
fn unsettled_initializer_leaves_value_pending() {
    init_test("unsettled_initializer_leaves_value_pending");
    let sched = test_scheduler();

    let d = D::new(&sched, |_| Ok(()));
    let tail = d.then(|v| Ok(Resolution::Value(v)));

    assert_eq!(sched.run_until_quiescent().unwrap(), 1);
    assert_pending!(d);
    assert_pending!(tail);
    test_complete!("unsettled_initializer_leaves_value_pending");
}

#[test]
fn shared_scheduler_matches_library_test_limit() {
    init_test("shared_scheduler_matches_library_test_limit");
    let sched = test_scheduler();
    assert_eq!(
        sched.config().max_steps,
        Some(deferred::test_utils::DEFAULT_TEST_MAX_STEPS)
    );
    test_complete!("shared_scheduler_matches_library_test_limit");
}
