//! End-to-end scenarios: build, evaluate, trace and render conditions

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use verity::config::Config;
use verity::diagnostics::{Cause, ChainTermination, Formatter};
use verity::expr::{Disposition, Evaluation, Evaluator, Expression, Rationale, Subject};

fn results(evaluation: &Evaluation) -> Vec<Disposition> {
    evaluation.children().iter().map(Evaluation::disposition).collect()
}

#[test]
fn test_and_of_tautology_contradiction_tautology() {
    let expr = Expression::all([Expression::tautology(), Expression::contradiction(), Expression::tautology()]);
    let evaluation = Evaluator::default().evaluate(&expr).unwrap();

    assert_eq!(evaluation.disposition(), Disposition::False);
    assert_eq!(results(&evaluation), vec![Disposition::True, Disposition::False, Disposition::Skipped]);
}

#[test]
fn test_or_of_tautology_contradiction_tautology() {
    let expr = Expression::any([Expression::tautology(), Expression::contradiction(), Expression::tautology()]);
    let evaluation = Evaluator::default().evaluate(&expr).unwrap();

    assert_eq!(evaluation.disposition(), Disposition::True);
    assert_eq!(results(&evaluation), vec![Disposition::True, Disposition::Skipped, Disposition::Skipped]);
}

#[test]
fn test_conjunction_truth_table() {
    let evaluator = Evaluator::default();
    for mask in 0_u32..16 {
        let values: Vec<bool> = (0..4).map(|bit| mask & (1 << bit) != 0).collect();
        let expr = Expression::all(values.iter().map(|&v| Expression::terminal("v", move || v)));
        let evaluation = evaluator.evaluate(&expr).unwrap();

        assert_eq!(evaluation.disposition().is_true(), values.iter().all(|&v| v), "mask {mask:04b}");

        let first_false = values.iter().position(|&v| !v);
        for (index, disposition) in results(&evaluation).into_iter().enumerate() {
            match first_false {
                Some(stop) if index > stop => assert_eq!(disposition, Disposition::Skipped),
                _ => assert_eq!(disposition, Disposition::from(values[index])),
            }
        }
    }
}

#[test]
fn test_disjunction_truth_table() {
    let evaluator = Evaluator::default();
    for mask in 0_u32..16 {
        let values: Vec<bool> = (0..4).map(|bit| mask & (1 << bit) != 0).collect();
        let expr = Expression::any(values.iter().map(|&v| Expression::terminal("v", move || v)));
        let evaluation = evaluator.evaluate(&expr).unwrap();

        assert_eq!(evaluation.disposition().is_true(), values.iter().any(|&v| v), "mask {mask:04b}");

        let first_true = values.iter().position(|&v| v);
        for (index, disposition) in results(&evaluation).into_iter().enumerate() {
            match first_true {
                Some(stop) if index > stop => assert_eq!(disposition, Disposition::Skipped),
                _ => assert_eq!(disposition, Disposition::from(values[index])),
            }
        }
    }
}

#[test]
fn test_depth_guard_aborts_evaluation() {
    let mut expr = Expression::tautology();
    for _ in 0..101 {
        expr = Expression::all([expr]);
    }

    let err = Evaluator::default().evaluate(&expr).unwrap_err();
    assert!(err.to_string().contains("maximum evaluation depth"));
}

#[test]
fn test_evaluator_from_config() {
    let config = Config::from_toml_str("[evaluator]\nmax_depth = 1\n").unwrap();
    let evaluator = Evaluator::from_config(&config.evaluator);

    let _ = evaluator.evaluate(&Expression::all([Expression::tautology()])).unwrap();
    let _ = evaluator
        .evaluate(&Expression::all([Expression::all([Expression::tautology()])]))
        .unwrap_err();
}

#[test]
#[cfg_attr(miri, ignore)]
fn test_concurrent_evaluation_of_shared_tree() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let expr = Expression::all([
        Expression::terminal("counted", move || {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
            true
        }),
        Expression::not(Expression::contradiction()),
    ]);
    let evaluator = Evaluator::default();

    thread::scope(|scope| {
        for _ in 0..8 {
            let _ = scope.spawn(|| {
                for _ in 0..100 {
                    let evaluation = evaluator.evaluate(&expr).unwrap();
                    assert_eq!(evaluation.disposition(), Disposition::True);
                }
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 800);
}

#[test]
fn test_rationale_generated_only_when_asked() {
    let explained = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&explained);
    let expr = Expression::explained(
        "quiet",
        || true,
        move |passed| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
            Rationale::from_outcome(passed)
        },
    );

    let evaluation = Evaluator::default().evaluate(&expr).unwrap();
    let _ = Formatter::new().format(&evaluation);
    assert_eq!(explained.load(Ordering::SeqCst), 0);

    let _ = evaluation.rationale();
    assert_eq!(explained.load(Ordering::SeqCst), 1);
}

#[test]
fn test_root_cause_of_nested_failure() {
    let user = Subject::new("user.name", "");
    let age = Subject::new("user.age", 17);
    let expr = Expression::all([
        user.is_not_blank(),
        Expression::any([age.is_at_least(18), Expression::terminal("guardian present", || false)]).named("may sign"),
    ])
    .named("signup allowed");

    let evaluation = Evaluator::default().evaluate(&expr).unwrap();
    let chain = Cause::from_evaluation(&evaluation).root_cause_chain();

    assert_eq!(chain.termination(), ChainTermination::Complete);
    assert_eq!(chain.to_string(), "signup allowed -> user.name is not blank");
    assert_eq!(chain.root_cause().evaluation().rationale().unwrap().actual, "\"\"");
}

#[test]
fn test_cyclic_causes_terminate() {
    let evaluation = Evaluator::default().evaluate(&Expression::contradiction()).unwrap();
    let a = Cause::new(evaluation.clone());
    let b = Cause::with_underlying(evaluation, Arc::clone(&a));
    a.link(Arc::clone(&b)).unwrap();

    let chain = a.root_cause_chain();
    assert!(chain.len() <= 2);
    assert_eq!(chain.termination(), ChainTermination::CycleDetected);
}

#[test]
fn test_long_cause_chain_is_bounded() {
    let evaluation = Evaluator::default().evaluate(&Expression::contradiction()).unwrap();
    let mut cause = Cause::new(evaluation.clone());
    for _ in 0..1500 {
        cause = Cause::with_underlying(evaluation.clone(), cause);
    }

    let chain = cause.root_cause_chain();
    assert_eq!(chain.len(), 1024);
    assert_eq!(chain.termination(), ChainTermination::MaximumDepthExceeded);
}

#[test]
fn test_full_report() {
    let temperature = Subject::new("temperature", 92.5_f64);
    let expr = Expression::all([
        temperature.is_between(10.0, 80.0),
        Expression::tautology().named("sensor online"),
    ])
    .named("safe to operate");

    let evaluation = Evaluator::default().evaluate(&expr).unwrap();
    let report = Formatter::new().with_root_cause_first(true).format(&evaluation);

    let expected = "\
Root cause: 10.0 <= temperature <= 80.0
    Expected: 10.0 <= temperature <= 80.0
    Actual: 92.5
    Via: safe to operate -> 10.0 <= temperature <= 80.0

[X] safe to operate
    [X] 10.0 <= temperature <= 80.0
        Expected: 10.0 <= temperature <= 80.0
        Actual: 92.5
    [ ] sensor online
";
    assert_eq!(report.to_string(), expected);
}

#[test]
fn test_evaluation_as_json() {
    let expr = Expression::any([Expression::contradiction().named("a"), Expression::contradiction().named("b")]).named("either");
    let evaluation = Evaluator::default().evaluate(&expr).unwrap();

    let json = serde_json::to_value(&evaluation).unwrap();
    assert_eq!(json["name"], "either");
    assert_eq!(json["disposition"], "false");
    assert_eq!(json["junction"], "any");
    assert_eq!(json["children"].as_array().unwrap().len(), 2);
    assert_eq!(json["children"][1]["rationale"]["expected"], "false");
}
