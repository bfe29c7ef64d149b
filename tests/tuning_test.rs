//! Tuning search behavior: declaration, convergence, overrides, fastest_of.

use std::time::Duration;

use octotune::tuning::{self, fastest_of, Candidates, VariableInfo, TRIALS_PER_CANDIDATE};

#[test]
fn declare_is_idempotent_by_name() {
    let tuner = tuning::global();
    let a = tuner
        .declare_output_var(VariableInfo::new(
            "test.idempotent",
            Candidates::set(vec![1, 2]),
            1,
        ))
        .unwrap();
    let b = tuner
        .declare_output_var(VariableInfo::new(
            "test.idempotent",
            Candidates::set(vec![1, 2]),
            1,
        ))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_candidate_set_rejected() {
    let tuner = tuning::global();
    let err = tuner
        .declare_output_var(VariableInfo::new("test.empty", Candidates::set(vec![]), 0))
        .unwrap_err();
    assert!(matches!(err, octotune::OctotuneError::EmptyCandidates(_)));

    let err = tuner
        .declare_output_var(VariableInfo::new(
            "test.badrange",
            Candidates::range(0, 10, 0),
            0,
        ))
        .unwrap_err();
    assert!(matches!(
        err,
        octotune::OctotuneError::InvalidCandidateRange { .. }
    ));
}

#[test]
fn converges_to_cheapest_candidate() {
    let tuner = tuning::global();
    let var = tuner
        .declare_output_var(VariableInfo::new(
            "test.converge",
            Candidates::set(vec![1, 2, 3]),
            2,
        ))
        .unwrap();

    // Synthetic cost proportional to the candidate value, so 1 must win.
    for _ in 0..(3 * TRIALS_PER_CANDIDATE + 2) {
        let mut ctx = tuner.new_context();
        let value = ctx.request(var);
        assert!((1..=3).contains(&value));
        ctx.record_elapsed(var, Duration::from_micros(value as u64 * 100));
        ctx.end();
    }

    assert!(tuner.converged(var));
    assert_eq!(tuner.best(var), Some(1));

    // Converged variables keep handing out the winner.
    let mut ctx = tuner.new_context();
    assert_eq!(ctx.request(var), 1);
}

#[test]
fn discarded_round_leaves_search_unchanged() {
    let tuner = tuning::global();
    let var = tuner
        .declare_output_var(VariableInfo::new(
            "test.discard",
            Candidates::set(vec![10, 20]),
            10,
        ))
        .unwrap();

    // Requests without record_elapsed must not count as samples.
    for _ in 0..(4 * TRIALS_PER_CANDIDATE) {
        let mut ctx = tuner.new_context();
        let _ = ctx.request(var);
    }
    assert!(!tuner.converged(var));
}

#[test]
fn env_override_wins() {
    std::env::set_var("OCTOTUNE_OVERRIDE_TEST_OVERRIDE_VAR", "64");
    let tuner = tuning::global();
    let var = tuner
        .declare_output_var(VariableInfo::new(
            "test.override_var",
            Candidates::set(vec![8, 64, 128]),
            8,
        ))
        .unwrap();
    let mut ctx = tuner.new_context();
    assert_eq!(ctx.request(var), 64);
}

#[test]
fn env_override_outside_candidates_ignored() {
    std::env::set_var("OCTOTUNE_OVERRIDE_TEST_OVERRIDE_BAD", "7");
    let tuner = tuning::global();
    let var = tuner
        .declare_output_var(VariableInfo::new(
            "test.override_bad",
            Candidates::set(vec![8, 16]),
            8,
        ))
        .unwrap();
    let mut ctx = tuner.new_context();
    let value = ctx.request(var);
    assert!(value == 8 || value == 16);
}

#[test]
fn fastest_of_converges_on_faster_variant() {
    let mut slow_runs = 0usize;
    let mut fast_runs = 0usize;
    for _ in 0..(2 * TRIALS_PER_CANDIDATE + 2) {
        let mut slow = || {
            slow_runs += 1;
            std::thread::sleep(Duration::from_millis(2));
        };
        let mut fast = || {
            fast_runs += 1;
            std::thread::sleep(Duration::from_micros(100));
        };
        let mut variants: [&mut dyn FnMut(); 2] = [&mut slow, &mut fast];
        let choice = fastest_of("test.fastest", &mut variants).unwrap();
        assert!(choice < 2);
    }
    assert!(slow_runs >= TRIALS_PER_CANDIDATE);
    assert!(fast_runs >= TRIALS_PER_CANDIDATE);

    let tuner = tuning::global();
    let var = tuner
        .declare_output_var(VariableInfo::categorical("test.fastest", 2))
        .unwrap();
    assert!(tuner.converged(var));
    assert_eq!(tuner.best(var), Some(1));
}

#[test]
fn no_variants_is_an_error() {
    let mut variants: [&mut dyn FnMut(); 0] = [];
    let err = fastest_of("test.novariants", &mut variants).unwrap_err();
    assert!(matches!(err, octotune::OctotuneError::NoVariants(_)));
}

#[test]
fn snapshot_lists_declared_variables() {
    let tuner = tuning::global();
    tuner
        .declare_output_var(VariableInfo::new(
            "test.snapshot_var",
            Candidates::set(vec![1, 2]),
            1,
        ))
        .unwrap();
    let snapshot = tuner.snapshot();
    assert!(snapshot.iter().any(|v| v.name == "test.snapshot_var"));
}
