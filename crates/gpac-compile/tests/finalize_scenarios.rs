//! End-to-end finalize scenarios.

use gpac_compile::{finalize, CompileError, FinalizeOptions};
use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::{builder, builtins, Circuit};

#[test]
fn exp_finalizes_with_one_int_gate() {
    let mut exp = builtins::exp();
    finalize(&mut exp, FinalizeOptions::default()).unwrap();
    assert!(exp.is_finalized());
    assert_eq!(exp.int_gates().unwrap().len(), 1);
}

#[test]
fn cse_collapses_exp_plus_exp_to_one_int_and_one_add() {
    let exp = builtins::exp();
    let mut sum = builder::add(&exp, &exp).unwrap();

    finalize(&mut sum, FinalizeOptions::default()).unwrap();

    let int_count = sum.gates().values().filter(|g| g.is_int()).count();
    let add_count = sum
        .gates()
        .values()
        .filter(|g| matches!(g, Gate::Add(..)))
        .count();
    let const_values: Vec<f64> = sum
        .gates()
        .values()
        .filter_map(|g| match g {
            Gate::Constant(v) => Some(*v),
            _ => None,
        })
        .collect();

    assert_eq!(int_count, 1, "shared exp should collapse to one Int gate");
    assert_eq!(add_count, 1, "one Add gate combining the shared exp with itself");
    let mut seen = std::collections::HashSet::new();
    for v in &const_values {
        assert!(seen.insert(v.to_bits()), "duplicate Constant({v}) survived CSE");
    }
}

#[test]
fn polynomial_folds_its_coefficient_constants_but_keeps_t() {
    let mut p = builtins::polynomial(&[1.0, 0.0, 1.0]);
    finalize(&mut p, FinalizeOptions::default()).unwrap();
    // 1 + 0*t + t^2: still depends on t, so it cannot collapse to a
    // single Constant, but no Int gates are introduced by a pure
    // polynomial (no differential equations involved).
    assert_eq!(p.int_gates().unwrap().len(), 0);
    assert!(p.gates().values().any(|g| !g.is_constant()));
}

#[test]
fn normalization_failure_does_not_panic() {
    let mut c = Circuit::new("bad").without_validation();
    let k = c.add_const(Some(Name::from("k")), 3.0).unwrap();
    let x = c.add_const(Some(Name::from("x")), 1.0).unwrap();
    let g = c.add_int(None, x, k, Some(0.0)).unwrap();
    c.set_output(g);

    let err = finalize(&mut c, FinalizeOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::NotNormalizable(_)));
    assert!(!c.is_finalized());
}

#[test]
fn finalize_is_idempotent_across_repeated_calls() {
    let mut exp = builtins::exp();
    finalize(&mut exp, FinalizeOptions::default()).unwrap();
    let gates_after_first = exp.gates().clone();
    finalize(&mut exp, FinalizeOptions::default()).unwrap();
    assert_eq!(exp.gates(), &gates_after_first);
}
