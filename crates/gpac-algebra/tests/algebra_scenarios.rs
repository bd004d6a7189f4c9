//! End-to-end algebra scenarios: composition, inversion, and iteration
//! working together across already-finalized circuits.

use gpac_algebra::{compose, derivate, invert, iterate, AlgebraError};
use gpac_compile::{finalize, FinalizeOptions};
use gpac_ir::builtins;
use gpac_sim::{Rk4Driver, VectorField};

fn output_at(circuit: &gpac_ir::Circuit, b: f64, dt: f64) -> f64 {
    let driver = Rk4Driver::new(circuit, 0.0, b, dt).unwrap();
    let state = driver.run().unwrap();
    let field = VectorField::new(circuit).unwrap();
    field.output_value(&state, b).unwrap()
}

#[test]
fn sin_of_t_squared_normalizes_to_four_int_gates_and_matches_numerically() {
    let mut sin = builtins::sin();
    finalize(&mut sin, FinalizeOptions::default()).unwrap();
    let mut t2 = builtins::power_power2(1);
    finalize(&mut t2, FinalizeOptions::default()).unwrap();

    let mut composed = compose(&sin, &t2).unwrap();
    finalize(&mut composed, FinalizeOptions::default()).unwrap();
    assert_eq!(composed.int_gates().unwrap().len(), 4);

    for &t in &[0.0, 0.5, 1.0] {
        let got = output_at(&composed, t, 0.0005);
        let want = (t * t).sin();
        assert!((got - want).abs() < 1e-2, "t={t} got={got} want={want}");
    }
}

#[test]
fn inverse_of_exp_matches_reciprocal() {
    let mut exp = builtins::exp();
    finalize(&mut exp, FinalizeOptions::default()).unwrap();
    let mut inv = invert(&exp).unwrap();
    finalize(&mut inv, FinalizeOptions::default()).unwrap();

    for &t in &[0.0, 0.25, 0.75] {
        let got = output_at(&inv, t, 0.0005);
        let want = (-t).exp();
        assert!((got - want).abs() < 1e-3, "t={t} got={got} want={want}");
    }
}

#[test]
fn derivative_of_inverse_of_exp_is_negative_itself() {
    // d/dt(1/exp(t)) = -1/exp(t): invert's own output circuit should,
    // after differentiating, numerically match its negation.
    let mut exp = builtins::exp();
    finalize(&mut exp, FinalizeOptions::default()).unwrap();
    let mut inv = invert(&exp).unwrap();
    finalize(&mut inv, FinalizeOptions::default()).unwrap();

    let mut d_inv = derivate(&inv).unwrap();
    finalize(&mut d_inv, FinalizeOptions::default()).unwrap();

    let got = output_at(&d_inv, 0.5, 0.0005);
    let want = -(-0.5f64).exp();
    assert!((got - want).abs() < 1e-3, "got={got} want={want}");
}

#[test]
fn iterate_accepts_an_unfinalized_operand() {
    // iterate finalizes its own clone of `a` before looping, unlike
    // compose, so callers do not need to finalize their input up front.
    let t2 = builtins::power_power2(1);
    let mut result = iterate(&t2, 2).unwrap();
    finalize(&mut result, FinalizeOptions::default()).unwrap();
    assert!((output_at(&result, 1.5, 0.0005) - 1.5f64.powi(4)).abs() < 1e-2);
}

#[test]
fn compose_rejects_unfinalized_left_operand_even_with_finalized_right() {
    let sin = builtins::sin();
    let mut t2 = builtins::power_power2(1);
    finalize(&mut t2, FinalizeOptions::default()).unwrap();
    let err = compose(&sin, &t2).unwrap_err();
    assert!(matches!(err, AlgebraError::NotFinalized(_)));
}
