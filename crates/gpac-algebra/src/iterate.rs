//! `Iterate`: repeated self-composition, `A^{\circ n} = A \circ A \circ
//! \cdots \circ A` (`n` times), built by binary exponentiation over
//! [`compose`].
//!
//! `compose` is associative but not commutative, so the usual square-and-
//! multiply loop applies unchanged: halve `n`, square the accumulator, and
//! fold in one more factor on odd steps. `Identity` (the circuit whose
//! output is `t` itself) is the neutral element, matching
//! `A^{\circ 0} = Identity`.

use gpac_compile::{finalize, FinalizeOptions};
use gpac_ir::builtins;
use gpac_ir::Circuit;

use crate::compose::compose;
use crate::error::AlgebraResult;

/// Compose `a` with itself `n` times. `n = 0` returns `Identity`; `n = 1`
/// returns a finalized clone of `a`.
///
/// `compose` requires both of its operands finalized (see that function's
/// doc comment), so every intermediate result is finalized before being fed
/// back in as the next accumulator or factor — the repeated
/// normalize/simplify this costs is the price of keeping `compose` itself
/// simple rather than teaching it to finalize its own inputs silently.
pub fn iterate(a: &Circuit, n: u32) -> AlgebraResult<Circuit> {
    if n == 0 {
        return Ok(builtins::identity());
    }

    let mut base = a.clone();
    finalize(&mut base, FinalizeOptions::default())?;
    if n == 1 {
        return Ok(base);
    }

    let mut acc = builtins::identity();
    let mut remaining = n;
    loop {
        if remaining & 1 == 1 {
            acc = compose(&acc, &base)?;
            finalize(&mut acc, FinalizeOptions::default())?;
        }
        remaining >>= 1;
        if remaining == 0 {
            break;
        }
        base = compose(&base, &base)?;
        finalize(&mut base, FinalizeOptions::default())?;
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_sim::{Rk4Driver, VectorField};

    fn output_at(circuit: &Circuit, b: f64, dt: f64) -> f64 {
        let driver = Rk4Driver::new(circuit, 0.0, b, dt).unwrap();
        let state = driver.run().unwrap();
        let field = VectorField::new(circuit).unwrap();
        field.output_value(&state, b).unwrap()
    }

    #[test]
    fn iterate_zero_is_identity() {
        let mut exp = builtins::exp();
        finalize(&mut exp, FinalizeOptions::default()).unwrap();
        let result = iterate(&exp, 0).unwrap();
        assert!(result.output().unwrap().is_t());
    }

    #[test]
    fn iterate_one_is_a_clone() {
        let mut exp = builtins::exp();
        finalize(&mut exp, FinalizeOptions::default()).unwrap();
        let mut once = iterate(&exp, 1).unwrap();
        finalize(&mut once, FinalizeOptions::default()).unwrap();
        assert!((output_at(&once, 0.5, 0.001) - output_at(&exp, 0.5, 0.001)).abs() < 1e-9);
    }

    #[test]
    fn power_power2_one_iterated_twice_matches_power_power2_two() {
        // PowerPower2(1) computes t^2; composing it with itself computes
        // (t^2)^2 = t^4, the same function PowerPower2(2) builds directly.
        let mut p1 = builtins::power_power2(1);
        finalize(&mut p1, FinalizeOptions::default()).unwrap();
        let mut twice = iterate(&p1, 2).unwrap();
        finalize(&mut twice, FinalizeOptions::default()).unwrap();

        let mut p2 = builtins::power_power2(2);
        finalize(&mut p2, FinalizeOptions::default()).unwrap();

        for &t in &[0.3, 1.0, 1.7] {
            let a = output_at(&twice, t, 0.0005);
            let b = output_at(&p2, t, 0.0005);
            assert!((a - b).abs() < 1e-2, "t={t} iterated={a} direct={b}");
        }
    }

    #[test]
    fn iterate_three_matches_manual_composition() {
        let mut p1 = builtins::power_power2(1);
        finalize(&mut p1, FinalizeOptions::default()).unwrap();

        let mut manual = compose(&p1, &p1).unwrap();
        finalize(&mut manual, FinalizeOptions::default()).unwrap();
        let mut manual = compose(&manual, &p1).unwrap();
        finalize(&mut manual, FinalizeOptions::default()).unwrap();

        let mut via_iterate = iterate(&p1, 3).unwrap();
        finalize(&mut via_iterate, FinalizeOptions::default()).unwrap();

        let a = output_at(&manual, 0.8, 0.0005);
        let b = output_at(&via_iterate, 0.8, 0.0005);
        assert!((a - b).abs() < 1e-2);
    }
}
