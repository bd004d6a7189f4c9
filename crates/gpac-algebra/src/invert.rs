//! `Inverse`: the auxiliary-integration construction computing `1/A(t)`
//!: `z' = -A' * z^2`, `z(0) = 1/A(0)`.

use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::derivate::derivate;
use crate::error::{AlgebraError, AlgebraResult};
use crate::propagate::value_at_zero;

/// Build the circuit computing `1/A(t)`.
///
/// `a` must already be `gpac_compile::finalize`d — reading `A(0)` needs its
/// `int_gates` cache and init values. Fails with
/// [`AlgebraError::DivisionByZeroAtOrigin`] if `A(0) == 0`.
pub fn invert(a: &Circuit) -> AlgebraResult<Circuit> {
    if !a.is_finalized() {
        return Err(AlgebraError::NotFinalized(a.name().to_string()));
    }
    let a0 = value_at_zero(a)?;
    if a0 == 0.0 {
        return Err(AlgebraError::DivisionByZeroAtOrigin(a.name().to_string()));
    }

    let deriv = derivate(a)?;

    let mut out = Circuit::new(format!("Inverse({})", a.name()));
    let a_prime = out.splice(&deriv);
    let neg_one = out.add_const(None, -1.0)?;
    let z_name = out.fresh_name();
    let z_sq = out.add_prod(None, z_name.clone(), z_name.clone())?;
    let neg_a_prime = out.add_prod(None, neg_one, a_prime)?;
    let rate = out.add_prod(None, neg_a_prime, z_sq)?;
    let z = out.add_int(Some(z_name), rate, Name::t(), Some(1.0 / a0))?;
    out.set_output(z);
    Ok(out)
}

/// `A / B = A * invert(B)`.
pub fn div(a: &Circuit, b: &Circuit) -> AlgebraResult<Circuit> {
    let inv_b = invert(b)?;
    Ok(gpac_ir::builder::mul(a, &inv_b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_compile::{finalize, FinalizeOptions};
    use gpac_ir::builtins;
    use gpac_sim::{Rk4Driver, VectorField};

    /// Run `circuit` (already finalized) from `t=0` to `b` and read its
    /// designated output at the end — as opposed to indexing the raw state
    /// vector, whose per-gate order is lexicographic by name ([`gpac_ir`]'s
    /// `int_gates` cache) and so does not generally put the output first.
    fn output_at(circuit: &gpac_ir::Circuit, b: f64, dt: f64) -> f64 {
        let driver = Rk4Driver::new(circuit, 0.0, b, dt).unwrap();
        let state = driver.run().unwrap();
        let field = VectorField::new(circuit).unwrap();
        field.output_value(&state, b).unwrap()
    }

    #[test]
    fn invert_of_constant_two_is_half() {
        let mut two = builtins::constant(2.0);
        finalize(&mut two, FinalizeOptions::default()).unwrap();
        let mut inv = invert(&two).unwrap();
        finalize(&mut inv, FinalizeOptions::default()).unwrap();

        assert!((output_at(&inv, 1.0, 0.01) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn invert_rejects_zero_at_origin() {
        let mut zero = builtins::constant(0.0);
        finalize(&mut zero, FinalizeOptions::default()).unwrap();
        assert!(matches!(
            invert(&zero),
            Err(AlgebraError::DivisionByZeroAtOrigin(_))
        ));
    }

    #[test]
    fn invert_requires_finalized_input() {
        let exp = builtins::exp();
        assert!(matches!(invert(&exp), Err(AlgebraError::NotFinalized(_))));
    }

    #[test]
    fn double_inversion_matches_original_within_tolerance() {
        let mut exp = builtins::exp();
        finalize(&mut exp, FinalizeOptions::default()).unwrap();

        let mut inv = invert(&exp).unwrap();
        finalize(&mut inv, FinalizeOptions::default()).unwrap();
        let mut inv_inv = invert(&inv).unwrap();
        finalize(&mut inv_inv, FinalizeOptions::default()).unwrap();

        let a = output_at(&exp, 0.5, 0.001);
        let b = output_at(&inv_inv, 0.5, 0.001);
        assert!((a - b).abs() < 1e-3);
    }
}
