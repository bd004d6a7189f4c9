//! `finalize`: the lifecycle that turns a freshly-built [`Circuit`] into
//! one the simulator and exporters can trust.
//!
//! Normalize, then (optionally) simplify, then validate, then check every
//! integration gate has an initial value, then cache the finalize-order
//! list of integration gates and lock `finalized`. Idempotent: calling
//! `finalize` again on an already-finalized, unmutated circuit is a no-op.

use tracing::info;

use gpac_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::passes::{canonicalize, cse, dce, fold, normalize, validate};

/// Options controlling what `finalize` does beyond the mandatory
/// normalize/validate steps.
#[derive(Debug, Clone, Copy)]
pub struct FinalizeOptions {
    /// Run the simplifier sub-passes (constant folding, DCE,
    /// canonicalization, CSE) before validating. Default `true`.
    pub simplify: bool,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self { simplify: true }
    }
}

/// Finalize `circuit` in place per [`FinalizeOptions`].
///
/// A no-op if the circuit is already finalized — mutating a `Circuit`
/// through any public method clears `finalized`, so this is a cheap and
/// safe thing for callers (e.g. `gpac-algebra`'s `compose`) to call
/// defensively before using a circuit they didn't build themselves.
pub fn finalize(circuit: &mut Circuit, opts: FinalizeOptions) -> CompileResult<()> {
    if circuit.is_finalized() {
        return Ok(());
    }

    normalize::normalize(circuit)?;

    if opts.simplify {
        fold::constant_fold(circuit)?;
        dce::dead_code_elimination(circuit);
        canonicalize::canonicalize(circuit);
        cse::common_subexpression_elimination(circuit);
    }

    validate::validate(circuit)?;

    let int_gates: Vec<_> = circuit
        .gates()
        .iter()
        .filter(|(_, gate)| gate.is_int())
        .map(|(name, _)| name.clone())
        .collect();

    for name in &int_gates {
        if circuit.init_values().get(name).is_none() {
            return Err(CompileError::MissingInitValue(name.to_string()));
        }
    }

    info!(
        circuit = circuit.name(),
        gates = circuit.gates().len(),
        int_gates = int_gates.len(),
        "finalized circuit"
    );

    circuit.set_finalized(int_gates);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_ir::builtins;
    use gpac_ir::name::Name;

    #[test]
    fn finalize_is_idempotent() {
        let mut exp = builtins::exp();
        finalize(&mut exp, FinalizeOptions::default()).unwrap();
        assert!(exp.is_finalized());
        let snapshot = exp.int_gates().unwrap().to_vec();
        finalize(&mut exp, FinalizeOptions::default()).unwrap();
        assert_eq!(exp.int_gates().unwrap(), snapshot.as_slice());
    }

    #[test]
    fn finalize_without_init_value_fails() {
        let mut c = Circuit::new("bad").without_validation();
        let x = c.add_const(Some(Name::from("x")), 1.0).unwrap();
        let g = c.add_int(None, x, Name::t(), None).unwrap();
        c.set_output(g);
        let err = finalize(&mut c, FinalizeOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::MissingInitValue(_)));
    }

    #[test]
    fn finalize_rejects_constant_differential() {
        let mut c = Circuit::new("bad").without_validation();
        let k = c.add_const(Some(Name::from("k")), 3.0).unwrap();
        let x = c.add_const(Some(Name::from("x")), 1.0).unwrap();
        let g = c.add_int(None, x, k, Some(0.0)).unwrap();
        c.set_output(g);
        let err = finalize(&mut c, FinalizeOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::NotNormalizable(_)));
    }

    #[test]
    fn finalize_without_simplify_skips_cse() {
        let exp = builtins::exp();
        let mut sum = gpac_ir::builder::add(&exp, &exp).unwrap();
        finalize(&mut sum, FinalizeOptions { simplify: false }).unwrap();
        let int_count = sum.gates().values().filter(|g| g.is_int()).count();
        assert_eq!(int_count, 2);
    }
}
