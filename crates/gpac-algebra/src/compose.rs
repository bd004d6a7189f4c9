//! `Compose`: functional composition of two circuits, `A ∘ B`, written as
//! `compose(a, b)` meaning "evaluate `a` at `b`'s output" —
//! `(A ∘ B)(t) = A(B(t))`.

use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::{AlgebraError, AlgebraResult};
use crate::propagate::{state_at, value_at_zero};

/// `A ∘ B`: substitute every `t` reference in `A`'s portion of the circuit
/// with `B`'s output, then immediately re-normalize (substitution routinely
/// produces Int gates whose differential variable is no longer `t`).
///
/// Shortcuts when either side is the identity. Otherwise both `a` and `b` must already be
/// `gpac_compile::finalize`d: composition needs `b`'s `int_gates` cache
/// and init values to read `B(0)`, and needs the same of `a` to
/// pre-simulate `A`'s own state from `t=0` to `t=B(0)` — the initial value
/// every one of `A`'s Int gates must carry once its differential variable
/// becomes `oB` rather than `t`. This
/// is a stricter reading than "require finalization before composition" —
/// it requires it of *both* operands, not just the right-hand one, because
/// the pre-simulation runs against `A`, not `B` (see DESIGN.md).
pub fn compose(a: &Circuit, b: &Circuit) -> AlgebraResult<Circuit> {
    let oa = a
        .output()
        .cloned()
        .ok_or_else(|| gpac_ir::IrError::NoOutput(a.name().to_string()))?;
    if oa.is_t() {
        return Ok(b.clone());
    }
    let ob = b
        .output()
        .cloned()
        .ok_or_else(|| gpac_ir::IrError::NoOutput(b.name().to_string()))?;
    if ob.is_t() {
        return Ok(a.clone());
    }

    if !b.is_finalized() {
        return Err(AlgebraError::NotFinalized(b.name().to_string()));
    }
    if !a.is_finalized() {
        return Err(AlgebraError::NotFinalized(a.name().to_string()));
    }

    let b0 = value_at_zero(b)?;

    let a_names: Vec<Name> = a.gates().keys().cloned().collect();
    let mut out = a.clone();
    let ob_in_out = out.splice(b);

    // Substitute t -> ob_in_out, but only within A's own portion of the
    // spliced circuit: B's copied gates reference t meaningfully as their
    // own independent variable and must not be touched.
    for name in &a_names {
        if let Some(gate) = out.gates_mut().get_mut(name) {
            if let Some((x, y)) = gate.inputs_mut() {
                if x.is_t() {
                    *x = ob_in_out.clone();
                }
                if y.is_t() {
                    *y = ob_in_out.clone();
                }
            }
        }
    }
    out.invalidate();

    if b0 != 0.0 {
        let state = state_at(a, b0)?;
        let int_gates: Vec<Name> = a.int_gates().expect("checked finalized above").to_vec();
        for (name, value) in int_gates.iter().zip(state.iter()) {
            out.set_init_value(name, *value)?;
        }
    }

    gpac_compile::passes::normalize::normalize(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_compile::{finalize, FinalizeOptions};
    use gpac_ir::builtins;

    #[test]
    fn compose_with_identity_on_right_is_a_clone() {
        let mut sin = builtins::sin();
        finalize(&mut sin, FinalizeOptions::default()).unwrap();
        let id = builtins::identity();
        let composed = compose(&sin, &id).unwrap();
        assert_eq!(composed.gates().len(), sin.gates().len());
    }

    #[test]
    fn compose_with_identity_on_left_is_a_clone() {
        let id = builtins::identity();
        let mut sin = builtins::sin();
        finalize(&mut sin, FinalizeOptions::default()).unwrap();
        let composed = compose(&id, &sin).unwrap();
        assert_eq!(composed.gates().len(), sin.gates().len());
    }

    #[test]
    fn sin_of_t_squared_normalizes_to_four_int_gates() {
        // Sin o PowerPower2(1): normalization must rewrite the inner Ints
        // (whose Y becomes t^2) over t. Two from Sin's own sin/cos pair,
        // two introduced by normalizing the substituted differential.
        let mut sin = builtins::sin();
        finalize(&mut sin, FinalizeOptions::default()).unwrap();
        let mut t2 = builtins::power_power2(1);
        finalize(&mut t2, FinalizeOptions::default()).unwrap();

        let mut composed = compose(&sin, &t2).unwrap();
        finalize(&mut composed, FinalizeOptions::default()).unwrap();
        assert_eq!(composed.int_gates().unwrap().len(), 4);
    }

    #[test]
    fn unfinalized_operand_is_rejected() {
        let sin = builtins::sin();
        let id = builtins::identity();
        // id is identity so this shortcuts without needing sin finalized;
        // use a non-identity right-hand side to force the finalized check.
        let mut t2 = builtins::power_power2(1);
        let err = compose(&sin, &t2).unwrap_err();
        assert!(matches!(err, AlgebraError::NotFinalized(_)));
        finalize(&mut t2, FinalizeOptions::default()).unwrap();
        let err2 = compose(&sin, &t2).unwrap_err();
        assert!(matches!(err2, AlgebraError::NotFinalized(_)));
        let _ = id; // identity shortcut exercised separately above
    }
}
