//! The normalizer: rewrite every integration gate so its differential
//! variable is `t`.
//!
//! A work-list over the pending (non-normalized) Int gates, processed in
//! priority order — Case 1 (already-normalized Int) before Case 2 (Prod)
//! before Case 3 (Add), ties broken lexicographically on the gate's own
//! name. The ordering only affects
//! how much the graph grows in the middle of the rewrite; termination and
//! correctness hold for any order, so a plain `BTreeSet` rescanned each
//! iteration is enough — these circuits are small enough that this isn't
//! worth a real binary heap.

use std::collections::{BTreeSet, HashMap};

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;

/// The normalization pass.
pub struct Normalizer;

impl Pass for Normalizer {
    fn name(&self) -> &str {
        "normalize"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        normalize(circuit)
    }
}

/// Rewrite every Int gate in `circuit` so that its differential variable
/// is `t`, per the three-case rewrite system above.
pub fn normalize(circuit: &mut Circuit) -> CompileResult<()> {
    let mut pending: BTreeSet<Name> = circuit
        .gates()
        .iter()
        .filter_map(|(name, gate)| match gate {
            Gate::Int(_, y) if !y.is_t() => Some(name.clone()),
            _ => None,
        })
        .collect();

    let mut const_memo: HashMap<Name, bool> = HashMap::new();

    while let Some(next) = pick_next(circuit, &pending) {
        pending.remove(&next);
        rewrite_one(circuit, &next, &mut pending, &mut const_memo)?;
    }

    Ok(())
}

/// Tier of a pending Int gate `g`, used to order the work-list: 0 for
/// Case 1 (Y is an already-normalized Int), 1 for Case 2 (Y is a Prod),
/// 2 for Case 3 (Y is an Add), 3 for anything else (a standalone Constant,
/// or a dangling name — not normalizable).
fn tier(circuit: &Circuit, g: &Name) -> u8 {
    let y = match circuit.gates().get(g) {
        Some(Gate::Int(_, y)) => y,
        _ => return 4,
    };
    match circuit.gates().get(y) {
        Some(Gate::Int(_, yy)) if yy.is_t() => 0,
        Some(Gate::Prod(..)) => 1,
        Some(Gate::Add(..)) => 2,
        _ => 3,
    }
}

fn pick_next(circuit: &Circuit, pending: &BTreeSet<Name>) -> Option<Name> {
    pending
        .iter()
        .min_by_key(|name| (tier(circuit, name), (*name).clone()))
        .cloned()
}

/// Whether the sub-DAG rooted at `name` contains only `Constant`, `Add`,
/// and `Prod` gates — no `t`, no `Int`.
fn is_constant_subexpr(circuit: &Circuit, name: &Name, memo: &mut HashMap<Name, bool>) -> bool {
    if let Some(&cached) = memo.get(name) {
        return cached;
    }
    if name.is_t() {
        memo.insert(name.clone(), false);
        return false;
    }
    // Guard against a pure algebraic cycle.
    memo.insert(name.clone(), false);
    let result = match circuit.gates().get(name) {
        Some(Gate::Constant(_)) => true,
        Some(Gate::Add(x, y)) | Some(Gate::Prod(x, y)) => {
            is_constant_subexpr(circuit, x, memo) && is_constant_subexpr(circuit, y, memo)
        }
        Some(Gate::Int(..)) | None => false,
    };
    memo.insert(name.clone(), result);
    result
}

fn rewrite_one(
    circuit: &mut Circuit,
    g: &Name,
    pending: &mut BTreeSet<Name>,
    const_memo: &mut HashMap<Name, bool>,
) -> CompileResult<()> {
    let (w, y) = match circuit.gates().get(g) {
        Some(Gate::Int(w, y)) => (w.clone(), y.clone()),
        _ => return Ok(()), // no longer an Int gate (merged away by a prior step)
    };
    if y.is_t() {
        return Ok(());
    }

    match circuit.gates().get(&y).cloned() {
        // Case 1: Y = int U dt (already normalized).
        Some(Gate::Int(u, yy)) if yy.is_t() => {
            let product = circuit.add_prod(None, u, w)?;
            circuit.set_gate_int(g, product, Name::t());
        }
        // Case 2: Y = U * V.
        Some(Gate::Prod(u, v)) => {
            let u_const = is_constant_subexpr(circuit, &u, const_memo);
            let v_const = is_constant_subexpr(circuit, &v, const_memo);
            if u_const || v_const {
                // Sub-case 2a: int (c * W) d(other).
                let (c, other) = if u_const { (u, v) } else { (v, u) };
                let product = circuit.add_prod(None, c, w)?;
                circuit.set_gate_int(g, product, other);
                pending.insert(g.clone());
            } else {
                // Sub-case 2b: g = i1 + i2, i1 = int (U*W) d(V), i2 = int (W*V) d(U).
                let half = circuit.init_values().get(g).map(|v| v / 2.0);
                let uw = circuit.add_prod(None, u.clone(), w.clone())?;
                let i1 = circuit.add_int(None, uw, v.clone(), half)?;
                let wv = circuit.add_prod(None, w, v.clone())?;
                let i2 = circuit.add_int(None, wv, u.clone(), half)?;
                circuit.set_gate_add(g, i1.clone(), i2.clone());
                if !v.is_t() {
                    pending.insert(i1);
                }
                if !u.is_t() {
                    pending.insert(i2);
                }
            }
        }
        // Case 3: Y = U + V.
        Some(Gate::Add(u, v)) => {
            let u_const = is_constant_subexpr(circuit, &u, const_memo);
            let v_const = is_constant_subexpr(circuit, &v, const_memo);
            if u_const || v_const {
                // Sub-case 3a: int W d(U+c) -> int W d(U) (d(U+c) = dU).
                let other = if u_const { v } else { u };
                circuit.set_gate_int(g, w, other);
                pending.insert(g.clone());
            } else {
                // Sub-case 3b: g = (int W dU) + (int W dV).
                let half = circuit.init_values().get(g).map(|val| val / 2.0);
                let i1 = circuit.add_int(None, w.clone(), u.clone(), half)?;
                let i2 = circuit.add_int(None, w, v.clone(), half)?;
                circuit.set_gate_add(g, i1.clone(), i2.clone());
                if !u.is_t() {
                    pending.insert(i1);
                }
                if !v.is_t() {
                    pending.insert(i2);
                }
            }
        }
        _ => return Err(CompileError::NotNormalizable(g.to_string())),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_ir::builtins;

    #[test]
    fn identity_and_exp_are_already_normalized() {
        let mut exp = builtins::exp();
        normalize(&mut exp).unwrap();
        for gate in exp.gates().values() {
            if let Gate::Int(_, y) = gate {
                assert!(y.is_t());
            }
        }
    }

    #[test]
    fn constant_differential_fails_to_normalize() {
        let mut c = Circuit::new("bad").without_validation();
        let k = c.add_const(Some(Name::from("k")), 3.0).unwrap();
        let x = c.add_const(Some(Name::from("x")), 1.0).unwrap();
        let g = c.add_int(None, x, k, Some(0.0)).unwrap();
        c.set_output(g);
        let err = normalize(&mut c).unwrap_err();
        assert!(matches!(err, CompileError::NotNormalizable(_)));
    }

    #[test]
    fn int_with_differential_t_squared_normalizes_by_splitting() {
        // `int x d(t*t)`: Y = Prod(t, t), neither input is a constant
        // sub-expression, so Case 2b splits into two Ints over t and u.
        let mut c = Circuit::new("sin_t2");
        let t2 = c.add_prod(None, Name::t(), Name::t()).expect("prod");
        let x = c.add_const(Some(Name::from("x")), 2.0).unwrap();
        let g = c.add_int(None, x, t2, Some(1.0)).unwrap();
        c.set_output(g.clone());

        normalize(&mut c).unwrap();
        assert!(matches!(c.gates().get(&g), Some(Gate::Add(..))));
        for gate in c.gates().values() {
            if let Gate::Int(_, y) = gate {
                assert!(y.is_t());
            }
        }
    }
}
