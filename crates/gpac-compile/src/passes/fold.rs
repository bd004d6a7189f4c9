//! Constant folding: any gate whose sub-DAG is
//! composed entirely of `Constant`, `Add`, and `Prod` gates — no `t`, no
//! `Int` — is replaced by a single `Constant` with the evaluated value.

use std::collections::HashMap;

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;

/// The constant-folding pass.
pub struct ConstantFold;

impl Pass for ConstantFold {
    fn name(&self) -> &str {
        "constant_fold"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        constant_fold(circuit)
    }
}

/// Fold every constant sub-expression gate down to a single `Constant`.
pub fn constant_fold(circuit: &mut Circuit) -> CompileResult<()> {
    let mut memo: HashMap<Name, bool> = HashMap::new();
    let candidates: Vec<Name> = circuit
        .gates()
        .iter()
        .filter(|(name, gate)| !gate.is_constant() && is_constant_subexpr(circuit, name, &mut memo))
        .map(|(name, _)| name.clone())
        .collect();

    if candidates.is_empty() {
        return Ok(());
    }

    for name in &candidates {
        let value = eval_constant(circuit, name)?;
        circuit.set_gate_constant(name, value);
    }
    Ok(())
}

fn is_constant_subexpr(circuit: &Circuit, name: &Name, memo: &mut HashMap<Name, bool>) -> bool {
    if let Some(&cached) = memo.get(name) {
        return cached;
    }
    if name.is_t() {
        memo.insert(name.clone(), false);
        return false;
    }
    memo.insert(name.clone(), false); // cycle guard
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

fn eval_constant(circuit: &Circuit, name: &Name) -> CompileResult<f64> {
    match circuit.gates().get(name) {
        Some(Gate::Constant(v)) => Ok(*v),
        Some(Gate::Add(x, y)) => Ok(eval_constant(circuit, x)? + eval_constant(circuit, y)?),
        Some(Gate::Prod(x, y)) => Ok(eval_constant(circuit, x)? * eval_constant(circuit, y)?),
        Some(Gate::Int(..)) | None => Err(CompileError::UnknownInput {
            gate: "constant_fold".into(),
            input: name.to_string(),
        }),
    }
}
