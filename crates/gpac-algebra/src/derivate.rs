//! `Derivate`: the symbolic derivative of a circuit's output with respect
//! to `t`.
//!
//! `(x+y)' = x'+y'`, `(xy)' = x'y + xy'`, `(Int x dy)' = x * y'` (which
//! specializes to `(Int x dt)' = x` when `y = t`, since `t' = 1`), constants
//! differentiate to 0. Note that differentiating an `Int` gate needs only
//! `y'`, never `x'` — the integrand `x` is used as-is, which is exactly why
//! this terminates even though `x` may close a cycle back through gates
//! whose own derivative depends on this one (the Sin/Cos builtin pair, for
//! instance): the recursion never walks into `x`.

use std::collections::HashMap;

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::{AlgebraError, AlgebraResult};

/// Build the circuit computing `d(output)/dt` for `a`.
///
/// Clones `a` in full (the chain rule for `Prod` needs the original factors
/// alongside their derivatives) and adds one derivative gate per reachable
/// original gate, memoized so shared sub-expressions are differentiated
/// once. Does not fold constants or normalize — the result is handed to
/// `gpac_compile::finalize` by callers that need that (e.g. `invert`'s
/// caller, or a test asserting against a simplified closed form).
pub fn derivate(a: &Circuit) -> AlgebraResult<Circuit> {
    let output = a
        .output()
        .cloned()
        .ok_or_else(|| gpac_ir::IrError::NoOutput(a.name().to_string()))?;

    let mut out = a.clone();
    out.set_name(format!("d/dt({})", a.name()));
    let mut memo: HashMap<Name, Name> = HashMap::new();
    let mut in_progress: Vec<Name> = Vec::new();

    let d_output = derivative_of(&mut out, &output, &mut memo, &mut in_progress)?;
    out.set_output(d_output);
    Ok(out)
}

/// Derivative of `t` itself, or of a gate named `name`, inserted into `out`
/// if not already memoized. Returns the derivative's name.
fn derivative_of(
    out: &mut Circuit,
    name: &Name,
    memo: &mut HashMap<Name, Name>,
    in_progress: &mut Vec<Name>,
) -> AlgebraResult<Name> {
    if name.is_t() {
        return Ok(constant_gate(out, 1.0));
    }
    if let Some(d) = memo.get(name) {
        return Ok(d.clone());
    }
    if in_progress.contains(name) {
        return Err(AlgebraError::DerivativeCycle(
            out.name().to_string(),
            name.to_string(),
        ));
    }

    let gate = out
        .gates()
        .get(name)
        .cloned()
        .ok_or_else(|| gpac_ir::IrError::UnknownInput {
            consumer: "derivate".into(),
            input: name.to_string(),
        })?;

    in_progress.push(name.clone());
    let d_name = match gate {
        Gate::Constant(_) => constant_gate(out, 0.0),
        Gate::Add(x, y) => {
            let dx = derivative_of(out, &x, memo, in_progress)?;
            let dy = derivative_of(out, &y, memo, in_progress)?;
            out.add_add(None, dx, dy)?
        }
        Gate::Prod(x, y) => {
            let dx = derivative_of(out, &x, memo, in_progress)?;
            let dy = derivative_of(out, &y, memo, in_progress)?;
            let xdy = out.add_prod(None, x.clone(), dy)?;
            let ydx = out.add_prod(None, y.clone(), dx)?;
            out.add_add(None, xdy, ydx)?
        }
        Gate::Int(x, y) => {
            // g' = x * y' by Int's own defining relation; x' is never needed.
            let dy = derivative_of(out, &y, memo, in_progress)?;
            out.add_prod(None, x, dy)?
        }
    };
    in_progress.pop();
    memo.insert(name.clone(), d_name.clone());
    Ok(d_name)
}

/// Reuse an existing `Constant(value)` gate if present, else insert one.
/// Small local counterpart to `gpac_ir::builder`'s private `constant_gate`
/// (not exposed across the crate boundary) — see that module's doc comment
/// on why the builder's composers reuse constants the same way.
fn constant_gate(circuit: &mut Circuit, value: f64) -> Name {
    let existing = circuit
        .gates()
        .iter()
        .find(|(_, g)| matches!(g, Gate::Constant(v) if *v == value))
        .map(|(name, _)| name.clone());
    existing.unwrap_or_else(|| {
        circuit
            .add_const(None, value)
            .expect("inserting a fresh constant gate cannot fail")
    })
}
