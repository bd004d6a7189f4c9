//! Shared pre-simulation helper: evaluate a finalized circuit's own state
//! at an arbitrary target time, forward or backward from `t = 0`.
//!
//! `compose` uses this to propagate initial values and `invert` uses it (via [`value_at_zero`]) to
//! read `A(0)` before constructing the auxiliary integration.

use gpac_ir::Circuit;
use gpac_sim::{rk4_step, VectorField};

use crate::error::AlgebraResult;

/// Number of fixed steps used to pre-simulate a circuit from `t = 0` to an
/// arbitrary target time. Matches the CLI's default `-s 0.001` step over a
/// `[0, 1]`-scale interval; composition targets are rarely much larger, and
/// this is a one-shot bookkeeping integration, not the main simulation the
/// caller ultimately runs.
const PROPAGATION_STEPS: usize = 1_000;

/// Evaluate `circuit`'s own state vector at `target_t`, starting from its
/// recorded initial values at `t = 0`.
///
/// `target_t` may be negative: the step size `dt = target_t / PROPAGATION_STEPS`
/// then comes out negative too, and [`gpac_sim::rk4_step`]'s formula is
/// agnostic to the sign of `dt`, so a negative target time needs no
/// separate code path.
pub(crate) fn state_at(circuit: &Circuit, target_t: f64) -> AlgebraResult<Vec<f64>> {
    let int_gates = circuit
        .int_gates()
        .ok_or_else(|| crate::error::AlgebraError::NotFinalized(circuit.name().to_string()))?;

    let mut y: Vec<f64> = int_gates
        .iter()
        .map(|name| {
            *circuit
                .init_values()
                .get(name)
                .expect("finalize guarantees every Int gate has an initial value")
        })
        .collect();

    if target_t == 0.0 || y.is_empty() {
        return Ok(y);
    }

    let field = VectorField::new(circuit)?;
    let dt = target_t / PROPAGATION_STEPS as f64;
    let mut t = 0.0;
    for _ in 0..PROPAGATION_STEPS {
        y = rk4_step(&field, &y, t, dt)?;
        t += dt;
    }
    Ok(y)
}

/// Evaluate `circuit`'s designated output at its own `t = 0` initial state,
/// without any integration (the common case: `A(0)`, `B(0)`).
pub(crate) fn value_at_zero(circuit: &Circuit) -> AlgebraResult<f64> {
    let int_gates = circuit
        .int_gates()
        .ok_or_else(|| crate::error::AlgebraError::NotFinalized(circuit.name().to_string()))?;
    let y0: Vec<f64> = int_gates
        .iter()
        .map(|name| {
            *circuit
                .init_values()
                .get(name)
                .expect("finalize guarantees every Int gate has an initial value")
        })
        .collect();
    let field = VectorField::new(circuit)?;
    Ok(field.output_value(&y0, 0.0)?)
}
