//! Vector-field construction from a finalized circuit.
//!
//! A finalized circuit defines `ẋᵢ = Xᵢ(x₁, …, xₙ, t)` where `xᵢ` is the
//! value of the `i`-th gate in `int_gates` and `Xᵢ` is the sub-DAG rooted
//! at that gate's first input. Evaluating the field at a point means
//! seeding constants and the current state, then propagating Add/Prod
//! values to a fixpoint.

use std::collections::HashMap;

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::{SimError, SimResult};

/// Evaluates the right-hand side of a finalized circuit's ODE system.
pub struct VectorField<'a> {
    circuit: &'a Circuit,
    int_gates: &'a [Name],
}

impl<'a> VectorField<'a> {
    /// Bind a vector field to a finalized circuit. Errors if `circuit`
    /// has not been through `gpac_compile::finalize`.
    pub fn new(circuit: &'a Circuit) -> SimResult<Self> {
        let int_gates = circuit
            .int_gates()
            .ok_or_else(|| SimError::NotFinalized(circuit.name().to_string()))?;
        Ok(Self { circuit, int_gates })
    }

    /// Number of state variables (one per integration gate).
    pub fn dim(&self) -> usize {
        self.int_gates.len()
    }

    /// Evaluate `ẋ = X(x, t)` at state `y` and time `t`.
    pub fn eval(&self, y: &[f64], t: f64) -> SimResult<Vec<f64>> {
        debug_assert_eq!(y.len(), self.int_gates.len());
        let values = self.propagate(y, t)?;

        let mut dydt = Vec::with_capacity(self.int_gates.len());
        for name in self.int_gates {
            let (x, _) = match self.circuit.gates().get(name) {
                Some(Gate::Int(x, y)) => (x, y),
                _ => unreachable!("int_gates only ever names Int gates"),
            };
            let value = value_of(&values, x).ok_or_else(|| {
                SimError::AlgebraicCycle(vec![x.to_string()])
            })?;
            dydt.push(value);
        }
        Ok(dydt)
    }

    /// Evaluate the circuit's designated output at state `y` and time `t`.
    /// Used by the integrator's step observer to report `(t, output)`
    /// pairs without the caller needing to re-derive the output value
    /// from the raw state vector.
    pub fn output_value(&self, y: &[f64], t: f64) -> SimResult<f64> {
        let output = self
            .circuit
            .output()
            .ok_or_else(|| SimError::NotFinalized(self.circuit.name().to_string()))?;
        if output.is_t() {
            return Ok(t);
        }
        let values = self.propagate(y, t)?;
        value_of(&values, output).ok_or_else(|| SimError::AlgebraicCycle(vec![output.to_string()]))
    }

    /// Seed constants, state, and `t`, then propagate Add/Prod values to a
    /// fixpoint. The two loops below — the pre-step state assignment and
    /// the post-propagation read-out in [`VectorField::eval`] — are both
    /// embarrassingly parallel over disjoint keys, which is what the
    /// `parallel-eval` feature exploits.
    fn propagate(&self, y: &[f64], t: f64) -> SimResult<HashMap<Name, f64>> {
        let mut values: HashMap<Name, f64> = HashMap::with_capacity(self.circuit.gates().len());

        #[cfg(feature = "parallel-eval")]
        {
            use rayon::prelude::*;
            let seeded: Vec<(Name, f64)> = self
                .int_gates
                .par_iter()
                .zip(y.par_iter())
                .map(|(name, v)| (name.clone(), *v))
                .collect();
            values.extend(seeded);
        }
        #[cfg(not(feature = "parallel-eval"))]
        {
            for (name, v) in self.int_gates.iter().zip(y.iter()) {
                values.insert(name.clone(), *v);
            }
        }

        for (name, gate) in self.circuit.gates() {
            if let Gate::Constant(v) = gate {
                values.insert(name.clone(), *v);
            }
        }
        values.insert(Name::t(), t);

        loop {
            let mut progressed = false;
            for (name, gate) in self.circuit.gates() {
                if values.contains_key(name) {
                    continue;
                }
                if let Some((x, yy)) = gate.inputs() {
                    if let (Some(a), Some(b)) = (value_of(&values, x), value_of(&values, yy)) {
                        if let Some(v) = gate.eval_binary(a, b) {
                            values.insert(name.clone(), v);
                            progressed = true;
                        }
                    }
                }
            }
            if !progressed {
                break;
            }
        }

        let stalled: Vec<String> = self
            .circuit
            .gates()
            .iter()
            .filter(|(name, gate)| !gate.is_int() && !values.contains_key(*name))
            .map(|(name, _)| name.to_string())
            .collect();
        if !stalled.is_empty() {
            return Err(SimError::AlgebraicCycle(stalled));
        }

        Ok(values)
    }
}

fn value_of(values: &HashMap<Name, f64>, name: &Name) -> Option<f64> {
    values.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_compile::{finalize, FinalizeOptions};
    use gpac_ir::builtins;

    #[test]
    fn exp_field_equals_state_at_every_point() {
        let mut exp = builtins::exp();
        finalize(&mut exp, FinalizeOptions::default()).unwrap();
        let field = VectorField::new(&exp).unwrap();
        let dydt = field.eval(&[2.0], 0.0).unwrap();
        assert_eq!(dydt, vec![2.0]);
    }

    #[test]
    fn rejects_non_finalized_circuit() {
        let exp = builtins::exp();
        assert!(matches!(VectorField::new(&exp), Err(SimError::NotFinalized(_))));
    }

    #[test]
    fn polynomial_has_no_state_variables() {
        let mut p = builtins::polynomial(&[1.0, 0.0, 1.0]);
        finalize(&mut p, FinalizeOptions::default()).unwrap();
        let field = VectorField::new(&p).unwrap();
        assert_eq!(field.dim(), 0);
        let dydt = field.eval(&[], 3.0).unwrap();
        assert!(dydt.is_empty());
    }
}
