//! Structural validation:
//! every Binary gate's inputs must be `t` or a present gate, every `Int`
//! gate's differential must be `t` (i.e. the circuit is normalized), and
//! `output` must be set and point at `t` or a present gate.

use gpac_ir::gate::Gate;
use gpac_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};

/// The structural validation pass. An [`Pass::kind`] of
/// [`PassKind::Analysis`] since it never mutates the circuit.
pub struct Validate;

impl Pass for Validate {
    fn name(&self) -> &str {
        "validate"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        validate(circuit)
    }
}

/// Check the structural invariants a finalizable circuit must satisfy.
/// Does not check that every `Int` has an initial value —
/// `finalize` checks that separately, since it's a finalize-specific
/// requirement rather than a general circuit well-formedness rule.
pub fn validate(circuit: &Circuit) -> CompileResult<()> {
    for (name, gate) in circuit.gates() {
        if let Some((x, y)) = gate.inputs() {
            check_present(circuit, name, x)?;
            check_present(circuit, name, y)?;
        }
        if let Gate::Int(_, y) = gate {
            if !y.is_t() {
                return Err(CompileError::NotNormalized(name.to_string()));
            }
        }
    }

    match circuit.output() {
        None => Err(CompileError::InvalidOutput),
        Some(output) if output.is_t() => Ok(()),
        Some(output) if circuit.gates().contains_key(output) => Ok(()),
        Some(_) => Err(CompileError::InvalidOutput),
    }
}

fn check_present(
    circuit: &Circuit,
    consumer: &gpac_ir::name::Name,
    input: &gpac_ir::name::Name,
) -> CompileResult<()> {
    if input.is_t() || circuit.gates().contains_key(input) {
        Ok(())
    } else {
        Err(CompileError::UnknownInput {
            gate: consumer.to_string(),
            input: input.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_ir::builtins;
    use gpac_ir::name::Name;

    #[test]
    fn exp_is_valid() {
        let exp = builtins::exp();
        validate(&exp).unwrap();
    }

    #[test]
    fn missing_output_is_rejected() {
        let c = Circuit::new("test");
        assert!(matches!(validate(&c), Err(CompileError::InvalidOutput)));
    }

    #[test]
    fn dangling_input_is_rejected() {
        let mut c = Circuit::new("test").without_validation();
        let sum = c
            .add_add(Some(Name::from("sum")), Name::from("ghost"), Name::t())
            .unwrap();
        c.set_output(sum);
        assert!(matches!(validate(&c), Err(CompileError::UnknownInput { .. })));
    }

    #[test]
    fn unnormalized_int_is_rejected() {
        let mut c = Circuit::new("test").without_validation();
        let k = c.add_const(Some(Name::from("k")), 3.0).unwrap();
        let x = c.add_const(Some(Name::from("x")), 1.0).unwrap();
        let g = c.add_int(None, x, k, Some(0.0)).unwrap();
        c.set_output(g);
        assert!(matches!(validate(&c), Err(CompileError::NotNormalized(_))));
    }
}
