//! Canonicalization: sort the inputs of every
//! commutative gate (`Add`, `Prod`) lexicographically. Makes two
//! structurally-equal sub-expressions compare equal regardless of
//! construction order, which is what lets CSE find them.

use gpac_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;

/// The canonicalization pass.
pub struct Canonicalize;

impl Pass for Canonicalize {
    fn name(&self) -> &str {
        "canonicalize"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        canonicalize(circuit);
        Ok(())
    }
}

/// Sort every commutative gate's inputs in place.
pub fn canonicalize(circuit: &mut Circuit) {
    for gate in circuit.gates_mut().values_mut() {
        gate.canonicalize();
    }
    circuit.invalidate();
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_ir::gate::Gate;
    use gpac_ir::name::Name;

    #[test]
    fn reorders_add_inputs() {
        let mut c = Circuit::new("test");
        let y = c.add_const(Some(Name::from("y")), 1.0).unwrap();
        let x = c.add_const(Some(Name::from("x")), 2.0).unwrap();
        let sum = c.add_add(Some(Name::from("sum")), y, x).unwrap();

        canonicalize(&mut c);
        assert_eq!(
            c.gates().get(&sum),
            Some(&Gate::Add(Name::from("x"), Name::from("y")))
        );
    }

    #[test]
    fn leaves_int_inputs_alone() {
        let mut c = Circuit::new("test");
        let w = c.add_const(Some(Name::from("w")), 1.0).unwrap();
        let g = c.add_int(Some(Name::from("g")), w.clone(), Name::t(), Some(0.0)).unwrap();
        canonicalize(&mut c);
        assert_eq!(c.gates().get(&g), Some(&Gate::Int(w, Name::t())));
    }
}
