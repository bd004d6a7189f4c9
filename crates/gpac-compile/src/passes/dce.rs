//! Dead-code elimination: erase every gate not
//! reachable from `output` by input edges.

use std::collections::BTreeSet;

use gpac_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;

/// The dead-code-elimination pass.
pub struct DeadCodeElimination;

impl Pass for DeadCodeElimination {
    fn name(&self) -> &str {
        "dead_code_elimination"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        dead_code_elimination(circuit);
        Ok(())
    }
}

/// Erase every gate unreachable from `output`. A no-op if `output` is
/// unset — the validator is what reports that as an error.
pub fn dead_code_elimination(circuit: &mut Circuit) {
    let Some(output) = circuit.output().cloned() else {
        return;
    };

    let mut reachable: BTreeSet<_> = BTreeSet::new();
    let mut stack = Vec::new();
    if !output.is_t() {
        stack.push(output);
    }
    while let Some(name) = stack.pop() {
        if !reachable.insert(name.clone()) {
            continue;
        }
        if let Some((x, y)) = circuit.gates().get(&name).and_then(|g| g.inputs()) {
            if !x.is_t() {
                stack.push(x.clone());
            }
            if !y.is_t() {
                stack.push(y.clone());
            }
        }
    }

    let dead: Vec<_> = circuit
        .gates()
        .keys()
        .filter(|name| !reachable.contains(*name))
        .cloned()
        .collect();
    for name in dead {
        let _ = circuit.erase_gate(&name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_ir::name::Name;

    #[test]
    fn erases_unreferenced_gate() {
        let mut c = Circuit::new("test");
        let live = c.add_const(Some(Name::from("live")), 1.0).unwrap();
        c.add_const(Some(Name::from("dead")), 2.0).unwrap();
        c.set_output(live);

        dead_code_elimination(&mut c);
        assert_eq!(c.gates().len(), 1);
        assert!(c.gates().contains_key(&Name::from("live")));
    }

    #[test]
    fn no_output_is_a_no_op() {
        let mut c = Circuit::new("test");
        c.add_const(Some(Name::from("orphan")), 1.0).unwrap();
        dead_code_elimination(&mut c);
        assert_eq!(c.gates().len(), 1);
    }
}
