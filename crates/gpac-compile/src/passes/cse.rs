//! Common-subexpression elimination: merge gates
//! that are structurally identical — same kind, same (canonicalized)
//! inputs, and for `Int` the same initial value — into one gate, rewiring
//! every consumer to the survivor.
//!
//! Run after canonicalization so that `Add`/`Prod` inputs are already in a
//! consistent order; two occurrences of `a + b` and `b + a` only compare
//! equal once both have been sorted the same way. Iterates to a fixpoint:
//! merging a pair of leaves can make their parents structurally equal too,
//! so one pass is not always enough.

use std::collections::HashMap;

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;

/// The common-subexpression-elimination pass.
pub struct CommonSubexpressionElimination;

impl Pass for CommonSubexpressionElimination {
    fn name(&self) -> &str {
        "cse"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        common_subexpression_elimination(circuit);
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum Key {
    Constant(u64),
    Add(Name, Name),
    Prod(Name, Name),
    Int(Name, Name, Option<u64>),
}

fn canonical_pair(x: &Name, y: &Name) -> (Name, Name) {
    if x <= y {
        (x.clone(), y.clone())
    } else {
        (y.clone(), x.clone())
    }
}

/// Prefer a user-given name over a generated one; tie-break lexicographic.
fn better(a: &Name, b: &Name) -> bool {
    match (a.is_generated(), b.is_generated()) {
        (false, true) => true,
        (true, false) => false,
        _ => a < b,
    }
}

/// Merge structurally-equal gates until no more merges are possible.
pub fn common_subexpression_elimination(circuit: &mut Circuit) {
    loop {
        let mut groups: HashMap<Key, Vec<Name>> = HashMap::new();
        for (name, gate) in circuit.gates() {
            let key = match gate {
                Gate::Constant(v) => Key::Constant(v.to_bits()),
                Gate::Add(x, y) => {
                    let (a, b) = canonical_pair(x, y);
                    Key::Add(a, b)
                }
                Gate::Prod(x, y) => {
                    let (a, b) = canonical_pair(x, y);
                    Key::Prod(a, b)
                }
                Gate::Int(x, y) => {
                    let init = circuit.init_values().get(name).map(|v| v.to_bits());
                    Key::Int(x.clone(), y.clone(), init)
                }
            };
            groups.entry(key).or_default().push(name.clone());
        }

        let mut merged_any = false;
        for (_key, mut names) in groups {
            if names.len() < 2 {
                continue;
            }
            names.sort_by(|a, b| {
                if better(a, b) {
                    std::cmp::Ordering::Less
                } else if better(b, a) {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            });
            let winner = names[0].clone();
            for loser in &names[1..] {
                circuit.rename_inputs(loser, &winner);
                if circuit.output() == Some(loser) {
                    circuit.set_output(winner.clone());
                }
                let _ = circuit.erase_gate(loser);
                merged_any = true;
            }
        }

        if !merged_any {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpac_ir::builder;
    use gpac_ir::builtins;

    #[test]
    fn merges_two_identical_exp_instantiations() {
        let exp = builtins::exp();
        let sum = builder::add(&exp, &exp).unwrap();
        let mut c = sum;

        let before = c.gates().len();
        common_subexpression_elimination(&mut c);
        assert!(c.gates().len() < before);
    }

    #[test]
    fn merges_duplicate_constants() {
        let mut c = Circuit::new("test");
        let a = c.add_const(Some(Name::from("a")), 1.0).unwrap();
        let b = c.add_const(Some(Name::from("b")), 1.0).unwrap();
        let sum = c.add_add(None, a, b).unwrap();
        c.set_output(sum);

        common_subexpression_elimination(&mut c);
        assert_eq!(c.gates().values().filter(|g| g.is_constant()).count(), 1);
    }
}
