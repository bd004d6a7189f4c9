//! Source-form dump: gate-by-gate declarations in the
//! external parser's "gate list" grammar, suitable to
//! round-trip a circuit back through it.
//!
//! The grammar's gate-list form (`Circuit <name>: <gate>: <spec> … ;`)
//! never pins down how the designated output is written down — there is
//! no separate "output" keyword. This dump adopts the convention that the
//! **last** gate declaration names the output, reordering the (otherwise
//! order-independent) gate list to put it there. The
//! one case that convention can't express is the identity circuit, whose
//! output is `t` itself with no gates at all; that one is written using
//! the grammar's alternate expression form instead (`Circuit <name> = t;`).

use std::io::Write;

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::ExportResult;

fn gate_spec(circuit: &Circuit, name: &Name, gate: &Gate) -> String {
    match gate {
        Gate::Constant(v) => format!("{v}"),
        Gate::Add(x, y) => format!("{x} + {y}"),
        Gate::Prod(x, y) => format!("{x} * {y}"),
        Gate::Int(x, y) => {
            let v0 = circuit.init_values().get(name).copied().unwrap_or(0.0);
            format!("int {x} d({y}) | {v0}")
        }
    }
}

/// Write `circuit` to `sink` as a source-form circuit declaration.
pub fn to_code(circuit: &Circuit, sink: &mut impl Write) -> ExportResult<()> {
    let output = circuit
        .output()
        .cloned()
        .ok_or_else(|| gpac_ir::IrError::NoOutput(circuit.name().to_string()))?;

    if circuit.gates().is_empty() {
        writeln!(sink, "Circuit {} = {};", circuit.name(), output)?;
        return Ok(());
    }

    writeln!(sink, "Circuit {}:", circuit.name())?;
    for (name, gate) in circuit.gates() {
        if *name == output {
            continue;
        }
        writeln!(sink, "  {}: {}", name, gate_spec(circuit, name, gate))?;
    }
    if let Some(gate) = circuit.gates().get(&output) {
        writeln!(sink, "  {}: {}", output, gate_spec(circuit, &output, gate))?;
    }
    writeln!(sink, ";")?;
    Ok(())
}
