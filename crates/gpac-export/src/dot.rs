//! DOT export: one rectangular node per gate, the output
//! gate double-bordered and red, an Int gate's `Y` edge omitted when
//! `Y = t` and dashed otherwise.

use std::io::Write;

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::ExportResult;

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_label(gate: &Gate) -> String {
    match gate {
        Gate::Constant(v) => format!("{v}"),
        Gate::Add(..) => "+".to_string(),
        Gate::Prod(..) => "\u{d7}".to_string(),
        Gate::Int(..) => "\u{222b}".to_string(),
    }
}

/// Write `circuit` to `sink` as a Graphviz DOT digraph.
///
/// Builtin block circuits are rendered the same as any other — `is_block`
/// is a naming/provenance flag, not a rendering one.
pub fn to_dot(circuit: &Circuit, sink: &mut impl Write) -> ExportResult<()> {
    writeln!(sink, "digraph \"{}\" {{", dot_escape(circuit.name()))?;
    writeln!(sink, "  node [shape=box];")?;

    let output = circuit.output();
    let mut t_referenced = false;

    for (name, gate) in circuit.gates() {
        let is_output = output == Some(name);
        let label = node_label(gate);
        if is_output {
            writeln!(
                sink,
                "  \"{}\" [label=\"{}\", peripheries=2, color=red];",
                dot_escape(name.as_str()),
                dot_escape(&label)
            )?;
        } else {
            writeln!(
                sink,
                "  \"{}\" [label=\"{}\"];",
                dot_escape(name.as_str()),
                dot_escape(&label)
            )?;
        }

        match gate {
            Gate::Constant(_) => {}
            Gate::Add(x, y) | Gate::Prod(x, y) => {
                t_referenced |= x.is_t() || y.is_t();
                write_edge(sink, x, name, None)?;
                write_edge(sink, y, name, None)?;
            }
            Gate::Int(x, y) => {
                t_referenced |= x.is_t();
                write_edge(sink, x, name, None)?;
                if !y.is_t() {
                    write_edge(sink, y, name, Some("dashed"))?;
                } else {
                    t_referenced = true;
                }
            }
        }
    }

    if matches!(output, Some(o) if o.is_t()) {
        t_referenced = true;
    }
    if t_referenced {
        writeln!(sink, "  \"t\" [label=\"t\"];")?;
    }

    writeln!(sink, "}}")?;
    Ok(())
}

fn write_edge(
    sink: &mut impl Write,
    from: &Name,
    to: &Name,
    style: Option<&str>,
) -> ExportResult<()> {
    match style {
        Some(s) => writeln!(
            sink,
            "  \"{}\" -> \"{}\" [style={}];",
            dot_escape(from.as_str()),
            dot_escape(to.as_str()),
            s
        )?,
        None => writeln!(
            sink,
            "  \"{}\" -> \"{}\";",
            dot_escape(from.as_str()),
            dot_escape(to.as_str())
        )?,
    }
    Ok(())
}
