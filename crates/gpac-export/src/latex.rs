//! LaTeX pIVP export: render a finalized circuit as
//! `{ xᵢ' = polynomial, y = polynomial }` by structural recursion over the
//! output gate and each Int gate's integrand, normalizing every polynomial
//! to a sum of [`Term`]s (coefficient times a product of monomials).

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use gpac_ir::gate::Gate;
use gpac_ir::name::Name;
use gpac_ir::Circuit;

use crate::error::{ExportError, ExportResult};

/// A single monomial term: `coefficient * prod(var^exponent)`.
#[derive(Debug, Clone)]
struct Term {
    coeff: f64,
    vars: BTreeMap<Name, u32>,
}

impl Term {
    fn constant(c: f64) -> Self {
        Term { coeff: c, vars: BTreeMap::new() }
    }

    fn variable(name: Name) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(name, 1);
        Term { coeff: 1.0, vars }
    }

    fn multiply(&self, other: &Term) -> Term {
        let mut vars = self.vars.clone();
        for (name, exp) in &other.vars {
            *vars.entry(name.clone()).or_insert(0) += exp;
        }
        Term { coeff: self.coeff * other.coeff, vars }
    }

    fn key(&self) -> Vec<(String, u32)> {
        self.vars.iter().map(|(n, e)| (n.as_str().to_string(), *e)).collect()
    }
}

/// Expand `name`'s defining expression into a sum-of-monomials normal
/// form, structurally recursing through `Constant`/`Add`/`Prod` gates and
/// treating `Int` gates (and `t`) as atomic variables — exactly the shape
/// a pIVP's right-hand side has: a polynomial in the *other* state
/// variables and `t`, never expanded through an integration.
fn terms_of(circuit: &Circuit, name: &Name, memo: &mut HashMap<Name, Vec<Term>>) -> Vec<Term> {
    if name.is_t() {
        return vec![Term::variable(name.clone())];
    }
    if let Some(cached) = memo.get(name) {
        return cached.clone();
    }

    let terms = match circuit.gates().get(name) {
        Some(Gate::Constant(v)) => vec![Term::constant(*v)],
        Some(Gate::Add(x, y)) => {
            let mut xs = terms_of(circuit, x, memo);
            xs.extend(terms_of(circuit, y, memo));
            xs
        }
        Some(Gate::Prod(x, y)) => {
            let xs = terms_of(circuit, x, memo);
            let ys = terms_of(circuit, y, memo);
            let mut out = Vec::with_capacity(xs.len() * ys.len());
            for a in &xs {
                for b in &ys {
                    out.push(a.multiply(b));
                }
            }
            out
        }
        Some(Gate::Int(..)) | None => vec![Term::variable(name.clone())],
    };

    memo.insert(name.clone(), terms.clone());
    terms
}

/// Merge terms sharing the same monomial (e.g. from `x + x`) and drop any
/// that collapse to an exact-zero coefficient, keeping a deterministic
/// order (lexicographic on the monomial's variable/exponent pairs).
fn merge_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut merged: BTreeMap<Vec<(String, u32)>, Term> = BTreeMap::new();
    for term in terms {
        merged
            .entry(term.key())
            .and_modify(|t| t.coeff += term.coeff)
            .or_insert(term);
    }
    merged.into_values().filter(|t| t.coeff != 0.0).collect()
}

/// LaTeX-safe rendering of a gate name: generated `_<k>` names become the
/// conventional pIVP variable `x_k`; user names are wrapped in `\mathrm{}`
/// with underscores escaped.
fn latex_name(name: &Name) -> String {
    if name.is_t() {
        return "t".to_string();
    }
    match name.as_str().strip_prefix('_') {
        Some(rest) => format!("x_{{{rest}}}"),
        None => format!("\\mathrm{{{}}}", name.as_str().replace('_', "\\_")),
    }
}

fn term_to_latex(term: &Term) -> String {
    if term.vars.is_empty() {
        return format!("{}", term.coeff);
    }
    let mut s = String::new();
    if term.coeff != 1.0 {
        s.push_str(&format!("{}", term.coeff));
    }
    for (name, exp) in &term.vars {
        let v = latex_name(name);
        if *exp == 1 {
            s.push_str(&v);
        } else {
            s.push_str(&format!("{v}^{{{exp}}}"));
        }
    }
    s
}

fn poly_to_latex(circuit: &Circuit, name: &Name, memo: &mut HashMap<Name, Vec<Term>>) -> String {
    let terms = merge_terms(terms_of(circuit, name, memo));
    if terms.is_empty() {
        return "0".to_string();
    }
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        let negative = term.coeff < 0.0;
        let magnitude = Term { coeff: term.coeff.abs(), vars: term.vars.clone() };
        if i == 0 {
            if negative {
                out.push('-');
            }
        } else {
            out.push_str(if negative { " - " } else { " + " });
        }
        out.push_str(&term_to_latex(&magnitude));
    }
    out
}

/// Write `circuit` (already finalized) to `sink` as a LaTeX `align*` block
/// giving every Int gate's differential equation followed by the output
/// equation.
pub fn to_latex(circuit: &Circuit, sink: &mut impl Write) -> ExportResult<()> {
    if !circuit.is_finalized() {
        return Err(ExportError::NotFinalized(circuit.name().to_string()));
    }
    let output = circuit
        .output()
        .cloned()
        .ok_or_else(|| gpac_ir::IrError::NoOutput(circuit.name().to_string()))?;

    let mut memo: HashMap<Name, Vec<Term>> = HashMap::new();
    writeln!(sink, "\\begin{{align*}}")?;

    for int_gate in circuit.int_gates().unwrap_or(&[]) {
        let Gate::Int(x, _y) = circuit.gates().get(int_gate).expect("int_gates cache is stale")
        else {
            unreachable!("int_gates cache only ever names Int gates");
        };
        let rhs = poly_to_latex(circuit, x, &mut memo);
        writeln!(sink, "  {}' &= {} \\\\", latex_name(int_gate), rhs)?;
    }

    let y_rhs = poly_to_latex(circuit, &output, &mut memo);
    writeln!(sink, "  y &= {y_rhs}")?;
    writeln!(sink, "\\end{{align*}}")?;
    Ok(())
}
