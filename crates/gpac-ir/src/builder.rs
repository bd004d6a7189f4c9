//! Structural composition: the operators that only ever splice gate maps
//! together and never need re-normalization.
//!
//! `compose`, `derivate`, `invert`, and `iterate` need the normalizer
//! and/or the single-point evaluator and live in `gpac-algebra` instead —
//! see that crate's module docs and DESIGN.md for why.

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::name::Name;

fn require_output(c: &Circuit) -> IrResult<Name> {
    c.output()
        .cloned()
        .ok_or_else(|| IrError::NoOutput(c.name().to_string()))
}

/// Find an existing `Constant` gate with value `c`, if one exists, so
/// scalar ops and `add`/`mul` against a literal constant reuse it rather
/// than inserting a duplicate.
fn find_constant(circuit: &Circuit, value: f64) -> Option<Name> {
    circuit
        .gates()
        .iter()
        .find(|(_, g)| matches!(g, Gate::Constant(v) if *v == value))
        .map(|(name, _)| name.clone())
}

fn constant_gate(circuit: &mut Circuit, value: f64) -> Name {
    find_constant(circuit, value).unwrap_or_else(|| {
        circuit
            .add_const(None, value)
            .expect("inserting a fresh constant gate cannot fail")
    })
}

/// `A + B`: splice `B` into a clone of `A` and add one fresh `Add` gate on
/// top of their outputs.
pub fn add(a: &Circuit, b: &Circuit) -> IrResult<Circuit> {
    let oa = require_output(a)?;
    let ob = require_output(b)?;
    let mut out = a.clone();
    let ob_in_out = out.splice(b);
    let _ = ob; // ob was B's output before splicing; ob_in_out is its name after.
    let sum = out.add_add(None, oa, ob_in_out)?;
    out.set_output(sum);
    Ok(out)
}

/// `A + c`: reuse or create a `Constant(c)` gate and add it to `A`'s output.
pub fn add_scalar(a: &Circuit, c: f64) -> IrResult<Circuit> {
    let oa = require_output(a)?;
    let mut out = a.clone();
    let k = constant_gate(&mut out, c);
    let sum = out.add_add(None, oa, k)?;
    out.set_output(sum);
    Ok(out)
}

/// `A * B`: splice `B` into a clone of `A` and add one fresh `Prod` gate.
pub fn mul(a: &Circuit, b: &Circuit) -> IrResult<Circuit> {
    let oa = require_output(a)?;
    let mut out = a.clone();
    let ob_in_out = out.splice(b);
    let prod = out.add_prod(None, oa, ob_in_out)?;
    out.set_output(prod);
    Ok(out)
}

/// `A * c`.
pub fn mul_scalar(a: &Circuit, c: f64) -> IrResult<Circuit> {
    let oa = require_output(a)?;
    let mut out = a.clone();
    let k = constant_gate(&mut out, c);
    let prod = out.add_prod(None, oa, k)?;
    out.set_output(prod);
    Ok(out)
}

/// `A - B = A + (-1) * B`.
pub fn sub(a: &Circuit, b: &Circuit) -> IrResult<Circuit> {
    let neg_b = mul_scalar(b, -1.0)?;
    add(a, &neg_b)
}

/// `Integrate(A w.r.t. B, init)`: splice `B` into a clone of `A` and add a
/// fresh `Int` gate `(oA, oB)` with the given initial value.
pub fn integrate(a: &Circuit, b: &Circuit, init: f64) -> IrResult<Circuit> {
    let oa = require_output(a)?;
    let mut out = a.clone();
    let ob_in_out = out.splice(b);
    let int_gate = out.add_int(None, oa, ob_in_out, Some(init))?;
    out.set_output(int_gate);
    Ok(out)
}

/// Integrate with respect to `t` directly, without splicing a second
/// circuit — the common case (`int x dt`).
pub fn integrate_wrt_t(a: &Circuit, init: f64) -> IrResult<Circuit> {
    let oa = require_output(a)?;
    let mut out = a.clone();
    let int_gate = out.add_int(None, oa, Name::t(), Some(init))?;
    out.set_output(int_gate);
    Ok(out)
}

impl std::ops::Add for &Circuit {
    type Output = IrResult<Circuit>;
    fn add(self, rhs: &Circuit) -> IrResult<Circuit> {
        add(self, rhs)
    }
}

impl std::ops::Mul for &Circuit {
    type Output = IrResult<Circuit>;
    fn mul(self, rhs: &Circuit) -> IrResult<Circuit> {
        mul(self, rhs)
    }
}

impl std::ops::Sub for &Circuit {
    type Output = IrResult<Circuit>;
    fn sub(self, rhs: &Circuit) -> IrResult<Circuit> {
        sub(self, rhs)
    }
}
