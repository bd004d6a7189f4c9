//! The builtin circuit library: small, self-contained
//! `Circuit`s with their output and any required initial values already
//! set, ready to be spliced into a larger circuit by the algebraic
//! builder.
//!
//! Every entry here is built directly with [`Circuit`]'s low-level
//! gate-insertion API rather than through `gpac_ir::builder`'s free
//! functions, because several of them (`Sin`/`Cos`, `Exp`, `Inverse`)
//! are genuinely self-referential or mutually-cyclic — a shape that
//! `Circuit::add_int` supports by design (see its doc comment) but that
//! `builder`'s splice-based composers don't need to produce.

use crate::circuit::Circuit;
use crate::name::Name;

/// `t` itself: a circuit with no gates, whose output is the independent
/// variable directly.
pub fn identity() -> Circuit {
    let mut c = Circuit::new("Identity").as_block();
    c.set_output(Name::t());
    c
}

/// A single `Constant(c)` gate.
pub fn constant(value: f64) -> Circuit {
    let mut c = Circuit::new("Constant").as_block();
    let k = c
        .add_const(None, value)
        .expect("inserting a constant gate cannot fail");
    c.set_output(k);
    c
}

/// `exp' = exp`, `exp(0) = 1` — the single-gate self-referential case
/// that motivated `add_int` not eagerly checking input existence.
pub fn exp() -> Circuit {
    let mut c = Circuit::new("Exp").as_block();
    let e = c.fresh_name();
    let out = c
        .add_int(Some(e.clone()), e, Name::t(), Some(1.0))
        .expect("exp builtin is well-formed");
    c.set_output(out);
    c
}

/// Build the mutually-recursive `sin(omega * t)` / `cos(omega * t)` pair
/// inside `c`, returning `(sin_name, cos_name)`.
///
/// `sin' = omega * cos`, `sin(0) = 0`; `cos' = -omega * sin`, `cos(0) = 1`.
/// The three gates (`sin`, `cos`, and the `-omega*sin` product feeding
/// `cos`'s integrator) form a genuine 3-cycle: no insertion order exists
/// that has every gate's inputs already present, which is exactly the
/// case `Circuit::add_add`/`add_prod`/`add_int` are required to tolerate.
fn sin_cos_pair(c: &mut Circuit, omega: f64) -> (Name, Name) {
    let neg_omega = c
        .add_const(None, -omega)
        .expect("inserting a constant gate cannot fail");
    let sin_name = c.fresh_name();
    let cos_name = c.fresh_name();
    let neg_omega_sin = c
        .add_prod(None, neg_omega, sin_name.clone())
        .expect("inserting a product gate cannot fail");
    let sin_out = c
        .add_int(Some(sin_name.clone()), cos_name.clone(), Name::t(), Some(0.0))
        .expect("sin/cos builtin is well-formed");
    let cos_out = c
        .add_int(Some(cos_name.clone()), neg_omega_sin, Name::t(), Some(1.0))
        .expect("sin/cos builtin is well-formed");
    (sin_out, cos_out)
}

/// `Sin`: `sin(t)`.
pub fn sin() -> Circuit {
    let mut c = Circuit::new("Sin").as_block();
    let (sin_name, _) = sin_cos_pair(&mut c, 1.0);
    c.set_output(sin_name);
    c
}

/// `Cos`: `cos(t)`.
pub fn cos() -> Circuit {
    let mut c = Circuit::new("Cos").as_block();
    let (_, cos_name) = sin_cos_pair(&mut c, 1.0);
    c.set_output(cos_name);
    c
}

/// `Tan`: `tan' = 1 + tan^2`, `tan(0) = 0`.
pub fn tan() -> Circuit {
    let mut c = Circuit::new("Tan").as_block();
    let one = c.add_const(None, 1.0).expect("const gate");
    let tan_name = c.fresh_name();
    let tan_sq = c
        .add_prod(None, tan_name.clone(), tan_name.clone())
        .expect("prod gate");
    let sum = c.add_add(None, one, tan_sq).expect("add gate");
    let out = c
        .add_int(Some(tan_name), sum, Name::t(), Some(0.0))
        .expect("tan builtin is well-formed");
    c.set_output(out);
    c
}

/// `Arctan`: the auxiliary-integration construction for `1/(1+t^2)`
///
/// integrated once more to give `arctan(t)`.
pub fn arctan() -> Circuit {
    let mut c = Circuit::new("Arctan").as_block();
    let neg_two = c.add_const(None, -2.0).expect("const gate");
    let neg_two_t = c.add_prod(None, neg_two, Name::t()).expect("prod gate");
    let z_name = c.fresh_name();
    let z_sq = c
        .add_prod(None, z_name.clone(), z_name.clone())
        .expect("prod gate");
    let integrand = c.add_prod(None, neg_two_t, z_sq).expect("prod gate");
    let z = c
        .add_int(Some(z_name), integrand, Name::t(), Some(1.0))
        .expect("arctan builtin is well-formed");
    let out = c
        .add_int(None, z, Name::t(), Some(0.0))
        .expect("arctan builtin is well-formed");
    c.set_output(out);
    c
}

/// `Tanh`: `tanh' = 1 - tanh^2`, `tanh(0) = 0`.
pub fn tanh() -> Circuit {
    let mut c = Circuit::new("Tanh").as_block();
    let out = tanh_scaled(&mut c, 1.0, 0.0);
    c.set_output(out);
    c
}

/// Insert `y = tanh(mu * (t - shift))` into `c`, returning `y`'s name.
///
/// `y' = mu * (1 - y^2)`, `y(0) = tanh(-mu * shift)` (the initial value
/// is a plain number computed once, via [`f64::tanh`], not by evaluating
/// any circuit). Shared by `Tanh`, `Sgn`, `Abs`, and `Lxh`, all of which
/// are smooth approximations built from a shifted, scaled logistic-style
/// switch — the standard trick for turning the non-differentiable sign
/// and absolute-value functions into GPAC-representable ones.
fn tanh_scaled(c: &mut Circuit, mu: f64, shift: f64) -> Name {
    let one = c.add_const(None, 1.0).expect("const gate");
    let neg_one = c.add_const(None, -1.0).expect("const gate");
    let mu_const = c.add_const(None, mu).expect("const gate");
    let y_name = c.fresh_name();
    let y_sq = c
        .add_prod(None, y_name.clone(), y_name.clone())
        .expect("prod gate");
    let neg_y_sq = c.add_prod(None, neg_one, y_sq).expect("prod gate");
    let one_minus_y_sq = c.add_add(None, one, neg_y_sq).expect("add gate");
    let rate = c
        .add_prod(None, mu_const, one_minus_y_sq)
        .expect("prod gate");
    let init = (-mu * shift).tanh();
    c.add_int(Some(y_name), rate, Name::t(), Some(init))
        .expect("tanh_scaled builtin is well-formed")
}

/// `Sqrt`: `sqrt(t + 1)`, shifted by one to keep the construction
/// non-singular at `t = 0` (`Sqrt(0)` has no finite derivative).
///
/// `z = 1/sqrt(t+1)` satisfies `z' = -z^3 / 2`, `z(0) = 1`; `y = sqrt(t+1)`
/// then satisfies `y' = z / 2`, `y(0) = 1`.
pub fn sqrt() -> Circuit {
    let mut c = Circuit::new("Sqrt").as_block();
    let half = c.add_const(None, 0.5).expect("const gate");
    let neg_half = c.add_const(None, -0.5).expect("const gate");
    let z_name = c.fresh_name();
    let z_sq = c
        .add_prod(None, z_name.clone(), z_name.clone())
        .expect("prod gate");
    let z_cubed = c.add_prod(None, z_sq, z_name.clone()).expect("prod gate");
    let z_rate = c.add_prod(None, neg_half, z_cubed).expect("prod gate");
    let z = c
        .add_int(Some(z_name), z_rate, Name::t(), Some(1.0))
        .expect("sqrt builtin is well-formed");
    let y_rate = c.add_prod(None, half, z).expect("prod gate");
    let y = c
        .add_int(None, y_rate, Name::t(), Some(1.0))
        .expect("sqrt builtin is well-formed");
    c.set_output(y);
    c
}

/// `Inverse`: `1/(t + 1)`, shifted by one for the same reason as [`sqrt`].
/// `z' = -z^2`, `z(0) = 1` — the `A = Identity + 1`, `A' = 1` case of the
/// general `1/A` auxiliary-integration construction, applied directly.
pub fn inverse() -> Circuit {
    let mut c = Circuit::new("Inverse").as_block();
    let neg_one = c.add_const(None, -1.0).expect("const gate");
    let z_name = c.fresh_name();
    let z_sq = c
        .add_prod(None, z_name.clone(), z_name.clone())
        .expect("prod gate");
    let rate = c.add_prod(None, neg_one, z_sq).expect("prod gate");
    let out = c
        .add_int(Some(z_name), rate, Name::t(), Some(1.0))
        .expect("inverse builtin is well-formed");
    c.set_output(out);
    c
}

/// `Exp2`: `2^t = exp(t * ln 2)`. `y' = ln(2) * y`, `y(0) = 1`.
pub fn exp2() -> Circuit {
    let mut c = Circuit::new("Exp2").as_block();
    let ln2 = c
        .add_const(None, std::f64::consts::LN_2)
        .expect("const gate");
    let y_name = c.fresh_name();
    let rate = c.add_prod(None, ln2, y_name.clone()).expect("prod gate");
    let out = c
        .add_int(Some(y_name), rate, Name::t(), Some(1.0))
        .expect("exp2 builtin is well-formed");
    c.set_output(out);
    c
}

/// `PowerPower2(n)`: `t^(2^n)`, built by `n` repeated squarings of `t`
/// with plain `Prod` gates — no integration needed, since this is a
/// monomial rather than a differential equation.
pub fn power_power2(n: u32) -> Circuit {
    let mut c = Circuit::new(format!("PowerPower2({n})")).as_block();
    let mut cur = Name::t();
    for _ in 0..n {
        cur = c
            .add_prod(None, cur.clone(), cur)
            .expect("inserting a product gate cannot fail");
    }
    c.set_output(cur);
    c
}

/// `Polynomial(coeffs)`: `coeffs[0] + coeffs[1]*t + ... + coeffs[n]*t^n`,
/// built by Horner's method with plain `Add`/`Prod` gates. Empty `coeffs`
/// gives the zero circuit.
pub fn polynomial(coeffs: &[f64]) -> Circuit {
    let mut c = Circuit::new("Polynomial").as_block();
    let out = if coeffs.is_empty() {
        c.add_const(None, 0.0).expect("const gate")
    } else {
        let (last, rest) = coeffs.split_last().expect("checked non-empty above");
        let mut acc = c.add_const(None, *last).expect("const gate");
        for &coef in rest.iter().rev() {
            let scaled = c.add_prod(None, acc, Name::t()).expect("prod gate");
            let k = c.add_const(None, coef).expect("const gate");
            acc = c.add_add(None, scaled, k).expect("add gate");
        }
        acc
    };
    c.set_output(out);
    c
}

/// `L2(alpha)`: a smooth, monotone 0→1 switch along `t`, built as
/// logistic growth `y' = alpha * y * (1 - y)`, `y(0) = 0.5`.
pub fn l2(alpha: f64) -> Circuit {
    let mut c = Circuit::new("L2").as_block();
    let one = c.add_const(None, 1.0).expect("const gate");
    let neg_one = c.add_const(None, -1.0).expect("const gate");
    let alpha_const = c.add_const(None, alpha).expect("const gate");
    let y_name = c.fresh_name();
    let neg_y = c.add_prod(None, neg_one, y_name.clone()).expect("prod gate");
    let one_minus_y = c.add_add(None, one, neg_y).expect("add gate");
    let y_one_minus_y = c
        .add_prod(None, y_name.clone(), one_minus_y)
        .expect("prod gate");
    let rate = c
        .add_prod(None, alpha_const, y_one_minus_y)
        .expect("prod gate");
    let out = c
        .add_int(Some(y_name), rate, Name::t(), Some(0.5))
        .expect("l2 builtin is well-formed");
    c.set_output(out);
    c
}

/// `Sgn(mu)`: `tanh(mu * t)`, a smooth sign approximation that sharpens
/// towards the discontinuous sign function as `mu` grows.
pub fn sgn(mu: f64) -> Circuit {
    let mut c = Circuit::new("Sgn").as_block();
    let out = tanh_scaled(&mut c, mu, 0.0);
    c.set_output(out);
    c
}

/// `Abs(delta)`: `t * tanh(t / delta)`, a smooth absolute value that
/// sharpens towards `|t|` as `delta` shrinks towards zero.
pub fn abs(delta: f64) -> Circuit {
    let mut c = Circuit::new("Abs").as_block();
    let sgn_t = tanh_scaled(&mut c, 1.0 / delta, 0.0);
    let out = c.add_prod(None, Name::t(), sgn_t).expect("prod gate");
    c.set_output(out);
    c
}

/// `Ip1(mu)`: `mu * (1 - tanh(mu*t)^2)`, the instantaneous rate term
/// from [`sgn`]'s own construction taken as an output in its own right —
/// a smooth bump localized around `t = 0` that sharpens as `mu` grows.
pub fn ip1(mu: f64) -> Circuit {
    let mut c = Circuit::new("Ip1").as_block();
    let one = c.add_const(None, 1.0).expect("const gate");
    let neg_one = c.add_const(None, -1.0).expect("const gate");
    let mu_const = c.add_const(None, mu).expect("const gate");
    let y_name = c.fresh_name();
    let y_sq = c
        .add_prod(None, y_name.clone(), y_name.clone())
        .expect("prod gate");
    let neg_y_sq = c.add_prod(None, neg_one, y_sq).expect("prod gate");
    let one_minus_y_sq = c.add_add(None, one, neg_y_sq).expect("add gate");
    let rate = c
        .add_prod(None, mu_const, one_minus_y_sq)
        .expect("prod gate");
    let init = 0.0_f64.tanh();
    let y = c
        .add_int(Some(y_name), rate, Name::t(), Some(init))
        .expect("ip1 builtin is well-formed");
    let y_sq_out = c.add_prod(None, y.clone(), y).expect("prod gate");
    let neg_y_sq_out = c.add_prod(None, neg_one, y_sq_out).expect("prod gate");
    let one_minus = c.add_add(None, one, neg_y_sq_out).expect("add gate");
    let out = c.add_prod(None, mu_const, one_minus).expect("prod gate");
    c.set_output(out);
    c
}

/// `Lxh(x0, h)`: a smooth step centered at `x0` with width `h`,
/// `0.5 * (1 + tanh((t - x0) / h))`.
pub fn lxh(x0: f64, h: f64) -> Circuit {
    let mut c = Circuit::new("Lxh").as_block();
    let y = tanh_scaled(&mut c, 1.0 / h, x0);
    let one = c.add_const(None, 1.0).expect("const gate");
    let half = c.add_const(None, 0.5).expect("const gate");
    let one_plus_y = c.add_add(None, one, y).expect("add gate");
    let out = c.add_prod(None, half, one_plus_y).expect("prod gate");
    c.set_output(out);
    c
}

/// `Select`: the unparameterized smooth step at the origin,
/// `Lxh(0, 1)` — chooses between its two implicit branches (0 below `t`,
/// 1 above) by the sign of `t`.
pub fn select() -> Circuit {
    let mut c = lxh(0.0, 1.0);
    c.set_name("Select");
    c
}

/// `Max`: a smooth approximation of `max(t, 0)`, `(t + |t|) / 2`, using
/// [`abs`] with a small fixed smoothing width.
pub fn max() -> Circuit {
    let mut c = Circuit::new("Max").as_block();
    let abs_t = abs_into(&mut c, 0.01);
    let sum = c.add_add(None, Name::t(), abs_t).expect("add gate");
    let half = c.add_const(None, 0.5).expect("const gate");
    let out = c.add_prod(None, sum, half).expect("prod gate");
    c.set_output(out);
    c
}

/// Insert [`abs`]'s gates directly into `c` (rather than building a
/// separate circuit and splicing it), returning the output name. Shared
/// by [`max`].
fn abs_into(c: &mut Circuit, delta: f64) -> Name {
    let sgn_t = tanh_scaled(c, 1.0 / delta, 0.0);
    c.add_prod(None, Name::t(), sgn_t).expect("prod gate")
}

/// `Mod10`: a period-10 trigonometric interpolant through the decimal
/// digit sequence `0, 1, ..., 9` at integer `t`, computed offline as a
/// 6-term discrete Fourier series and built here from five internal
/// `sin(omega*t)`/`cos(omega*t)` pairs.
pub fn mod10() -> Circuit {
    const A0: f64 = 4.5;
    const HARMONICS: [(f64, f64); 4] = [
        (-1.0, -3.0776835371752536),
        (-1.0, -1.3763819204711736),
        (-1.0, -0.7265425280053606),
        (-1.0, -0.3249196962329055),
    ];
    const A5: f64 = -0.5;

    let mut c = Circuit::new("Mod10").as_block();
    let mut out = c.add_const(None, A0).expect("const gate");
    for (k, &(a_k, b_k)) in HARMONICS.iter().enumerate() {
        let omega = std::f64::consts::TAU * (k as f64 + 1.0) / 10.0;
        let (sin_k, cos_k) = sin_cos_pair(&mut c, omega);
        let a_const = c.add_const(None, a_k).expect("const gate");
        let b_const = c.add_const(None, b_k).expect("const gate");
        let a_term = c.add_prod(None, a_const, cos_k).expect("prod gate");
        let b_term = c.add_prod(None, b_const, sin_k).expect("prod gate");
        let harmonic = c.add_add(None, a_term, b_term).expect("add gate");
        out = c.add_add(None, out, harmonic).expect("add gate");
    }
    // k = 5 is the Nyquist term: cos(pi*t), no paired sine.
    let (_, cos_nyquist) = sin_cos_pair(&mut c, std::f64::consts::PI);
    let a5_const = c.add_const(None, A5).expect("const gate");
    let nyquist_term = c.add_prod(None, a5_const, cos_nyquist).expect("prod gate");
    out = c.add_add(None, out, nyquist_term).expect("add gate");
    c.set_output(out);
    c
}

/// `Round`: the nearest-integer function, approximated as `t` minus a
/// truncated Fourier series for the period-1 sawtooth `t - round(t)`
/// (the same offline-harmonics technique [`mod10`] uses, just period 1
/// instead of period 10 and built from `sin` terms alone since the
/// sawtooth is odd).
pub fn round() -> Circuit {
    const HARMONICS: u32 = 8;

    let mut c = Circuit::new("Round").as_block();
    let mut saw = c.add_const(None, 0.0).expect("const gate");
    for k in 1..=HARMONICS {
        let omega = std::f64::consts::TAU * k as f64;
        let (sin_k, _cos_k) = sin_cos_pair(&mut c, omega);
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let coeff = sign / (std::f64::consts::PI * k as f64);
        let coeff_const = c.add_const(None, coeff).expect("const gate");
        let term = c.add_prod(None, coeff_const, sin_k).expect("prod gate");
        saw = c.add_add(None, saw, term).expect("add gate");
    }
    let neg_one = c.add_const(None, -1.0).expect("const gate");
    let neg_saw = c.add_prod(None, neg_one, saw).expect("prod gate");
    let out = c.add_add(None, Name::t(), neg_saw).expect("add gate");
    c.set_output(out);
    c
}

/// `Upsilon`: a rectangular pulse on `[0, 1]`, `Lxh(0, w) - Lxh(1, w)`
/// for a small fixed edge width `w`.
pub fn upsilon() -> Circuit {
    const EDGE_WIDTH: f64 = 0.05;
    let rising = lxh(0.0, EDGE_WIDTH);
    let falling = lxh(1.0, EDGE_WIDTH);
    let mut out = rising;
    let falling_out = out.splice(&falling);
    let neg_one = out.add_const(None, -1.0).expect("const gate");
    let neg_falling = out.add_prod(None, neg_one, falling_out).expect("prod gate");
    let prev_out = out.output().cloned().expect("lxh always sets an output");
    let pulse = out.add_add(None, prev_out, neg_falling).expect("add gate");
    out.set_output(pulse);
    out.set_name("Upsilon");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_is_self_referential_and_has_one_int_gate() {
        let c = exp();
        assert_eq!(c.gates().values().filter(|g| g.is_int()).count(), 1);
        assert_eq!(c.init_values().len(), 1);
    }

    #[test]
    fn sin_and_cos_form_a_three_gate_cycle() {
        let s = sin();
        // sin, cos, and the -sin product: three gates, two of them Int.
        assert_eq!(s.gates().len(), 3);
        assert_eq!(s.gates().values().filter(|g| g.is_int()).count(), 2);
    }

    #[test]
    fn power_power2_zero_is_identity() {
        let p = power_power2(0);
        assert!(p.gates().is_empty());
        assert_eq!(p.output(), Some(&Name::t()));
    }

    #[test]
    fn power_power2_counts_squarings() {
        let p = power_power2(3);
        assert_eq!(p.gates().len(), 3);
    }

    #[test]
    fn polynomial_one_plus_t_squared_has_expected_shape() {
        let p = polynomial(&[1.0, 0.0, 1.0]);
        // Two Prod gates (t*t via Horner's two multiply steps) and two
        // Add gates, plus three Constant gates (1, 0, 1).
        assert_eq!(p.gates().values().filter(|g| g.is_constant()).count(), 3);
    }

    #[test]
    fn builtin_blocks_are_marked_as_blocks() {
        assert!(identity().is_block());
        assert!(exp().is_block());
        assert!(mod10().is_block());
    }

    #[test]
    fn round_has_one_harmonic_pair_per_term() {
        let r = round();
        // 8 harmonics, each a sin/cos pair (2 Int gates) plus the shared
        // -omega*sin product gate: 3 gates per harmonic.
        assert_eq!(r.gates().values().filter(|g| g.is_int()).count(), 16);
    }
}
