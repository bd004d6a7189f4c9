//! Gate types: the four GPAC primitives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::Name;

/// A GPAC gate.
///
/// One tagged variant rather than a `Gate` → `Binary` → `Add`/`Prod`/`Int`
/// inheritance hierarchy. `Constant` carries its value directly;
/// `Add`/`Prod`/`Int` carry the *names* of
/// their two inputs rather than owning pointers to them, so a gate never
/// needs to know which circuit it lives in and Int gates can legitimately
/// close a cycle through the containing map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// An immutable numeric constant.
    Constant(f64),
    /// Commutative addition of two named inputs.
    Add(Name, Name),
    /// Commutative product of two named inputs.
    Prod(Name, Name),
    /// Integration: `g' = x * y'`. Normalized when `y == t`.
    Int(Name, Name),
}

impl Gate {
    /// The gate kind as a short label, used in DOT/LaTeX/error output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Gate::Constant(_) => "const",
            Gate::Add(..) => "add",
            Gate::Prod(..) => "prod",
            Gate::Int(..) => "int",
        }
    }

    /// Whether this is a [`Gate::Constant`].
    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, Gate::Constant(_))
    }

    /// Whether this is a [`Gate::Int`].
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Gate::Int(..))
    }

    /// The two input names of a Binary gate (`Add`, `Prod`, or `Int`), if any.
    ///
    /// `Constant` has no inputs and returns `None`. Used uniformly by the
    /// normalizer, simplifier, and export hooks instead of re-matching the
    /// enum at every call site.
    pub fn inputs(&self) -> Option<(&Name, &Name)> {
        match self {
            Gate::Constant(_) => None,
            Gate::Add(x, y) | Gate::Prod(x, y) | Gate::Int(x, y) => Some((x, y)),
        }
    }

    /// Mutable access to the two input names of a Binary gate.
    pub fn inputs_mut(&mut self) -> Option<(&mut Name, &mut Name)> {
        match self {
            Gate::Constant(_) => None,
            Gate::Add(x, y) | Gate::Prod(x, y) | Gate::Int(x, y) => Some((x, y)),
        }
    }

    /// Evaluate an `Add` or `Prod` gate given its two input values.
    ///
    /// Returns `None` for `Constant` (no inputs to combine) and `Int`
    /// (integration gates are evaluated indirectly by the ODE driver, never
    /// by folding two values together).
    pub fn eval_binary(&self, a: f64, b: f64) -> Option<f64> {
        match self {
            Gate::Add(..) => Some(a + b),
            Gate::Prod(..) => Some(a * b),
            Gate::Constant(_) | Gate::Int(..) => None,
        }
    }

    /// Canonically reorder a commutative gate's inputs so `x <= y`
    /// lexicographically. No-op for `Int`, which is non-commutative, and
    /// for `Constant`, which has no inputs.
    pub fn canonicalize(&mut self) {
        match self {
            Gate::Add(x, y) | Gate::Prod(x, y) if y < x => std::mem::swap(x, y),
            _ => {}
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Constant(c) => write!(f, "{c}"),
            Gate::Add(x, y) => write!(f, "{x} + {y}"),
            Gate::Prod(x, y) => write!(f, "{x} * {y}"),
            Gate::Int(x, y) => write!(f, "int {x} d({y})"),
        }
    }
}
