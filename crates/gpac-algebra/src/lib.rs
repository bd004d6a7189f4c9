//! GPAC circuit algebra: the four operators that sit above the normalizer
//! and the single-point evaluator — `compose`, `derivate`,
//! `invert`, and `iterate` — plus the `div` convenience built on `invert`.
//!
//! The purely structural composers (`+`, `*`, `-`, scalar ops, `integrate`)
//! live in `gpac_ir::builder` instead: they only ever splice gate maps
//! together and never need to re-normalize or evaluate anything, so they
//! have no reason to depend on `gpac-compile` or `gpac-sim`. See that
//! module's doc comment, and DESIGN.md, for the full account of why the
//! algebraic builder splits across two crates along this line.

mod compose;
mod derivate;
mod error;
mod invert;
mod iterate;
mod propagate;

pub use compose::compose;
pub use derivate::derivate;
pub use error::{AlgebraError, AlgebraResult};
pub use invert::{div, invert};
pub use iterate::iterate;
