//! GPAC circuit compilation.
//!
//! Turns a [`gpac_ir::Circuit`] built by the algebraic operators into one
//! the simulator and exporters can trust: the normalizer that rewrites
//! every integration gate to differentiate with respect to `t`, the
//! simplifier sub-passes (constant folding, dead-code elimination,
//! canonicalization, common-subexpression elimination), the structural
//! validator, and the `finalize` lifecycle that runs all of the above
//! and caches the result.
//!
//! Passes are orchestrated through a small [`Pass`]/[`PassManager`] pair,
//! but [`finalize`] is the entry point most callers actually want.

pub mod error;
pub mod finalize;
pub mod manager;
pub mod pass;
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use finalize::{finalize, FinalizeOptions};
pub use manager::PassManager;
pub use pass::{Pass, PassKind};
pub use passes::{
    Canonicalize, CommonSubexpressionElimination, ConstantFold, DeadCodeElimination, Normalizer,
    Validate,
};
