//! Individual compilation passes.

pub mod canonicalize;
pub mod cse;
pub mod dce;
pub mod fold;
pub mod normalize;
pub mod validate;

pub use canonicalize::Canonicalize;
pub use cse::CommonSubexpressionElimination;
pub use dce::DeadCodeElimination;
pub use fold::ConstantFold;
pub use normalize::Normalizer;
pub use validate::Validate;
