//! Error types for the algebra crate.

use thiserror::Error;

/// Errors produced by composition, derivation, inversion, or iteration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgebraError {
    /// `compose`/`invert` were handed a circuit that has not been through
    /// `gpac_compile::finalize` — both operands need a finalized, cached
    /// `int_gates` list and a settled init-value table before their
    /// initial-value-propagation pre-simulation can run.
    #[error("circuit '{0}' must be finalized before this operation")]
    NotFinalized(String),

    /// `invert`/division where the denominator circuit evaluates to zero
    /// at `t = 0`.
    #[error("cannot invert circuit '{0}': output is zero at t=0")]
    DivisionByZeroAtOrigin(String),

    /// Symbolic differentiation encountered a dependency cycle among
    /// non-Int gates while computing a derivative — an algebraic cycle,
    /// which this domain does not give meaning to.
    #[error("cannot differentiate circuit '{0}': algebraic cycle through gate '{1}'")]
    DerivativeCycle(String, String),

    /// A lower-layer IR error.
    #[error("circuit IR error: {0}")]
    Ir(#[from] gpac_ir::IrError),

    /// A lower-layer compilation (normalize/simplify/validate) error.
    #[error("circuit compilation error: {0}")]
    Compile(#[from] gpac_compile::CompileError),

    /// A lower-layer simulation error.
    #[error("circuit simulation error: {0}")]
    Sim(#[from] gpac_sim::SimError),
}

/// Result type for algebra operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;
