//! Error types for the simulation crate.

use thiserror::Error;

/// Errors produced while evaluating or integrating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The circuit passed to the driver has not been through `gpac_compile::finalize`.
    #[error("circuit '{0}' is not finalized; call gpac_compile::finalize first")]
    NotFinalized(String),

    /// The vector-field evaluator's value-propagation loop reached a
    /// fixpoint with some Add/Prod gate still unvalued — an algebraic
    /// cycle among non-Int gates.
    #[error("algebraic cycle: gate(s) {0:?} never received a value during propagation")]
    AlgebraicCycle(Vec<String>),

    /// The integration interval `[a, b]` is empty or reversed.
    #[error("invalid integration interval [{a}, {b}]")]
    InvalidInterval {
        /// Interval start.
        a: f64,
        /// Interval end.
        b: f64,
    },

    /// The step size `dt` is not strictly positive.
    #[error("step size must be positive, got {0}")]
    InvalidStepSize(f64),

    /// A lower-layer circuit-compilation error.
    #[error("circuit compilation error: {0}")]
    Compile(#[from] gpac_compile::CompileError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
