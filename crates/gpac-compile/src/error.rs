//! Error types for the compile crate.

use thiserror::Error;

/// Errors produced while normalizing, simplifying, validating, or
/// finalizing a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// An integration gate's differential variable could not be rewritten
    /// to `t` by any of the normalizer's three cases.
    #[error(
        "integration gate '{0}' is not normalizable: its differential variable is a standalone \
         constant, or otherwise matches none of the normalizer's rewrite cases"
    )]
    NotNormalizable(String),

    /// A Binary gate references a name that is neither `t` nor a present gate.
    #[error("gate '{gate}' references unknown input '{input}'")]
    UnknownInput {
        /// The gate doing the referencing.
        gate: String,
        /// The dangling input name.
        input: String,
    },

    /// An integration gate's differential variable is not `t` after normalization.
    #[error("integration gate '{0}' does not integrate with respect to t")]
    NotNormalized(String),

    /// The circuit's output is unset or names a gate that is not present.
    #[error("circuit has no valid output gate")]
    InvalidOutput,

    /// `finalize` was asked to proceed but some integration gate has no
    /// recorded initial value.
    #[error("integration gate '{0}' has no initial value")]
    MissingInitValue(String),

    /// A lower-layer IR operation failed.
    #[error("circuit IR error: {0}")]
    Ir(#[from] gpac_ir::IrError),
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
