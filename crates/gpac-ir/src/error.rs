//! Error types for the IR crate.

use thiserror::Error;

use crate::name::Name;

/// Errors that can occur while constructing or mutating a [`crate::circuit::Circuit`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate name was empty.
    #[error("gate name must not be empty")]
    EmptyName,

    /// A gate name used the reserved leading-underscore convention.
    #[error("gate name '{0}' starts with '_', which is reserved for generated names")]
    ReservedUnderscoreName(String),

    /// A gate was named `t`, the reserved independent-variable identifier.
    #[error("'t' is reserved for the independent variable and cannot name a gate")]
    ReservedIndependentVariable,

    /// A Binary gate referenced a name that is neither `t` nor a present gate.
    #[error("gate '{consumer}' references unknown input '{input}'")]
    UnknownInput {
        /// The gate doing the referencing.
        consumer: String,
        /// The dangling input name.
        input: String,
    },

    /// An integration gate's differential variable was a Constant gate.
    #[error("integration gate '{0}' cannot integrate with respect to a constant")]
    ConstantDifferential(String),

    /// `set_init_value` (or equivalent) was called on a non-Int gate.
    #[error("gate '{0}' is not an integration gate and cannot take an initial value")]
    NotAnIntegrationGate(String),

    /// The circuit's output was never set, or was set to a name no longer present.
    #[error("circuit has no valid output gate")]
    InvalidOutput,

    /// An algebraic operator was applied to a circuit with no output set.
    #[error("cannot operate on circuit '{0}': no output gate set")]
    NoOutput(String),

    /// Composition, derivation, or inversion was attempted on an empty circuit.
    #[error("cannot operate on an empty circuit")]
    EmptyCircuit,

    /// Division or inversion where the denominator circuit evaluates to zero at t=0.
    #[error("cannot invert circuit '{0}': output is zero at t=0")]
    DivisionByZeroAtOrigin(String),

    /// A gate name collided with an existing gate and insertion overwrote it.
    ///
    /// Not an error variant used in practice (overwriting is a warning, see
    /// [`tracing::warn!`] call sites in `circuit.rs`) — kept here so callers
    /// that want overwrite to be a hard error can opt in explicitly.
    #[error("gate name '{0}' already exists")]
    DuplicateName(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

/// Validate a user-supplied gate name against the reserved-name rules.
///
/// Generated fresh names (`_<k>`) bypass this check; it exists to reject
/// *user*-supplied names of that shape, plus the empty string and the
/// literal `t`.
pub(crate) fn validate_user_name(name: &str) -> IrResult<()> {
    if name.is_empty() {
        return Err(IrError::EmptyName);
    }
    if name == Name::INDEPENDENT_VARIABLE {
        return Err(IrError::ReservedIndependentVariable);
    }
    if name.starts_with('_') {
        return Err(IrError::ReservedUnderscoreName(name.to_string()));
    }
    Ok(())
}
