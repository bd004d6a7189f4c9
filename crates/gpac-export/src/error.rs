//! Error types for the export crate.

use thiserror::Error;

/// Errors produced while writing a circuit out to DOT, LaTeX, or source
/// form.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// Writing to the caller's sink failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// LaTeX export needs a finalized circuit (it walks the `int_gates`
    /// cache to know which gates are the pIVP's differential equations).
    #[error("circuit '{0}' must be finalized before LaTeX export")]
    NotFinalized(String),

    /// A lower-layer IR error (e.g. the circuit has no output set).
    #[error("circuit IR error: {0}")]
    Ir(#[from] gpac_ir::IrError),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
