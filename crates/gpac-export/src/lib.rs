//! GPAC circuit export hooks: DOT, LaTeX pIVP, and a
//! source-form dump, for the external graph-rendering, report-generation,
//! and parser-round-trip collaborators this workspace does not itself own.

mod dot;
mod error;
mod latex;
mod source;

pub use dot::to_dot;
pub use error::{ExportError, ExportResult};
pub use latex::to_latex;
pub use source::to_code;
