//! Typst compilation wrapper with timeout and error handling

pub mod errors;
pub mod render;

pub use errors::{Diagnostic, DiagnosticSeverity, RenderError};
pub use render::{compile_document_sync, compile_source, CompiledPdf};

#[cfg(feature = "server")]
pub use render::{compile_document, run_blocking};
