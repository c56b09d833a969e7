//! Building inspection report rendering
//!
//! This crate turns an inspection record and its events into a PDF:
//! - `assembler`: the cover, table of contents and fifteen chapters, as a document model
//! - `markup`: lowering of the document model to Typst source
//! - `compiler` / `world`: in-memory Typst compilation (sync and async)
//! - `attach`: appending the ART PDF after the report
//!
//! # Feature Flags
//!
//! - `server` (default): Enables async compilation with timeout (requires tokio)

pub mod assembler;
pub mod attach;
pub mod compiler;
pub mod document;
pub mod markup;
pub mod report;
pub mod world;

pub use assembler::{assemble, RenderContext, CHAPTERS};
pub use compiler::{compile_document_sync, Diagnostic, RenderError};
pub use document::{Block, Document, Inline};
pub use report::{
    build_document, render_report, RenderedReport, ART_NOT_PDF_WARNING, PDF_MIME_TYPE,
};

#[cfg(feature = "server")]
pub use compiler::compile_document;
#[cfg(feature = "server")]
pub use report::render_report_with_timeout;
