//! Typst compilation and PDF export

use std::collections::BTreeMap;

use chrono::NaiveDate;
use typst::diag::{Severity, SourceDiagnostic};
use typst::model::Document as TypstDocument;

use super::errors::{Diagnostic, RenderError};
use crate::document::Document;
use crate::markup;
use crate::world::VirtualWorld;

/// Output of one successful compilation
#[derive(Debug, Clone)]
pub struct CompiledPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<Diagnostic>,
}

/// Compile a document model to PDF on the current thread
pub fn compile_document_sync(doc: &Document, today: NaiveDate) -> Result<CompiledPdf, RenderError> {
    compile_source(markup::lower(doc), &doc.assets, today)
}

/// Compile a document model to PDF on the blocking pool, giving up after `timeout_ms`
#[cfg(feature = "server")]
pub async fn compile_document(
    doc: &Document,
    today: NaiveDate,
    timeout_ms: u64,
) -> Result<CompiledPdf, RenderError> {
    let source = markup::lower(doc);
    let assets = doc.assets.clone();
    run_blocking(timeout_ms, move || compile_source(source, &assets, today)).await
}

/// Run `job` on the blocking pool, giving up after `timeout_ms`
#[cfg(feature = "server")]
pub async fn run_blocking<T, F>(timeout_ms: u64, job: F) -> Result<T, RenderError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RenderError> + Send + 'static,
{
    use std::time::Duration;

    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(job),
    )
    .await;

    match result {
        Ok(Ok(output)) => output,
        Ok(Err(join_error)) => Err(RenderError::Task(join_error.to_string())),
        Err(_timeout) => Err(RenderError::Timeout(timeout_ms)),
    }
}

/// Compile raw Typst source with the given assets mounted
pub fn compile_source(
    source: String,
    assets: &BTreeMap<String, Vec<u8>>,
    today: NaiveDate,
) -> Result<CompiledPdf, RenderError> {
    let world = VirtualWorld::new(source, assets, today)?;

    let warned = typst::compile(&world);
    let (_, warnings) = categorize_diagnostics(&warned.warnings);

    let result = match warned.output {
        Ok(document) => export_pdf(&document, warnings),
        Err(diagnostics) => {
            let (errors, _) = categorize_diagnostics(&diagnostics);
            tracing::warn!(errors = errors.len(), "Typst compilation failed");
            Err(RenderError::Compile(errors))
        }
    };

    // Drop memoized results older than a few compilations
    comemo::evict(10);
    result
}

fn export_pdf(document: &TypstDocument, warnings: Vec<Diagnostic>) -> Result<CompiledPdf, RenderError> {
    let bytes = typst_pdf::pdf(document, &typst_pdf::PdfOptions::default()).map_err(|diags| {
        let (errors, _) = categorize_diagnostics(&diags);
        RenderError::Export(
            errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        )
    })?;

    Ok(CompiledPdf {
        bytes,
        page_count: document.pages.len(),
        warnings,
    })
}

/// Split diagnostics into errors and warnings
fn categorize_diagnostics(diagnostics: &[SourceDiagnostic]) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for diag in diagnostics {
        let mut converted = Diagnostic::new(diag.message.to_string());

        if !diag.hints.is_empty() {
            let hint = diag
                .hints
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            converted = converted.with_hint(hint);
        }

        match diag.severity {
            Severity::Error => errors.push(converted),
            Severity::Warning => warnings.push(converted.as_warning()),
        }
    }

    (errors, warnings)
}
