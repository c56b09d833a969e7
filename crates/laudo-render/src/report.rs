//! Record and events in, finished PDF out

use laudo_types::{AttachmentKind, Event, InspectionRecord};
use tracing::{info, warn};

use crate::assembler::{assemble, RenderContext};
use crate::attach::append_pdf;
use crate::compiler::{compile_document_sync, CompiledPdf, Diagnostic, RenderError};
use crate::document::Document;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Warning reported when the ART file cannot be appended
pub const ART_NOT_PDF_WARNING: &str = "O arquivo da ART não é um PDF e não foi anexado ao laudo";

/// A generated report ready for download
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub page_count: usize,
    pub warnings: Vec<Diagnostic>,
}

/// The document model for a record, before compilation
pub fn build_document(record: &InspectionRecord, events: &[Event]) -> Document {
    assemble(&RenderContext::new(record, events))
}

/// Assemble and compile a report on the current thread
pub fn render_report(
    record: &InspectionRecord,
    events: &[Event],
) -> Result<RenderedReport, RenderError> {
    let doc = build_document(record, events);
    let compiled = compile_document_sync(&doc, record.inspection_date)?;
    finish(record, compiled)
}

/// Assemble a report, then compile it and append the ART on the blocking pool with a timeout
#[cfg(feature = "server")]
pub async fn render_report_with_timeout(
    record: &InspectionRecord,
    events: &[Event],
    timeout_ms: u64,
) -> Result<RenderedReport, RenderError> {
    let doc = build_document(record, events);
    let record = record.clone();
    crate::compiler::run_blocking(timeout_ms, move || {
        let compiled = compile_document_sync(&doc, record.inspection_date)?;
        finish(&record, compiled)
    })
    .await
}

/// Append the ART PDF when the record carries both a number and a PDF file
fn finish(record: &InspectionRecord, compiled: CompiledPdf) -> Result<RenderedReport, RenderError> {
    let CompiledPdf {
        mut bytes,
        mut page_count,
        mut warnings,
    } = compiled;

    if let (Some(art), Some(attachment)) = (record.art(), record.art_attachment.as_ref()) {
        if attachment.kind == AttachmentKind::Pdf {
            let (merged, merged_pages) = append_pdf(&bytes, &attachment.data)?;
            info!(
                art,
                report_pages = page_count,
                total_pages = merged_pages,
                "Appended ART document"
            );
            bytes = merged;
            page_count = merged_pages;
        } else {
            warn!(art, file = %attachment.file_name, "ART attachment is not a PDF, skipping");
            warnings.push(
                Diagnostic::new(format!(
                    "{ART_NOT_PDF_WARNING}: {}",
                    attachment.file_name
                ))
                .as_warning(),
            );
        }
    }

    Ok(RenderedReport {
        bytes,
        mime_type: PDF_MIME_TYPE,
        page_count,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::tests::{sample_events, sample_record};
    use crate::attach::tests::create_test_pdf;
    use laudo_types::Attachment;

    #[test]
    fn test_render_full_report() {
        let record = sample_record();
        let report = render_report(&record, &sample_events()).unwrap();

        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.mime_type, "application/pdf");
        // cover, table of contents and at least the chapters
        assert!(report.page_count >= 3);
    }

    #[test]
    fn test_markup_in_fields_is_inert() {
        let mut record = sample_record();
        record.contractor = "#panic(\"x\") *Acme* [ok]".into();
        record.address = "Rua $1 // centro".into();
        let mut events = sample_events();
        events[0].name = "= Heading? - lista + enum".into();

        assert!(render_report(&record, &events).is_ok());
    }

    #[test]
    fn test_art_pdf_is_appended() {
        let mut record = sample_record();
        let without = render_report(&record, &sample_events()).unwrap();

        record.art_number = Some("PE20250012345".into());
        record.art_attachment = Attachment::from_upload("art.pdf", create_test_pdf(2, "ART"));
        let with = render_report(&record, &sample_events()).unwrap();

        assert_eq!(with.page_count, without.page_count + 2);
    }

    #[test]
    fn test_art_pdf_ignored_without_number() {
        let mut record = sample_record();
        let without = render_report(&record, &sample_events()).unwrap();

        record.art_attachment = Attachment::from_upload("art.pdf", create_test_pdf(2, "ART"));
        let with = render_report(&record, &sample_events()).unwrap();

        assert_eq!(with.page_count, without.page_count);
    }

    #[test]
    fn test_broken_art_pdf_fails_generation() {
        let mut record = sample_record();
        record.art_number = Some("PE1".into());
        record.art_attachment = Attachment::from_upload("art.pdf", b"garbage".to_vec());

        let result = render_report(&record, &sample_events());
        assert!(matches!(result, Err(RenderError::Attachment(_))));
    }

    #[test]
    fn test_non_pdf_art_is_reported_as_warning() {
        let mut record = sample_record();
        let without = render_report(&record, &sample_events()).unwrap();

        record.art_number = Some("PE1".into());
        record.art_attachment = Attachment::from_upload("art.png", vec![0x89, b'P', b'N', b'G']);
        let with = render_report(&record, &sample_events()).unwrap();

        assert_eq!(with.page_count, without.page_count);
        let warning = with
            .warnings
            .iter()
            .find(|w| w.message.starts_with(ART_NOT_PDF_WARNING))
            .expect("missing ART warning");
        assert!(warning.message.ends_with("art.png"));
        assert_eq!(warning.severity, crate::compiler::DiagnosticSeverity::Warning);
    }

    #[cfg(feature = "server")]
    #[tokio::test]
    async fn test_async_render_rejects_cyclic_art() {
        let mut record = sample_record();
        record.art_number = Some("PE1".into());
        record.art_attachment =
            Attachment::from_upload("art.pdf", crate::attach::tests::create_cyclic_pdf());

        let result = render_report_with_timeout(&record, &sample_events(), 60_000).await;
        assert!(matches!(result, Err(RenderError::Attachment(_))));
    }

    #[cfg(feature = "server")]
    #[tokio::test]
    async fn test_async_render_matches_sync_page_count() {
        let record = sample_record();
        let events = sample_events();
        let sync = render_report(&record, &events).unwrap();
        let async_report = render_report_with_timeout(&record, &events, 60_000)
            .await
            .unwrap();
        assert_eq!(sync.page_count, async_report.page_count);
    }
}
