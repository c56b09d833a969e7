use laudo_types::narrative::short_date;

use super::{RenderContext, CHAPTERS, ENGINEER_NAME, ENGINEER_REGISTRY, ENGINEER_TITLE};
use crate::document::{Align, Block, Document, Inline};

pub fn cover(ctx: &RenderContext<'_>, doc: &mut Document) {
    let record = ctx.record;

    doc.aligned(Align::Center, vec![Inline::bold("RELATÓRIO DE ENGENHARIA")]);
    doc.aligned(
        Align::Center,
        vec![Inline::bold("Laudo Técnico de Inspeção Predial")],
    );
    doc.spacer();

    doc.labeled("Contratante", record.contractor.trim());
    doc.labeled("CNPJ", record.tax_id.trim());
    doc.labeled("Contratada", record.contracted_company.trim());
    doc.labeled("Data", short_date(record.inspection_date));
    doc.spacer();

    doc.spans(vec![Inline::bold("Imóvel motivo:")]);
    doc.paragraph(record.address.trim());
    doc.spacer();

    doc.aligned(
        Align::Center,
        vec![Inline::text(format!("{ENGINEER_NAME}, {ENGINEER_TITLE}"))],
    );
    doc.aligned(Align::Center, vec![Inline::text(ENGINEER_REGISTRY)]);
}

/// Fixed entries; page numbers are placeholders, not real pagination
pub fn table_of_contents(_ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.heading(1, "Sumário");
    for chapter in &CHAPTERS {
        doc.push(Block::TocEntry {
            title: chapter.heading(),
            page: chapter.toc_page.to_string(),
        });
    }
}
