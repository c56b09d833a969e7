//! Chapters 12 and 13: documentation checklist and the anamnesis with its events

use laudo_types::catalog::REQUIRED_DOCUMENTS;
use laudo_types::event::MAX_EVENT_IMAGES;
use laudo_types::Event;

use super::RenderContext;
use crate::document::{Block, Document, Inline};

pub const PROVIDED: &str = "DISPONIBILIZADA";
pub const MISSING: &str = "AUSENTE";

const EVENTS_INTRO: &str = "A coordenação de dados se dá por meio de textos classificando as \
    constatações quanto à localização, à anomalia observada, à provável causa, às consequências, \
    ao patamar de urgência e às condições de uso, acompanhados da recomendação técnica e do \
    registro fotográfico de cada evento.";

/// One bullet per required document, in catalog order
pub fn documentation(ctx: &RenderContext<'_>, doc: &mut Document) {
    let record = ctx.record;

    doc.push(Block::List {
        ordered: false,
        items: REQUIRED_DOCUMENTS
            .iter()
            .map(|label| {
                let status = if record.is_document_provided(label) {
                    PROVIDED
                } else {
                    MISSING
                };
                vec![Inline::text(format!("{label} - ")), Inline::bold(status)]
            })
            .collect(),
    });

    let note = record.documents_note.trim();
    if !note.is_empty() {
        doc.labeled("Obs", note);
    }
}

pub fn anamnesis(ctx: &RenderContext<'_>, doc: &mut Document) {
    let anamnesis = ctx.record.anamnesis.trim();
    if !anamnesis.is_empty() {
        doc.paragraphs(anamnesis);
    }
    doc.paragraph(EVENTS_INTRO);

    for event in ctx.events {
        event_block(event, doc);
    }

    priority_summary(ctx, doc);
}

fn event_block(event: &Event, doc: &mut Document) {
    doc.spacer();

    let images: Vec<String> = event
        .images
        .iter()
        .filter(|image| image.kind.is_image())
        .take(MAX_EVENT_IMAGES)
        .enumerate()
        .map(|(idx, image)| {
            let path = format!(
                "/eventos/{:02}/{}.{}",
                event.number,
                idx + 1,
                image.kind.extension()
            );
            doc.add_asset(path, image.data.clone())
        })
        .collect();
    if !images.is_empty() {
        doc.push(Block::Images(images));
    }

    doc.spans(vec![Inline::bold(format!(
        "{}: {}",
        event.tag(),
        event.name.trim()
    ))]);
    doc.labeled("Localização", event.location.label());
    doc.labeled("Anomalia", event.defects.joined());
    doc.labeled("Provável causa", event.cause.as_str());
    doc.labeled("Consequência da anomalia", event.consequences.joined());
    doc.labeled("Patamar de urgência", event.priority.label());
    doc.labeled("Uso", event.usage.label());
    doc.labeled("Recomendação técnica", event.recommendations.joined());
}

/// Events sorted by (priority, number), on a page of their own
pub fn priority_summary(ctx: &RenderContext<'_>, doc: &mut Document) {
    let mut sorted: Vec<&Event> = ctx.events.iter().collect();
    sorted.sort_by_key(|e| (e.priority, e.number));

    doc.page_break();
    doc.heading(2, "Resumo de Eventos por Prioridade");
    doc.push(Block::Table {
        header: vec!["EVENTO".into(), "ANOMALIA".into(), "PRIORIDADE".into()],
        rows: sorted
            .into_iter()
            .map(|e| {
                vec![
                    e.tag(),
                    e.defects.joined(),
                    e.priority.numeral().to_string(),
                ]
            })
            .collect(),
    });
}
