use laudo_types::narrative::long_date;

use super::{RenderContext, ENGINEER_NAME, ENGINEER_REGISTRY, ENGINEER_TITLE};
use crate::document::{Align, Document, Inline};

pub fn conclusion(ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraphs(&ctx.narrative);
}

pub fn report_date(ctx: &RenderContext<'_>, doc: &mut Document) {
    let record = ctx.record;

    doc.paragraph(format!(
        "{}, {}.",
        record.city_state.trim(),
        long_date(record.inspection_date)
    ));
    doc.spacer();

    let mut signature = vec![
        ENGINEER_NAME.to_string(),
        ENGINEER_TITLE.to_string(),
        ENGINEER_REGISTRY.to_string(),
    ];
    if let Some(art) = record.art() {
        signature.push(format!("ART nº {art}"));
    }
    for line in signature {
        doc.aligned(Align::Center, vec![Inline::text(line)]);
    }
}
