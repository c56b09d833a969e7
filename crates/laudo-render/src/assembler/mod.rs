//! Report assembly
//!
//! The report is a fixed sequence: cover, table of contents, then fifteen
//! numbered chapters. Each chapter body is a plain function over a shared,
//! immutable [`RenderContext`], so chapters can be tested one at a time.

mod closing;
mod criteria;
mod findings;
mod front;
mod preliminary;

use laudo_types::narrative::standard_narrative;
use laudo_types::{Event, InspectionRecord};

use crate::document::{Document, Footer};

pub use closing::{conclusion, report_date};
pub use criteria::{
    criticality_levels, irregularity_classification, maintenance_assessment, methodology,
    normative_references, scope, terminology, usage_assessment,
};
pub use findings::{anamnesis, documentation, priority_summary};
pub use front::{cover, table_of_contents};
pub use preliminary::{disclaimers, inspected_object, objective};

/// Responsible engineer printed on the cover and the signature block
pub const ENGINEER_NAME: &str = "Silvio Augusto Barbosa de Albuquerque Filho";
pub const ENGINEER_TITLE: &str = "Engenheiro Civil";
pub const ENGINEER_REGISTRY: &str = "CREA/PE nº 054787D-PE";

/// Read-only inputs shared by every section
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub record: &'a InspectionRecord,
    pub events: &'a [Event],
    /// Body of the LAUDO TÉCNICO chapter
    pub narrative: String,
}

impl<'a> RenderContext<'a> {
    /// Uses the record's report text, or the standard narrative when it is blank
    pub fn new(record: &'a InspectionRecord, events: &'a [Event]) -> Self {
        let narrative = if record.report_text.trim().is_empty() {
            standard_narrative(record)
        } else {
            record.report_text.clone()
        };
        Self {
            record,
            events,
            narrative,
        }
    }
}

pub type SectionFn = fn(&RenderContext<'_>, &mut Document);

/// One numbered chapter of the report
pub struct Chapter {
    pub number: u8,
    pub title: &'static str,
    /// Page shown in the table of contents; fixed, not computed from layout
    pub toc_page: &'static str,
    pub render: SectionFn,
}

impl Chapter {
    pub fn heading(&self) -> String {
        format!("{}. {}", self.number, self.title)
    }
}

pub const CHAPTERS: [Chapter; 15] = [
    Chapter {
        number: 1,
        title: "RESSALVAS INICIAIS",
        toc_page: "4",
        render: disclaimers,
    },
    Chapter {
        number: 2,
        title: "OBJETIVO",
        toc_page: "5",
        render: objective,
    },
    Chapter {
        number: 3,
        title: "DESCRIÇÃO DO OBJETO INSPECIONADO",
        toc_page: "8",
        render: inspected_object,
    },
    Chapter {
        number: 4,
        title: "REFERÊNCIAS NORMATIVAS",
        toc_page: "11",
        render: normative_references,
    },
    Chapter {
        number: 5,
        title: "TERMINOLOGIA",
        toc_page: "12",
        render: terminology,
    },
    Chapter {
        number: 6,
        title: "ABRANGÊNCIA DA ANÁLISE",
        toc_page: "18",
        render: scope,
    },
    Chapter {
        number: 7,
        title: "CLASSIFICAÇÃO DAS IRREGULARIDADES",
        toc_page: "19",
        render: irregularity_classification,
    },
    Chapter {
        number: 8,
        title: "PATAMARES DE CRITICIDADE",
        toc_page: "20",
        render: criticality_levels,
    },
    Chapter {
        number: 9,
        title: "AVALIAÇÃO DE MANUTENÇÃO",
        toc_page: "21",
        render: maintenance_assessment,
    },
    Chapter {
        number: 10,
        title: "AVALIAÇÃO DE USO",
        toc_page: "23",
        render: usage_assessment,
    },
    Chapter {
        number: 11,
        title: "METODOLOGIA",
        toc_page: "23",
        render: methodology,
    },
    Chapter {
        number: 12,
        title: "DOCUMENTAÇÕES SOLICITADAS E DISPONIBILIZADAS",
        toc_page: "26",
        render: documentation,
    },
    Chapter {
        number: 13,
        title: "ANAMNESE",
        toc_page: "27",
        render: anamnesis,
    },
    Chapter {
        number: 14,
        title: "LAUDO TÉCNICO",
        toc_page: "48",
        render: conclusion,
    },
    Chapter {
        number: 15,
        title: "DATA DO RELATÓRIO TÉCNICO",
        toc_page: "53",
        render: report_date,
    },
];

/// Build the complete report document
pub fn assemble(ctx: &RenderContext<'_>) -> Document {
    let mut doc = Document::new();

    cover(ctx, &mut doc);
    doc.page_break();
    table_of_contents(ctx, &mut doc);
    doc.page_break();

    for chapter in &CHAPTERS {
        doc.heading(1, chapter.heading());
        (chapter.render)(ctx, &mut doc);
    }

    doc.footer = footer(ctx.record);
    doc
}

fn footer(record: &InspectionRecord) -> Footer {
    Footer {
        text: record
            .include_footer
            .then(|| format!("Laudo de Inspeção Predial - {}", record.contractor.trim())),
        page_numbers: record.include_page_numbers,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::document::Block;
    use chrono::NaiveDate;
    use laudo_types::{Location, Priority};

    pub(crate) fn sample_record() -> InspectionRecord {
        let mut record = InspectionRecord::new(NaiveDate::from_ymd_opt(2025, 7, 11).unwrap());
        record.contractor = "Ser Educacional S.A".into();
        record.tax_id = "04.986.320/0001-13".into();
        record.address = "Av. Engenheiro Roberto Freire, 1684, Natal-RN".into();
        record.city_state = "Natal-RN".into();
        record.inspection_days = "08 a 11/07/2025".into();
        record
    }

    pub(crate) fn sample_events() -> Vec<Event> {
        let mut first = Event::new(1);
        first.name = "Fachada norte".into();
        first.defects.insert("Fissuras");
        first.priority = Priority::P2;

        let mut second = Event::new(2);
        second.name = "Marquise".into();
        second.location = Location::custom("Bloco B");
        second.defects.insert("Corrosão");
        second.priority = Priority::P1;

        let mut third = Event::new(3);
        third.name = "Subsolo".into();
        third.defects.insert("Infiltrações");
        third.priority = Priority::P1;

        vec![first, second, third]
    }

    pub(crate) fn render_section(
        section: SectionFn,
        record: &InspectionRecord,
        events: &[Event],
    ) -> Document {
        let mut doc = Document::new();
        section(&RenderContext::new(record, events), &mut doc);
        doc
    }

    #[test]
    fn test_chapters_are_numbered_in_order() {
        let numbers: Vec<u8> = CHAPTERS.iter().map(|c| c.number).collect();
        assert_eq!(numbers, (1..=15).collect::<Vec<u8>>());
    }

    #[test]
    fn test_assemble_emits_every_chapter_heading_once() {
        let record = sample_record();
        let events = sample_events();
        let doc = assemble(&RenderContext::new(&record, &events));

        let headings: Vec<&str> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading { level: 1, text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        // Sumário plus fifteen chapters
        assert_eq!(headings.len(), 16);
        assert_eq!(headings[0], "Sumário");
        assert_eq!(headings[1], "1. RESSALVAS INICIAIS");
        assert_eq!(headings[15], "15. DATA DO RELATÓRIO TÉCNICO");
    }

    #[test]
    fn test_footer_follows_flags() {
        let mut record = sample_record();
        let doc = assemble(&RenderContext::new(&record, &[]));
        assert_eq!(
            doc.footer.text.as_deref(),
            Some("Laudo de Inspeção Predial - Ser Educacional S.A")
        );
        assert!(doc.footer.page_numbers);

        record.include_footer = false;
        record.include_page_numbers = false;
        let doc = assemble(&RenderContext::new(&record, &[]));
        assert!(doc.footer.is_empty());
    }

    #[test]
    fn test_blank_report_text_uses_standard_narrative() {
        let mut record = sample_record();
        record.report_text = "  \n ".into();
        let ctx = RenderContext::new(&record, &[]);
        assert_eq!(ctx.narrative, standard_narrative(&record));

        record.report_text = "Texto do engenheiro.".into();
        let ctx = RenderContext::new(&record, &[]);
        assert_eq!(ctx.narrative, "Texto do engenheiro.");
    }

    #[test]
    fn test_assembly_does_not_touch_inputs() {
        let record = sample_record();
        let events = sample_events();
        let before = (record.clone(), events.clone());
        let _ = assemble(&RenderContext::new(&record, &events));
        assert_eq!((record, events), before);
    }
}
