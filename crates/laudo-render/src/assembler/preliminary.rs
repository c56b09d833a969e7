//! Chapters 1 to 3: disclaimers, objective and description of the building

use laudo_types::Occupancy;

use super::RenderContext;
use crate::document::{Block, Document, Inline};

const DISCLAIMERS: [&str; 4] = [
    "a) Este laudo foi elaborado com base em inspeção visual, sem a realização de ensaios \
     destrutivos, ensaios laboratoriais ou prospecções, salvo quando expressamente indicado.",
    "b) As constatações refletem as condições da edificação nas datas da vistoria; alterações \
     posteriores não são de responsabilidade do signatário.",
    "c) Elementos ocultos, embutidos ou inacessíveis durante a vistoria não foram objeto de \
     análise.",
    "d) A análise documental limitou-se aos documentos disponibilizados pelo contratante, cuja \
     veracidade é de responsabilidade de quem os forneceu.",
];

pub fn disclaimers(_ctx: &RenderContext<'_>, doc: &mut Document) {
    for item in DISCLAIMERS {
        doc.paragraph(item);
    }
}

pub fn objective(ctx: &RenderContext<'_>, doc: &mut Document) {
    let record = ctx.record;

    let mut text = format!(
        "O presente laudo tem por objetivo apresentar o resultado da inspeção predial realizada \
         no empreendimento de {}, inscrito sob o CNPJ/CPF {}, executada pela {}, avaliando as \
         condições de conservação, manutenção e uso da edificação conforme a ABNT NBR \
         16747:2020.",
        record.contractor.trim(),
        record.tax_id.trim(),
        record.contracted_company.trim(),
    );
    if let Some(art) = record.art() {
        text.push_str(&format!(
            " Os serviços estão registrados sob a Anotação de Responsabilidade Técnica ART nº {art}."
        ));
    }
    doc.paragraph(text);

    let items = record.brief_account_items();
    if items.is_empty() {
        return;
    }
    doc.heading(2, "2.1 RELATO BREVE");
    doc.paragraph(
        "Segundo relato dos responsáveis pela edificação, foram apontadas as seguintes ocorrências:",
    );
    doc.push(Block::List {
        ordered: true,
        items: items.into_iter().map(|i| vec![Inline::text(i)]).collect(),
    });
}

pub fn inspected_object(ctx: &RenderContext<'_>, doc: &mut Document) {
    let record = ctx.record;

    doc.paragraph(format!(
        "Trata-se de empreendimento do tipo {}, situado em {}.",
        record.building_type.trim(),
        record.address.trim(),
    ));

    let location = record.location_info.trim();
    if !location.is_empty() {
        let mut sentence = format!("O imóvel {location}");
        if !sentence.ends_with('.') {
            sentence.push('.');
        }
        doc.paragraph(sentence);
    }

    doc.paragraph(match record.occupancy {
        Occupancy::Occupied => {
            "Durante as vistorias a edificação encontrava-se ocupada e em funcionamento, o que \
             permitiu observar as condições reais de uso dos sistemas construtivos."
        }
        Occupancy::Vacant => {
            "Durante as vistorias a edificação encontrava-se desocupada, não sendo possível \
             observar as condições de uso dos sistemas construtivos em funcionamento."
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::tests::{render_section, sample_record};
    use crate::assembler::SectionFn;
    use laudo_types::InspectionRecord;

    fn render(section: SectionFn, record: &InspectionRecord) -> Document {
        render_section(section, record, &[])
    }

    #[test]
    fn test_disclaimers_are_lettered() {
        let doc = render(disclaimers, &sample_record());
        let text = doc.plain_text();
        let prefixes: Vec<&str> = text.lines().map(|l| &l[..2]).collect();
        assert_eq!(prefixes, vec!["a)", "b)", "c)", "d)"]);
    }

    #[test]
    fn test_objective_interpolates_parties() {
        let doc = render(objective, &sample_record());
        let text = doc.plain_text();
        assert!(text.contains("empreendimento de Ser Educacional S.A"));
        assert!(text.contains("CNPJ/CPF 04.986.320/0001-13"));
        assert!(text.contains("executada pela Testcon Engenharia"));
        assert!(!text.contains("ART"));
        assert!(!text.contains("RELATO BREVE"));
    }

    #[test]
    fn test_objective_art_clause_only_when_present() {
        let mut record = sample_record();
        record.art_number = Some("PE20250998877".into());
        let text = render(objective, &record).plain_text();
        assert!(text.contains("ART nº PE20250998877."));
    }

    #[test]
    fn test_brief_account_becomes_numbered_list() {
        let mut record = sample_record();
        record.brief_account = "Infiltração no bloco A\n\nFissuras na fachada\n".into();
        let doc = render(objective, &record);

        assert!(doc.blocks.contains(&Block::Heading {
            level: 2,
            text: "2.1 RELATO BREVE".into()
        }));
        let list = doc.blocks.iter().find_map(|b| match b {
            Block::List { ordered: true, items } => Some(items.len()),
            _ => None,
        });
        assert_eq!(list, Some(2));
    }

    #[test]
    fn test_occupancy_branch() {
        let mut record = sample_record();
        assert!(render(inspected_object, &record).plain_text().contains("encontrava-se ocupada"));
        record.occupancy = Occupancy::Vacant;
        assert!(render(inspected_object, &record).plain_text().contains("encontrava-se desocupada"));
    }

    #[test]
    fn test_location_sentence() {
        let text = render(inspected_object, &sample_record()).plain_text();
        assert!(text.contains(
            "O imóvel encontra-se em área urbanizada, perto de comércio e com estrutura \
             desenvolvida de saneamento básico."
        ));
    }
}
