//! Chapters 4 to 11: standards, terminology and inspection criteria
//!
//! Mostly fixed text. Methodology is the only chapter here that reads the
//! record.

use laudo_types::Priority;

use super::RenderContext;
use crate::document::{Block, Document, Inline};

fn defined_terms(doc: &mut Document, terms: &[(&str, &str)]) {
    doc.push(Block::List {
        ordered: false,
        items: terms
            .iter()
            .map(|(term, definition)| {
                vec![Inline::bold(format!("{term}: ")), Inline::text(*definition)]
            })
            .collect(),
    });
}

pub fn normative_references(_ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraph("Este laudo foi elaborado com base nas seguintes normas e publicações técnicas:");
    doc.push(Block::List {
        ordered: false,
        items: [
            "ABNT NBR 16747:2020 - Inspeção predial - Diretrizes, conceitos, terminologia, requisitos e procedimento",
            "ABNT NBR 5674:2012 - Manutenção de edificações - Requisitos para o sistema de gestão de manutenção",
            "ABNT NBR 14037:2011 - Diretrizes para elaboração de manuais de uso, operação e manutenção das edificações",
            "ABNT NBR 15575:2013 - Edificações habitacionais - Desempenho",
            "IBAPE - Norma de Inspeção Predial Nacional",
        ]
        .into_iter()
        .map(|r| vec![Inline::text(r)])
        .collect(),
    });
}

pub fn terminology(_ctx: &RenderContext<'_>, doc: &mut Document) {
    defined_terms(
        doc,
        &[
            (
                "Anomalia",
                "irregularidade relativa à construção, decorrente de falhas de projeto, de \
                 execução ou de materiais, ou de agentes externos",
            ),
            (
                "Falha",
                "irregularidade relativa à manutenção, à operação ou ao uso da edificação",
            ),
            (
                "Inspeção predial",
                "processo que visa avaliar as condições técnicas, de uso, de operação e de \
                 manutenção da edificação e de seus sistemas construtivos",
            ),
            (
                "Manutenção",
                "conjunto de atividades executadas para conservar ou recuperar a capacidade \
                 funcional da edificação e de seus sistemas",
            ),
            (
                "Vida útil",
                "período de tempo em que a edificação e seus sistemas se prestam às atividades \
                 para as quais foram projetados",
            ),
            (
                "Desempenho",
                "comportamento em uso da edificação e de seus sistemas",
            ),
        ],
    );
}

pub fn scope(_ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraph(
        "A análise abrange os sistemas construtivos acessíveis durante as vistorias: estrutura, \
         vedações, revestimentos, esquadrias, coberturas, impermeabilizações e instalações \
         aparentes. A avaliação é sensorial e não contempla ensaios, cálculos estruturais ou \
         verificação de conformidade de projetos.",
    );
    doc.paragraph(
        "Sistemas embutidos ou de acesso restrito foram avaliados apenas por seus sintomas \
         aparentes.",
    );
}

pub fn irregularity_classification(_ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraph("As irregularidades constatadas são classificadas quanto à sua origem em:");
    defined_terms(
        doc,
        &[
            (
                "Endógena",
                "originária da própria edificação, em decorrência de projeto, materiais ou \
                 execução",
            ),
            (
                "Exógena",
                "originária de fatores externos à edificação, provocados por terceiros",
            ),
            (
                "Funcional",
                "originária do envelhecimento natural e do término da vida útil dos elementos",
            ),
        ],
    );
}

pub fn criticality_levels(_ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraph(
        "As anomalias e falhas são organizadas em patamares de urgência, considerando o grau de \
         risco e a necessidade de intervenção:",
    );
    defined_terms(
        doc,
        &Priority::ALL.map(|priority| (priority.label(), criticality_description(priority))),
    );
}

fn criticality_description(priority: Priority) -> &'static str {
    match priority {
        Priority::P1 => {
            "ações necessárias quando a perda de desempenho compromete a saúde ou a segurança \
             dos usuários, exigindo intervenção imediata"
        }
        Priority::P2 => {
            "ações necessárias quando a perda de desempenho compromete parcialmente a \
             funcionalidade da edificação, sem prejuízo à operação direta de seus sistemas"
        }
        Priority::P3 => {
            "ações necessárias quando a perda de desempenho pode ocasionar pequenos prejuízos à \
             estética ou quando se trata de atividade programável"
        }
    }
}

pub fn maintenance_assessment(_ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraph(
        "A avaliação de manutenção considera a existência e a execução de um plano de \
         manutenção compatível com a ABNT NBR 5674, bem como o estado de conservação observado \
         nos sistemas construtivos.",
    );
    doc.paragraph(
        "A ausência de registros de manutenção ou de manual de uso, operação e manutenção \
         compromete a rastreabilidade das intervenções e é apontada no capítulo de \
         documentações.",
    );
}

pub fn usage_assessment(_ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraph(
        "O uso é classificado como Regular quando a edificação é utilizada de acordo com o \
         previsto em projeto, e como Irregular quando há divergência entre a utilização \
         observada e a prevista, como sobrecargas, alterações não planejadas ou usos \
         inadequados dos sistemas.",
    );
}

pub fn methodology(ctx: &RenderContext<'_>, doc: &mut Document) {
    doc.paragraph(format!(
        "As vistorias foram realizadas nos dias {}, por meio de inspeção sensorial dos sistemas \
         construtivos, com registro fotográfico das constatações.",
        ctx.record.inspection_days.trim()
    ));
    doc.paragraph(
        "Cada constatação foi registrada como um evento, classificado quanto à localização, \
         anomalia, provável causa, consequência, patamar de urgência e condição de uso, \
         acompanhado da respectiva recomendação técnica.",
    );
}
