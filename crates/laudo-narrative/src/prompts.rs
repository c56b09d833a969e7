//! Prompt texts sent to the completion service

use laudo_types::{Event, InspectionRecord};
use serde::{Deserialize, Serialize};

use crate::client::CompletionRequest;

pub const ENGINEER_SYSTEM_PROMPT: &str =
    "Você é um engenheiro civil especialista em laudos técnicos.";

/// How far a rewrite may depart from the original wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewriteIntensity {
    #[default]
    Leve,
    Moderada,
    Completa,
}

impl RewriteIntensity {
    pub fn instruction(&self) -> &'static str {
        match self {
            RewriteIntensity::Leve => {
                "Reescreva mantendo exatamente o mesmo sentido, mudando apenas algumas palavras e estrutura das frases"
            }
            RewriteIntensity::Moderada => {
                "Reescreva o texto de forma mais elaborada, mantendo todas as informações mas com estilo diferente"
            }
            RewriteIntensity::Completa => {
                "Reescreva completamente o texto, mantendo rigorosamente todas as informações técnicas e sentido"
            }
        }
    }
}

/// "- {name}: {defects}" per event
pub fn event_digest(events: &[Event]) -> String {
    events
        .iter()
        .map(|event| format!("- {}: {}", event.name.trim(), event.defects.joined()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn inspection_facts(record: &InspectionRecord, events: &[Event]) -> String {
    format!(
        "Contratante: {}\nEndereço: {}\nDias de vistoria: {}\nEventos encontrados: {}\n\nPrincipais anomalias:\n{}",
        record.contractor.trim(),
        record.address.trim(),
        record.inspection_days.trim(),
        events.len(),
        event_digest(events),
    )
}

pub fn report_request(record: &InspectionRecord, events: &[Event]) -> CompletionRequest {
    let prompt = format!(
        "Gere um laudo técnico de inspeção predial profissional com base nos seguintes dados:\n\n{}\n\n\
         Escreva em português formal, em parágrafos, sem títulos.",
        inspection_facts(record, events)
    );
    CompletionRequest::new(prompt, 0.7, 2000).with_system(ENGINEER_SYSTEM_PROMPT)
}

/// Ask for text that continues what the engineer already wrote
pub fn merge_request(record: &InspectionRecord, events: &[Event], text: &str) -> CompletionRequest {
    let prompt = format!(
        "Complemente o texto abaixo de um laudo técnico de inspeção predial, sem repetir o que já foi dito, \
         usando os dados da vistoria:\n\n{}\n\nTexto atual:\n{}",
        inspection_facts(record, events),
        text.trim()
    );
    CompletionRequest::new(prompt, 0.7, 2000).with_system(ENGINEER_SYSTEM_PROMPT)
}

pub fn rewrite_request(text: &str, intensity: RewriteIntensity) -> CompletionRequest {
    let prompt = format!("{}:\n\n{}", intensity.instruction(), text);
    CompletionRequest::new(prompt, 0.7, 1000).with_system(ENGINEER_SYSTEM_PROMPT)
}

pub fn brief_account_request(points: &str) -> CompletionRequest {
    let prompt = format!(
        "Organize os seguintes pontos em um relato técnico profissional para um laudo:\n{points}\n\n\
         Formato: lista numerada, linguagem técnica, concisa."
    );
    CompletionRequest::new(prompt, 0.5, 500)
}
