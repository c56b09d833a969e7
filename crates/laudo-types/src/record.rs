//! The editable inspection record

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;

pub const DEFAULT_LOCATION_INFO: &str = "encontra-se em área urbanizada, perto de comércio e com estrutura desenvolvida de saneamento básico";

pub const DEFAULT_ANAMNESIS: &str =
    "Os usuários da edificação pontuam de forma simplificada que perceberam uma deterioração...";

/// Whether the building was in use at inspection time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Occupancy {
    #[default]
    #[serde(rename = "Sim")]
    Occupied,
    #[serde(rename = "Não")]
    Vacant,
}

/// Field values of one report in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRecord {
    // Identity / parties
    #[serde(rename = "contratante", default)]
    pub contractor: String,
    #[serde(rename = "cnpj", default)]
    pub tax_id: String,
    #[serde(rename = "contratada", default)]
    pub contracted_company: String,
    #[serde(rename = "data_laudo")]
    pub inspection_date: NaiveDate,
    #[serde(rename = "dias_vistoria", default)]
    pub inspection_days: String,
    #[serde(rename = "cidade_estado", default)]
    pub city_state: String,
    #[serde(rename = "art_numero", default)]
    pub art_number: Option<String>,
    #[serde(rename = "art_arquivo", default, skip_serializing_if = "Option::is_none")]
    pub art_attachment: Option<Attachment>,

    // Site
    #[serde(rename = "endereco", default)]
    pub address: String,
    #[serde(rename = "tipo_empreendimento", default)]
    pub building_type: String,
    #[serde(rename = "ocupado", default)]
    pub occupancy: Occupancy,
    #[serde(rename = "info_localizacao", default)]
    pub location_info: String,

    // Documentation checklist
    #[serde(rename = "docs_disponibilizadas", default)]
    pub provided_documents: BTreeSet<String>,
    #[serde(rename = "obs_docs", default)]
    pub documents_note: String,

    // Narrative
    #[serde(rename = "relato_breve", default)]
    pub brief_account: String,
    #[serde(rename = "anamnese", default)]
    pub anamnesis: String,
    #[serde(rename = "texto_laudo", default)]
    pub report_text: String,

    // Output options
    #[serde(rename = "incluir_rodape", default = "default_true")]
    pub include_footer: bool,
    #[serde(rename = "incluir_numeracao", default = "default_true")]
    pub include_page_numbers: bool,
    #[serde(rename = "versao", default = "default_version")]
    pub version: u32,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    1
}

impl InspectionRecord {
    /// Empty record dated `inspection_date`, with the form's pre-filled texts
    pub fn new(inspection_date: NaiveDate) -> Self {
        Self {
            contractor: String::new(),
            tax_id: String::new(),
            contracted_company: crate::catalog::CONTRACTED_COMPANIES[0].to_string(),
            inspection_date,
            inspection_days: String::new(),
            city_state: String::new(),
            art_number: None,
            art_attachment: None,
            address: String::new(),
            building_type: crate::catalog::BUILDING_TYPES[0].to_string(),
            occupancy: Occupancy::Occupied,
            location_info: DEFAULT_LOCATION_INFO.to_string(),
            provided_documents: BTreeSet::new(),
            documents_note: String::new(),
            brief_account: String::new(),
            anamnesis: DEFAULT_ANAMNESIS.to_string(),
            report_text: String::new(),
            include_footer: true,
            include_page_numbers: true,
            version: 1,
        }
    }

    /// ART number, if one was filled in
    pub fn art(&self) -> Option<&str> {
        self.art_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    pub fn is_document_provided(&self, label: &str) -> bool {
        self.provided_documents.contains(label)
    }

    /// Non-blank lines of the brief account, trimmed and without "1." / "1)" markers
    pub fn brief_account_items(&self) -> Vec<&str> {
        self.brief_account
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(strip_list_marker)
            .collect()
    }
}

/// Drop a leading "12." or "12)" marker followed by whitespace
fn strip_list_marker(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    let Some(rest) = line[digits..].strip_prefix(['.', ')']) else {
        return line;
    };
    if !rest.starts_with(char::is_whitespace) {
        return line;
    }
    match rest.trim_start() {
        "" => line,
        item => item,
    }
}

impl Default for InspectionRecord {
    fn default() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}
