//! Static option lists offered by the inspection form
//!
//! Every selectable field draws its values from here. The document
//! assembler also walks [`REQUIRED_DOCUMENTS`] to build the documentation
//! checklist, so the order of that list is significant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field categories that have a fixed option list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionCategory {
    /// Contracted inspection company ("contratada")
    ContractedCompany,
    /// Building type ("tipo_empreendimento")
    BuildingType,
    /// Defect / anomaly type ("anomalias")
    Defect,
    /// Probable cause ("causas")
    Cause,
    /// Consequence of the anomaly ("consequencias")
    Consequence,
    /// Technical recommendation ("recomendacoes")
    Recommendation,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 6] = [
        OptionCategory::ContractedCompany,
        OptionCategory::BuildingType,
        OptionCategory::Defect,
        OptionCategory::Cause,
        OptionCategory::Consequence,
        OptionCategory::Recommendation,
    ];

    /// Key used when the catalog is serialized for the form
    pub fn key(&self) -> &'static str {
        match self {
            OptionCategory::ContractedCompany => "contratada",
            OptionCategory::BuildingType => "tipo_empreendimento",
            OptionCategory::Defect => "anomalias",
            OptionCategory::Cause => "causas",
            OptionCategory::Consequence => "consequencias",
            OptionCategory::Recommendation => "recomendacoes",
        }
    }

    /// Multi-select categories also accept free text outside the list
    pub fn accepts_custom(&self) -> bool {
        matches!(
            self,
            OptionCategory::Defect | OptionCategory::Consequence | OptionCategory::Recommendation
        )
    }
}

pub const CONTRACTED_COMPANIES: &[&str] = &[
    "Testcon Engenharia",
    "E2E Consultoria e Gestão",
    "Outra",
];

pub const BUILDING_TYPES: &[&str] = &[
    "Institucional de ensino superior privado",
    "Comercial",
    "Residencial multifamiliar",
    "Industrial",
    "Hospitalar",
    "Outro",
];

pub const DEFECTS: &[&str] = &[
    "Eflorescência",
    "Pinturas em desconformidades",
    "Pilares apresentam expansão de armadura",
    "Marquises com rupturas e desplacamento",
    "Corrosão",
    "Mofo e bolor",
    "Infiltrações",
    "Fissuras",
    "Trincas",
    "Rachaduras",
    "Desplacamento de revestimento",
    "Vazamentos",
    "Problemas estruturais",
    "Deficiência de impermeabilização",
    "Instalações elétricas inadequadas",
    "Outra",
];

pub const CAUSES: &[&str] = &["Endógena", "Exógena", "Funcional", "Outra"];

pub const CONSEQUENCES: &[&str] = &[
    "Prejuízo estético",
    "Iminência de infiltração",
    "Risco à segurança dos usuários",
    "Comprometimento estrutural",
    "Insalubridade",
    "Perda de funcionalidade",
    "Comprometimento de equipamentos",
    "Outra",
];

pub const RECOMMENDATIONS: &[&str] = &[
    "Contratar empresa especializada para reabilitar as estruturas",
    "Realizar pintura de toda área",
    "Revisar estruturas e trocar selantes",
    "Impermeabilizar áreas afetadas",
    "Adequar instalações elétricas",
    "Realizar limpeza e organização",
    "Substituir elementos danificados",
    "Realizar manutenção preventiva",
    "Outra",
];

/// Documentation requested from the client, in checklist order
pub const REQUIRED_DOCUMENTS: &[&str] = &[
    "Certificado de Conclusão de Obra ou Habite-se",
    "Alvará ou Licença de Funcionamento",
    "Auto de Vistoria do Corpo de Bombeiros",
    "Licença de operação da ETE",
    "Licenças ambientais",
    "Certificado de Acessibilidade",
    "Licença de perfuração poços profundos",
    "Documentos de formação da brigada de incêndio",
    "Alvará de aprovação para instalação de equipamento",
    "Declaração de prestação de serviços de Pronto Atendimento",
    "Aprovação de paralelismo de Grupo Moto Gerador",
    "Manual de Uso, Operação e Manutenção",
    "Registros de manutenções",
    "Projetos Arquitetônicos",
];

/// Cause assigned to a freshly created event
pub const DEFAULT_CAUSE: &str = "Funcional";

/// Get the option list for a category
pub fn options(category: OptionCategory) -> &'static [&'static str] {
    match category {
        OptionCategory::ContractedCompany => CONTRACTED_COMPANIES,
        OptionCategory::BuildingType => BUILDING_TYPES,
        OptionCategory::Defect => DEFECTS,
        OptionCategory::Cause => CAUSES,
        OptionCategory::Consequence => CONSEQUENCES,
        OptionCategory::Recommendation => RECOMMENDATIONS,
    }
}

/// True for the "Other" sentinels that unlock a free-text override
pub fn is_other(value: &str) -> bool {
    matches!(value, "Outra" | "Outro")
}

/// True if `label` is one of the required documentation entries
pub fn is_required_document(label: &str) -> bool {
    REQUIRED_DOCUMENTS.contains(&label)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("'{value}' is not an option for {category}")]
    UnknownOption { category: &'static str, value: String },

    #[error("Unknown documentation label: {0}")]
    UnknownDocument(String),
}

/// A value picked in the form for a catalog-backed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Choice {
    /// One of the listed options, with the override typed after picking "Outra"/"Outro"
    Option {
        value: String,
        #[serde(default, rename = "other")]
        override_text: Option<String>,
    },
    /// Free text typed directly (multi-select categories only)
    Custom { value: String },
}

impl Choice {
    pub fn option(value: impl Into<String>) -> Self {
        Choice::Option {
            value: value.into(),
            override_text: None,
        }
    }

    pub fn other(sentinel: impl Into<String>, override_text: impl Into<String>) -> Self {
        Choice::Option {
            value: sentinel.into(),
            override_text: Some(override_text.into()),
        }
    }

    pub fn custom(value: impl Into<String>) -> Self {
        Choice::Custom {
            value: value.into(),
        }
    }

    /// Resolve to the value that gets stored on the record
    pub fn resolve(&self, category: OptionCategory) -> Result<String, CatalogError> {
        match self {
            Choice::Option {
                value,
                override_text,
            } => resolve_choice(category, value, override_text.as_deref()),
            Choice::Custom { value } if category.accepts_custom() => Ok(value.trim().to_string()),
            Choice::Custom { value } => Err(CatalogError::UnknownOption {
                category: category.key(),
                value: value.clone(),
            }),
        }
    }
}

/// Resolve a selected option and its optional override into the stored value
///
/// When the selection is an "Outra"/"Outro" sentinel and a non-blank override
/// is supplied, the override replaces the sentinel.
pub fn resolve_choice(
    category: OptionCategory,
    selected: &str,
    override_text: Option<&str>,
) -> Result<String, CatalogError> {
    if !options(category).contains(&selected) {
        return Err(CatalogError::UnknownOption {
            category: category.key(),
            value: selected.to_string(),
        });
    }

    if is_other(selected) {
        if let Some(text) = override_text.map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(text.to_string());
        }
    }

    Ok(selected.to_string())
}

/// Serializable view of the whole catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub options: std::collections::BTreeMap<&'static str, &'static [&'static str]>,
    pub documentacoes: &'static [&'static str],
}

pub fn catalog_view() -> CatalogView {
    CatalogView {
        options: OptionCategory::ALL
            .iter()
            .map(|c| (c.key(), options(*c)))
            .collect(),
        documentacoes: REQUIRED_DOCUMENTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_every_category_has_an_other_sentinel() {
        for category in OptionCategory::ALL {
            assert!(
                options(category).iter().any(|v| is_other(v)),
                "{} should offer Outra/Outro",
                category.key()
            );
        }
    }

    #[test]
    fn test_required_documents_count() {
        assert_eq!(REQUIRED_DOCUMENTS.len(), 14);
        assert_eq!(REQUIRED_DOCUMENTS[13], "Projetos Arquitetônicos");
    }

    #[test]
    fn test_resolve_plain_option() {
        let value = resolve_choice(OptionCategory::Cause, "Exógena", None).unwrap();
        assert_eq!(value, "Exógena");
    }

    #[test]
    fn test_resolve_rejects_unknown_option() {
        let result = resolve_choice(OptionCategory::Cause, "Acidental", None);
        assert!(matches!(result, Err(CatalogError::UnknownOption { .. })));
    }

    #[test]
    fn test_sentinel_without_override_is_kept() {
        let value = resolve_choice(OptionCategory::BuildingType, "Outro", Some("   ")).unwrap();
        assert_eq!(value, "Outro");
    }

    #[test]
    fn test_override_ignored_for_regular_option() {
        let value =
            resolve_choice(OptionCategory::BuildingType, "Comercial", Some("Galpão")).unwrap();
        assert_eq!(value, "Comercial");
    }

    #[test]
    fn test_custom_choice_only_for_multi_select() {
        assert_eq!(
            Choice::custom(" Bolhas na pintura ")
                .resolve(OptionCategory::Defect)
                .unwrap(),
            "Bolhas na pintura"
        );
        assert!(Choice::custom("Acidental")
            .resolve(OptionCategory::Cause)
            .is_err());
    }

    #[test]
    fn test_choice_deserializes_from_form_json() {
        let choice: Choice =
            serde_json::from_str(r#"{"kind":"option","value":"Outra","other":"Acme Engenharia"}"#)
                .unwrap();
        assert_eq!(
            choice.resolve(OptionCategory::ContractedCompany).unwrap(),
            "Acme Engenharia"
        );
    }

    fn sentinel_category() -> impl Strategy<Value = (OptionCategory, &'static str)> {
        prop::sample::select(OptionCategory::ALL.to_vec()).prop_map(|c| {
            let sentinel = options(c)
                .iter()
                .copied()
                .find(|v| is_other(v))
                .unwrap_or("Outra");
            (c, sentinel)
        })
    }

    proptest! {
        /// Property: an override supplied with a sentinel always replaces it
        #[test]
        fn override_replaces_sentinel(
            (category, sentinel) in sentinel_category(),
            text in "[A-Za-zÀ-ú][A-Za-zÀ-ú ]{0,30}",
        ) {
            let stored = resolve_choice(category, sentinel, Some(&text)).unwrap();
            prop_assert_eq!(&stored, text.trim());
            prop_assert!(!is_other(&stored) || is_other(text.trim()));
        }
    }
}
