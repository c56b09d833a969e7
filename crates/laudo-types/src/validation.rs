//! Generation-time completeness checks
//!
//! Nothing is validated while the form is being edited; these checks run
//! only when a document is requested.

use serde::Serialize;
use thiserror::Error;

use crate::event::Event;
use crate::record::InspectionRecord;

/// Fields that must be filled before a report can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Contractor,
    TaxId,
    Address,
    CityState,
    InspectionDays,
}

impl RequiredField {
    pub const ALL: [RequiredField; 5] = [
        RequiredField::Contractor,
        RequiredField::TaxId,
        RequiredField::Address,
        RequiredField::CityState,
        RequiredField::InspectionDays,
    ];

    /// Label shown in the form
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Contractor => "Nome do Contratante",
            RequiredField::TaxId => "CNPJ/CPF",
            RequiredField::Address => "Endereço Completo",
            RequiredField::CityState => "Cidade-Estado",
            RequiredField::InspectionDays => "Dias de Vistoria",
        }
    }

    fn value<'a>(&self, record: &'a InspectionRecord) -> &'a str {
        match self {
            RequiredField::Contractor => &record.contractor,
            RequiredField::TaxId => &record.tax_id,
            RequiredField::Address => &record.address,
            RequiredField::CityState => &record.city_state,
            RequiredField::InspectionDays => &record.inspection_days,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Campos obrigatórios não preenchidos: {}", join_labels(.0))]
    MissingFields(Vec<RequiredField>),

    #[error("Adicione pelo menos um evento de inspeção")]
    NoEvents,
}

fn join_labels(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Required fields that are blank, in form order
pub fn missing_fields(record: &InspectionRecord) -> Vec<RequiredField> {
    RequiredField::ALL
        .into_iter()
        .filter(|field| field.value(record).trim().is_empty())
        .collect()
}

/// Check that a record and its events are complete enough to generate
pub fn validate_for_generation(
    record: &InspectionRecord,
    events: &[Event],
) -> Result<(), ValidationError> {
    let missing = missing_fields(record);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    if events.is_empty() {
        return Err(ValidationError::NoEvents);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn complete_record() -> InspectionRecord {
        let mut record = InspectionRecord::new(NaiveDate::from_ymd_opt(2025, 7, 11).unwrap());
        record.contractor = "Ser Educacional S.A".into();
        record.tax_id = "04.986.320/0001-13".into();
        record.address = "Av. Engenheiro Roberto Freire, 1684, Natal-RN".into();
        record.city_state = "Natal-RN".into();
        record.inspection_days = "08 a 11/07/2025".into();
        record
    }

    fn clear(record: &mut InspectionRecord, field: RequiredField) {
        match field {
            RequiredField::Contractor => record.contractor.clear(),
            RequiredField::TaxId => record.tax_id.clear(),
            RequiredField::Address => record.address = "   ".into(),
            RequiredField::CityState => record.city_state.clear(),
            RequiredField::InspectionDays => record.inspection_days.clear(),
        }
    }

    #[test]
    fn test_complete_record_with_event_passes() {
        assert!(validate_for_generation(&complete_record(), &[Event::new(1)]).is_ok());
    }

    #[test]
    fn test_no_events_blocks_generation() {
        let result = validate_for_generation(&complete_record(), &[]);
        assert_eq!(result, Err(ValidationError::NoEvents));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Adicione pelo menos um evento de inspeção"
        );
    }

    #[test]
    fn test_missing_fields_message_names_fields() {
        let mut record = complete_record();
        record.tax_id.clear();
        record.city_state.clear();
        let err = validate_for_generation(&record, &[Event::new(1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Campos obrigatórios não preenchidos: CNPJ/CPF, Cidade-Estado"
        );
    }

    proptest! {
        /// Property: generation names exactly the blank required fields
        #[test]
        fn missing_fields_are_named_exactly(mask in prop::collection::vec(any::<bool>(), 5)) {
            let mut record = complete_record();
            let mut expected = Vec::new();
            for (field, blank) in RequiredField::ALL.into_iter().zip(mask) {
                if blank {
                    clear(&mut record, field);
                    expected.push(field);
                }
            }

            let result = validate_for_generation(&record, &[Event::new(1)]);
            if expected.is_empty() {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(ValidationError::MissingFields(expected)));
            }
        }

        /// Property: zero events always blocks, whatever the fields hold
        #[test]
        fn zero_events_always_blocks(mask in prop::collection::vec(any::<bool>(), 5)) {
            let mut record = complete_record();
            for (field, blank) in RequiredField::ALL.into_iter().zip(mask) {
                if blank {
                    clear(&mut record, field);
                }
            }
            prop_assert!(validate_for_generation(&record, &[]).is_err());
        }
    }
}
