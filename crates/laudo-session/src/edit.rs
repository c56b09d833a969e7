//! Typed edits applied to a session's record and events
//!
//! Each edit overwrites one attribute. Catalog-backed fields carry a
//! [`Choice`] so an "Outra"/"Outro" pick is replaced by its override text.

use chrono::NaiveDate;
use laudo_types::{
    Attachment, Choice, Event, InspectionRecord, Location, Occupancy, OptionCategory, OptionSet,
    Priority, UsageStatus,
};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum RecordEdit {
    Contractor(String),
    TaxId(String),
    ContractedCompany(Choice),
    InspectionDate(NaiveDate),
    InspectionDays(String),
    CityState(String),
    ArtNumber(Option<String>),
    ArtAttachment(Option<Attachment>),
    Address(String),
    BuildingType(Choice),
    Occupancy(Occupancy),
    LocationInfo(String),
    DocumentsNote(String),
    BriefAccount(String),
    Anamnesis(String),
    ReportText(String),
    IncludeFooter(bool),
    IncludePageNumbers(bool),
    Version(u32),
}

impl RecordEdit {
    /// Apply to `record`; on error the record is left as it was
    pub fn apply(self, record: &mut InspectionRecord) -> Result<(), SessionError> {
        match self {
            RecordEdit::Contractor(v) => record.contractor = v,
            RecordEdit::TaxId(v) => record.tax_id = v,
            RecordEdit::ContractedCompany(choice) => {
                record.contracted_company = choice.resolve(OptionCategory::ContractedCompany)?
            }
            RecordEdit::InspectionDate(v) => record.inspection_date = v,
            RecordEdit::InspectionDays(v) => record.inspection_days = v,
            RecordEdit::CityState(v) => record.city_state = v,
            RecordEdit::ArtNumber(v) => record.art_number = v,
            RecordEdit::ArtAttachment(v) => record.art_attachment = v,
            RecordEdit::Address(v) => record.address = v,
            RecordEdit::BuildingType(choice) => {
                record.building_type = choice.resolve(OptionCategory::BuildingType)?
            }
            RecordEdit::Occupancy(v) => record.occupancy = v,
            RecordEdit::LocationInfo(v) => record.location_info = v,
            RecordEdit::DocumentsNote(v) => record.documents_note = v,
            RecordEdit::BriefAccount(v) => record.brief_account = v,
            RecordEdit::Anamnesis(v) => record.anamnesis = v,
            RecordEdit::ReportText(v) => record.report_text = v,
            RecordEdit::IncludeFooter(v) => record.include_footer = v,
            RecordEdit::IncludePageNumbers(v) => record.include_page_numbers = v,
            RecordEdit::Version(0) => return Err(SessionError::InvalidVersion),
            RecordEdit::Version(v) => record.version = v,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EventEdit {
    Name(String),
    Location(Location),
    Defects(Vec<Choice>),
    Cause(Choice),
    Consequences(Vec<Choice>),
    Priority(Priority),
    Usage(UsageStatus),
    Recommendations(Vec<Choice>),
}

fn resolve_all(choices: &[Choice], category: OptionCategory) -> Result<OptionSet, SessionError> {
    let mut set = OptionSet::new();
    for choice in choices {
        set.insert(choice.resolve(category)?);
    }
    Ok(set)
}

impl EventEdit {
    pub fn apply(self, event: &mut Event) -> Result<(), SessionError> {
        match self {
            EventEdit::Name(v) => event.name = v,
            EventEdit::Location(Location::Custom(text)) => event.location = Location::custom(&text),
            EventEdit::Location(v) => event.location = v,
            EventEdit::Defects(choices) => {
                event.defects = resolve_all(&choices, OptionCategory::Defect)?
            }
            EventEdit::Cause(choice) => event.cause = choice.resolve(OptionCategory::Cause)?,
            EventEdit::Consequences(choices) => {
                event.consequences = resolve_all(&choices, OptionCategory::Consequence)?
            }
            EventEdit::Priority(v) => event.priority = v,
            EventEdit::Usage(v) => event.usage = v,
            EventEdit::Recommendations(choices) => {
                event.recommendations = resolve_all(&choices, OptionCategory::Recommendation)?
            }
        }
        Ok(())
    }
}
