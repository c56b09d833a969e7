//! Domain types for building inspection reports
//!
//! The record and event list edited by the form, the static options catalog,
//! generation-time validation and the naming rules for output files.

pub mod attachment;
pub mod catalog;
pub mod event;
pub mod naming;
pub mod narrative;
pub mod record;
pub mod saved;
pub mod validation;

pub use attachment::{Attachment, AttachmentKind};
pub use catalog::{CatalogError, Choice, OptionCategory};
pub use event::{Event, Location, OptionSet, Priority, UsageStatus};
pub use record::{InspectionRecord, Occupancy};
pub use saved::{SavedReport, SavedReportsMap};
pub use validation::{validate_for_generation, RequiredField, ValidationError};
