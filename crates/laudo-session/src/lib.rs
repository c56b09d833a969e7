//! Form state for building inspection reports
//!
//! A [`Session`] owns one record and its event list, applies typed edits,
//! keeps named snapshots and drives generation. [`MemoryStore`] persists
//! snapshots to a JSON file.

pub mod edit;
pub mod error;
pub mod memory;
pub mod session;

pub use edit::{EventEdit, RecordEdit};
pub use error::{MemoryError, SessionError};
pub use memory::{MemoryContents, MemoryStore, DEFAULT_MEMORY_PATH};
pub use session::{
    GeneratedReport, GenerationInput, ImageUpload, Session, IMAGE_LIMIT_WARNING,
};
