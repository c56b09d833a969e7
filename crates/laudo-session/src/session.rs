//! One report in progress: the live record, its events and saved snapshots

use chrono::{DateTime, TimeZone, Utc};
use laudo_narrative::{NarrativeGenerator, NarrativeMode, NarrativeOutcome};
use laudo_render::RenderedReport;
use laudo_types::catalog::{is_required_document, REQUIRED_DOCUMENTS};
use laudo_types::event::{renumber, MAX_EVENT_IMAGES};
use laudo_types::naming::{draft_name, report_filename};
use laudo_types::{
    validate_for_generation, Attachment, CatalogError, Event, InspectionRecord, SavedReport,
    SavedReportsMap,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::edit::{EventEdit, RecordEdit};
use crate::error::SessionError;

pub const IMAGE_LIMIT_WARNING: &str =
    "Máximo de 3 imagens por evento. Apenas as 3 primeiras serão usadas.";

/// Frozen copy of the session content handed to the renderer
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub record: InspectionRecord,
    pub events: Vec<Event>,
}

impl GenerationInput {
    pub fn filename(&self) -> String {
        report_filename(
            &self.record.contractor,
            self.record.inspection_date,
            self.record.version,
        )
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub filename: String,
    pub report: RenderedReport,
}

/// Result of attaching images to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUpload {
    pub stored: usize,
    pub warning: Option<&'static str>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    record: InspectionRecord,
    events: Vec<Event>,
    saved: SavedReportsMap,
}

impl Session {
    pub fn new(record: InspectionRecord) -> Self {
        Self {
            record,
            events: Vec::new(),
            saved: SavedReportsMap::new(),
        }
    }

    pub fn record(&self) -> &InspectionRecord {
        &self.record
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn saved_reports(&self) -> &SavedReportsMap {
        &self.saved
    }

    /// Apply edits in order; stops at the first failing edit
    pub fn edit_record(
        &mut self,
        edits: impl IntoIterator<Item = RecordEdit>,
    ) -> Result<(), SessionError> {
        for edit in edits {
            debug!(?edit, "Record edit");
            edit.apply(&mut self.record)?;
        }
        Ok(())
    }

    fn event_mut(&mut self, index: usize) -> Result<&mut Event, SessionError> {
        let len = self.events.len();
        self.events
            .get_mut(index)
            .ok_or(SessionError::EventOutOfRange { index, len })
    }

    // Event list

    /// Append a blank event and return its index
    pub fn add_event(&mut self) -> usize {
        let index = self.events.len();
        self.events.push(Event::new(index as u32 + 1));
        debug!(index, "Event added");
        index
    }

    pub fn remove_event(&mut self, index: usize) -> Result<Event, SessionError> {
        if index >= self.events.len() {
            return Err(SessionError::EventOutOfRange {
                index,
                len: self.events.len(),
            });
        }
        let removed = self.events.remove(index);
        renumber(&mut self.events);
        debug!(index, remaining = self.events.len(), "Event removed");
        Ok(removed)
    }

    pub fn clear_all_events(&mut self) {
        debug!(count = self.events.len(), "Clearing all events");
        self.events.clear();
    }

    pub fn edit_event(
        &mut self,
        index: usize,
        edits: impl IntoIterator<Item = EventEdit>,
    ) -> Result<(), SessionError> {
        let event = self.event_mut(index)?;
        for edit in edits {
            debug!(index, ?edit, "Event edit");
            edit.apply(event)?;
        }
        Ok(())
    }

    /// Replace the event's images with the first three uploads
    pub fn attach_images(
        &mut self,
        index: usize,
        mut images: Vec<Attachment>,
    ) -> Result<ImageUpload, SessionError> {
        if let Some(bad) = images.iter().find(|a| !a.kind.is_image()) {
            return Err(SessionError::UnsupportedImage(bad.file_name.clone()));
        }
        let event = self.event_mut(index)?;

        let warning = if images.len() > MAX_EVENT_IMAGES {
            warn!(
                index,
                supplied = images.len(),
                kept = MAX_EVENT_IMAGES,
                "Too many images for event, keeping the first ones"
            );
            images.truncate(MAX_EVENT_IMAGES);
            Some(IMAGE_LIMIT_WARNING)
        } else {
            None
        };
        event.images = images;

        Ok(ImageUpload {
            stored: event.images.len(),
            warning,
        })
    }

    // Documentation checklist

    pub fn set_document(&mut self, label: &str, provided: bool) -> Result<(), SessionError> {
        if !is_required_document(label) {
            return Err(CatalogError::UnknownDocument(label.to_string()).into());
        }
        if provided {
            self.record.provided_documents.insert(label.to_string());
        } else {
            self.record.provided_documents.remove(label);
        }
        Ok(())
    }

    pub fn mark_all_documents(&mut self) {
        self.record.provided_documents = REQUIRED_DOCUMENTS.iter().map(|d| d.to_string()).collect();
    }

    pub fn clear_documents(&mut self) {
        self.record.provided_documents.clear();
    }

    // Narrative

    /// Produce the narrative and store it as the report text
    pub async fn write_narrative(
        &mut self,
        generator: &NarrativeGenerator,
        mode: &NarrativeMode,
    ) -> NarrativeOutcome {
        let outcome = generator.generate(mode, &self.record, &self.events).await;
        self.record.report_text = outcome.text.clone();
        outcome
    }

    /// Reorganize the brief account into a numbered list, in place
    pub async fn organize_brief_account(
        &mut self,
        generator: &NarrativeGenerator,
    ) -> NarrativeOutcome {
        let outcome = generator
            .organize_brief_account(&self.record.brief_account)
            .await;
        self.record.brief_account = outcome.text.clone();
        outcome
    }

    // Snapshots

    /// Save the current content as `Rascunho_{timestamp}` and return the name
    pub fn save_draft<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let name = draft_name(now);
        let snapshot = SavedReport::capture(&self.record, &self.events, now.with_timezone(&Utc));
        self.saved.insert(name.clone(), snapshot);
        info!(name = %name, "Draft saved");
        name
    }

    /// Replace the live content with a copy of a saved snapshot
    pub fn load_saved(&mut self, name: &str) -> Result<(), SessionError> {
        let snapshot = self
            .saved
            .get(name)
            .ok_or_else(|| SessionError::SavedNotFound(name.to_string()))?;
        self.record = snapshot.dados.clone();
        self.events = snapshot.eventos.clone();
        info!(name, events = self.events.len(), "Saved report loaded");
        Ok(())
    }

    /// Store a snapshot under `name`, e.g. one read back from the memory store
    pub fn insert_saved(&mut self, name: impl Into<String>, snapshot: SavedReport) {
        self.saved.insert(name.into(), snapshot);
    }

    // Generation

    pub fn prepare_generation(&self) -> Result<GenerationInput, SessionError> {
        validate_for_generation(&self.record, &self.events)?;
        Ok(GenerationInput {
            record: self.record.clone(),
            events: self.events.clone(),
        })
    }

    pub fn complete_generation(
        &mut self,
        input: &GenerationInput,
        filename: &str,
        now: DateTime<Utc>,
    ) {
        self.saved.insert(
            filename.to_string(),
            SavedReport::capture(&input.record, &input.events, now),
        );
    }

    /// Validate, render on this thread and record the snapshot
    pub fn generate(&mut self, now: DateTime<Utc>) -> Result<GeneratedReport, SessionError> {
        let input = self.prepare_generation()?;
        let report = laudo_render::render_report(&input.record, &input.events)?;
        Ok(self.finish_generation(input, report, now))
    }

    /// Like [`Session::generate`], compiling on the blocking pool with a timeout
    pub async fn generate_with_timeout(
        &mut self,
        now: DateTime<Utc>,
        timeout_ms: u64,
    ) -> Result<GeneratedReport, SessionError> {
        let input = self.prepare_generation()?;
        let report =
            laudo_render::render_report_with_timeout(&input.record, &input.events, timeout_ms)
                .await?;
        Ok(self.finish_generation(input, report, now))
    }

    fn finish_generation(
        &mut self,
        input: GenerationInput,
        report: RenderedReport,
        now: DateTime<Utc>,
    ) -> GeneratedReport {
        let filename = input.filename();
        self.complete_generation(&input, &filename, now);
        info!(
            filename = %filename,
            pages = report.page_count,
            bytes = report.bytes.len(),
            "Report generated"
        );
        GeneratedReport { filename, report }
    }
}
