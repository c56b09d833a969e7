//! API handlers for the laudo server
//!
//! Provides REST endpoints for:
//! - The options catalog
//! - Session lifecycle and form edits
//! - Narrative text
//! - Report generation, drafts and the memory store

use axum::{
    extract::{Path, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Local, Utc};
use laudo_narrative::{suggest_image_captions, NarrativeMode, NarrativeOutcome, RewriteIntensity};
use laudo_session::{EventEdit, ImageUpload, RecordEdit, Session};
use laudo_types::catalog::{catalog_view, CatalogView};
use laudo_types::{Attachment, Event, InspectionRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub completions: bool,
    pub sessions: usize,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "laudo-server",
        version: env!("CARGO_PKG_VERSION"),
        completions: state.narrative.has_completions(),
        sessions: state.sessions.len().await,
    })
}

/// Handler: GET /api/catalog
pub async fn handle_catalog() -> Json<CatalogView> {
    Json(catalog_view())
}

#[derive(Serialize)]
pub struct SavedEntry {
    pub name: String,
    pub versao: u32,
    pub data_criacao: DateTime<Utc>,
}

/// Full view of a session as the form needs it
#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub id: Uuid,
    pub record: InspectionRecord,
    pub events: Vec<Event>,
    pub saved: Vec<SavedEntry>,
}

fn saved_entries(session: &Session) -> Vec<SavedEntry> {
    session
        .saved_reports()
        .iter()
        .map(|(name, report)| SavedEntry {
            name: name.clone(),
            versao: report.versao,
            data_criacao: report.data_criacao,
        })
        .collect()
}

impl SessionResponse {
    fn of(id: Uuid, session: &Session) -> Self {
        Self {
            success: true,
            id,
            record: session.record().clone(),
            events: session.events().to_vec(),
            saved: saved_entries(session),
        }
    }
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

const OK: SuccessResponse = SuccessResponse { success: true };

/// Handler: POST /api/sessions
pub async fn handle_create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let (id, shared) = state.new_session().await;
    let session = shared.lock().await;
    Json(SessionResponse::of(id, &session))
}

/// Handler: GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let session = shared.lock().await;
    Ok(Json(SessionResponse::of(id, &session)))
}

/// Handler: DELETE /api/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.sessions.remove(id).await?;
    Ok(Json(OK))
}

/// Handler: PATCH /api/sessions/:id/record
pub async fn handle_edit_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(edits): Json<Vec<RecordEdit>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    debug!(%id, count = edits.len(), "Applying record edits");
    session.edit_record(edits)?;
    Ok(Json(SessionResponse::of(id, &session)))
}

#[derive(Serialize)]
pub struct EventResponse {
    pub success: bool,
    pub index: usize,
    pub event: Event,
}

/// Handler: POST /api/sessions/:id/events
pub async fn handle_add_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    let index = session.add_event();
    Ok(Json(EventResponse {
        success: true,
        index,
        event: session.events()[index].clone(),
    }))
}

/// Handler: DELETE /api/sessions/:id/events
pub async fn handle_clear_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    session.clear_all_events();
    Ok(Json(SessionResponse::of(id, &session)))
}

/// Handler: PATCH /api/sessions/:id/events/:index
pub async fn handle_edit_event(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(edits): Json<Vec<EventEdit>>,
) -> Result<Json<EventResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    session.edit_event(index, edits)?;
    Ok(Json(EventResponse {
        success: true,
        index,
        event: session.events()[index].clone(),
    }))
}

/// Handler: DELETE /api/sessions/:id/events/:index
pub async fn handle_remove_event(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    session.remove_event(index)?;
    Ok(Json(SessionResponse::of(id, &session)))
}

#[derive(Serialize)]
pub struct ImagesResponse {
    pub success: bool,
    #[serde(flatten)]
    pub upload: ImageUpload,
    pub captions: Vec<String>,
}

/// Handler: PUT /api/sessions/:id/events/:index/images
pub async fn handle_attach_images(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(images): Json<Vec<Attachment>>,
) -> Result<Json<ImagesResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    let upload = session.attach_images(index, images)?;
    let captions = suggest_image_captions(&session.events()[index]);
    Ok(Json(ImagesResponse {
        success: true,
        upload,
        captions,
    }))
}

/// Checklist change
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DocumentsRequest {
    Set { label: String, provided: bool },
    MarkAll,
    Clear,
}

/// Handler: PUT /api/sessions/:id/documents
pub async fn handle_documents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DocumentsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    match req {
        DocumentsRequest::Set { label, provided } => session.set_document(&label, provided)?,
        DocumentsRequest::MarkAll => session.mark_all_documents(),
        DocumentsRequest::Clear => session.clear_documents(),
    }
    Ok(Json(SessionResponse::of(id, &session)))
}

#[derive(Serialize)]
pub struct NarrativeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: NarrativeOutcome,
}

impl From<NarrativeOutcome> for NarrativeResponse {
    fn from(outcome: NarrativeOutcome) -> Self {
        Self {
            success: true,
            outcome,
        }
    }
}

/// Handler: POST /api/sessions/:id/narrative
pub async fn handle_narrative(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mode): Json<NarrativeMode>,
) -> Result<Json<NarrativeResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    let outcome = session.write_narrative(&state.narrative, &mode).await;
    Ok(Json(outcome.into()))
}

#[derive(Deserialize)]
pub struct RewriteRequest {
    #[serde(default)]
    pub intensity: RewriteIntensity,
}

/// Handler: POST /api/sessions/:id/narrative/rewrite
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RewriteRequest>,
) -> Result<Json<NarrativeResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    let outcome = state
        .narrative
        .rewrite(&session.record().report_text, req.intensity)
        .await;
    session.edit_record([RecordEdit::ReportText(outcome.text.clone())])?;
    Ok(Json(outcome.into()))
}

/// Handler: POST /api/sessions/:id/brief-account
pub async fn handle_brief_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NarrativeResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    let outcome = session.organize_brief_account(&state.narrative).await;
    Ok(Json(outcome.into()))
}

/// Generated report, PDF bytes base64-encoded
#[derive(Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub filename: String,
    pub data: String,
    pub mime_type: &'static str,
    pub page_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

/// Handler: POST /api/sessions/:id/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    info!(%id, "Generate request");

    let generated = session
        .generate_with_timeout(Utc::now(), state.timeout_ms)
        .await?;

    let warnings: Vec<String> = generated
        .report
        .warnings
        .iter()
        .map(|w| w.message.clone())
        .collect();

    Ok(Json(GenerateResponse {
        success: true,
        data: BASE64.encode(&generated.report.bytes),
        mime_type: generated.report.mime_type,
        page_count: generated.report.page_count,
        filename: generated.filename,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
    }))
}

#[derive(Serialize)]
pub struct SavedListResponse {
    pub success: bool,
    pub saved: Vec<SavedEntry>,
}

/// Handler: GET /api/sessions/:id/saved
pub async fn handle_list_saved(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SavedListResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let session = shared.lock().await;
    Ok(Json(SavedListResponse {
        success: true,
        saved: saved_entries(&session),
    }))
}

/// Handler: POST /api/sessions/:id/saved/:name/load
pub async fn handle_load_saved(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    session.load_saved(&name)?;
    Ok(Json(SessionResponse::of(id, &session)))
}

#[derive(Serialize)]
pub struct NameResponse {
    pub success: bool,
    pub name: String,
}

/// Handler: POST /api/sessions/:id/drafts
pub async fn handle_save_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NameResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;
    let name = session.save_draft(&Local::now());
    Ok(Json(NameResponse {
        success: true,
        name,
    }))
}

#[derive(Deserialize)]
pub struct PersistRequest {
    /// Snapshot to persist; all of the session's snapshots when absent
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct PersistResponse {
    pub success: bool,
    pub persisted: Vec<String>,
}

/// Handler: POST /api/sessions/:id/persist
pub async fn handle_persist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PersistRequest>,
) -> Result<Json<PersistResponse>, ApiError> {
    let shared = state.sessions.get(id).await?;
    let session = shared.lock().await;

    let snapshots: Vec<_> = match &req.name {
        Some(name) => {
            let report = session
                .saved_reports()
                .get(name)
                .ok_or_else(|| laudo_session::SessionError::SavedNotFound(name.clone()))?;
            vec![(name.clone(), report.clone())]
        }
        None => session
            .saved_reports()
            .iter()
            .map(|(name, report)| (name.clone(), report.clone()))
            .collect(),
    };

    let mut memory = state.memory.lock().await;
    let mut persisted = Vec::with_capacity(snapshots.len());
    for (name, report) in snapshots {
        memory.save_report(&name, report)?;
        persisted.push(name);
    }

    Ok(Json(PersistResponse {
        success: true,
        persisted,
    }))
}

#[derive(Serialize)]
pub struct BackupResponse {
    pub success: bool,
    pub path: String,
}

/// Handler: POST /api/memory/backup
pub async fn handle_backup(State(state): State<AppState>) -> Result<Json<BackupResponse>, ApiError> {
    let memory = state.memory.lock().await;
    let path = memory.export_backup(&state.backup_dir, &Local::now())?;
    Ok(Json(BackupResponse {
        success: true,
        path: path.display().to_string(),
    }))
}
