//! Application state for the laudo server

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use laudo_narrative::NarrativeGenerator;
use laudo_session::{MemoryStore, Session};
use laudo_types::InspectionRecord;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

pub type SharedSession = Arc<Mutex<Session>>;

/// Open sessions by id; each session is locked independently
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionRegistry {
    pub async fn create(&self, session: Session) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, shared.clone());
        info!(%id, "Session created");
        (id, shared)
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, ApiError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ApiError::SessionNotFound(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!(%id, "Session closed");
                Ok(())
            }
            None => Err(ApiError::SessionNotFound(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    pub narrative: NarrativeGenerator,
    pub memory: Arc<Mutex<MemoryStore>>,
    /// Directory that receives memory backups
    pub backup_dir: PathBuf,
    /// Render timeout in milliseconds
    pub timeout_ms: u64,
}

impl AppState {
    pub fn new(
        narrative: NarrativeGenerator,
        memory: MemoryStore,
        backup_dir: PathBuf,
        timeout_ms: u64,
    ) -> Self {
        Self {
            sessions: SessionRegistry::default(),
            narrative,
            memory: Arc::new(Mutex::new(memory)),
            backup_dir,
            timeout_ms,
        }
    }

    /// A blank session dated today, preloaded with the persisted reports
    pub async fn new_session(&self) -> (Uuid, SharedSession) {
        let mut session = Session::new(InspectionRecord::new(chrono::Local::now().date_naive()));
        {
            let memory = self.memory.lock().await;
            for (name, report) in &memory.contents().laudos {
                session.insert_saved(name.clone(), report.clone());
            }
        }
        self.sessions.create(session).await
    }
}
