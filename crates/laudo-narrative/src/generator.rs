//! Narrative generation with an optional completion service
//!
//! Every operation here returns usable text. When the completion service is
//! absent or fails, the deterministic fallback for the same inputs is
//! returned and [`NarrativeOutcome::used_fallback`] is set.

use std::sync::Arc;

use laudo_types::narrative::standard_narrative;
use laudo_types::{Event, InspectionRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::{CompletionClient, CompletionRequest};
use crate::prompts::{self, RewriteIntensity};

/// How the report narrative is produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NarrativeMode {
    /// The standard narrative with the record's details filled in
    Template,
    /// The engineer's own text, used as is
    Manual { text: String },
    /// Text written by the completion service
    Ai,
    /// The engineer's text followed by a generated complement
    Merge { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeOutcome {
    pub text: String,
    pub used_fallback: bool,
}

impl NarrativeOutcome {
    fn generated(text: String) -> Self {
        Self {
            text,
            used_fallback: false,
        }
    }

    fn fallback(text: String) -> Self {
        Self {
            text,
            used_fallback: true,
        }
    }
}

#[derive(Clone, Default)]
pub struct NarrativeGenerator {
    client: Option<Arc<dyn CompletionClient>>,
}

impl NarrativeGenerator {
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { client }
    }

    /// A generator that only ever produces the deterministic texts
    pub fn offline() -> Self {
        Self { client: None }
    }

    pub fn has_completions(&self) -> bool {
        self.client.is_some()
    }

    /// Ask the service; `None` means the caller should fall back
    async fn ask(&self, purpose: &'static str, request: CompletionRequest) -> Option<String> {
        let Some(client) = &self.client else {
            debug!(purpose, "No completion service configured");
            return None;
        };
        match client.complete(request).await {
            Ok(text) => {
                info!(purpose, chars = text.len(), "Completion received");
                Some(text)
            }
            Err(e) => {
                warn!(purpose, error = %e, "Completion failed, using fallback text");
                None
            }
        }
    }

    pub async fn generate(
        &self,
        mode: &NarrativeMode,
        record: &InspectionRecord,
        events: &[Event],
    ) -> NarrativeOutcome {
        match mode {
            NarrativeMode::Template => NarrativeOutcome::generated(standard_narrative(record)),
            NarrativeMode::Manual { text } => NarrativeOutcome::generated(text.clone()),
            NarrativeMode::Ai => {
                match self
                    .ask("report", prompts::report_request(record, events))
                    .await
                {
                    Some(text) => NarrativeOutcome::generated(text),
                    None => NarrativeOutcome::fallback(standard_narrative(record)),
                }
            }
            NarrativeMode::Merge { text } => {
                match self
                    .ask("merge", prompts::merge_request(record, events, text))
                    .await
                {
                    Some(completion) => {
                        NarrativeOutcome::generated(format!("{}\n\n{}", text, completion))
                    }
                    None => NarrativeOutcome::fallback(standard_narrative(record)),
                }
            }
        }
    }

    /// Reword `text`; the original comes back unchanged on failure
    pub async fn rewrite(&self, text: &str, intensity: RewriteIntensity) -> NarrativeOutcome {
        if text.trim().is_empty() {
            return NarrativeOutcome::generated(text.to_string());
        }
        match self
            .ask("rewrite", prompts::rewrite_request(text, intensity))
            .await
        {
            Some(rewritten) => NarrativeOutcome::generated(rewritten),
            None => NarrativeOutcome::fallback(text.to_string()),
        }
    }

    /// Turn loose notes into a numbered technical list
    pub async fn organize_brief_account(&self, points: &str) -> NarrativeOutcome {
        if points.trim().is_empty() {
            return NarrativeOutcome::generated(String::new());
        }
        match self
            .ask("brief_account", prompts::brief_account_request(points))
            .await
        {
            Some(list) => NarrativeOutcome::generated(list),
            None => NarrativeOutcome::fallback(number_lines(points)),
        }
    }
}

/// "1. first\n2. second" over the non-blank lines
pub fn number_lines(points: &str) -> String {
    points
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(idx, line)| format!("{}. {}", idx + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One caption per attached image
pub fn suggest_image_captions(event: &Event) -> Vec<String> {
    event
        .images
        .iter()
        .map(|_| format!("Imagem mostrando {}", event.name.trim()))
        .collect()
}
