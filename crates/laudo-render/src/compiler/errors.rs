//! Error types for report compilation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A Typst diagnostic, kept for logs and API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub severity: DiagnosticSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
            severity: DiagnosticSeverity::Error,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn as_warning(mut self) -> Self {
        self.severity = DiagnosticSeverity::Warning;
        self
    }
}

/// Failures while producing a report document
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Document compilation failed: {}", first_message(.0))]
    Compile(Vec<Diagnostic>),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("Compilation timeout after {0}ms")]
    Timeout(u64),

    #[error("Compilation task failed: {0}")]
    Task(String),

    #[error("Path security violation: {0}")]
    PathSecurityViolation(String),

    #[error("Could not attach ART document: {0}")]
    Attachment(String),
}

fn first_message(diagnostics: &[Diagnostic]) -> &str {
    diagnostics
        .first()
        .map(|d| d.message.as_str())
        .unwrap_or("unknown error")
}
