//! Virtual filesystem for in-memory compilation
//!
//! Holds the generated main source and the event images it references.
//! Nothing is read from or written to the real filesystem.

use std::collections::HashMap;

use typst::foundations::Bytes;
use typst::syntax::{FileId, Source, VirtualPath};

use crate::compiler::errors::RenderError;

const MAIN_PATH: &str = "/main.typ";

#[derive(Debug, Default)]
pub struct VirtualFilesystem {
    files: HashMap<FileId, Bytes>,
}

impl VirtualFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the main source file and return its id
    pub fn mount_main(&mut self, content: String) -> FileId {
        let id = file_id(MAIN_PATH);
        self.files.insert(id, Bytes::from(content.into_bytes()));
        id
    }

    /// Mount an asset such as an event image
    pub fn mount_file(&mut self, path: &str, content: Bytes) -> Result<FileId, RenderError> {
        validate_path(path)?;
        let id = file_id(&normalize_path(path));
        self.files.insert(id, content);
        Ok(id)
    }

    pub fn get_source(&self, id: FileId) -> Option<Source> {
        let bytes = self.files.get(&id)?;
        let text = std::str::from_utf8(bytes).ok()?;
        Some(Source::new(id, text.to_string()))
    }

    pub fn get_file(&self, id: FileId) -> Option<&Bytes> {
        self.files.get(&id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn file_id(path: &str) -> FileId {
    FileId::new(None, VirtualPath::new(path))
}

fn validate_path(path: &str) -> Result<(), RenderError> {
    if path.contains("..") {
        return Err(RenderError::PathSecurityViolation(
            "Path traversal with '..' is not allowed".to_string(),
        ));
    }
    if path.contains(':') || path.contains('\\') {
        return Err(RenderError::PathSecurityViolation(format!(
            "Not a virtual path: {path}"
        )));
    }
    Ok(())
}

fn normalize_path(path: &str) -> String {
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_main() {
        let mut fs = VirtualFilesystem::new();
        let id = fs.mount_main("= Sumário".to_string());
        let source = fs.get_source(id).unwrap();
        assert!(source.text().contains("Sumário"));
    }

    #[test]
    fn test_path_traversal_blocked() {
        let mut fs = VirtualFilesystem::new();
        let result = fs.mount_file("../../../etc/passwd", Bytes::from_static(&[]));
        assert!(matches!(result, Err(RenderError::PathSecurityViolation(_))));
    }

    #[test]
    fn test_relative_and_absolute_paths_share_an_id() {
        let mut fs = VirtualFilesystem::new();
        let content: Bytes = vec![0x89u8, 0x50, 0x4E, 0x47].into();
        let id = fs.mount_file("eventos//01/1.png", content.clone()).unwrap();
        assert_eq!(id, file_id("/eventos/01/1.png"));
        assert_eq!(fs.get_file(id), Some(&content));
    }
}
