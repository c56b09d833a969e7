//! JSON file that keeps saved reports between runs
//!
//! Layout:
//!
//! ```json
//! { "laudos": { "<name>": { "dados": ..., "eventos": [...], "data_criacao": "...", "versao": 1 } },
//!   "templates": {},
//!   "configuracoes": {} }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use laudo_types::naming::backup_filename;
use laudo_types::{SavedReport, SavedReportsMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::MemoryError;

pub const DEFAULT_MEMORY_PATH: &str = "laudos_memoria.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryContents {
    #[serde(default)]
    pub laudos: SavedReportsMap,
    #[serde(default)]
    pub templates: Map<String, Value>,
    #[serde(default)]
    pub configuracoes: Map<String, Value>,
}

#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    contents: MemoryContents,
}

impl MemoryStore {
    /// Read the store at `path`; a missing file yields an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MemoryError> {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryContents::default(),
            Err(e) => return Err(e.into()),
        };
        info!(
            path = %path.display(),
            reports = contents.laudos.len(),
            "Memory store opened"
        );
        Ok(Self { path, contents })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> &MemoryContents {
        &self.contents
    }

    /// Store under `name` and write the file
    pub fn save_report(&mut self, name: &str, report: SavedReport) -> Result<(), MemoryError> {
        self.contents.laudos.insert(name.to_string(), report);
        self.flush()?;
        info!(name, "Report saved to memory store");
        Ok(())
    }

    pub fn load_report(&self, name: &str) -> Result<SavedReport, MemoryError> {
        self.contents
            .laudos
            .get(name)
            .cloned()
            .ok_or_else(|| MemoryError::NotFound(name.to_string()))
    }

    pub fn list_reports(&self) -> Vec<String> {
        self.contents.laudos.keys().cloned().collect()
    }

    pub fn flush(&self) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.to_json()?)?;
        Ok(())
    }

    /// Write a copy of the store into `dir` and return its path
    pub fn export_backup<Tz: TimeZone>(
        &self,
        dir: &Path,
        now: &DateTime<Tz>,
    ) -> Result<PathBuf, MemoryError>
    where
        Tz::Offset: std::fmt::Display,
    {
        fs::create_dir_all(dir)?;
        let path = dir.join(backup_filename(now));
        fs::write(&path, self.to_json()?)?;
        info!(path = %path.display(), "Memory backup written");
        Ok(path)
    }

    fn to_json(&self) -> Result<String, MemoryError> {
        Ok(serde_json::to_string_pretty(&self.contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use laudo_types::{Event, InspectionRecord};
    use pretty_assertions::assert_eq;

    fn snapshot(contractor: &str) -> SavedReport {
        let mut record = InspectionRecord::new(NaiveDate::from_ymd_opt(2025, 7, 11).unwrap());
        record.contractor = contractor.into();
        let now = Utc.with_ymd_and_hms(2025, 7, 11, 9, 0, 0).unwrap();
        SavedReport::capture(&record, &[Event::new(1)], now)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::open(dir.path().join("laudos_memoria.json")).unwrap();
        assert!(store.list_reports().is_empty());
        assert_eq!(store.contents(), &MemoryContents::default());
    }

    #[test]
    fn test_reports_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memoria.json");

        let mut store = MemoryStore::open(&path).unwrap();
        store.save_report("LAUDO_Acme_20250711_v1.pdf", snapshot("Acme")).unwrap();
        store.save_report("Rascunho_20250711_090000", snapshot("Beta")).unwrap();

        let reopened = MemoryStore::open(&path).unwrap();
        assert_eq!(
            reopened.list_reports(),
            vec!["LAUDO_Acme_20250711_v1.pdf", "Rascunho_20250711_090000"]
        );
        let loaded = reopened.load_report("LAUDO_Acme_20250711_v1.pdf").unwrap();
        assert_eq!(loaded, snapshot("Acme"));
        assert!(matches!(
            reopened.load_report("nada"),
            Err(MemoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_layout_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memoria.json");
        let mut store = MemoryStore::open(&path).unwrap();
        store.save_report("r1", snapshot("Acme")).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"laudos\""));
        let json: Value = serde_json::from_str(&text).unwrap();
        assert!(json["templates"].is_object());
        assert!(json["configuracoes"].is_object());
        let entry = &json["laudos"]["r1"];
        for key in ["dados", "eventos", "data_criacao", "versao"] {
            assert!(entry.get(key).is_some(), "missing {key}");
        }
        assert_eq!(entry["data_criacao"], "2025-07-11T09:00:00Z");
    }

    #[test]
    fn test_unknown_sections_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memoria.json");
        fs::write(
            &path,
            r#"{"laudos": {}, "templates": {"padrao": "texto"}, "configuracoes": {"tema": "claro"}}"#,
        )
        .unwrap();

        let mut store = MemoryStore::open(&path).unwrap();
        store.save_report("r1", snapshot("Acme")).unwrap();

        let reopened = MemoryStore::open(&path).unwrap();
        assert_eq!(reopened.contents().templates["padrao"], "texto");
        assert_eq!(reopened.contents().configuracoes["tema"], "claro");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memoria.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(MemoryStore::open(&path), Err(MemoryError::Json(_))));
    }

    #[test]
    fn test_export_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::open(dir.path().join("memoria.json")).unwrap();
        store.save_report("r1", snapshot("Acme")).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 7, 12, 8, 15, 0).unwrap();
        let backup = store.export_backup(&dir.path().join("backups"), &now).unwrap();

        assert_eq!(
            backup.file_name().unwrap().to_str().unwrap(),
            "backup_laudos_20250712_081500.json"
        );
        let copy: MemoryContents =
            serde_json::from_str(&fs::read_to_string(&backup).unwrap()).unwrap();
        assert_eq!(&copy, store.contents());
    }
}
