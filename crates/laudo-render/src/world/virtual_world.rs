//! In-memory implementation of the Typst `World` trait

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::{global_font_cache, FontCache};
use super::virtual_fs::VirtualFilesystem;
use crate::compiler::errors::RenderError;

pub struct VirtualWorld {
    filesystem: VirtualFilesystem,
    main: FileId,
    font_cache: &'static FontCache,
    library: LazyHash<Library>,
    /// Date reported by `datetime.today()`, fixed so output is reproducible
    today: NaiveDate,
}

impl VirtualWorld {
    pub fn new(
        source: String,
        assets: &BTreeMap<String, Vec<u8>>,
        today: NaiveDate,
    ) -> Result<Self, RenderError> {
        let mut filesystem = VirtualFilesystem::new();
        let main = filesystem.mount_main(source);

        for (path, data) in assets {
            filesystem.mount_file(path, Bytes::from(data.clone()))?;
        }

        Ok(Self {
            filesystem,
            main,
            font_cache: global_font_cache(),
            library: LazyHash::new(Library::builder().build()),
            today,
        })
    }

    pub fn filesystem(&self) -> &VirtualFilesystem {
        &self.filesystem
    }
}

impl World for VirtualWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.font_cache.book()
    }

    fn main(&self) -> FileId {
        self.main
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        self.filesystem
            .get_source(id)
            .ok_or_else(|| FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        self.filesystem
            .get_file(id)
            .cloned()
            .ok_or_else(|| FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.font_cache.font(index)
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        Datetime::from_ymd(
            self.today.year(),
            self.today.month() as u8,
            self.today.day() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 11).unwrap()
    }

    #[test]
    fn test_virtual_world_creation() {
        let world = VirtualWorld::new("Olá".to_string(), &BTreeMap::new(), date()).unwrap();
        assert!(world.source(world.main()).is_ok());
    }

    #[test]
    fn test_assets_are_mounted() {
        let mut assets = BTreeMap::new();
        assets.insert("/eventos/01/1.png".to_string(), vec![1, 2, 3]);
        let world = VirtualWorld::new("x".to_string(), &assets, date()).unwrap();
        assert_eq!(world.filesystem().len(), 2);
    }

    #[test]
    fn test_today_is_fixed() {
        let world = VirtualWorld::new("x".to_string(), &BTreeMap::new(), date()).unwrap();
        let today = world.today(None).unwrap();
        assert_eq!(today.year(), Some(2025));
        assert_eq!(today.month(), Some(7));
        assert_eq!(today.day(), Some(11));
    }
}
