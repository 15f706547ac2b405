//! Durable storage for entity collections.
//!
//! Each entity type lives in its own JSON document: a flat array of flat
//! objects. Callers always load the whole collection, mutate it in memory
//! and save it back in full.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DeskError, DeskResult};

/// Load/save access to one collection.
pub trait Store<T>: Send + Sync {
    /// The full collection, or an empty one if nothing was saved yet.
    fn load(&self) -> DeskResult<Vec<T>>;

    /// Replace the stored collection.
    fn save(&self, entities: &[T]) -> DeskResult<()>;
}

/// A collection persisted as a JSON document on disk.
pub struct JsonStore<T> {
    path: PathBuf,
    _entity: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore {
            path: path.into(),
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> DeskError {
        DeskError::StoreIo {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T> Store<T> for JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> DeskResult<Vec<T>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&content).map_err(|e| {
            DeskError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Writes to a temporary file next to the document and renames it
    /// into place, so readers see either the old or the new collection.
    fn save(&self, entities: &[T]) -> DeskResult<()> {
        let json = to_json(entities)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&json).map_err(|e| self.io_error(e))?;
        // Keep the document's mode; temp files are created owner-only.
        if let Ok(existing) = std::fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| self.io_error(e))?;
        }
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        Ok(())
    }
}

/// Serialize with 4-space indentation so documents stay diffable.
fn to_json<T: Serialize>(entities: &[T]) -> DeskResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entities
        .serialize(&mut ser)
        .map_err(|e| DeskError::Serialization(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AccessLevel, Event};
    use crate::item::{Category, WorkItem};

    fn make_event(name: &str) -> Event {
        Event {
            name: name.to_string(),
            source: "Discord".to_string(),
            weekday: "Senin".to_string(),
            date: "05/05/2099".to_string(),
            time: "10:00".to_string(),
            access: AccessLevel::Member,
        }
    }

    #[test]
    fn test_missing_document_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Event> = JsonStore::new(dir.path().join("events.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/events.json"));
        store.save(&[make_event("AMA"), make_event("Launch")]).unwrap();

        let loaded: Vec<Event> = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "AMA");
        assert_eq!(loaded[1].name, "Launch");
    }

    #[test]
    fn test_resave_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garapan.json");
        let store = JsonStore::new(&path);
        store
            .save(&[
                WorkItem::new("Node A", Category::Depin, "https://a"),
                WorkItem::new("Swap", Category::Dapps, "https://b"),
            ])
            .unwrap();
        let first = std::fs::read(&path).unwrap();

        let loaded: Vec<WorkItem> = store.load().unwrap();
        store.save(&loaded).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_reads_documents_written_by_the_bot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"[
    {
        "nama": "AMA",
        "sumber": "Twitter",
        "hari": "Senin",
        "tanggal": "05/05/2099",
        "jam": "10:00",
        "akses": "@sbx"
    }
]"#,
        )
        .unwrap();

        let store: JsonStore<Event> = JsonStore::new(&path);
        let events = store.load().unwrap();
        assert_eq!(events[0].access, AccessLevel::Sbx);

        store.save(&events).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"[
    {
        "nama": "AMA",
        "sumber": "Twitter",
        "hari": "Senin",
        "tanggal": "05/05/2099",
        "jam": "10:00",
        "akses": "@sbx"
    }
]"#
        );
    }

    #[test]
    fn test_access_level_case_does_not_break_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"[
    {"nama": "Old", "sumber": "X", "hari": "Senin", "tanggal": "05/05/2020", "jam": "10:00", "akses": "@member"},
    {"nama": "Odd", "sumber": "X", "hari": "Senin", "tanggal": "05/05/2099", "jam": "10:00", "akses": "@Member"}
]"#,
        )
        .unwrap();

        let store: JsonStore<Event> = JsonStore::new(&path);
        let events = store.load().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].access, AccessLevel::Member);

        store.save(&events).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("@Member"));
        assert_eq!(written.matches("\"@member\"").count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "[]").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store: JsonStore<Event> = JsonStore::new(&path);
        store.save(&[make_event("AMA")]).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{not json").unwrap();

        let store: JsonStore<Event> = JsonStore::new(&path);
        assert!(matches!(store.load(), Err(DeskError::Serialization(_))));
    }
}
