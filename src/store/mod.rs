//! Document store - JSON file persistence for the workout document
//!
//! One file, one document. `open` loads it (seeding on first run), `save`
//! overwrites it whole and only then adopts the new value in memory, so the
//! current document always matches what the file holds.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::StoreError;
use crate::model::{Day, Document};

/// Default data file, relative to the working directory.
pub const DATA_PATH: &str = "gymbro_v1.json";

/// Single source of truth for the workout document.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    current: Document,
}

impl Store {
    /// Load the document from `path`, seeding and persisting the fixed
    /// three-day document when no file exists yet.
    ///
    /// An unreadable file or malformed JSON is an error; existing data is
    /// never overwritten with a fresh seed on failure.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(json) => {
                let current: Document = serde_json::from_str(&json)
                    .map_err(|err| StoreError::MalformedDocument(err.to_string()))?;
                validate_ids(&current)?;
                Ok(Self { path, current })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no stored data, writing seed");
                let mut store = Self {
                    path,
                    current: Document { days: Vec::new() },
                };
                store.save(seed_document())?;
                Ok(store)
            }
            Err(err) => Err(StoreError::StorageUnavailable(err)),
        }
    }

    /// The current document, always matching the last successful save.
    pub fn current(&self) -> &Document {
        &self.current
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole-document overwrite: serialize, write to a temp file, rename over
    /// the old copy, then adopt `doc` as current. The in-memory value changes
    /// only after the write completed, so a failed save leaves both file and
    /// memory on the previous snapshot. Safe to call repeatedly with the same
    /// value.
    pub fn save(&mut self, doc: Document) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|err| StoreError::MalformedDocument(err.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(StoreError::StorageUnavailable)?;
        fs::rename(&tmp, &self.path).map_err(StoreError::StorageUnavailable)?;
        self.current = doc;
        Ok(())
    }
}

/// Ids must be unique within their immediate parent collection; a stored
/// document violating that is corrupt, not loadable.
fn validate_ids(doc: &Document) -> Result<(), StoreError> {
    ensure_unique("day", doc.days.iter().map(|d| d.id.as_str()))?;
    for day in &doc.days {
        ensure_unique("workout", day.workouts.iter().map(|w| w.id.as_str()))?;
        for workout in &day.workouts {
            ensure_unique("log", workout.logs.iter().map(|l| l.id.as_str()))?;
        }
    }
    Ok(())
}

fn ensure_unique<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::MalformedDocument(format!(
                "duplicate {what} id {id:?}"
            )));
        }
    }
    Ok(())
}

/// The fixed first-run document: three named days, no workouts.
pub fn seed_document() -> Document {
    let day = |id: &str, name: &str| Day {
        id: id.to_string(),
        name: name.to_string(),
        workouts: Vec::new(),
    };
    Document {
        days: vec![
            day("day1", "Day 1 - Push"),
            day("day2", "Day 2 - Pull"),
            day("day3", "Day 3 - Legs & Core"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SequentialIdGen;

    #[test]
    fn test_open_empty_storage_seeds_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymbro_v1.json");

        let store = Store::open(&path).unwrap();
        assert_eq!(store.current(), &seed_document());
        assert_eq!(store.current().days.len(), 3);

        // the seed was written, not just returned
        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.current(), &seed_document());
    }

    #[test]
    fn test_save_then_reopen_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymbro_v1.json");
        let mut ids = SequentialIdGen::new();

        let mut store = Store::open(&path).unwrap();
        let doc = store
            .current()
            .add_workout("day2", "Barbell Row", None, &mut ids)
            .unwrap();
        store.save(doc.clone()).unwrap();
        assert_eq!(store.current(), &doc);

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.current(), &doc);
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymbro_v1.json");

        let mut store = Store::open(&path).unwrap();
        let doc = store.current().clone();
        store.save(doc.clone()).unwrap();
        store.save(doc.clone()).unwrap();
        assert_eq!(Store::open(&path).unwrap().current(), &doc);
    }

    #[test]
    fn test_malformed_file_is_not_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymbro_v1.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument(_)));

        // the broken file is left in place for the user to recover
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymbro_v1.json");
        fs::write(&path, r#"{"days": [{"id": "day1"}]}"#).unwrap();

        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument(_)));
    }

    #[test]
    fn test_duplicate_sibling_ids_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymbro_v1.json");
        fs::write(
            &path,
            r#"{"days": [{"id": "day1", "name": "Day 1 - Push", "workouts": [
                {"id": "w1", "name": "Bench Press", "logs": []},
                {"id": "w1", "name": "Squat", "logs": []}
            ]}]}"#,
        )
        .unwrap();

        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument(_)));
        assert!(err.to_string().contains("duplicate workout id"));
    }

    #[test]
    fn test_duplicate_log_ids_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymbro_v1.json");
        fs::write(
            &path,
            r#"{"days": [{"id": "day1", "name": "Day 1 - Push", "workouts": [
                {"id": "w1", "name": "Bench Press", "logs": [
                    {"id": "l1", "kg": 50.0, "sets": 3, "reps": 10, "date": "2024-01-01"},
                    {"id": "l1", "kg": 52.5, "sets": 3, "reps": 8, "date": "2024-01-08"}
                ]}
            ]}]}"#,
        )
        .unwrap();

        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument(_)));
        assert!(err.to_string().contains("duplicate log id"));
    }

    #[test]
    fn test_unreadable_path_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be read as a file
        let err = Store::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));
    }
}
