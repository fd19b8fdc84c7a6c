use super::{PersistenceError, PersistenceResult, PlannerStore};
use crate::planner::{PlannerDocument, STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk envelope: the document is stored under its storage key.
#[derive(Deserialize)]
struct DocumentSnapshot {
    key: String,
    document: PlannerDocument,
}

#[derive(Serialize)]
struct DocumentSnapshotRef<'a> {
    key: &'a str,
    document: &'a PlannerDocument,
}

pub fn save_document_to_json<P: AsRef<Path>>(
    document: &PlannerDocument,
    path: P,
) -> PersistenceResult<()> {
    save_keyed_document_to_json(document, STORAGE_KEY, path)
}

pub fn load_document_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<PlannerDocument> {
    load_keyed_document_from_json(STORAGE_KEY, path)
}

/// Writes the document under `key`; a file holds exactly one keyed document.
pub fn save_keyed_document_to_json<P: AsRef<Path>>(
    document: &PlannerDocument,
    key: &str,
    path: P,
) -> PersistenceResult<()> {
    super::validate_document(document)?;
    let snapshot = DocumentSnapshotRef { key, document };
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), key, "saved planner document");
    Ok(())
}

/// Reads the document, rejecting a file written under another key.
pub fn load_keyed_document_from_json<P: AsRef<Path>>(
    key: &str,
    path: P,
) -> PersistenceResult<PlannerDocument> {
    let file = File::open(path.as_ref())?;
    let snapshot: DocumentSnapshot = serde_json::from_reader(file)?;
    if snapshot.key != key {
        return Err(PersistenceError::InvalidData(format!(
            "unexpected storage key '{}'",
            snapshot.key
        )));
    }
    super::validate_document(&snapshot.document)?;
    info!(path = %path.as_ref().display(), "loaded planner document");
    Ok(snapshot.document)
}

/// Keeps the document in a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    key: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, STORAGE_KEY)
    }

    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PlannerStore for JsonFileStore {
    fn save_document(&self, document: &PlannerDocument) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        save_keyed_document_to_json(document, &self.key, &self.path)
    }

    fn load_document(&self) -> PersistenceResult<Option<PlannerDocument>> {
        match load_keyed_document_from_json(&self.key, &self.path) {
            Ok(document) => Ok(Some(document)),
            Err(PersistenceError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
