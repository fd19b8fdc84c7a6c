use super::{PersistenceResult, PlannerStore};
use crate::planner::{PlannerDocument, STORAGE_KEY};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;
use tracing::info;

/// Key/value store holding the planner document under its storage key.
pub struct SqliteStore {
    connection: Mutex<Connection>,
    key: String,
}

impl SqliteStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        Self::open_with_key(path, STORAGE_KEY)
    }

    /// Opens the database file; the document row is stored under `key`.
    pub fn open_with_key<P: AsRef<std::path::Path>>(
        path: P,
        key: impl Into<String>,
    ) -> PersistenceResult<Self> {
        Self::with_connection(Connection::open(path)?, key)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, STORAGE_KEY)
    }

    pub fn with_connection(connection: Connection, key: impl Into<String>) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            key: key.into(),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                document_json TEXT NOT NULL,
                saved_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves the connection itself usable.
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlannerStore for SqliteStore {
    fn save_document(&self, document: &PlannerDocument) -> PersistenceResult<()> {
        super::validate_document(document)?;
        let json = serde_json::to_string(document)?;
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO documents (key, document_json, saved_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET document_json = excluded.document_json,
                                            saved_at = excluded.saved_at",
            params![self.key, json],
        )?;
        tx.commit()?;
        info!(key = %self.key, "saved planner document to sqlite");
        Ok(())
    }

    fn load_document(&self) -> PersistenceResult<Option<PlannerDocument>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT document_json FROM documents WHERE key = ?1")?;
        let json: Option<String> = stmt
            .query_row(params![self.key], |row| row.get(0))
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };
        let document: PlannerDocument = serde_json::from_str(&json)?;
        super::validate_document(&document)?;
        Ok(Some(document))
    }
}
