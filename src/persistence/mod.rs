use crate::planner::PlannerDocument;
use crate::validation;

pub use crate::error::{PersistenceError, PersistenceResult};

/// Somewhere a planner document can be saved to and loaded from.
pub trait PlannerStore {
    fn save_document(&self, document: &PlannerDocument) -> PersistenceResult<()>;
    /// `Ok(None)` when nothing has been stored yet.
    fn load_document(&self) -> PersistenceResult<Option<PlannerDocument>>;
}

pub fn validate_document(document: &PlannerDocument) -> PersistenceResult<()> {
    validation::validate_document(document)?;
    Ok(())
}

pub mod csv_export;
pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use csv_export::{export_week_to_csv, export_weektaak_to_csv};
pub use file::{
    JsonFileStore, load_document_from_json, load_keyed_document_from_json, save_document_to_json,
    save_keyed_document_to_json,
};
