use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

/// Structural problems found in curriculum, timetable or document data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate slot id '{slot_id}' in week {cycle_week}")]
    DuplicateSlotId { cycle_week: String, slot_id: String },
    #[error("slot '{slot_id}' starts at {start} but ends at {end}")]
    SlotTimeOrder {
        slot_id: String,
        start: String,
        end: String,
    },
    #[error("slot '{slot_id}' is not a break but has no subject")]
    MissingSubject { slot_id: String },
    #[error("lesson id '{lesson_id}' appears more than once across teaching methods")]
    DuplicateLessonId { lesson_id: String },
    #[error("method '{method_id}' uses sequence order {sequence_order} more than once")]
    DuplicateSequenceOrder {
        method_id: String,
        sequence_order: u32,
    },
    #[error("method id '{method_id}' is used by more than one teaching method")]
    DuplicateMethodId { method_id: String },
    #[error("progress for method '{method_id}' records lesson '{lesson_id}' twice")]
    DuplicateCompletion { method_id: String, lesson_id: String },
    #[error("week numbers start at 1 (got {0})")]
    InvalidWeekNumber(u32),
    #[error("current week id '{0}' does not match any stored week")]
    UnknownCurrentWeek(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("no planner document stored")]
    NotFound,
}

impl From<ValidationError> for PersistenceError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not write config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no week has been generated yet")]
    NoCurrentWeek,
    #[error("evaluation refers to week {found}, but the current week is {expected}")]
    EvaluationMismatch { expected: u32, found: u32 },
    #[error("evaluation belongs to schedule '{found}', but the current week is '{expected}'")]
    EvaluationForOtherWeek { expected: String, found: String },
}

pub type PlannerResult<T> = Result<T, PlannerError>;
