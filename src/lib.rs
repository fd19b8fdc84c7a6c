pub mod calendar;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod evaluation;
pub mod frame;
pub mod generator;
pub mod persistence;
pub mod planner;
pub mod progress;
pub mod stats;
pub mod timetable;
pub mod validation;
pub mod week;
pub mod weektaak;

pub use calendar::{SchoolCalendar, date_of, next_week_start, week_start};
pub use config::{PlannerConfig, StorageBackend};
pub use curriculum::{
    Block, EnrichedLesson, Lesson, LessonIndex, MethodGroup, TeachingMethod,
    all_lessons_from_method, find_lesson_by_id,
};
pub use error::{
    ConfigError, PersistenceError, PersistenceResult, PlannerError, PlannerResult,
    ValidationError,
};
pub use evaluation::{CompletionCheck, Evaluation, ExtraProgress, apply, next_available_lessons};
pub use generator::{ScheduleGenerator, generate};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteStore;
pub use persistence::{
    JsonFileStore, PlannerStore, export_week_to_csv, export_weektaak_to_csv,
    load_document_from_json, load_keyed_document_from_json, save_document_to_json,
    save_keyed_document_to_json,
};
pub use planner::{PlannerDocument, PlannerSettings, STORAGE_KEY};
pub use progress::{CompletedLesson, MethodProgress, ProgressTracker};
pub use stats::{ScheduleStats, SubjectStats, stats};
pub use timetable::{
    CycleType, CycleWeek, DaySchedule, MasterSchedule, SchoolDay, TimeSlot, WeekTemplate,
};
pub use week::{
    Exception, ScheduleStatus, ScheduledLesson, WeeklyScheduleInstance, validate_lesson_move,
};
pub use weektaak::{DayPlan, SubjectTasks, Weektaak, WeektaakTask, derive_by_day, derive_weektaak};
