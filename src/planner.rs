use crate::calendar::next_week_start;
use crate::curriculum::{LessonIndex, TeachingMethod};
use crate::error::{PlannerError, PlannerResult};
use crate::evaluation::{self, Evaluation};
use crate::generator::ScheduleGenerator;
use crate::progress::ProgressTracker;
use crate::timetable::MasterSchedule;
use crate::validation;
use crate::week::{ScheduleStatus, WeeklyScheduleInstance};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Storage identifier the planner document is kept under.
pub const STORAGE_KEY: &str = "smartPlannerData";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSettings {
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub teacher_name: String,
    pub group_name: String,
    pub school_year: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            school_name: String::new(),
            teacher_name: String::new(),
            group_name: "Groep 4".to_string(),
            school_year: "2024-2025".to_string(),
        }
    }
}

/// Everything the planner persists, as one JSON-compatible document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerDocument {
    pub settings: PlannerSettings,
    pub master_schedule: MasterSchedule,
    pub progress_tracker: ProgressTracker,
    #[serde(default)]
    pub weekly_schedules: Vec<WeeklyScheduleInstance>,
    #[serde(default)]
    pub current_week_id: Option<String>,
    #[serde(default)]
    pub teaching_methods: Vec<TeachingMethod>,
}

impl PlannerDocument {
    /// A new school year: progress starts at zero for every method.
    pub fn new(
        settings: PlannerSettings,
        master_schedule: MasterSchedule,
        teaching_methods: Vec<TeachingMethod>,
    ) -> Self {
        let progress_tracker = ProgressTracker::initialize(
            settings.school_year.clone(),
            settings.group_name.clone(),
            &teaching_methods,
        );
        Self {
            settings,
            master_schedule,
            progress_tracker,
            weekly_schedules: Vec::new(),
            current_week_id: None,
            teaching_methods,
        }
    }

    pub fn current_week(&self) -> Option<&WeeklyScheduleInstance> {
        let id = self.current_week_id.as_deref()?;
        self.week_by_id(id)
    }

    pub fn current_week_mut(&mut self) -> Option<&mut WeeklyScheduleInstance> {
        let id = self.current_week_id.clone()?;
        self.weekly_schedules.iter_mut().find(|w| w.id == id)
    }

    pub fn week_by_id(&self, id: &str) -> Option<&WeeklyScheduleInstance> {
        self.weekly_schedules.iter().find(|w| w.id == id)
    }

    /// Replaces the stored week with the same id, or appends it.
    pub fn upsert_week(&mut self, week: WeeklyScheduleInstance) {
        match self.weekly_schedules.iter_mut().find(|w| w.id == week.id) {
            Some(existing) => *existing = week,
            None => self.weekly_schedules.push(week),
        }
    }

    /// Generates week 1 from the timetable and current progress.
    pub fn start_first_week(&mut self, week_start: NaiveDate) -> PlannerResult<&WeeklyScheduleInstance> {
        validation::validate_master_schedule(&self.master_schedule)?;
        let index = LessonIndex::build(&self.teaching_methods);
        let generator = ScheduleGenerator::new(&self.master_schedule, &self.progress_tracker, &index);
        let mut week = generator.generate(None, 1, week_start);
        week.advance_status(ScheduleStatus::Active);
        Ok(self.push_current(week))
    }

    /// Folds the evaluation of the current week into progress and generates the next week.
    pub fn advance_week(&mut self, evaluation: &Evaluation) -> PlannerResult<&WeeklyScheduleInstance> {
        let current = self.current_week().ok_or(PlannerError::NoCurrentWeek)?;
        if current.week_number != evaluation.week_number {
            return Err(PlannerError::EvaluationMismatch {
                expected: current.week_number,
                found: evaluation.week_number,
            });
        }
        if current.id != evaluation.weekly_schedule_id {
            return Err(PlannerError::EvaluationForOtherWeek {
                expected: current.id.clone(),
                found: evaluation.weekly_schedule_id.clone(),
            });
        }
        let next_number = current.week_number + 1;
        let next_start = next_week_start(current.week_start_date);

        let index = LessonIndex::build(&self.teaching_methods);
        let tracker = evaluation::apply_with_index(&self.progress_tracker, evaluation, &index);
        let next = ScheduleGenerator::new(&self.master_schedule, &tracker, &index).generate(
            Some(evaluation),
            next_number,
            next_start,
        );

        if let Some(current) = self.current_week_mut() {
            current.advance_status(ScheduleStatus::Evaluated);
        }
        self.progress_tracker = tracker;
        info!(week_number = next_number, "advanced to next week");
        Ok(self.push_current(next))
    }

    fn push_current(&mut self, week: WeeklyScheduleInstance) -> &WeeklyScheduleInstance {
        self.current_week_id = Some(week.id.clone());
        self.weekly_schedules.push(week);
        let last = self.weekly_schedules.len() - 1;
        &self.weekly_schedules[last]
    }
}
