use crate::curriculum::{EnrichedLesson, LessonIndex, TeachingMethod};
use crate::progress::{CompletedLesson, MethodProgress, ProgressTracker};
use crate::week::{Exception, WeeklyScheduleInstance};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// How many "extra progress" candidates are offered per subject.
pub const EXTRA_PROGRESS_CANDIDATES: usize = 10;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionCheck {
    #[serde(default)]
    pub completed_lesson_ids: Vec<String>,
    #[serde(default)]
    pub missed_lesson_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraProgress {
    #[serde(default)]
    pub additional_completed_lesson_ids: Vec<String>,
}

/// The teacher's end-of-week report. Feeds one progress update and one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub weekly_schedule_id: String,
    pub week_number: u32,
    pub evaluation_date: String,
    #[serde(default)]
    pub completion_check: CompletionCheck,
    #[serde(default)]
    pub extra_progress: ExtraProgress,
    #[serde(default)]
    pub next_week_exceptions: Vec<Exception>,
}

impl Evaluation {
    /// Builds an evaluation for `week`. Every scheduled lesson not listed in
    /// `completed` is reported as missed.
    pub fn from_week(
        week: &WeeklyScheduleInstance,
        completed: Vec<String>,
        extra: Vec<String>,
        exceptions: Vec<Exception>,
        evaluated_at: DateTime<Utc>,
    ) -> Self {
        let done: HashSet<&str> = completed.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let missed = week
            .scheduled_lessons
            .iter()
            .map(|l| l.lesson_id.as_str())
            .filter(|id| !done.contains(id) && seen.insert(*id))
            .map(str::to_owned)
            .collect();

        Self {
            weekly_schedule_id: week.id.clone(),
            week_number: week.week_number,
            evaluation_date: evaluated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            completion_check: CompletionCheck {
                completed_lesson_ids: completed,
                missed_lesson_ids: missed,
            },
            extra_progress: ExtraProgress {
                additional_completed_lesson_ids: extra,
            },
            next_week_exceptions: exceptions,
        }
    }

    /// Checklist and extra-progress ids, first occurrence kept.
    pub fn all_completed_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.completion_check
            .completed_lesson_ids
            .iter()
            .chain(&self.extra_progress.additional_completed_lesson_ids)
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Folds an evaluation into a copy of the tracker.
pub fn apply(
    tracker: &ProgressTracker,
    evaluation: &Evaluation,
    methods: &[TeachingMethod],
) -> ProgressTracker {
    let index = LessonIndex::build(methods);
    apply_with_index(tracker, evaluation, &index)
}

pub fn apply_with_index(
    tracker: &ProgressTracker,
    evaluation: &Evaluation,
    index: &LessonIndex,
) -> ProgressTracker {
    let mut updated = tracker.clone();
    let mut completed_sets: HashMap<String, HashSet<String>> = HashMap::new();
    let mut recorded = 0usize;

    for lesson_id in evaluation.all_completed_ids() {
        let Some(lesson) = index.get(lesson_id) else {
            warn!(lesson_id, "completed lesson not found in any teaching method; skipped");
            continue;
        };

        let progress = progress_entry(&mut updated, lesson);
        let completed = completed_sets
            .entry(lesson.method_id.clone())
            .or_insert_with(|| {
                progress
                    .completed_lessons
                    .iter()
                    .map(|c| c.lesson_id.clone())
                    .collect()
            });
        if !completed.insert(lesson_id.to_string()) {
            continue;
        }

        progress.completed_lessons.push(CompletedLesson {
            lesson_id: lesson_id.to_string(),
            completed_date: evaluation.evaluation_date.clone(),
            week_number: evaluation.week_number,
            notes: String::new(),
        });
        progress.advance_to(lesson.sequence_order);
        recorded += 1;
    }

    info!(
        week_number = evaluation.week_number,
        recorded, "applied evaluation to progress tracker"
    );
    updated
}

fn progress_entry<'t>(tracker: &'t mut ProgressTracker, lesson: &EnrichedLesson) -> &'t mut MethodProgress {
    let position = tracker
        .method_progress
        .iter()
        .position(|mp| mp.method_id == lesson.method_id);
    let position = match position {
        Some(position) => position,
        None => {
            tracker.method_progress.push(MethodProgress::new(
                lesson.method_id.clone(),
                lesson.subject.clone(),
            ));
            tracker.method_progress.len() - 1
        }
    };
    &mut tracker.method_progress[position]
}

/// Lessons that can be offered as extra progress for `subject`: not yet
/// completed, not in `exclude`, in curriculum order, at most `limit`.
pub fn next_available_lessons(
    tracker: &ProgressTracker,
    methods: &[TeachingMethod],
    subject: &str,
    exclude: &[String],
    limit: usize,
) -> Vec<EnrichedLesson> {
    let Some(progress) = tracker.progress_for_subject(subject) else {
        return Vec::new();
    };
    let Some(method) = methods.iter().find(|m| m.id == progress.method_id) else {
        return Vec::new();
    };
    let mut taken = progress.completed_ids();
    taken.extend(exclude.iter().map(String::as_str));

    crate::curriculum::all_lessons_from_method(method)
        .into_iter()
        .filter(|lesson| !taken.contains(lesson.lesson_id.as_str()))
        .take(limit)
        .collect()
}
