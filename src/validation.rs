use crate::curriculum::TeachingMethod;
use crate::error::ValidationError;
use crate::planner::PlannerDocument;
use crate::progress::ProgressTracker;
use crate::timetable::{CycleWeek, MasterSchedule, WeekTemplate};
use crate::week::WeeklyScheduleInstance;
use std::collections::HashSet;

fn validate_week_template(
    cycle_week: CycleWeek,
    template: &WeekTemplate,
) -> Result<(), ValidationError> {
    let mut seen_ids = HashSet::new();
    for (_, slot) in template.iter() {
        if !seen_ids.insert(slot.id.as_str()) {
            return Err(ValidationError::DuplicateSlotId {
                cycle_week: cycle_week.to_string(),
                slot_id: slot.id.clone(),
            });
        }
        if slot.start_time >= slot.end_time {
            return Err(ValidationError::SlotTimeOrder {
                slot_id: slot.id.clone(),
                start: slot.start_time.format("%H:%M").to_string(),
                end: slot.end_time.format("%H:%M").to_string(),
            });
        }
        if !slot.is_break && slot.subject.trim().is_empty() {
            return Err(ValidationError::MissingSubject {
                slot_id: slot.id.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_master_schedule(master: &MasterSchedule) -> Result<(), ValidationError> {
    validate_week_template(CycleWeek::A, &master.weeks.week_a)?;
    if let Some(week_b) = &master.weeks.week_b {
        validate_week_template(CycleWeek::B, week_b)?;
    }
    Ok(())
}

/// Lesson ids must be unique across methods, sequence orders unique within one.
pub fn validate_teaching_methods(methods: &[TeachingMethod]) -> Result<(), ValidationError> {
    let mut method_ids = HashSet::with_capacity(methods.len());
    let mut lesson_ids = HashSet::new();
    for method in methods {
        if !method_ids.insert(method.id.as_str()) {
            return Err(ValidationError::DuplicateMethodId {
                method_id: method.id.clone(),
            });
        }
        let mut orders = HashSet::new();
        for (_, lesson) in method.lessons() {
            if !lesson_ids.insert(lesson.lesson_id.as_str()) {
                return Err(ValidationError::DuplicateLessonId {
                    lesson_id: lesson.lesson_id.clone(),
                });
            }
            if !orders.insert(lesson.sequence_order) {
                return Err(ValidationError::DuplicateSequenceOrder {
                    method_id: method.id.clone(),
                    sequence_order: lesson.sequence_order,
                });
            }
        }
    }
    Ok(())
}

pub fn validate_progress_tracker(tracker: &ProgressTracker) -> Result<(), ValidationError> {
    for progress in &tracker.method_progress {
        let mut seen = HashSet::with_capacity(progress.completed_lessons.len());
        for completion in &progress.completed_lessons {
            if !seen.insert(completion.lesson_id.as_str()) {
                return Err(ValidationError::DuplicateCompletion {
                    method_id: progress.method_id.clone(),
                    lesson_id: completion.lesson_id.clone(),
                });
            }
        }
    }
    Ok(())
}

pub fn validate_weekly_schedule(week: &WeeklyScheduleInstance) -> Result<(), ValidationError> {
    if week.week_number == 0 {
        return Err(ValidationError::InvalidWeekNumber(week.week_number));
    }
    Ok(())
}

pub fn validate_document(document: &PlannerDocument) -> Result<(), ValidationError> {
    validate_master_schedule(&document.master_schedule)?;
    validate_teaching_methods(&document.teaching_methods)?;
    validate_progress_tracker(&document.progress_tracker)?;
    for week in &document.weekly_schedules {
        validate_weekly_schedule(week)?;
    }
    if let Some(current) = &document.current_week_id {
        if document.week_by_id(current).is_none() {
            return Err(ValidationError::UnknownCurrentWeek(current.clone()));
        }
    }
    Ok(())
}
