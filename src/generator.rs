//! Expands the master timetable into a concrete week of lessons.
//!
//! Slots are filled per subject in template order (day, then declared slot).
//! Lessons the previous evaluation reported as missed go first, sorted by
//! curriculum position; the remaining slots take the next lessons after the
//! subject's current sequence position. Slots that cannot be filled stay empty.

use crate::curriculum::{EnrichedLesson, LessonIndex, TeachingMethod};
use crate::evaluation::Evaluation;
use crate::progress::ProgressTracker;
use crate::timetable::{MasterSchedule, SchoolDay, TimeSlot, WeekTemplate};
use crate::week::{Exception, ScheduleStatus, ScheduledLesson, WeeklyScheduleInstance};
use chrono::NaiveDate;
use tracing::{debug, info};

/// A timetable slot that is free to receive a lesson this week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailableSlot<'a> {
    pub day: SchoolDay,
    pub slot: &'a TimeSlot,
}

/// Builds the schedule for `week_number` starting on `week_start_date`.
pub fn generate(
    master: &MasterSchedule,
    methods: &[TeachingMethod],
    tracker: &ProgressTracker,
    evaluation: Option<&Evaluation>,
    week_number: u32,
    week_start_date: NaiveDate,
) -> WeeklyScheduleInstance {
    let index = LessonIndex::build(methods);
    ScheduleGenerator::new(master, tracker, &index).generate(evaluation, week_number, week_start_date)
}

pub struct ScheduleGenerator<'a> {
    master: &'a MasterSchedule,
    tracker: &'a ProgressTracker,
    index: &'a LessonIndex,
}

impl<'a> ScheduleGenerator<'a> {
    pub fn new(master: &'a MasterSchedule, tracker: &'a ProgressTracker, index: &'a LessonIndex) -> Self {
        Self {
            master,
            tracker,
            index,
        }
    }

    pub fn generate(
        &self,
        evaluation: Option<&Evaluation>,
        week_number: u32,
        week_start_date: NaiveDate,
    ) -> WeeklyScheduleInstance {
        let cycle_week = self.master.cycle_week_for(week_number);
        let template = self.master.template_for(cycle_week);

        let mut week = WeeklyScheduleInstance::new(week_number, week_start_date, cycle_week);
        week.exceptions = evaluation
            .map(|eval| eval.next_week_exceptions.clone())
            .unwrap_or_default();
        week.status = ScheduleStatus::Draft;

        let missed: &[String] = evaluation
            .map(|eval| eval.completion_check.missed_lesson_ids.as_slice())
            .unwrap_or(&[]);

        let available = available_slots(template, &week.exceptions);
        for (subject, slots) in group_by_subject(&available) {
            let backlog = self.backlog_for_subject(missed, subject);
            let wanted = slots.len().saturating_sub(backlog.len());
            let upcoming = self.next_lessons_for_subject(subject, wanted);
            debug!(
                subject,
                slots = slots.len(),
                backlog = backlog.len(),
                upcoming = upcoming.len(),
                "filling subject slots"
            );

            let backlog_len = backlog.len();
            let lessons = backlog.into_iter().chain(upcoming);
            for (position, (available, lesson)) in slots.iter().zip(lessons).enumerate() {
                week.scheduled_lessons.push(ScheduledLesson::place(
                    lesson,
                    available.day,
                    available.slot,
                    position < backlog_len,
                ));
            }
        }

        info!(
            week_number,
            cycle_week = %cycle_week,
            lessons = week.scheduled_lessons.len(),
            "generated weekly schedule"
        );
        week
    }

    /// Missed lessons belonging to `subject`, in curriculum order.
    pub fn backlog_for_subject(&self, missed: &[String], subject: &str) -> Vec<&'a EnrichedLesson> {
        let mut backlog: Vec<&EnrichedLesson> = missed
            .iter()
            .filter_map(|lesson_id| {
                let lesson = self.index.get(lesson_id);
                if lesson.is_none() {
                    debug!(lesson_id = %lesson_id, "missed lesson no longer in curriculum");
                }
                lesson
            })
            .filter(|lesson| lesson.subject == subject)
            .collect();
        backlog.sort_by_key(|lesson| lesson.sequence_order);
        backlog
    }

    /// Up to `count` lessons past the subject's current sequence position.
    pub fn next_lessons_for_subject(&self, subject: &str, count: usize) -> Vec<&'a EnrichedLesson> {
        if count == 0 {
            return Vec::new();
        }
        let Some(progress) = self.tracker.progress_for_subject(subject) else {
            return Vec::new();
        };
        self.index
            .method_lessons(&progress.method_id)
            .iter()
            .filter(|lesson| lesson.sequence_order > progress.current_sequence_position)
            .take(count)
            .collect()
    }
}

/// Non-break slots of the template that no exception blocks, Monday to Friday.
pub fn available_slots<'t>(template: &'t WeekTemplate, exceptions: &[Exception]) -> Vec<AvailableSlot<'t>> {
    template
        .iter()
        .filter(|(_, slot)| !slot.is_break)
        .filter(|(day, slot)| !exceptions.iter().any(|e| e.blocks(*day, &slot.id)))
        .map(|(day, slot)| AvailableSlot { day, slot })
        .collect()
}

/// Groups slots by subject label, keeping subjects in first-seen order and
/// each subject's slots in template order.
pub fn group_by_subject<'t>(slots: &[AvailableSlot<'t>]) -> Vec<(&'t str, Vec<AvailableSlot<'t>>)> {
    let mut groups: Vec<(&'t str, Vec<AvailableSlot<'t>>)> = Vec::new();
    for available in slots {
        let subject = available.slot.subject.as_str();
        match groups.iter_mut().find(|(name, _)| *name == subject) {
            Some((_, group)) => group.push(*available),
            None => groups.push((subject, vec![*available])),
        }
    }
    groups
}
