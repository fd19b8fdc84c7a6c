use crate::curriculum::EnrichedLesson;
use crate::timetable::{CycleWeek, SchoolDay, TimeSlot, WeekTemplate, hhmm};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Draft,
    Active,
    Completed,
    Evaluated,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Draft => "draft",
            ScheduleStatus::Active => "active",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Evaluated => "evaluated",
        }
    }
}

/// A lesson placed in a concrete slot of a concrete week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledLesson {
    pub id: String,
    pub day: SchoolDay,
    pub slot_id: String,
    pub lesson_id: String,
    pub method_id: String,
    pub subject: String,
    pub lesson_title: String,
    pub lesson_number: u32,
    pub block_name: String,
    #[serde(default)]
    pub is_backlog: bool,
    #[serde(default)]
    pub completed: bool,
}

impl ScheduledLesson {
    pub fn place(lesson: &EnrichedLesson, day: SchoolDay, slot: &TimeSlot, is_backlog: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day,
            slot_id: slot.id.clone(),
            lesson_id: lesson.lesson_id.clone(),
            method_id: lesson.method_id.clone(),
            subject: slot.subject.clone(),
            lesson_title: lesson.title.clone(),
            lesson_number: lesson.lesson_number,
            block_name: lesson.block_name.clone(),
            is_backlog,
            completed: false,
        }
    }
}

/// A one-off disruption that takes slots out of next week's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    pub id: String,
    pub day: SchoolDay,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub reason: String,
    #[serde(default)]
    pub affected_slot_ids: Vec<String>,
}

impl Exception {
    /// Blocks every slot of `template` on `day` that lies inside the window.
    pub fn for_window(
        day: SchoolDay,
        start_time: NaiveTime,
        end_time: NaiveTime,
        reason: impl Into<String>,
        template: &WeekTemplate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day,
            start_time,
            end_time,
            reason: reason.into(),
            affected_slot_ids: template.slots_within(day, start_time, end_time),
        }
    }

    pub fn blocks(&self, day: SchoolDay, slot_id: &str) -> bool {
        self.day == day && self.affected_slot_ids.iter().any(|id| id == slot_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScheduleInstance {
    pub id: String,
    pub week_number: u32,
    pub week_start_date: NaiveDate,
    pub cycle_week: CycleWeek,
    #[serde(default)]
    pub scheduled_lessons: Vec<ScheduledLesson>,
    #[serde(default)]
    pub exceptions: Vec<Exception>,
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl WeeklyScheduleInstance {
    pub fn new(week_number: u32, week_start_date: NaiveDate, cycle_week: CycleWeek) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            week_number,
            week_start_date,
            cycle_week,
            scheduled_lessons: Vec::new(),
            exceptions: Vec::new(),
            status: ScheduleStatus::Draft,
        }
    }

    pub fn lessons_on(&self, day: SchoolDay) -> impl Iterator<Item = &ScheduledLesson> {
        self.scheduled_lessons.iter().filter(move |l| l.day == day)
    }

    pub fn lessons_for_subject<'a>(
        &'a self,
        subject: &'a str,
    ) -> impl Iterator<Item = &'a ScheduledLesson> {
        self.scheduled_lessons
            .iter()
            .filter(move |l| l.subject == subject)
    }

    /// Flips the completion flag of a scheduled lesson; returns the new value.
    pub fn toggle_completed(&mut self, scheduled_id: &str) -> Option<bool> {
        let lesson = self
            .scheduled_lessons
            .iter_mut()
            .find(|l| l.id == scheduled_id)?;
        lesson.completed = !lesson.completed;
        Some(lesson.completed)
    }

    pub fn remove_lesson(&mut self, scheduled_id: &str) -> bool {
        let before = self.scheduled_lessons.len();
        self.scheduled_lessons.retain(|l| l.id != scheduled_id);
        self.scheduled_lessons.len() != before
    }

    /// Distinct ids of lessons ticked off this week, in schedule order.
    pub fn completed_lesson_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.scheduled_lessons
            .iter()
            .filter(|l| l.completed)
            .filter(|l| seen.insert(l.lesson_id.as_str()))
            .map(|l| l.lesson_id.clone())
            .collect()
    }

    /// Moves the status forward; a request to go back is ignored.
    pub fn advance_status(&mut self, status: ScheduleStatus) -> bool {
        if status <= self.status {
            return false;
        }
        self.status = status;
        true
    }
}

/// A scheduled lesson may only be dropped on a non-break slot of its own subject.
pub fn validate_lesson_move(lesson: &ScheduledLesson, slot: &TimeSlot) -> bool {
    lesson.subject == slot.subject && !slot.is_break
}
