//! Pupil-facing task list ("weektaak") derived from a concrete week.

use crate::calendar::date_of;
use crate::timetable::{MasterSchedule, SchoolDay};
use chrono::NaiveDate;
use crate::week::{ScheduledLesson, WeeklyScheduleInstance};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeektaakTask {
    pub lesson_id: String,
    pub lesson_title: String,
    pub block_name: String,
    pub lesson_number: u32,
    pub is_backlog: bool,
    /// Every weekday the lesson is scheduled on, in first-seen order.
    pub days: Vec<SchoolDay>,
}

impl WeektaakTask {
    fn from_scheduled(lesson: &ScheduledLesson) -> Self {
        Self {
            lesson_id: lesson.lesson_id.clone(),
            lesson_title: lesson.lesson_title.clone(),
            block_name: lesson.block_name.clone(),
            lesson_number: lesson.lesson_number,
            is_backlog: lesson.is_backlog,
            days: vec![lesson.day],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTasks {
    pub subject: String,
    pub tasks: Vec<WeektaakTask>,
}

/// Tasks grouped by subject. Subjects and tasks keep first-encounter order;
/// a lesson scheduled in several slots becomes one task listing all its days.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Weektaak {
    subjects: Vec<SubjectTasks>,
}

impl Weektaak {
    pub fn subjects(&self) -> &[SubjectTasks] {
        &self.subjects
    }

    pub fn tasks_for(&self, subject: &str) -> &[WeektaakTask] {
        self.subjects
            .iter()
            .find(|entry| entry.subject == subject)
            .map(|entry| entry.tasks.as_slice())
            .unwrap_or(&[])
    }

    pub fn task_count(&self) -> usize {
        self.subjects.iter().map(|entry| entry.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

pub fn derive_weektaak(week: &WeeklyScheduleInstance) -> Weektaak {
    let mut subjects: Vec<SubjectTasks> = Vec::new();
    for lesson in &week.scheduled_lessons {
        let position = match subjects.iter().position(|s| s.subject == lesson.subject) {
            Some(position) => position,
            None => {
                subjects.push(SubjectTasks {
                    subject: lesson.subject.clone(),
                    tasks: Vec::new(),
                });
                subjects.len() - 1
            }
        };
        let tasks = &mut subjects[position].tasks;
        match tasks.iter_mut().find(|task| task.lesson_id == lesson.lesson_id) {
            Some(task) => {
                if !task.days.contains(&lesson.day) {
                    task.days.push(lesson.day);
                }
            }
            None => tasks.push(WeektaakTask::from_scheduled(lesson)),
        }
    }
    Weektaak { subjects }
}

/// One day column of the printable weektaak.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: SchoolDay,
    pub date: NaiveDate,
    pub teacher: Option<String>,
    pub lessons: Vec<ScheduledLesson>,
}

/// Lessons per weekday ordered by slot start time, with the day's teacher.
///
/// Lessons whose slot is no longer in the timetable keep their schedule
/// order after the ones that still resolve.
pub fn derive_by_day(week: &WeeklyScheduleInstance, master: &MasterSchedule) -> Vec<DayPlan> {
    SchoolDay::ALL
        .into_iter()
        .map(|day| {
            let mut lessons: Vec<ScheduledLesson> = week.lessons_on(day).cloned().collect();
            lessons.sort_by_key(|lesson| master.slot_order(week.cycle_week, &lesson.slot_id));
            DayPlan {
                day,
                date: date_of(week.week_start_date, day),
                teacher: master.teacher_for(day).map(str::to_owned),
                lessons,
            }
        })
        .collect()
}
