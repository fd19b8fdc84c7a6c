use super::PersistenceResult;
use crate::timetable::{MasterSchedule, hhmm};
use crate::week::WeeklyScheduleInstance;
use crate::weektaak::derive_weektaak;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
struct LessonCsvRecord<'a> {
    week_number: u32,
    week_start_date: String,
    cycle_week: String,
    day: &'a str,
    start_time: String,
    end_time: String,
    subject: &'a str,
    lesson_number: u32,
    lesson_title: &'a str,
    block_name: &'a str,
    is_backlog: bool,
    completed: bool,
}

#[derive(Serialize)]
struct WeektaakCsvRecord<'a> {
    subject: &'a str,
    lesson_number: u32,
    lesson_title: &'a str,
    block_name: &'a str,
    is_backlog: bool,
    days: String,
}

/// One row per scheduled lesson, ordered by day and start time.
pub fn export_week_to_csv<P: AsRef<Path>>(
    week: &WeeklyScheduleInstance,
    master: &MasterSchedule,
    path: P,
) -> PersistenceResult<()> {
    let mut lessons: Vec<_> = week
        .scheduled_lessons
        .iter()
        .map(|lesson| {
            let slot = master.find_slot(week.cycle_week, &lesson.slot_id);
            (lesson, slot.map(|(_, s)| s))
        })
        .collect();
    lessons.sort_by_key(|(lesson, _)| {
        (lesson.day, master.slot_order(week.cycle_week, &lesson.slot_id))
    });

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (lesson, slot) in lessons {
        let format_time = |time: Option<chrono::NaiveTime>| {
            time.map(|t| t.format(hhmm::FORMAT).to_string())
                .unwrap_or_default()
        };
        writer.serialize(LessonCsvRecord {
            week_number: week.week_number,
            week_start_date: week.week_start_date.format("%Y-%m-%d").to_string(),
            cycle_week: week.cycle_week.to_string(),
            day: lesson.day.as_str(),
            start_time: format_time(slot.map(|s| s.start_time)),
            end_time: format_time(slot.map(|s| s.end_time)),
            subject: &lesson.subject,
            lesson_number: lesson.lesson_number,
            lesson_title: &lesson.lesson_title,
            block_name: &lesson.block_name,
            is_backlog: lesson.is_backlog,
            completed: lesson.completed,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// The weektaak as rows; days joined with ';'.
pub fn export_weektaak_to_csv<P: AsRef<Path>>(
    week: &WeeklyScheduleInstance,
    path: P,
) -> PersistenceResult<()> {
    let weektaak = derive_weektaak(week);
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in weektaak.subjects() {
        for task in &entry.tasks {
            let days = task
                .days
                .iter()
                .map(|day| day.as_str())
                .collect::<Vec<_>>()
                .join(";");
            writer.serialize(WeektaakCsvRecord {
                subject: &entry.subject,
                lesson_number: task.lesson_number,
                lesson_title: &task.lesson_title,
                block_name: &task.block_name,
                is_backlog: task.is_backlog,
                days,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
