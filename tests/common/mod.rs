#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use lesson_planner::timetable::hhmm;
use lesson_planner::{
    Block, CycleType, Lesson, MasterSchedule, ProgressTracker, SchoolDay, TeachingMethod,
    TimeSlot, WeekTemplate,
};

pub fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn t(value: &str) -> NaiveTime {
    hhmm::parse(value).unwrap()
}

/// Lessons `{prefix}-1` .. `{prefix}-{count}` with matching sequence orders.
pub fn method(id: &str, subject: &str, prefix: &str, count: u32) -> TeachingMethod {
    let mut method = TeachingMethod::new(id, format!("{subject} methode"), subject);
    let mut block = Block::new("Blok 1");
    for order in 1..=count {
        block.lessons.push(Lesson::new(
            format!("{prefix}-{order}"),
            order,
            format!("{subject} les {order}"),
        ));
    }
    method.groups[0].blocks.push(block);
    method
}

pub fn methods() -> Vec<TeachingMethod> {
    vec![
        method("m-rekenen", "Rekenen", "r", 8),
        method("m-taal", "Taal", "t", 8),
    ]
}

/// Rekenen: mon-1, mon-3, tue-2. Taal: mon-2, tue-1. One break on Monday.
pub fn week_template() -> WeekTemplate {
    let mut week = WeekTemplate::new();
    week.push_slot(
        SchoolDay::Monday,
        TimeSlot::lesson("mon-1", t("09:00"), t("10:00"), "Rekenen"),
    );
    week.push_slot(
        SchoolDay::Monday,
        TimeSlot::pause("mon-p", t("10:00"), t("10:15"), "Pauze"),
    );
    week.push_slot(
        SchoolDay::Monday,
        TimeSlot::lesson("mon-2", t("10:15"), t("11:00"), "Taal"),
    );
    week.push_slot(
        SchoolDay::Monday,
        TimeSlot::lesson("mon-3", t("11:00"), t("11:45"), "Rekenen"),
    );
    week.push_slot(
        SchoolDay::Tuesday,
        TimeSlot::lesson("tue-1", t("09:00"), t("10:00"), "Taal"),
    );
    week.push_slot(
        SchoolDay::Tuesday,
        TimeSlot::lesson("tue-2", t("10:00"), t("11:00"), "Rekenen"),
    );
    week
}

pub fn master() -> MasterSchedule {
    MasterSchedule::new("master-1", "2024-2025", CycleType::Weekly, week_template())
}

pub fn fresh_tracker(methods: &[TeachingMethod]) -> ProgressTracker {
    ProgressTracker::initialize("2024-2025", "Groep 4", methods)
}
