use crate::week::WeeklyScheduleInstance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubjectStats {
    pub total: usize,
    pub backlog: usize,
    pub new: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub total_lessons: usize,
    pub backlog_lessons: usize,
    pub new_lessons: usize,
    pub completed_lessons: usize,
    pub by_subject: BTreeMap<String, SubjectStats>,
}

impl ScheduleStats {
    pub fn completion_rate(&self) -> f64 {
        if self.total_lessons == 0 {
            return 0.0;
        }
        self.completed_lessons as f64 / self.total_lessons as f64
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = vec![
            format!("lessons={}", self.total_lessons),
            format!("new={}", self.new_lessons),
        ];
        if self.backlog_lessons > 0 {
            parts.push(format!("backlog={}", self.backlog_lessons));
        }
        if self.completed_lessons > 0 {
            parts.push(format!("completed={}", self.completed_lessons));
        }
        parts.join(", ")
    }
}

/// Single pass over the scheduled lessons.
pub fn stats(week: &WeeklyScheduleInstance) -> ScheduleStats {
    let mut stats = ScheduleStats::default();
    for lesson in &week.scheduled_lessons {
        let subject = stats.by_subject.entry(lesson.subject.clone()).or_default();
        subject.total += 1;
        stats.total_lessons += 1;
        if lesson.is_backlog {
            subject.backlog += 1;
            stats.backlog_lessons += 1;
        } else {
            subject.new += 1;
            stats.new_lessons += 1;
        }
        if lesson.completed {
            subject.completed += 1;
            stats.completed_lessons += 1;
        }
    }
    stats
}
