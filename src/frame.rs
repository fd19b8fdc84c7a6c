//! Tabular views of a week, for printing and export.

use crate::stats::ScheduleStats;
use crate::timetable::{MasterSchedule, hhmm};
use crate::week::WeeklyScheduleInstance;
use polars::prelude::*;

/// One row per scheduled lesson, ordered by day and slot start time.
pub fn lessons_dataframe(
    week: &WeeklyScheduleInstance,
    master: &MasterSchedule,
) -> PolarsResult<DataFrame> {
    let mut rows: Vec<_> = week
        .scheduled_lessons
        .iter()
        .map(|lesson| {
            let slot = master
                .find_slot(week.cycle_week, &lesson.slot_id)
                .map(|(_, slot)| slot);
            (lesson, slot)
        })
        .collect();
    rows.sort_by_key(|(lesson, _)| {
        (lesson.day, master.slot_order(week.cycle_week, &lesson.slot_id))
    });

    let format_time = |time: Option<chrono::NaiveTime>| {
        time.map(|t| t.format(hhmm::FORMAT).to_string())
            .unwrap_or_default()
    };

    let days: Vec<&str> = rows.iter().map(|(l, _)| l.day.as_str()).collect();
    let starts: Vec<String> = rows
        .iter()
        .map(|(_, s)| format_time(s.map(|s| s.start_time)))
        .collect();
    let ends: Vec<String> = rows
        .iter()
        .map(|(_, s)| format_time(s.map(|s| s.end_time)))
        .collect();
    let subjects: Vec<&str> = rows.iter().map(|(l, _)| l.subject.as_str()).collect();
    let numbers: Vec<i64> = rows.iter().map(|(l, _)| l.lesson_number as i64).collect();
    let titles: Vec<&str> = rows.iter().map(|(l, _)| l.lesson_title.as_str()).collect();
    let blocks: Vec<&str> = rows.iter().map(|(l, _)| l.block_name.as_str()).collect();
    let backlog: Vec<bool> = rows.iter().map(|(l, _)| l.is_backlog).collect();
    let completed: Vec<bool> = rows.iter().map(|(l, _)| l.completed).collect();
    let ids: Vec<&str> = rows.iter().map(|(l, _)| l.id.as_str()).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("day"), days).into_column(),
        Series::new(PlSmallStr::from_static("start"), starts).into_column(),
        Series::new(PlSmallStr::from_static("end"), ends).into_column(),
        Series::new(PlSmallStr::from_static("subject"), subjects).into_column(),
        Series::new(PlSmallStr::from_static("lesson_number"), numbers).into_column(),
        Series::new(PlSmallStr::from_static("title"), titles).into_column(),
        Series::new(PlSmallStr::from_static("block"), blocks).into_column(),
        Series::new(PlSmallStr::from_static("backlog"), backlog).into_column(),
        Series::new(PlSmallStr::from_static("completed"), completed).into_column(),
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
    ])
}

/// Per-subject counts, subjects in alphabetical order.
pub fn stats_dataframe(stats: &ScheduleStats) -> PolarsResult<DataFrame> {
    let subjects: Vec<&str> = stats.by_subject.keys().map(String::as_str).collect();
    let column = |pick: fn(&crate::stats::SubjectStats) -> usize| -> Vec<i64> {
        stats.by_subject.values().map(|s| pick(s) as i64).collect()
    };

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("subject"), subjects).into_column(),
        Series::new(PlSmallStr::from_static("total"), column(|s| s.total)).into_column(),
        Series::new(PlSmallStr::from_static("backlog"), column(|s| s.backlog)).into_column(),
        Series::new(PlSmallStr::from_static("new"), column(|s| s.new)).into_column(),
        Series::new(PlSmallStr::from_static("completed"), column(|s| s.completed)).into_column(),
    ])
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Boolean(v) => if *v { "yes".to_string() } else { String::new() },
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Renders a frame as a boxed plain-text table.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| {
                col.get(row_idx)
                    .map(|value| cell_text(&value))
                    .unwrap_or_default()
            })
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            let pad = widths[ci].saturating_sub(value.chars().count());
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
