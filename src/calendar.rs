use crate::timetable::SchoolDay;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn next_week_start(start: NaiveDate) -> NaiveDate {
    start + Duration::weeks(1)
}

/// Calendar date of `day` in the week that starts on `week_start`.
pub fn date_of(week_start: NaiveDate, day: SchoolDay) -> NaiveDate {
    week_start + Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Maps school-year week numbers onto calendar weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolCalendar {
    first_week_start: NaiveDate,
}

impl SchoolCalendar {
    /// Any date inside the first school week; it is normalised to that week's Monday.
    pub fn starting(first_day: NaiveDate) -> Self {
        Self {
            first_week_start: week_start(first_day),
        }
    }

    pub fn first_week_start(&self) -> NaiveDate {
        self.first_week_start
    }

    /// Monday of the given week; week 1 is the first school week.
    pub fn week_start_date(&self, week_number: u32) -> NaiveDate {
        let offset = week_number.saturating_sub(1) as i64;
        self.first_week_start + Duration::weeks(offset)
    }

    /// Week number for a date, or `None` before the first school week.
    pub fn week_number_for(&self, date: NaiveDate) -> Option<u32> {
        let days = (week_start(date) - self.first_week_start).num_days();
        if days < 0 {
            return None;
        }
        u32::try_from(days / 7).ok().map(|weeks| weeks + 1)
    }
}
