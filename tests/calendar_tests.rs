use chrono::NaiveDate;
use lesson_planner::{SchoolCalendar, SchoolDay, date_of, next_week_start, week_start};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn week_start_is_the_monday_of_the_week() {
    assert_eq!(week_start(d(2024, 8, 28)), d(2024, 8, 26));
    assert_eq!(week_start(d(2024, 8, 26)), d(2024, 8, 26));
    assert_eq!(week_start(d(2024, 9, 1)), d(2024, 8, 26));
}

#[test]
fn next_week_start_crosses_month_and_year() {
    assert_eq!(next_week_start(d(2024, 8, 26)), d(2024, 9, 2));
    assert_eq!(next_week_start(d(2024, 12, 30)), d(2025, 1, 6));
}

#[test]
fn school_calendar_numbers_weeks_from_one() {
    let calendar = SchoolCalendar::starting(d(2024, 8, 28));
    assert_eq!(calendar.first_week_start(), d(2024, 8, 26));
    assert_eq!(calendar.week_start_date(1), d(2024, 8, 26));
    assert_eq!(calendar.week_start_date(3), d(2024, 9, 9));

    assert_eq!(calendar.week_number_for(d(2024, 8, 30)), Some(1));
    assert_eq!(calendar.week_number_for(d(2024, 9, 2)), Some(2));
    assert_eq!(calendar.week_number_for(d(2024, 8, 25)), None);
}

#[test]
fn school_days_map_onto_dates_of_their_week() {
    let monday = d(2024, 12, 30);
    assert_eq!(date_of(monday, SchoolDay::Monday), monday);
    assert_eq!(date_of(monday, SchoolDay::Wednesday), d(2025, 1, 1));
    assert_eq!(date_of(monday, SchoolDay::Friday), d(2025, 1, 3));
}
