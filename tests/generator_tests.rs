mod common;

use chrono::Utc;
use common::{d, fresh_tracker, master, method, methods, t};
use lesson_planner::{
    CycleType, CycleWeek, Evaluation, Exception, MethodProgress, ProgressTracker, ScheduleStatus,
    SchoolDay, TimeSlot, WeeklyScheduleInstance, generate,
};

fn placed(week: &WeeklyScheduleInstance) -> Vec<(&str, &str, bool)> {
    week.scheduled_lessons
        .iter()
        .map(|l| (l.slot_id.as_str(), l.lesson_id.as_str(), l.is_backlog))
        .collect()
}

fn evaluation_missing(week_number: u32, missed: &[&str], exceptions: Vec<Exception>) -> Evaluation {
    let mut week = WeeklyScheduleInstance::new(week_number, d(2024, 8, 26), CycleWeek::A);
    week.id = "previous".to_string();
    let mut evaluation = Evaluation::from_week(&week, Vec::new(), Vec::new(), exceptions, Utc::now());
    evaluation.completion_check.missed_lesson_ids = missed.iter().map(|s| s.to_string()).collect();
    evaluation
}

#[test]
fn first_week_fills_every_lesson_slot_in_curriculum_order() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let week = generate(&master(), &methods, &tracker, None, 1, d(2024, 8, 26));

    assert_eq!(week.week_number, 1);
    assert_eq!(week.week_start_date, d(2024, 8, 26));
    assert_eq!(week.cycle_week, CycleWeek::A);
    assert_eq!(week.status, ScheduleStatus::Draft);
    assert!(week.exceptions.is_empty());
    assert_eq!(
        placed(&week),
        vec![
            ("mon-1", "r-1", false),
            ("mon-3", "r-2", false),
            ("tue-2", "r-3", false),
            ("mon-2", "t-1", false),
            ("tue-1", "t-2", false),
        ]
    );
    assert!(week.scheduled_lessons.iter().all(|l| !l.completed));
}

#[test]
fn scheduled_lessons_carry_slot_and_lesson_details() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let week = generate(&master(), &methods, &tracker, None, 1, d(2024, 8, 26));

    let first = &week.scheduled_lessons[0];
    assert_eq!(first.day, SchoolDay::Monday);
    assert_eq!(first.subject, "Rekenen");
    assert_eq!(first.method_id, "m-rekenen");
    assert_eq!(first.lesson_title, "Rekenen les 1");
    assert_eq!(first.lesson_number, 1);
    assert_eq!(first.block_name, "Blok 1");

    let ids: std::collections::HashSet<_> = week.scheduled_lessons.iter().map(|l| &l.id).collect();
    assert_eq!(ids.len(), week.scheduled_lessons.len());
}

#[test]
fn breaks_are_never_scheduled() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let week = generate(&master(), &methods, &tracker, None, 1, d(2024, 8, 26));
    assert!(week.scheduled_lessons.iter().all(|l| l.slot_id != "mon-p"));
}

#[test]
fn lessons_start_after_current_position() {
    let methods = methods();
    let mut tracker = fresh_tracker(&methods);
    tracker.progress_for_method_mut("m-rekenen").unwrap().current_sequence_position = 4;

    let week = generate(&master(), &methods, &tracker, None, 1, d(2024, 8, 26));
    let rekenen: Vec<_> = week
        .lessons_for_subject("Rekenen")
        .map(|l| l.lesson_id.as_str())
        .collect();
    assert_eq!(rekenen, vec!["r-5", "r-6", "r-7"]);
}

#[test]
fn missed_lessons_come_first_and_are_flagged_as_backlog() {
    let methods = methods();
    let mut tracker = fresh_tracker(&methods);
    tracker.progress_for_method_mut("m-rekenen").unwrap().current_sequence_position = 3;
    tracker.progress_for_method_mut("m-taal").unwrap().current_sequence_position = 2;

    let evaluation = evaluation_missing(1, &["r-2"], Vec::new());
    let week = generate(&master(), &methods, &tracker, Some(&evaluation), 2, d(2024, 9, 2));

    assert_eq!(
        placed(&week),
        vec![
            ("mon-1", "r-2", true),
            ("mon-3", "r-4", false),
            ("tue-2", "r-5", false),
            ("mon-2", "t-3", false),
            ("tue-1", "t-4", false),
        ]
    );
}

#[test]
fn backlog_is_sorted_and_routed_to_its_own_subject() {
    let methods = methods();
    let mut tracker = fresh_tracker(&methods);
    tracker.progress_for_method_mut("m-rekenen").unwrap().current_sequence_position = 3;
    tracker.progress_for_method_mut("m-taal").unwrap().current_sequence_position = 2;

    let evaluation = evaluation_missing(1, &["t-2", "r-3", "r-1"], Vec::new());
    let week = generate(&master(), &methods, &tracker, Some(&evaluation), 2, d(2024, 9, 2));

    assert_eq!(
        placed(&week),
        vec![
            ("mon-1", "r-1", true),
            ("mon-3", "r-3", true),
            ("tue-2", "r-4", false),
            ("mon-2", "t-2", true),
            ("tue-1", "t-3", false),
        ]
    );
}

#[test]
fn backlog_larger_than_capacity_is_truncated() {
    let methods = methods();
    let mut tracker = fresh_tracker(&methods);
    tracker.progress_for_method_mut("m-rekenen").unwrap().current_sequence_position = 5;

    let evaluation = evaluation_missing(1, &["r-4", "r-2", "r-3", "r-1"], Vec::new());
    let week = generate(&master(), &methods, &tracker, Some(&evaluation), 2, d(2024, 9, 2));

    let rekenen: Vec<_> = week
        .lessons_for_subject("Rekenen")
        .map(|l| (l.lesson_id.as_str(), l.is_backlog))
        .collect();
    assert_eq!(rekenen, vec![("r-1", true), ("r-2", true), ("r-3", true)]);
}

#[test]
fn unknown_missed_lessons_are_ignored() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let evaluation = evaluation_missing(1, &["deleted-lesson"], Vec::new());
    let week = generate(&master(), &methods, &tracker, Some(&evaluation), 2, d(2024, 9, 2));

    assert_eq!(week.scheduled_lessons.len(), 5);
    assert!(week.scheduled_lessons.iter().all(|l| !l.is_backlog));
}

#[test]
fn exceptions_remove_slots_and_are_copied_onto_the_week() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let master = master();
    let trip = Exception::for_window(
        SchoolDay::Monday,
        t("09:00"),
        t("10:15"),
        "Schoolreis",
        master.template_for(CycleWeek::A),
    );
    assert_eq!(trip.affected_slot_ids, vec!["mon-1", "mon-p"]);

    let evaluation = evaluation_missing(1, &[], vec![trip.clone()]);
    let week = generate(&master, &methods, &tracker, Some(&evaluation), 2, d(2024, 9, 2));

    assert_eq!(week.exceptions, vec![trip]);
    assert_eq!(
        placed(&week),
        vec![
            ("mon-3", "r-1", false),
            ("tue-2", "r-2", false),
            ("mon-2", "t-1", false),
            ("tue-1", "t-2", false),
        ]
    );
}

#[test]
fn exception_on_another_day_blocks_nothing() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let mut exception = Exception::for_window(
        SchoolDay::Monday,
        t("09:00"),
        t("10:00"),
        "Studiedag",
        master().template_for(CycleWeek::A),
    );
    exception.day = SchoolDay::Friday;

    let evaluation = evaluation_missing(1, &[], vec![exception]);
    let week = generate(&master(), &methods, &tracker, Some(&evaluation), 2, d(2024, 9, 2));
    assert_eq!(week.scheduled_lessons.len(), 5);
}

#[test]
fn subject_without_progress_gets_no_new_lessons() {
    let methods = vec![method("m-rekenen", "Rekenen", "r", 8)];
    let tracker = fresh_tracker(&methods);
    let week = generate(&master(), &methods, &tracker, None, 1, d(2024, 8, 26));

    assert_eq!(week.lessons_for_subject("Taal").count(), 0);
    assert_eq!(week.lessons_for_subject("Rekenen").count(), 3);
}

#[test]
fn exhausted_method_leaves_slots_empty() {
    let methods = vec![method("m-rekenen", "Rekenen", "r", 2)];
    let tracker = fresh_tracker(&methods);
    let week = generate(&master(), &methods, &tracker, None, 1, d(2024, 8, 26));

    let slots: Vec<_> = week
        .lessons_for_subject("Rekenen")
        .map(|l| l.slot_id.as_str())
        .collect();
    assert_eq!(slots, vec!["mon-1", "mon-3"]);
}

#[test]
fn empty_timetable_yields_empty_week() {
    let methods = methods();
    let tracker = ProgressTracker::new("2024-2025", "Groep 4");
    let mut master = master();
    master.weeks.week_a = Default::default();
    let week = generate(&master, &methods, &tracker, None, 1, d(2024, 8, 26));
    assert!(week.scheduled_lessons.is_empty());
}

#[test]
fn biweekly_even_weeks_use_week_b() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let mut master = master();
    master.cycle_type = CycleType::Biweekly;
    master.copy_week_a_to_b();
    let week_b = master.template_mut(CycleWeek::B);
    week_b.remove_slot(SchoolDay::Monday, "mon-1");
    week_b.push_slot(
        SchoolDay::Monday,
        TimeSlot::lesson("mon-1b", t("08:30"), t("09:00"), "Taal"),
    );

    let odd = generate(&master, &methods, &tracker, None, 3, d(2024, 9, 9));
    assert_eq!(odd.cycle_week, CycleWeek::A);
    assert_eq!(odd.lessons_for_subject("Rekenen").count(), 3);

    let even = generate(&master, &methods, &tracker, None, 2, d(2024, 9, 2));
    assert_eq!(even.cycle_week, CycleWeek::B);
    assert_eq!(even.lessons_for_subject("Rekenen").count(), 2);
    assert_eq!(even.lessons_for_subject("Taal").count(), 3);
}

#[test]
fn biweekly_without_week_b_falls_back_to_week_a() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let mut master = master();
    master.cycle_type = CycleType::Biweekly;

    let week = generate(&master, &methods, &tracker, None, 2, d(2024, 9, 2));
    assert_eq!(week.cycle_week, CycleWeek::B);
    assert_eq!(week.scheduled_lessons.len(), 5);
}

#[test]
fn progress_matched_by_subject_uses_first_entry() {
    let methods = vec![
        method("m-rekenen", "Rekenen", "r", 8),
        method("m-rekenen-2", "Rekenen", "x", 8),
    ];
    let mut tracker = ProgressTracker::new("2024-2025", "Groep 4");
    tracker
        .method_progress
        .push(MethodProgress::new("m-rekenen-2", "Rekenen").with_position(1));
    tracker
        .method_progress
        .push(MethodProgress::new("m-rekenen", "Rekenen"));

    let week = generate(&master(), &methods, &tracker, None, 1, d(2024, 8, 26));
    let ids: Vec<_> = week
        .lessons_for_subject("Rekenen")
        .map(|l| l.lesson_id.as_str())
        .collect();
    assert_eq!(ids, vec!["x-2", "x-3", "x-4"]);
}

fn single_slot_master() -> lesson_planner::MasterSchedule {
    let mut week = lesson_planner::WeekTemplate::new();
    week.push_slot(
        SchoolDay::Monday,
        TimeSlot::lesson("only", t("09:00"), t("09:45"), "Rekenen"),
    );
    lesson_planner::MasterSchedule::new("single", "2024-2025", CycleType::Weekly, week)
}

#[test]
fn single_slot_gets_the_first_lesson_after_position_zero() {
    let methods = vec![method("m-rekenen", "Rekenen", "r", 3)];
    let tracker = fresh_tracker(&methods);
    let week = generate(&single_slot_master(), &methods, &tracker, None, 1, d(2024, 8, 26));

    assert_eq!(week.scheduled_lessons.len(), 1);
    assert_eq!(week.scheduled_lessons[0].lesson_number, 1);
    assert!(!week.scheduled_lessons[0].is_backlog);
}

#[test]
fn single_slot_repeats_a_missed_lesson_before_new_ones() {
    let methods = vec![method("m-rekenen", "Rekenen", "r", 3)];
    let tracker = fresh_tracker(&methods);
    let evaluation = evaluation_missing(1, &["r-1"], Vec::new());
    let week = generate(
        &single_slot_master(),
        &methods,
        &tracker,
        Some(&evaluation),
        2,
        d(2024, 9, 2),
    );

    assert_eq!(placed(&week), vec![("only", "r-1", true)]);
}

#[test]
fn no_lesson_lands_in_a_blocked_or_break_slot() {
    let methods = methods();
    let tracker = fresh_tracker(&methods);
    let master = master();
    let template = master.template_for(CycleWeek::A);
    let exceptions = vec![
        Exception::for_window(SchoolDay::Monday, t("10:00"), t("12:00"), "Toets", template),
        Exception::for_window(SchoolDay::Tuesday, t("09:00"), t("10:00"), "Gastles", template),
    ];
    let evaluation = evaluation_missing(1, &["r-1", "t-1"], exceptions.clone());
    let week = generate(&master, &methods, &tracker, Some(&evaluation), 2, d(2024, 9, 2));

    for lesson in &week.scheduled_lessons {
        let (_, slot) = template.find_slot(&lesson.slot_id).unwrap();
        assert!(!slot.is_break);
        assert!(!exceptions.iter().any(|e| e.blocks(lesson.day, &lesson.slot_id)));
    }
    let slots: Vec<_> = week.scheduled_lessons.iter().map(|l| l.slot_id.as_str()).collect();
    assert_eq!(slots, vec!["mon-1", "tue-2"]);
}
