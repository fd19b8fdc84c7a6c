mod common;

use chrono::Utc;
use common::{d, master, methods, t};
use lesson_planner::validation::{
    validate_document, validate_master_schedule, validate_progress_tracker,
    validate_teaching_methods,
};
use lesson_planner::{
    CompletedLesson, CycleWeek, Evaluation, Exception, PlannerDocument, PlannerError,
    PlannerSettings, ScheduleStatus, SchoolDay, TimeSlot, ValidationError,
};

fn started() -> PlannerDocument {
    let mut document = PlannerDocument::new(PlannerSettings::default(), master(), methods());
    document.start_first_week(d(2024, 8, 26)).unwrap();
    document
}

#[test]
fn new_document_starts_every_method_at_zero() {
    let document = PlannerDocument::new(PlannerSettings::default(), master(), methods());
    assert_eq!(document.progress_tracker.school_year, "2024-2025");
    assert_eq!(document.progress_tracker.group, "Groep 4");
    assert_eq!(document.progress_tracker.method_progress.len(), 2);
    assert!(
        document
            .progress_tracker
            .method_progress
            .iter()
            .all(|p| p.current_sequence_position == 0 && p.completed_lessons.is_empty())
    );
    assert!(document.current_week().is_none());
}

#[test]
fn first_week_becomes_the_active_current_week() {
    let document = started();
    let week = document.current_week().unwrap();
    assert_eq!(week.week_number, 1);
    assert_eq!(week.status, ScheduleStatus::Active);
    assert_eq!(week.scheduled_lessons.len(), 5);
    assert_eq!(document.weekly_schedules.len(), 1);
}

#[test]
fn advancing_applies_progress_and_carries_missed_lessons() {
    let mut document = started();
    let week = document.current_week_mut().unwrap();
    let done: Vec<String> = week
        .scheduled_lessons
        .iter()
        .filter(|l| l.lesson_id != "r-2")
        .map(|l| l.id.clone())
        .collect();
    for id in &done {
        week.toggle_completed(id);
    }
    let trip = Exception::for_window(
        SchoolDay::Tuesday,
        t("09:00"),
        t("11:00"),
        "Schoolreis",
        document.master_schedule.template_for(CycleWeek::A),
    );

    let week = document.current_week().unwrap();
    let first_id = week.id.clone();
    let evaluation = Evaluation::from_week(
        week,
        week.completed_lesson_ids(),
        vec!["t-3".to_string()],
        vec![trip],
        Utc::now(),
    );
    assert_eq!(evaluation.completion_check.missed_lesson_ids, vec!["r-2"]);

    let next = document.advance_week(&evaluation).unwrap();
    assert_eq!(next.week_number, 2);
    assert_eq!(next.week_start_date, d(2024, 9, 2));
    assert_eq!(next.status, ScheduleStatus::Draft);
    assert_eq!(next.exceptions.len(), 1);

    let placed: Vec<_> = next
        .scheduled_lessons
        .iter()
        .map(|l| (l.slot_id.as_str(), l.lesson_id.as_str(), l.is_backlog))
        .collect();
    assert_eq!(
        placed,
        vec![
            ("mon-1", "r-2", true),
            ("mon-3", "r-4", false),
            ("mon-2", "t-4", false),
        ]
    );

    let rekenen = document.progress_tracker.progress_for_method("m-rekenen").unwrap();
    assert_eq!(rekenen.current_sequence_position, 3);
    assert!(!rekenen.is_completed("r-2"));
    let taal = document.progress_tracker.progress_for_method("m-taal").unwrap();
    assert_eq!(taal.current_sequence_position, 3);

    assert_eq!(
        document.week_by_id(&first_id).unwrap().status,
        ScheduleStatus::Evaluated
    );
    assert_eq!(document.current_week().unwrap().week_number, 2);
    assert_eq!(document.weekly_schedules.len(), 2);
}

#[test]
fn evaluation_for_another_week_is_rejected() {
    let mut document = started();
    let week = document.current_week().unwrap();
    let mut evaluation = Evaluation::from_week(week, Vec::new(), Vec::new(), Vec::new(), Utc::now());
    evaluation.week_number = 7;

    match document.advance_week(&evaluation) {
        Err(PlannerError::EvaluationMismatch { expected, found }) => {
            assert_eq!((expected, found), (1, 7));
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
    assert_eq!(document.weekly_schedules.len(), 1);
}

#[test]
fn evaluation_of_a_different_schedule_with_the_same_number_is_rejected() {
    let mut document = started();
    let other = started();
    let foreign = other.current_week().unwrap();
    assert_eq!(foreign.week_number, 1);
    let evaluation = Evaluation::from_week(foreign, Vec::new(), Vec::new(), Vec::new(), Utc::now());
    let current_id = document.current_week().unwrap().id.clone();

    match document.advance_week(&evaluation) {
        Err(PlannerError::EvaluationForOtherWeek { expected, found }) => {
            assert_eq!(expected, current_id);
            assert_eq!(found, foreign.id);
        }
        other => panic!("expected schedule mismatch, got {other:?}"),
    }
    assert_eq!(document.weekly_schedules.len(), 1);
    assert_eq!(
        document.current_week().unwrap().status,
        ScheduleStatus::Active
    );
}

#[test]
fn advancing_without_a_week_fails() {
    let mut document = PlannerDocument::new(PlannerSettings::default(), master(), methods());
    let other = started();
    let week = other.current_week().unwrap();
    let evaluation = Evaluation::from_week(week, Vec::new(), Vec::new(), Vec::new(), Utc::now());

    assert!(matches!(
        document.advance_week(&evaluation),
        Err(PlannerError::NoCurrentWeek)
    ));
}

#[test]
fn duplicate_slot_ids_are_rejected() {
    let mut master = master();
    master.weeks.week_a.push_slot(
        SchoolDay::Friday,
        TimeSlot::lesson("mon-1", t("09:00"), t("10:00"), "Rekenen"),
    );
    assert!(matches!(
        validate_master_schedule(&master),
        Err(ValidationError::DuplicateSlotId { .. })
    ));

    let mut document = PlannerDocument::new(PlannerSettings::default(), master, methods());
    assert!(matches!(
        document.start_first_week(d(2024, 8, 26)),
        Err(PlannerError::Validation(_))
    ));
}

#[test]
fn slot_must_end_after_it_starts() {
    let mut master = master();
    master.weeks.week_a.push_slot(
        SchoolDay::Friday,
        TimeSlot::lesson("fri-1", t("10:00"), t("10:00"), "Rekenen"),
    );
    assert!(matches!(
        validate_master_schedule(&master),
        Err(ValidationError::SlotTimeOrder { .. })
    ));
}

#[test]
fn lesson_slots_need_a_subject() {
    let mut master = master();
    master.weeks.week_a.push_slot(
        SchoolDay::Friday,
        TimeSlot::lesson("fri-1", t("09:00"), t("10:00"), " "),
    );
    assert_eq!(
        validate_master_schedule(&master),
        Err(ValidationError::MissingSubject {
            slot_id: "fri-1".to_string()
        })
    );

    let mut master = common::master();
    master.weeks.week_a.push_slot(
        SchoolDay::Friday,
        TimeSlot::pause("fri-p", t("10:00"), t("10:15"), ""),
    );
    assert!(validate_master_schedule(&master).is_ok());
}

#[test]
fn teaching_methods_need_unique_ids_and_orders() {
    let mut methods = methods();
    assert!(validate_teaching_methods(&methods).is_ok());

    methods[1].groups[0].blocks[0].lessons[0].lesson_id = "r-1".to_string();
    assert_eq!(
        validate_teaching_methods(&methods),
        Err(ValidationError::DuplicateLessonId {
            lesson_id: "r-1".to_string()
        })
    );

    let mut methods = common::methods();
    methods[0].groups[0].blocks[0].lessons[1].sequence_order = 1;
    assert!(matches!(
        validate_teaching_methods(&methods),
        Err(ValidationError::DuplicateSequenceOrder { sequence_order: 1, .. })
    ));
}

#[test]
fn progress_may_not_record_a_lesson_twice() {
    let mut document = started();
    let completion = CompletedLesson {
        lesson_id: "r-1".to_string(),
        completed_date: "2024-08-30T15:00:00.000Z".to_string(),
        week_number: 1,
        notes: String::new(),
    };
    let progress = document
        .progress_tracker
        .progress_for_method_mut("m-rekenen")
        .unwrap();
    progress.completed_lessons.push(completion.clone());
    progress.completed_lessons.push(completion);

    assert!(matches!(
        validate_progress_tracker(&document.progress_tracker),
        Err(ValidationError::DuplicateCompletion { .. })
    ));
}

#[test]
fn current_week_must_exist() {
    let mut document = started();
    assert!(validate_document(&document).is_ok());
    document.current_week_id = Some("nope".to_string());
    assert_eq!(
        validate_document(&document),
        Err(ValidationError::UnknownCurrentWeek("nope".to_string()))
    );
}
