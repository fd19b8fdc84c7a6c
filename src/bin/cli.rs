use chrono::{NaiveDate, Utc};
use clap::Parser;
use lesson_planner::frame::{lessons_dataframe, render_text_table, stats_dataframe};
use lesson_planner::timetable::hhmm;
use lesson_planner::{
    Evaluation, Exception, JsonFileStore, MasterSchedule, MethodProgress, PlannerConfig,
    PlannerDocument, PlannerSettings, PlannerStore, SchoolDay, StorageBackend, TeachingMethod,
    derive_by_day, derive_weektaak, export_week_to_csv, export_weektaak_to_csv, stats, week_start,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "planner", about = "Weekly lesson planner for primary-school timetables")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Planner document location, overriding the config
    #[arg(long)]
    data: Option<PathBuf>,
    /// Tracing filter, e.g. `debug` or `lesson_planner=trace`
    #[arg(long)]
    log_level: Option<String>,
}

/// State collected while the current week runs, consumed by `evaluate`.
#[derive(Default)]
struct PendingEvaluation {
    extra: Vec<String>,
    exceptions: Vec<Exception>,
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  init <YYYY-MM-DD>                  Start a new year; week 1 is the week containing the date\n  methods load <json_path>           Load teaching methods from a JSON array\n  method add <subject> <name...>     Add an empty teaching method (use _ for spaces in the subject)\n  lesson add <subject> <title...>    Append a lesson to the subject's method\n  progress                           Show curriculum progress per method\n  show                               Show the current week\n  stats                              Show lesson counts for the current week\n  weektaak                           Show the weektaak grouped by subject\n  days                               Show the current week day by day\n  done <scheduled_id>                Toggle completion of a scheduled lesson\n  extra <lesson_id>                  Record a lesson finished outside the schedule\n  except <day> <HH:MM> <HH:MM> <reason...>\n                                     Block slots next week (e.g. a school trip)\n  evaluate                           Evaluate the current week and generate the next one\n  export week <csv_path>             Export the current week as CSV\n  export weektaak <csv_path>         Export the weektaak as CSV\n  save                               Persist the planner document\n  load                               Reload the planner document\n  quit|exit                          Exit"
    );
}

fn open_store(config: &PlannerConfig, data: Option<PathBuf>) -> Result<Box<dyn PlannerStore>, String> {
    let path = data.unwrap_or_else(|| config.resolved_storage_path());
    match config.storage.backend {
        StorageBackend::Json => Ok(Box::new(JsonFileStore::with_key(
            path,
            config.storage.key.clone(),
        ))),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            lesson_planner::SqliteStore::open_with_key(&path, config.storage.key.clone())
                .map(|store| Box::new(store) as Box<dyn PlannerStore>)
                .map_err(|e| e.to_string())
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => Err("sqlite support was not compiled in".to_string()),
    }
}

fn show_week(document: &PlannerDocument) {
    let Some(week) = document.current_week() else {
        println!("No week generated yet. Use 'init <YYYY-MM-DD>'.");
        return;
    };
    println!(
        "Week {} ({}), cycle week {}, status {}",
        week.week_number,
        week.week_start_date,
        week.cycle_week,
        week.status.as_str()
    );
    match lessons_dataframe(week, &document.master_schedule) {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error: {}", e),
    }
}

fn show_weektaak(document: &PlannerDocument) {
    let Some(week) = document.current_week() else {
        println!("No week generated yet.");
        return;
    };
    let weektaak = derive_weektaak(week);
    println!("Weektaak week {}", week.week_number);
    for entry in weektaak.subjects() {
        println!("{}", entry.subject);
        for task in &entry.tasks {
            let days = task
                .days
                .iter()
                .map(|d| d.dutch_name())
                .collect::<Vec<_>>()
                .join(", ");
            let marker = if task.is_backlog { " (inhalen)" } else { "" };
            println!(
                "  [ ] {} {}{} - {}",
                task.lesson_number, task.lesson_title, marker, days
            );
        }
    }
}

fn show_days(document: &PlannerDocument) {
    let Some(week) = document.current_week() else {
        println!("No week generated yet.");
        return;
    };
    for plan in derive_by_day(week, &document.master_schedule) {
        match &plan.teacher {
            Some(teacher) => println!("{} {} ({})", plan.day.dutch_name(), plan.date, teacher),
            None => println!("{} {}", plan.day.dutch_name(), plan.date),
        }
        for lesson in &plan.lessons {
            let mark = if lesson.completed { "x" } else { " " };
            println!("  [{mark}] {} {} {}", lesson.subject, lesson.lesson_number, lesson.lesson_title);
        }
    }
}

/// Subjects are single tokens on the command line; `_` stands for a space and
/// a case-insensitive match against the timetable's subjects wins.
fn resolve_subject(token: &str, known: &[String]) -> String {
    let spaced = token.replace('_', " ");
    known
        .iter()
        .find(|subject| subject.to_lowercase() == spaced.to_lowercase())
        .cloned()
        .unwrap_or(spaced)
}

fn known_subjects(document: Option<&PlannerDocument>) -> Vec<String> {
    match document {
        Some(document) => document.master_schedule.subjects(),
        None => MasterSchedule::default_for_year("").subjects(),
    }
}

fn show_progress(document: &PlannerDocument) {
    for progress in &document.progress_tracker.method_progress {
        let Some(method) = document
            .teaching_methods
            .iter()
            .find(|m| m.id == progress.method_id)
        else {
            continue;
        };
        println!(
            "{}: {} ({}/{} lessons, {:.0}%, at lesson {})",
            progress.subject,
            method.name,
            progress.completed_lessons.len(),
            method.lesson_count(),
            progress.completion_ratio(method) * 100.0,
            progress.current_sequence_position
        );
    }
}

fn method_for_subject<'a>(
    document: &'a mut PlannerDocument,
    subject: &str,
) -> Option<&'a mut TeachingMethod> {
    document
        .teaching_methods
        .iter_mut()
        .find(|m| m.subject == subject)
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlannerConfig::load_from(path),
        None => PlannerConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}; using defaults");
            PlannerConfig::default()
        }
    };

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let store = match open_store(&config, args.data.clone()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Storage error: {e}");
            return;
        }
    };

    let mut methods: Vec<TeachingMethod> = Vec::new();
    let mut document: Option<PlannerDocument> = match store.load_document() {
        Ok(document) => document,
        Err(e) => {
            println!("Could not load saved planner ({e}); starting fresh.");
            None
        }
    };
    let mut pending = PendingEvaluation::default();

    println!("Lesson Planner (CLI) - type 'help' for commands\n");
    if let Some(document) = &document {
        show_week(document);
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "init" => {
                let Some(date_s) = parts.next() else {
                    println!("Usage: init <YYYY-MM-DD>");
                    continue;
                };
                let date = match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                    Ok(d) => d,
                    Err(_) => {
                        println!("Invalid date (YYYY-MM-DD)");
                        continue;
                    }
                };
                let settings = PlannerSettings {
                    group_name: config.defaults.group.clone(),
                    school_year: config.defaults.school_year.clone(),
                    ..PlannerSettings::default()
                };
                let mut master = MasterSchedule::default_for_year(settings.school_year.clone());
                master.cycle_type = config.defaults.cycle_type;
                let carried = document
                    .as_ref()
                    .map(|d| d.teaching_methods.clone())
                    .unwrap_or_else(|| methods.clone());
                let mut fresh = PlannerDocument::new(settings, master, carried);
                match fresh.start_first_week(week_start(date)) {
                    Ok(week) => println!(
                        "Started week 1 on {} with {} lessons.",
                        week.week_start_date,
                        week.scheduled_lessons.len()
                    ),
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                }
                pending = PendingEvaluation::default();
                show_week(&fresh);
                document = Some(fresh);
            }
            "methods" => match (parts.next(), parts.next()) {
                (Some("load"), Some(path)) => {
                    let loaded = fs::read_to_string(path)
                        .map_err(|e| e.to_string())
                        .and_then(|raw| {
                            serde_json::from_str::<Vec<TeachingMethod>>(&raw)
                                .map_err(|e| e.to_string())
                        });
                    match loaded {
                        Ok(loaded) => {
                            println!("Loaded {} teaching methods.", loaded.len());
                            match document.as_mut() {
                                Some(document) => document.teaching_methods = loaded,
                                None => methods = loaded,
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: methods load <json_path>"),
            },
            "method" => {
                let (Some("add"), Some(token)) = (parts.next(), parts.next()) else {
                    println!("Usage: method add <subject> <name...>");
                    continue;
                };
                let subject = resolve_subject(token, &known_subjects(document.as_ref()));
                let subject = subject.as_str();
                let name = parts.collect::<Vec<_>>().join(" ");
                let method = TeachingMethod::new(method_id_for(subject), name, subject);
                match document.as_mut() {
                    Some(document) => {
                        if document.progress_tracker.progress_for_subject(subject).is_none() {
                            document
                                .progress_tracker
                                .method_progress
                                .push(MethodProgress::new(method.id.clone(), subject));
                        }
                        document.teaching_methods.push(method);
                    }
                    None => methods.push(method),
                }
                println!("Added method for {subject}.");
            }
            "lesson" => {
                let (Some("add"), Some(token)) = (parts.next(), parts.next()) else {
                    println!("Usage: lesson add <subject> <title...>");
                    continue;
                };
                let subject = resolve_subject(token, &known_subjects(document.as_ref()));
                let subject = subject.as_str();
                let title = parts.collect::<Vec<_>>().join(" ");
                let target = match document.as_mut() {
                    Some(document) => method_for_subject(document, subject),
                    None => methods.iter_mut().find(|m| m.subject == subject),
                };
                match target {
                    Some(method) => {
                        let id = method.push_lesson(title, 45);
                        println!("Added lesson {id}.");
                    }
                    None => println!("No teaching method for {subject}."),
                }
            }
            "progress" => match &document {
                Some(document) => show_progress(document),
                None => println!("No planner yet."),
            },
            "show" => match &document {
                Some(document) => show_week(document),
                None => println!("No planner yet. Use 'init <YYYY-MM-DD>'."),
            },
            "stats" => {
                let Some(week) = document.as_ref().and_then(|d| d.current_week()) else {
                    println!("No week generated yet.");
                    continue;
                };
                let summary = stats(week);
                println!("Week {} ({})", week.week_number, summary.to_cli_summary());
                match stats_dataframe(&summary) {
                    Ok(df) => println!("{}", render_text_table(&df)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "days" => match &document {
                Some(document) => show_days(document),
                None => println!("No planner yet."),
            },
            "weektaak" => match &document {
                Some(document) => show_weektaak(document),
                None => println!("No planner yet."),
            },
            "done" => {
                let Some(id) = parts.next() else {
                    println!("Usage: done <scheduled_id>");
                    continue;
                };
                match document.as_mut().and_then(|d| d.current_week_mut()) {
                    Some(week) => match week.toggle_completed(id) {
                        Some(true) => println!("Marked {id} as done."),
                        Some(false) => println!("Marked {id} as not done."),
                        None => println!("Scheduled lesson {id} not found."),
                    },
                    None => println!("No week generated yet."),
                }
            }
            "extra" => match parts.next() {
                Some(id) => {
                    pending.extra.push(id.to_string());
                    println!("Recorded extra progress for {id}.");
                }
                None => println!("Usage: extra <lesson_id>"),
            },
            "except" => {
                let (Some(day_s), Some(start_s), Some(end_s)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    println!("Usage: except <day> <HH:MM> <HH:MM> <reason...>");
                    continue;
                };
                let reason = parts.collect::<Vec<_>>().join(" ");
                if reason.is_empty() {
                    println!("Give a reason for the exception.");
                    continue;
                }
                let day: SchoolDay = match day_s.parse() {
                    Ok(day) => day,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                let (start, end) = match (hhmm::parse(start_s), hhmm::parse(end_s)) {
                    (Ok(start), Ok(end)) => (start, end),
                    _ => {
                        println!("Invalid time (HH:MM)");
                        continue;
                    }
                };
                let Some(document) = &document else {
                    println!("No planner yet.");
                    continue;
                };
                // Slots resolve in the template of the week the exception lands in.
                let next_number = document
                    .current_week()
                    .map(|w| w.week_number + 1)
                    .unwrap_or(1);
                let cycle_week = document.master_schedule.cycle_week_for(next_number);
                let template = document.master_schedule.template_for(cycle_week);
                let exception = Exception::for_window(day, start, end, reason, template);
                println!(
                    "Exception on {} blocks {} slot(s) next week.",
                    day,
                    exception.affected_slot_ids.len()
                );
                pending.exceptions.push(exception);
            }
            "evaluate" => {
                let Some(doc) = document.as_mut() else {
                    println!("No planner yet.");
                    continue;
                };
                let Some(week) = doc.current_week() else {
                    println!("No week generated yet.");
                    continue;
                };
                let taken = std::mem::take(&mut pending);
                let evaluation = Evaluation::from_week(
                    week,
                    week.completed_lesson_ids(),
                    taken.extra,
                    taken.exceptions,
                    Utc::now(),
                );
                let missed = evaluation.completion_check.missed_lesson_ids.len();
                match doc.advance_week(&evaluation) {
                    Ok(next) => println!(
                        "Evaluated; {} lesson(s) carried over. Week {} has {} lessons.",
                        missed,
                        next.week_number,
                        next.scheduled_lessons.len()
                    ),
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                }
                show_week(doc);
            }
            "export" => {
                let (Some(kind), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: export <week|weektaak> <csv_path>");
                    continue;
                };
                let Some(doc) = &document else {
                    println!("No planner yet.");
                    continue;
                };
                let Some(week) = doc.current_week() else {
                    println!("No week generated yet.");
                    continue;
                };
                let result = match kind {
                    "week" => export_week_to_csv(week, &doc.master_schedule, path),
                    "weektaak" => export_weektaak_to_csv(week, path),
                    _ => {
                        println!("Usage: export <week|weektaak> <csv_path>");
                        continue;
                    }
                };
                match result {
                    Ok(()) => println!("Exported {kind} to {path}."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "save" => match &document {
                Some(doc) => match store.save_document(doc) {
                    Ok(()) => println!("Planner saved."),
                    Err(e) => println!("Error saving planner: {}", e),
                },
                None => println!("Nothing to save."),
            },
            "load" => match store.load_document() {
                Ok(Some(loaded)) => {
                    println!("Planner loaded.");
                    show_week(&loaded);
                    document = Some(loaded);
                    pending = PendingEvaluation::default();
                }
                Ok(None) => println!("No saved planner found."),
                Err(e) => println!("Error loading planner: {}", e),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}

fn method_id_for(subject: &str) -> String {
    format!(
        "{}-{}",
        subject.to_ascii_lowercase().replace(' ', "-"),
        uuid::Uuid::new_v4().simple()
    )
}
