use crate::curriculum::TeachingMethod;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One finished lesson in a method's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLesson {
    pub lesson_id: String,
    /// ISO-8601 timestamp taken from the evaluation.
    pub completed_date: String,
    pub week_number: u32,
    #[serde(default)]
    pub notes: String,
}

/// Cursor into a single teaching method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodProgress {
    pub method_id: String,
    pub subject: String,
    /// Highest sequence order ever marked complete; 0 before the first lesson.
    #[serde(default)]
    pub current_sequence_position: u32,
    #[serde(default)]
    pub completed_lessons: Vec<CompletedLesson>,
}

impl MethodProgress {
    pub fn new(method_id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            method_id: method_id.into(),
            subject: subject.into(),
            current_sequence_position: 0,
            completed_lessons: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.current_sequence_position = position;
        self
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|c| c.lesson_id == lesson_id)
    }

    /// Set of completed lesson ids, for repeated membership checks.
    pub fn completed_ids(&self) -> HashSet<&str> {
        self.completed_lessons
            .iter()
            .map(|c| c.lesson_id.as_str())
            .collect()
    }

    /// Raises the position; never lowers it.
    pub fn advance_to(&mut self, sequence_order: u32) {
        if sequence_order > self.current_sequence_position {
            self.current_sequence_position = sequence_order;
        }
    }

    pub fn completion_ratio(&self, method: &TeachingMethod) -> f64 {
        let total = method.lesson_count();
        if total == 0 {
            return 0.0;
        }
        self.completed_lessons.len() as f64 / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTracker {
    pub school_year: String,
    pub group: String,
    #[serde(default)]
    pub method_progress: Vec<MethodProgress>,
}

impl ProgressTracker {
    pub fn new(school_year: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            school_year: school_year.into(),
            group: group.into(),
            method_progress: Vec::new(),
        }
    }

    /// Fresh tracker with every method at position 0.
    pub fn initialize(
        school_year: impl Into<String>,
        group: impl Into<String>,
        methods: &[TeachingMethod],
    ) -> Self {
        let mut tracker = Self::new(school_year, group);
        tracker.method_progress = methods
            .iter()
            .map(|method| MethodProgress::new(method.id.clone(), method.subject.clone()))
            .collect();
        tracker
    }

    /// The first entry whose subject matches.
    pub fn progress_for_subject(&self, subject: &str) -> Option<&MethodProgress> {
        self.method_progress.iter().find(|mp| mp.subject == subject)
    }

    pub fn progress_for_method(&self, method_id: &str) -> Option<&MethodProgress> {
        self.method_progress.iter().find(|mp| mp.method_id == method_id)
    }

    pub fn progress_for_method_mut(&mut self, method_id: &str) -> Option<&mut MethodProgress> {
        self.method_progress
            .iter_mut()
            .find(|mp| mp.method_id == method_id)
    }
}
