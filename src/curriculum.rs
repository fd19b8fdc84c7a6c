use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub const DEFAULT_BLOCK_NAME: &str = "Blok 1";

/// A single lesson inside a block of a teaching method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub lesson_id: String,
    /// Curriculum position, unique within the owning method.
    pub sequence_order: u32,
    #[serde(default)]
    pub lesson_number: Option<u32>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minutes.
    #[serde(default)]
    pub estimated_duration: u32,
}

impl Lesson {
    pub fn new(lesson_id: impl Into<String>, sequence_order: u32, title: impl Into<String>) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            sequence_order,
            lesson_number: None,
            title: title.into(),
            description: None,
            estimated_duration: 45,
        }
    }

    /// The number shown to pupils; falls back to the curriculum position.
    pub fn display_number(&self) -> u32 {
        self.lesson_number.unwrap_or(self.sequence_order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub block_id: String,
    pub name: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            block_id: Uuid::new_v4().to_string(),
            name: name.into(),
            lessons: Vec::new(),
        }
    }
}

/// A grade level inside a method (e.g. "Groep 4").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodGroup {
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingMethod {
    pub id: String,
    pub name: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default)]
    pub groups: Vec<MethodGroup>,
}

impl TeachingMethod {
    pub fn new(id: impl Into<String>, name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject: subject.into(),
            publisher: None,
            groups: vec![MethodGroup::default()],
        }
    }

    pub fn lessons(&self) -> impl Iterator<Item = (&Block, &Lesson)> {
        self.groups
            .iter()
            .flat_map(|group| group.blocks.iter())
            .flat_map(|block| block.lessons.iter().map(move |lesson| (block, lesson)))
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons().count()
    }

    /// Appends a lesson after the current last lesson of the method and returns its id.
    ///
    /// The lesson lands in the last block of the last group; a group and a
    /// default block are created when the method has none yet.
    pub fn push_lesson(&mut self, title: impl Into<String>, estimated_duration: u32) -> String {
        let next_order = self
            .lessons()
            .map(|(_, lesson)| lesson.sequence_order)
            .max()
            .unwrap_or(0)
            + 1;

        if self.groups.is_empty() {
            self.groups.push(MethodGroup::default());
        }
        let last_group = self.groups.len() - 1;
        let blocks = &mut self.groups[last_group].blocks;
        if blocks.is_empty() {
            blocks.push(Block::new(DEFAULT_BLOCK_NAME));
        }
        let last_block = blocks.len() - 1;

        let mut lesson = Lesson::new(Uuid::new_v4().to_string(), next_order, title);
        lesson.lesson_number = Some(next_order);
        lesson.estimated_duration = estimated_duration;
        let lesson_id = lesson.lesson_id.clone();
        blocks[last_block].lessons.push(lesson);
        lesson_id
    }

    /// Removes a lesson; other lessons keep their sequence order.
    pub fn remove_lesson(&mut self, lesson_id: &str) -> bool {
        for block in self.groups.iter_mut().flat_map(|g| g.blocks.iter_mut()) {
            if let Some(pos) = block.lessons.iter().position(|l| l.lesson_id == lesson_id) {
                block.lessons.remove(pos);
                return true;
            }
        }
        false
    }
}

/// A lesson together with the method and block it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedLesson {
    pub lesson_id: String,
    pub sequence_order: u32,
    pub lesson_number: u32,
    pub title: String,
    pub estimated_duration: u32,
    pub method_id: String,
    pub method_name: String,
    pub subject: String,
    pub block_name: String,
}

impl EnrichedLesson {
    fn from_parts(method: &TeachingMethod, block: &Block, lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.lesson_id.clone(),
            sequence_order: lesson.sequence_order,
            lesson_number: lesson.display_number(),
            title: lesson.title.clone(),
            estimated_duration: lesson.estimated_duration,
            method_id: method.id.clone(),
            method_name: method.name.clone(),
            subject: method.subject.clone(),
            block_name: block.name.clone(),
        }
    }
}

/// Linear search across every method; the first match wins.
pub fn find_lesson_by_id(lesson_id: &str, methods: &[TeachingMethod]) -> Option<EnrichedLesson> {
    methods.iter().find_map(|method| {
        method
            .lessons()
            .find(|(_, lesson)| lesson.lesson_id == lesson_id)
            .map(|(block, lesson)| EnrichedLesson::from_parts(method, block, lesson))
    })
}

/// All lessons of a method, enriched and sorted by ascending sequence order.
pub fn all_lessons_from_method(method: &TeachingMethod) -> Vec<EnrichedLesson> {
    let mut lessons: Vec<EnrichedLesson> = method
        .lessons()
        .map(|(block, lesson)| EnrichedLesson::from_parts(method, block, lesson))
        .collect();
    lessons.sort_by_key(|lesson| lesson.sequence_order);
    lessons
}

/// Flat lookup table built once per snapshot of the teaching methods.
#[derive(Debug, Clone, Default)]
pub struct LessonIndex {
    by_id: HashMap<String, EnrichedLesson>,
    by_method: HashMap<String, Vec<EnrichedLesson>>,
}

impl LessonIndex {
    pub fn build(methods: &[TeachingMethod]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_method = HashMap::with_capacity(methods.len());
        for method in methods {
            let lessons = all_lessons_from_method(method);
            for lesson in &lessons {
                // Keep the first occurrence to match the linear search.
                by_id
                    .entry(lesson.lesson_id.clone())
                    .or_insert_with(|| lesson.clone());
            }
            by_method.entry(method.id.clone()).or_insert(lessons);
        }
        Self { by_id, by_method }
    }

    pub fn get(&self, lesson_id: &str) -> Option<&EnrichedLesson> {
        self.by_id.get(lesson_id)
    }

    /// Lessons of a method in ascending sequence order.
    pub fn method_lessons(&self, method_id: &str) -> &[EnrichedLesson] {
        self.by_method
            .get(method_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
