use super::{ChapterDefinition, CourseDefinition, LessonDefinition};
use crate::error::{LabError, LabResult};
use crate::profile::UserProfile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

const BUILTIN_CONTENT: &str = include_str!("builtin.yaml");

static LESSON_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn lesson_id_regex() -> &'static Regex {
    LESSON_ID_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap())
}

/// A course and every lesson it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTable {
    pub course: CourseDefinition,
    pub lessons: Vec<LessonDefinition>,
}

impl ContentTable {
    /// Parses and validates a content table from YAML.
    pub fn from_yaml_str(yaml: &str) -> LabResult<Self> {
        let table: ContentTable = serde_yaml::from_str(yaml)?;
        table.validate()?;
        debug!(
            course = %table.course.id,
            lessons = table.lessons.len(),
            "content table loaded"
        );
        Ok(table)
    }

    pub fn load(path: &Path) -> LabResult<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| LabError::io(path.display().to_string(), e))?;
        Self::from_yaml_str(&yaml)
    }

    /// The course shipped with the crate.
    pub fn builtin() -> LabResult<Self> {
        Self::from_yaml_str(BUILTIN_CONTENT)
    }

    pub fn lesson(&self, id: &str) -> Option<&LessonDefinition> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Like [`ContentTable::lesson`], but a missing lesson is an error.
    pub fn require_lesson(&self, id: &str) -> LabResult<&LessonDefinition> {
        self.lesson(id)
            .ok_or_else(|| LabError::UnknownLesson { id: id.to_string() })
    }

    /// Checks that every reference in the table resolves.
    pub fn validate(&self) -> LabResult<()> {
        let mut errors = Vec::new();
        let mut lesson_ids = HashSet::new();

        for lesson in &self.lessons {
            if !lesson_id_regex().is_match(&lesson.id) {
                errors.push(format!("lesson id '{}' is not a valid identifier", lesson.id));
            }
            if !lesson_ids.insert(lesson.id.as_str()) {
                errors.push(format!("lesson '{}' is defined twice", lesson.id));
            }
        }

        let chapter_ids: HashSet<&str> = self.course.chapters.iter().map(|c| c.id.as_str()).collect();
        let mut listed = HashSet::new();

        for chapter in &self.course.chapters {
            for id in &chapter.order {
                if !lesson_ids.contains(id.as_str()) {
                    errors.push(format!(
                        "chapter '{}' lists unknown lesson '{}'",
                        chapter.id, id
                    ));
                }
                if !listed.insert(id.as_str()) {
                    errors.push(format!("lesson '{}' is listed more than once", id));
                }
            }
        }

        for lesson in &self.lessons {
            if !chapter_ids.contains(lesson.chapter_id.as_str()) {
                errors.push(format!(
                    "lesson '{}' belongs to unknown chapter '{}'",
                    lesson.id, lesson.chapter_id
                ));
            }
            if let Some(next) = &lesson.summary.next_lesson_id {
                if !lesson_ids.contains(next.as_str()) {
                    errors.push(format!(
                        "lesson '{}' points to unknown next lesson '{}'",
                        lesson.id, next
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            for e in &errors {
                warn!("{}", e);
            }
            Err(LabError::InvalidContent(errors.join("; ")))
        }
    }

    /// Lesson ids in course order, chapter by chapter.
    pub fn ordered_lesson_ids(&self) -> Vec<&str> {
        self.course
            .chapters
            .iter()
            .flat_map(|c| c.order.iter().map(String::as_str))
            .collect()
    }

    /// The lesson after `id` in course order.
    pub fn next_in_order(&self, id: &str) -> Option<&LessonDefinition> {
        let order = self.ordered_lesson_ids();
        let pos = order.iter().position(|l| *l == id)?;
        order.get(pos + 1).and_then(|next| self.lesson(next))
    }

    pub fn chapter_of(&self, lesson_id: &str) -> Option<&ChapterDefinition> {
        let lesson = self.lesson(lesson_id)?;
        self.course.chapters.iter().find(|c| c.id == lesson.chapter_id)
    }

    pub fn first_lesson(&self) -> Option<&LessonDefinition> {
        self.ordered_lesson_ids()
            .first()
            .and_then(|id| self.lesson(id))
    }

    /// Percentage of the course's lessons the profile has completed, rounded.
    pub fn progress_percent(&self, profile: &UserProfile) -> u32 {
        if self.lessons.is_empty() {
            return 0;
        }
        let done = self
            .lessons
            .iter()
            .filter(|l| profile.has_completed(&l.id))
            .count();
        ((done as f64 / self.lessons.len() as f64) * 100.0).round() as u32
    }

    /// First lesson in course order the profile has not completed.
    pub fn next_incomplete_lesson(&self, profile: &UserProfile) -> Option<&LessonDefinition> {
        self.ordered_lesson_ids()
            .into_iter()
            .find(|id| !profile.has_completed(id))
            .and_then(|id| self.lesson(id))
    }

    /// `Course / Chapter / Lesson` titles for a lesson.
    pub fn breadcrumb(&self, lesson_id: &str) -> Option<String> {
        let lesson = self.lesson(lesson_id)?;
        let chapter = self.chapter_of(lesson_id)?;
        Some(format!(
            "{} / {} / {}",
            self.course.title, chapter.title, lesson.title
        ))
    }
}
