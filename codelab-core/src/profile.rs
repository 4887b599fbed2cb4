use crate::content::ContentTable;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

/// A learner's progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    pub current_course_id: String,
    pub current_lesson_id: String,
}

impl UserProfile {
    /// A fresh profile positioned at the first lesson of the course.
    pub fn signup(name: &str, content: &ContentTable) -> Self {
        let first = content
            .first_lesson()
            .map(|l| l.id.clone())
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            plan: Plan::Free,
            xp: 0,
            badges: Vec::new(),
            streak_days: 0,
            completed_lessons: Vec::new(),
            current_course_id: content.course.id.clone(),
            current_lesson_id: first,
        }
    }

    pub fn has_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|l| l == lesson_id)
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }
}
