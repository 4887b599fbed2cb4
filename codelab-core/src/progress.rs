use crate::content::LessonDefinition;
use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};

pub const DEFAULT_XP_REWARD: u32 = 50;
pub const DEFAULT_BADGE_THRESHOLD: u32 = 500;
pub const DEFAULT_THRESHOLD_BADGE: &str = "Streak Challenger";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRules {
    pub xp_reward: u32,
    pub badge_threshold: u32,
    pub threshold_badge: String,
}

impl Default for ProgressRules {
    fn default() -> Self {
        Self {
            xp_reward: DEFAULT_XP_REWARD,
            badge_threshold: DEFAULT_BADGE_THRESHOLD,
            threshold_badge: DEFAULT_THRESHOLD_BADGE.to_string(),
        }
    }
}

impl ProgressRules {
    /// Returns the profile after completing `lesson`. Completing a lesson a
    /// second time returns the profile unchanged.
    pub fn advance(&self, profile: &UserProfile, lesson: &LessonDefinition) -> UserProfile {
        if profile.has_completed(&lesson.id) {
            return profile.clone();
        }

        let mut next = profile.clone();
        next.xp = profile.xp.saturating_add(self.xp_reward);
        if next.xp >= self.badge_threshold && !next.has_badge(&self.threshold_badge) {
            next.badges.push(self.threshold_badge.clone());
        }
        next.completed_lessons.push(lesson.id.clone());
        if let Some(id) = &lesson.summary.next_lesson_id {
            next.current_lesson_id = id.clone();
        }
        next
    }

    /// XP still needed for the threshold badge, `None` once it is held.
    pub fn xp_to_next_badge(&self, profile: &UserProfile) -> Option<u32> {
        if profile.has_badge(&self.threshold_badge) {
            None
        } else {
            Some(self.badge_threshold.saturating_sub(profile.xp))
        }
    }
}

/// [`ProgressRules::advance`] with the default rules.
pub fn advance(profile: &UserProfile, lesson: &LessonDefinition) -> UserProfile {
    ProgressRules::default().advance(profile, lesson)
}

/// What changed between two snapshots of the same profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressDelta {
    pub xp_gained: u32,
    pub new_badges: Vec<String>,
    pub completed_lesson: Option<String>,
}

impl ProgressDelta {
    pub fn between(before: &UserProfile, after: &UserProfile) -> Self {
        Self {
            xp_gained: after.xp.saturating_sub(before.xp),
            new_badges: after
                .badges
                .iter()
                .filter(|b| !before.has_badge(b))
                .cloned()
                .collect(),
            completed_lesson: after
                .completed_lessons
                .iter()
                .find(|l| !before.has_completed(l))
                .cloned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.xp_gained == 0 && self.new_badges.is_empty() && self.completed_lesson.is_none()
    }
}
