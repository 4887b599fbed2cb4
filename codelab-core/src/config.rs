use crate::content::ContentTable;
use crate::error::{LabError, LabResult};
use crate::progress::ProgressRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_ENV: &str = "CODELAB_CONFIG";
pub const CONTENT_ENV: &str = "CODELAB_CONTENT";
pub const COACH_DELAY_ENV: &str = "CODELAB_COACH_DELAY_MS";

const MAX_COACH_DELAY_MS: u64 = 60_000;

/// Runtime configuration: an optional YAML file, then environment overrides.
///
/// ```yaml
/// content_path: courses/nextjs.yaml
/// coach_delay_ms: 600
/// progress:
///   xp_reward: 50
///   badge_threshold: 500
///   threshold_badge: Streak Challenger
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Course YAML to load instead of the built-in course.
    pub content_path: Option<PathBuf>,
    pub coach_delay_ms: u64,
    pub progress: ProgressRules,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            content_path: None,
            coach_delay_ms: 600,
            progress: ProgressRules::default(),
        }
    }
}

impl LabConfig {
    /// Reads the config file (if any), applies environment overrides and
    /// validates the result.
    pub fn load(path: Option<&Path>) -> LabResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> LabResult<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| LabError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), "config file loaded");
        Ok(serde_yaml::from_str(&yaml)?)
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> LabResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CONTENT_ENV).filter(|p| !p.is_empty()) {
            self.content_path = Some(PathBuf::from(path));
        }
        if let Some(delay) = lookup(COACH_DELAY_ENV) {
            self.coach_delay_ms = delay.trim().parse().map_err(|_| {
                LabError::InvalidConfig(format!("{} must be a number, got '{}'", COACH_DELAY_ENV, delay))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> LabResult<()> {
        let mut errors = Vec::new();

        if self.progress.xp_reward == 0 {
            errors.push("progress.xp_reward must be greater than 0".to_string());
        }
        if self.progress.threshold_badge.trim().is_empty() {
            errors.push("progress.threshold_badge cannot be empty".to_string());
        }
        if self.coach_delay_ms > MAX_COACH_DELAY_MS {
            errors.push(format!("coach_delay_ms must be at most {}", MAX_COACH_DELAY_MS));
        }
        if let Some(path) = &self.content_path {
            if !path.exists() {
                errors.push(format!("content_path '{}' does not exist", path.display()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LabError::InvalidConfig(errors.join("; ")))
        }
    }

    pub fn coach_delay(&self) -> Duration {
        Duration::from_millis(self.coach_delay_ms)
    }

    /// The configured course, or the built-in one.
    pub fn content(&self) -> LabResult<ContentTable> {
        match &self.content_path {
            Some(path) => ContentTable::load(path),
            None => ContentTable::builtin(),
        }
    }
}
