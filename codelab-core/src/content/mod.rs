mod table;

pub use table::ContentTable;

use codelab_markup::TestCase;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One block of lesson slide content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideBlock {
    Text {
        content: String,
    },
    Image {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Note {
        content: String,
    },
    Code {
        language: String,
        content: String,
    },
}

impl SlideBlock {
    /// The block's `content` string; images have none.
    pub fn content(&self) -> Option<&str> {
        match self {
            SlideBlock::Text { content }
            | SlideBlock::Note { content }
            | SlideBlock::Code { content, .. } => Some(content),
            SlideBlock::Image { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonTask {
    pub goal: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    #[serde(default)]
    pub recap: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_lesson_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDefinition {
    pub id: String,
    pub chapter_id: String,
    pub title: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub slides: Vec<SlideBlock>,
    #[serde(default)]
    pub starter_files: StarterFiles,
    pub task: LessonTask,
    #[serde(default)]
    pub qa: Vec<String>,
    pub summary: LessonSummary,
}

impl LessonDefinition {
    /// Source of the first starter file, in authoring order.
    pub fn first_starter_source(&self) -> Option<&str> {
        self.starter_files.first().map(|f| f.source.as_str())
    }

    /// The question half of each `Q. ... A. ...` line.
    pub fn question_templates(&self) -> Vec<String> {
        self.qa
            .iter()
            .map(|line| match line.split_once("A.") {
                Some((question, _)) => question.trim().to_string(),
                None => line.trim().to_string(),
            })
            .filter(|q| !q.is_empty())
            .collect()
    }

    pub fn has_tests(&self) -> bool {
        !self.task.tests.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub chapters: Vec<ChapterDefinition>,
    #[serde(default)]
    pub outcomes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarterFile {
    pub name: String,
    pub source: String,
}

/// Starter files keyed by name. Keeps the order they were authored in, which
/// decides the file a session opens with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarterFiles(Vec<StarterFile>);

impl StarterFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing the source of an existing one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        let source = source.into();
        match self.0.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.source = source,
            None => self.0.push(StarterFile { name, source }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.source.as_str())
    }

    pub fn first(&self) -> Option<&StarterFile> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StarterFile> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for StarterFiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for file in &self.0 {
            map.serialize_entry(&file.name, &file.source)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StarterFiles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FilesVisitor;

        impl<'de> Visitor<'de> for FilesVisitor {
            type Value = StarterFiles;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of file name to source")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut files = StarterFiles::new();
                while let Some((name, source)) = access.next_entry::<String, String>()? {
                    if files.get(&name).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate starter file '{}'",
                            name
                        )));
                    }
                    files.0.push(StarterFile { name, source });
                }
                Ok(files)
            }
        }

        deserializer.deserialize_map(FilesVisitor)
    }
}
