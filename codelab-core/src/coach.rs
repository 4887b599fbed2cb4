use crate::content::LessonDefinition;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const PRESET_QUESTION: &str = "Tell me about AI coding.";

pub const PRESET_RESPONSE: &str = "AI coding means using AI chat and generative APIs to sort out requirements and draft code faster, while a person reviews and finishes the work. The key points are to state the goal precisely, to check what was generated, and to sum up what you learned in your own words.";

pub const PRESET_HTML: &str = r#"<section className="space-y-4">
  <h1 className="text-2xl font-semibold">What is AI coding?</h1>
  <p>AI coding means using AI chat and generative APIs to sort out requirements and draft code faster, while a person reviews and finishes the work.</p>
  <ul className="list-disc space-y-2 pl-5">
    <li>Set a clear goal and give the AI careful instructions</li>
    <li>Read the generated code and make the fixes it needs yourself</li>
    <li>Write up the result and share it with the next step</li>
  </ul>
</section>"#;

const FALLBACK_SUMMARY: &str = "Let's review the key points of the lesson";

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: &'static str,
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachState {
    Idle,
    Asked,
    Answered,
}

/// Answers one preset question per lesson with a fixed reply and an HTML
/// snippet the learner can drop into their source.
pub struct ScriptedCoach {
    state: CoachState,
    messages: Vec<ChatMessage>,
    summary: String,
    delay: Duration,
}

impl ScriptedCoach {
    pub fn new(lesson: &LessonDefinition) -> Self {
        Self::with_delay(lesson, DEFAULT_REPLY_DELAY)
    }

    pub fn with_delay(lesson: &LessonDefinition, delay: Duration) -> Self {
        let intro = ChatMessage {
            id: "assistant-intro",
            role: Role::Assistant,
            content: format!(
                "Hi! The goal of this lesson is \"{}\". Ask the AI about anything you are unsure of.",
                lesson.task.goal
            ),
        };
        Self {
            state: CoachState::Idle,
            messages: vec![intro],
            summary: lesson_summary(lesson),
            delay,
        }
    }

    pub fn state(&self) -> CoachState {
        self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Asks the preset question. Returns the answer snippet the first time
    /// and `None` afterwards.
    pub async fn ask(&mut self) -> Option<&'static str> {
        if self.state != CoachState::Idle {
            return None;
        }
        self.state = CoachState::Asked;
        self.messages.push(ChatMessage {
            id: "user-question",
            role: Role::User,
            content: PRESET_QUESTION.to_string(),
        });

        tokio::time::sleep(self.delay).await;

        self.messages.push(ChatMessage {
            id: "assistant-answer",
            role: Role::Assistant,
            content: format!("{}\n\n{}", PRESET_RESPONSE, self.summary)
                .trim()
                .to_string(),
        });
        self.state = CoachState::Answered;
        debug!(messages = self.messages.len(), "coach answered");
        Some(PRESET_HTML)
    }
}

/// First sentence of the lesson's opening slide, whatever its kind, as long
/// as it carries content.
fn lesson_summary(lesson: &LessonDefinition) -> String {
    match lesson.slides.first().and_then(|s| s.content()) {
        Some(content) => content.split('.').next().unwrap_or_default().trim().to_string(),
        None => FALLBACK_SUMMARY.to_string(),
    }
}
