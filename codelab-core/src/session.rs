use crate::content::LessonDefinition;
use crate::error::LabResult;
use crate::profile::UserProfile;
use crate::store::{ProfileStore, ProgressLedger};
use codelab_markup::{apply_snippet, build_preview_document, evaluate, extract_markup, TestResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source a session starts from when the lesson ships no starter file.
pub const DEFAULT_SOURCE: &str = "export default function Result() {\n  return (\n    <main className=\"p-6 space-y-4\">\n      <p data-placeholder=\"ai-response\">Paste the coach's answer here.</p>\n    </main>\n  );\n}";

/// Receives a lesson when a session sees all of its tests pass.
pub trait CompletionSink {
    fn complete(&mut self, lesson: &LessonDefinition) -> LabResult<UserProfile>;
}

impl<F> CompletionSink for F
where
    F: FnMut(&LessonDefinition) -> LabResult<UserProfile>,
{
    fn complete(&mut self, lesson: &LessonDefinition) -> LabResult<UserProfile> {
        self(lesson)
    }
}

/// Completes lessons for one user through a shared ledger.
pub struct ProfileHandle<S> {
    ledger: Arc<ProgressLedger<S>>,
    user_id: String,
}

impl<S: ProfileStore> ProfileHandle<S> {
    pub fn new(ledger: Arc<ProgressLedger<S>>, user_id: impl Into<String>) -> Self {
        Self {
            ledger,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn profile(&self) -> LabResult<UserProfile> {
        self.ledger.profile(&self.user_id)
    }
}

impl<S: ProfileStore> CompletionSink for ProfileHandle<S> {
    fn complete(&mut self, lesson: &LessonDefinition) -> LabResult<UserProfile> {
        self.ledger.complete_lesson(&self.user_id, lesson)
    }
}

/// State after one pass of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub markup: String,
    pub results: Vec<TestResult>,
    /// The updated profile, only on the pass that completed the lesson.
    pub completed: Option<UserProfile>,
}

impl SessionUpdate {
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.passed)
    }
}

/// Owns the learner's working source for one lesson. Every edit is
/// extracted, graded, then checked against the completion guard, which hands
/// the lesson to the [`CompletionSink`] at most once per session.
pub struct LessonSession<'a, C: CompletionSink> {
    lesson: &'a LessonDefinition,
    sink: C,
    source: String,
    markup: String,
    results: Vec<TestResult>,
    completion_sent: bool,
}

impl<'a, C: CompletionSink> LessonSession<'a, C> {
    /// Opens a session on `lesson` for `profile` and runs the pipeline on
    /// the starter source.
    ///
    /// If the profile already completed the lesson the sink is never called.
    pub fn open(
        lesson: &'a LessonDefinition,
        profile: &UserProfile,
        sink: C,
    ) -> LabResult<(Self, SessionUpdate)> {
        let source = lesson
            .first_starter_source()
            .unwrap_or(DEFAULT_SOURCE)
            .to_string();
        let mut session = Self {
            lesson,
            sink,
            source,
            markup: String::new(),
            results: Vec::new(),
            completion_sent: profile.has_completed(&lesson.id),
        };
        debug!(lesson = %lesson.id, done = session.completion_sent, "session opened");
        let update = session.run()?;
        Ok((session, update))
    }

    /// Replaces the working source and re-runs the pipeline.
    pub fn set_source(&mut self, source: impl Into<String>) -> LabResult<SessionUpdate> {
        self.source = source.into();
        self.run()
    }

    /// Drops a coach snippet into the source and re-runs the pipeline.
    pub fn apply_coach_snippet(&mut self, snippet: &str) -> LabResult<SessionUpdate> {
        self.source = apply_snippet(&self.source, snippet);
        self.run()
    }

    pub fn preview_document(&self) -> String {
        build_preview_document(&self.markup)
    }

    pub fn lesson(&self) -> &LessonDefinition {
        self.lesson
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn is_completed(&self) -> bool {
        self.completion_sent
    }

    pub fn into_sink(self) -> C {
        self.sink
    }

    fn run(&mut self) -> LabResult<SessionUpdate> {
        self.markup = extract_markup(&self.source);
        self.results = evaluate(&self.markup, &self.lesson.task.tests);

        let all_passed = !self.results.is_empty() && self.results.iter().all(|r| r.passed);
        let mut completed = None;

        if all_passed && !self.completion_sent {
            self.completion_sent = true;
            match self.sink.complete(self.lesson) {
                Ok(profile) => {
                    info!(lesson = %self.lesson.id, xp = profile.xp, "all tests passed");
                    completed = Some(profile);
                }
                Err(e) => {
                    warn!(lesson = %self.lesson.id, error = %e, "completion failed");
                    self.completion_sent = false;
                    return Err(e);
                }
            }
        }

        Ok(SessionUpdate {
            markup: self.markup.clone(),
            results: self.results.clone(),
            completed,
        })
    }
}
