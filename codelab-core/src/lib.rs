//! # codelab core
//!
//! Lesson content, learner progress and the lesson session that ties the
//! markup grader to a learner's profile.
//!
//! ```ignore
//! use codelab_core::{ContentTable, LessonSession, MemoryProfileStore, ProfileHandle, ProgressLedger, UserProfile};
//! use std::sync::Arc;
//!
//! let content = ContentTable::builtin()?;
//! let ledger = Arc::new(ProgressLedger::new(MemoryProfileStore::new()));
//! let profile = ledger.register(UserProfile::signup("Mika", &content))?;
//!
//! let lesson = content.require_lesson("homepage01")?;
//! let handle = ProfileHandle::new(Arc::clone(&ledger), profile.id.clone());
//! let (mut session, _) = LessonSession::open(lesson, &profile, handle)?;
//! let update = session.set_source(source)?;
//! ```

pub mod coach;
pub mod config;
pub mod content;
pub mod error;
pub mod profile;
pub mod progress;
pub mod session;
pub mod store;

pub use coach::{CoachState, ScriptedCoach};
pub use config::LabConfig;
pub use content::{ContentTable, LessonDefinition};
pub use error::{LabError, LabResult};
pub use profile::{Plan, UserProfile};
pub use progress::{advance, ProgressDelta, ProgressRules};
pub use session::{CompletionSink, LessonSession, ProfileHandle, SessionUpdate};
pub use store::{MemoryProfileStore, ProfileEvent, ProfileStore, ProgressLedger};
