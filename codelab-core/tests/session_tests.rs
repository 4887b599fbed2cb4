use codelab_core::coach::PRESET_HTML;
use codelab_core::{
    advance, ContentTable, LabResult, LessonDefinition, LessonSession, MemoryProfileStore,
    ProfileEvent, ProfileHandle, ProfileStore, ProgressLedger, ScriptedCoach, UserProfile,
};
use codelab_markup::TestCase;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const WELCOME: &str = "export default function Home() {\n  return (\n    <div>\n      <header></header>\n      <main></main>\n      <footer></footer>\n      <h1>Welcome</h1>\n    </div>\n  );\n}";

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("fixtures");
    path.push(filename);
    path
}

fn welcome_lesson() -> LessonDefinition {
    let mut lesson = ContentTable::builtin()
        .unwrap()
        .lesson("homepage01")
        .unwrap()
        .clone();
    lesson.task.tests = vec![TestCase::dom_exists("header"), TestCase::dom_text("h1", "Welcome")];
    lesson
}

fn setup() -> (ContentTable, Arc<ProgressLedger<MemoryProfileStore>>, UserProfile) {
    let content = ContentTable::builtin().unwrap();
    let ledger = Arc::new(ProgressLedger::new(MemoryProfileStore::new()));
    let profile = ledger.register(UserProfile::signup("Mika", &content)).unwrap();
    (content, ledger, profile)
}

#[test]
fn test_welcome_source_completes_once() {
    let lesson = welcome_lesson();
    let content = ContentTable::builtin().unwrap();
    let profile = UserProfile::signup("Mika", &content);
    let mut calls = Vec::new();

    {
        let start = profile.clone();
        let sink = |l: &LessonDefinition| -> LabResult<UserProfile> {
            calls.push(l.id.clone());
            Ok(advance(&start, l))
        };
        let (mut session, _) = LessonSession::open(&lesson, &profile, sink).unwrap();
        let update = session.set_source(WELCOME).unwrap();
        assert!(update.results.iter().all(|r| r.passed));
        assert_eq!(update.completed.unwrap().xp, 50);

        session.set_source(WELCOME).unwrap();
        session.set_source(format!("// edited\n{}", WELCOME)).unwrap();
    }

    assert_eq!(calls, vec!["homepage01".to_string()]);
}

#[test]
fn test_hello_source_never_completes() {
    let lesson = welcome_lesson();
    let content = ContentTable::builtin().unwrap();
    let profile = UserProfile::signup("Mika", &content);
    let sink = |_: &LessonDefinition| -> LabResult<UserProfile> { panic!("must not complete") };

    let (mut session, _) = LessonSession::open(&lesson, &profile, sink).unwrap();
    let update = session
        .set_source("export default function Home() {\n  return (\n    <div><h1>Hello</h1></div>\n  );\n}")
        .unwrap();

    assert_eq!(update.results[0].message, "header not found");
    assert!(!update.results[0].passed);
    assert_eq!(update.results[1].message, "h1 text must be \"Welcome\"");
    assert!(!update.results[1].passed);
    assert!(update.completed.is_none());
}

#[test]
fn test_ledger_session_awards_xp_and_badge() {
    let (content, ledger, mut profile) = setup();
    profile.xp = 460;
    ledger.store().save(&profile.id, &profile).unwrap();

    let lesson = content.require_lesson("homepage01").unwrap();
    let handle = ProfileHandle::new(Arc::clone(&ledger), profile.id.clone());
    let (mut session, _) = LessonSession::open(lesson, &profile, handle).unwrap();

    let solution = fs::read_to_string(get_fixture_path("homepage-solution.jsx")).unwrap();
    let completed = session.set_source(solution).unwrap().completed.unwrap();

    assert_eq!(completed.xp, 510);
    assert_eq!(completed.badges, vec!["Streak Challenger".to_string()]);
    assert_eq!(completed.current_lesson_id, "state01");
    assert_eq!(ledger.profile(&profile.id).unwrap(), completed);
}

#[test]
fn test_two_sessions_complete_once() {
    let (content, ledger, profile) = setup();
    let lesson = content.require_lesson("homepage01").unwrap();
    let solution = fs::read_to_string(get_fixture_path("homepage-solution.jsx")).unwrap();

    for _ in 0..2 {
        let handle = ProfileHandle::new(Arc::clone(&ledger), profile.id.clone());
        let (mut session, _) = LessonSession::open(lesson, &profile, handle).unwrap();
        session.set_source(solution.clone()).unwrap();
    }

    let stored = ledger.profile(&profile.id).unwrap();
    assert_eq!(stored.xp, 50);
    assert_eq!(stored.completed_lessons, vec!["homepage01".to_string()]);
}

#[test]
fn test_reopened_lesson_stays_quiet() {
    let (content, ledger, profile) = setup();
    let lesson = content.require_lesson("homepage01").unwrap();
    let done = ledger.complete_lesson(&profile.id, lesson).unwrap();

    let handle = ProfileHandle::new(Arc::clone(&ledger), profile.id.clone());
    let (mut session, _) = LessonSession::open(lesson, &done, handle).unwrap();
    let update = session.set_source(WELCOME).unwrap();
    assert!(update.all_passed());
    assert!(update.completed.is_none());
}

#[test]
fn test_zero_test_lesson_never_completes() {
    let (content, ledger, profile) = setup();
    let lesson = content.require_lesson("setup01").unwrap();
    let handle = ProfileHandle::new(Arc::clone(&ledger), profile.id.clone());
    let (mut session, opened) = LessonSession::open(lesson, &profile, handle).unwrap();
    assert!(opened.results.is_empty());

    let update = session.set_source(WELCOME).unwrap();
    assert!(update.results.is_empty());
    assert!(update.completed.is_none());
    assert_eq!(ledger.profile(&profile.id).unwrap().xp, 0);
}

#[tokio::test]
async fn test_coach_answer_completes_lesson() {
    let (content, ledger, profile) = setup();
    let lesson = content.require_lesson("ai01").unwrap();
    let mut events = ledger.subscribe(&profile.id);

    let mut coach = ScriptedCoach::with_delay(lesson, Duration::ZERO);
    let snippet = coach.ask().await.unwrap();
    assert_eq!(snippet, PRESET_HTML);

    let handle = ProfileHandle::new(Arc::clone(&ledger), profile.id.clone());
    let (mut session, _) = LessonSession::open(lesson, &profile, handle).unwrap();
    let update = session.apply_coach_snippet(snippet).unwrap();
    assert!(update.completed.is_some());

    match events.recv().await.unwrap() {
        ProfileEvent::LessonCompleted { delta, .. } => {
            assert_eq!(delta.xp_gained, 50);
            assert_eq!(delta.completed_lesson.as_deref(), Some("ai01"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_dashboard_progress() {
    let (content, ledger, profile) = setup();
    for id in ["setup01", "setup02", "setup03"] {
        ledger
            .complete_lesson(&profile.id, content.require_lesson(id).unwrap())
            .unwrap();
    }
    let stored = ledger.profile(&profile.id).unwrap();
    assert_eq!(content.progress_percent(&stored), 19);
    assert_eq!(content.next_incomplete_lesson(&stored).unwrap().id, "homepage01");
    assert_eq!(stored.current_lesson_id, "homepage01");
}
