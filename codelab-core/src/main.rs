use clap::{Parser, Subcommand};
use codelab_core::config::CONFIG_ENV;
use codelab_core::{
    advance, ContentTable, LabConfig, LabError, LabResult, LessonDefinition, LessonSession,
    MemoryProfileStore, ProfileHandle, ProgressDelta, ProgressLedger, ScriptedCoach, UserProfile,
};
use codelab_markup::{TestResult, TestSummary};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codelab", version, about = "Interactive coding lessons in the terminal")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the course chapters and lessons
    Outline,

    /// Render a lesson source as a standalone preview document
    Preview {
        lesson: String,

        /// Source file to preview instead of the lesson's starter
        #[arg(long)]
        source: Option<PathBuf>,

        /// Write the document here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Grade a source file against a lesson's tests
    Grade {
        lesson: String,
        source: PathBuf,

        /// Learner name for the throwaway profile
        #[arg(long, default_value = "learner")]
        name: String,
    },

    /// Ask the lesson coach and apply its answer to the starter source
    Coach { lesson: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {}", e);
            2
        }
    };
    process::exit(code);
}

async fn run(cli: Cli) -> LabResult<i32> {
    let config = LabConfig::load(cli.config.as_deref())?;
    let content = config.content()?;
    info!(course = %content.course.id, lessons = content.lessons.len(), "course loaded");

    match cli.command {
        Command::Outline => {
            print_outline(&content);
            Ok(0)
        }
        Command::Preview {
            lesson,
            source,
            output,
        } => preview(&content, &lesson, source.as_deref(), output.as_deref()),
        Command::Grade {
            lesson,
            source,
            name,
        } => grade(&config, &content, &lesson, &source, &name),
        Command::Coach { lesson } => coach(&config, &content, &lesson).await,
    }
}

fn print_outline(content: &ContentTable) {
    println!("{} ({} min)", content.course.title, content.course.duration_minutes);
    for (i, chapter) in content.course.chapters.iter().enumerate() {
        println!("  {}. {}", i + 1, chapter.title);
        for id in &chapter.order {
            if let Some(lesson) = content.lesson(id) {
                let tests = lesson.task.tests.len();
                println!(
                    "     - {} {} ({} min, {} tests)",
                    lesson.id, lesson.title, lesson.duration_minutes, tests
                );
            }
        }
    }
}

fn preview(
    content: &ContentTable,
    lesson_id: &str,
    source: Option<&Path>,
    output: Option<&Path>,
) -> LabResult<i32> {
    let lesson = content.require_lesson(lesson_id)?;
    let profile = UserProfile::signup("preview", content);
    let (mut session, _) = LessonSession::open(lesson, &profile, detached_sink(&profile))?;
    if let Some(path) = source {
        session.set_source(read_source(path)?)?;
    }

    let document = session.preview_document();
    match output {
        Some(path) => {
            fs::write(path, document).map_err(|e| LabError::io(path.display().to_string(), e))?;
            println!("✓ preview written to {}", path.display());
        }
        None => println!("{}", document),
    }
    Ok(0)
}

fn grade(
    config: &LabConfig,
    content: &ContentTable,
    lesson_id: &str,
    source: &Path,
    name: &str,
) -> LabResult<i32> {
    let lesson = content.require_lesson(lesson_id)?;
    let ledger = Arc::new(ProgressLedger::with_rules(
        MemoryProfileStore::new(),
        config.progress.clone(),
    ));
    let profile = ledger.register(UserProfile::signup(name, content))?;
    let handle = ProfileHandle::new(Arc::clone(&ledger), profile.id.clone());

    let (mut session, _) = LessonSession::open(lesson, &profile, handle)?;
    let update = session.set_source(read_source(source)?)?;

    println!("{}", content.breadcrumb(lesson_id).unwrap_or_else(|| lesson.title.clone()));
    for result in &update.results {
        print_result(result);
    }
    let summary = TestSummary::of(&update.results);
    if update.results.is_empty() {
        println!("This lesson has no automatic checks.");
        return Ok(0);
    }
    println!("{}", summary);

    if let Some(after) = &update.completed {
        let delta = ProgressDelta::between(&profile, after);
        println!("✓ lesson complete: +{} XP ({} total)", delta.xp_gained, after.xp);
        for badge in &delta.new_badges {
            println!("  badge earned: {}", badge);
        }
        if let Some(next) = content.next_incomplete_lesson(after) {
            println!("  next up: {} {}", next.id, next.title);
        }
    }

    Ok(if summary.all_passed() { 0 } else { 1 })
}

async fn coach(config: &LabConfig, content: &ContentTable, lesson_id: &str) -> LabResult<i32> {
    let lesson = content.require_lesson(lesson_id)?;
    let mut coach = ScriptedCoach::with_delay(lesson, config.coach_delay());

    let snippet = coach.ask().await;
    for message in coach.messages() {
        println!("[{:?}] {}", message.role, message.content);
    }

    let Some(snippet) = snippet else {
        return Ok(0);
    };
    let profile = UserProfile::signup("coach", content);
    let (mut session, _) = LessonSession::open(lesson, &profile, detached_sink(&profile))?;
    let update = session.apply_coach_snippet(snippet)?;
    println!();
    println!("{}", session.source());
    for result in &update.results {
        print_result(result);
    }
    Ok(0)
}

/// Completes lessons against a profile that is never stored.
fn detached_sink(
    profile: &UserProfile,
) -> impl FnMut(&LessonDefinition) -> LabResult<UserProfile> + '_ {
    move |lesson: &LessonDefinition| Ok(advance(profile, lesson))
}

fn read_source(path: &Path) -> LabResult<String> {
    fs::read_to_string(path).map_err(|e| LabError::io(path.display().to_string(), e))
}

fn print_result(result: &TestResult) {
    let mark = if result.passed { "✓" } else { "✗" };
    println!("  {} {}: {}", mark, result.case.label(), result.message);
}
