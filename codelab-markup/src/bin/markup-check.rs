use clap::Parser;
use codelab_markup::{grade_source, load_test_cases, MarkupError, TestResult, TestSummary};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Grade component sources against a YAML list of lesson test cases.
///
/// Examples:
///   markup-check tests.yaml pages/index.jsx
///   markup-check tests.yaml solutions/*.jsx
#[derive(Parser, Debug)]
#[command(name = "markup-check", version)]
struct Args {
    /// YAML file holding the test case list
    tests: PathBuf,

    /// Component source files to grade
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Print the extracted markup before the results
    #[arg(long)]
    show_markup: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let cases = match load_test_cases(&args.tests) {
        Ok(cases) => cases,
        Err(e) => {
            eprintln!("✗ {} could not be loaded:", args.tests.display());
            print_error(&e);
            process::exit(2);
        }
    };

    let mut exit_code = 0;

    for path in &args.sources {
        match check_file(path, &cases, args.show_markup) {
            Ok(summary) if summary.all_passed() => {
                println!("✓ {} ({})", path.display(), summary);
            }
            Ok(summary) => {
                println!("✗ {} ({})", path.display(), summary);
                exit_code = 1;
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", path.display());
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn check_file(
    path: &Path,
    cases: &[codelab_markup::TestCase],
    show_markup: bool,
) -> Result<TestSummary, MarkupError> {
    let source = fs::read_to_string(path).map_err(|e| MarkupError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if show_markup {
        println!("{}", codelab_markup::extract_markup(&source));
    }

    let results = grade_source(&source, cases);
    for result in &results {
        print_result(result);
    }
    Ok(TestSummary::of(&results))
}

fn print_result(result: &TestResult) {
    let mark = if result.passed { "✓" } else { "✗" };
    println!("  {} {}: {}", mark, result.case.label(), result.message);
}

fn print_error(error: &MarkupError) {
    match error {
        MarkupError::Io { path, message } => {
            eprintln!("  Failed to read '{}':", path);
            eprintln!("    {}", message);
        }
        MarkupError::YamlError(msg) => {
            eprintln!("  YAML error:");
            eprintln!("    {}", msg);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
