//! # codelab markup
//!
//! Turns a learner's component source into something a lesson can show and
//! grade.
//!
//! ## Features
//! - Textual extraction of the first `return ( ... );` render block
//! - Standalone preview documents for a sandboxed frame
//! - A small CSS selector engine over an html5ever DOM
//! - Declarative `dom` test cases with pass/fail messages
//!
//! ## Example
//! ```ignore
//! use codelab_markup::{build_preview_document, evaluate, extract_markup, TestCase};
//!
//! let source = r#"
//! export default function Home() {
//!   return (
//!     <div><header></header><h1>Welcome</h1></div>
//!   );
//! }
//! "#;
//!
//! let markup = extract_markup(source);
//! let preview = build_preview_document(&markup);
//! let results = evaluate(&markup, &[TestCase::dom_text("h1", "Welcome")]);
//! assert!(results[0].passed);
//! ```

pub mod dom;
pub mod error;
pub mod evaluator;
pub mod extract;
pub mod preview;
pub mod selector;
pub mod testcase;

use std::fs;
use std::path::Path;

pub use dom::HtmlDocument;
pub use error::{MarkupError, MarkupResult};
pub use evaluator::{evaluate, evaluate_case};
pub use extract::{apply_snippet, extract_markup};
pub use preview::build_preview_document;
pub use selector::Selector;
pub use testcase::{TestCase, TestResult, TestSummary};

/// Extracts markup from `source` and grades it in one step.
pub fn grade_source(source: &str, cases: &[TestCase]) -> Vec<TestResult> {
    evaluate(&extract_markup(source), cases)
}

/// Parses a YAML list of test cases.
pub fn parse_test_cases(yaml: &str) -> MarkupResult<Vec<TestCase>> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Reads and parses a YAML test case file.
pub fn load_test_cases(path: &Path) -> MarkupResult<Vec<TestCase>> {
    let content = fs::read_to_string(path).map_err(|e| MarkupError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_test_cases(&content)
}
