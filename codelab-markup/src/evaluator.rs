use tracing::{debug, warn};

use crate::dom::HtmlDocument;
use crate::selector::Selector;
use crate::testcase::{TestCase, TestResult};

pub const MESSAGE_OK: &str = "OK";
pub const MESSAGE_UNSUPPORTED: &str = "unsupported test type";

/// Evaluates `cases` against `markup`.
///
/// The result list has the same length and order as `cases`. Missing
/// elements, bad selectors and unsupported case kinds all become failing
/// results. The markup is parsed once per call; an empty case list skips
/// parsing.
pub fn evaluate(markup: &str, cases: &[TestCase]) -> Vec<TestResult> {
    if cases.is_empty() {
        return Vec::new();
    }
    let document = HtmlDocument::parse(markup);
    let results: Vec<TestResult> = cases
        .iter()
        .map(|case| evaluate_case(&document, case))
        .collect();
    debug!(
        cases = cases.len(),
        passed = results.iter().filter(|r| r.passed).count(),
        "evaluated markup"
    );
    results
}

/// Evaluates one case against an already parsed document.
pub fn evaluate_case(document: &HtmlDocument, case: &TestCase) -> TestResult {
    match case {
        TestCase::Dom {
            selector,
            exists,
            text,
        } => evaluate_dom(document, case, selector, *exists, text.as_deref()),
        _ => TestResult {
            case: case.clone(),
            passed: false,
            message: MESSAGE_UNSUPPORTED.to_string(),
        },
    }
}

fn evaluate_dom(
    document: &HtmlDocument,
    case: &TestCase,
    selector: &str,
    exists: bool,
    text: Option<&str>,
) -> TestResult {
    let result = |passed: bool, message: String| TestResult {
        case: case.clone(),
        passed,
        message,
    };

    let parsed = match Selector::parse(selector) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(selector, error = %e, "test case has an invalid selector");
            return result(false, e.to_string());
        }
    };

    let Some(element) = document.query_selector(&parsed) else {
        return result(!exists, format!("{} not found", selector));
    };

    if !exists {
        return result(false, format!("{} must not exist", selector));
    }

    // An empty expected text is treated as "no text check".
    if let Some(expected) = text.filter(|t| !t.is_empty()) {
        if element.text_content().trim() != expected {
            return result(false, format!("{} text must be \"{}\"", selector, expected));
        }
    }

    result(true, MESSAGE_OK.to_string())
}
