use serde::{Deserialize, Serialize};

/// A declarative check a lesson runs against the learner's markup.
///
/// Only `Dom` has an evaluator. `Function` and `Unit` are accepted in lesson
/// content and always reported as unsupported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TestCase {
    Dom {
        selector: String,
        exists: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Function {
        #[serde(rename = "exportName")]
        export_name: String,
        #[serde(default)]
        expected: serde_json::Value,
    },
    Unit {
        file: String,
    },
}

impl TestCase {
    /// Shorthand for a `dom` case that only checks existence.
    pub fn dom_exists(selector: impl Into<String>) -> Self {
        TestCase::Dom {
            selector: selector.into(),
            exists: true,
            text: None,
        }
    }

    /// Shorthand for a `dom` case that checks the element's text.
    pub fn dom_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        TestCase::Dom {
            selector: selector.into(),
            exists: true,
            text: Some(text.into()),
        }
    }

    /// Shorthand for a `dom` case that requires the element to be absent.
    pub fn dom_absent(selector: impl Into<String>) -> Self {
        TestCase::Dom {
            selector: selector.into(),
            exists: false,
            text: None,
        }
    }

    /// Short line shown in result lists.
    pub fn label(&self) -> String {
        match self {
            TestCase::Dom { selector, .. } => format!("check {}", selector),
            _ => "unsupported test".to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TestCase::Dom { .. } => "dom",
            TestCase::Function { .. } => "function",
            TestCase::Unit { .. } => "unit",
        }
    }
}

/// Outcome of one [`TestCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub case: TestCase,
    pub passed: bool,
    pub message: String,
}

/// Pass count over a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub passed: usize,
    pub total: usize,
}

impl TestSummary {
    pub fn of(results: &[TestResult]) -> Self {
        Self {
            passed: results.iter().filter(|r| r.passed).count(),
            total: results.len(),
        }
    }

    /// True when there is at least one result and every result passed.
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }
}

impl std::fmt::Display for TestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} passed", self.passed, self.total)
    }
}
