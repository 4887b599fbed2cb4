use thiserror::Error;

pub type MarkupResult<T> = Result<T, MarkupError>;

/// Errors raised while preparing a grading run.
///
/// Grading itself never fails: a bad selector or missing element becomes a
/// failing [`TestResult`](crate::TestResult). These variants cover the
/// places where the caller supplied something that cannot be used at all.
#[derive(Error, Debug, Clone)]
pub enum MarkupError {
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid selector '{selector}': unsupported syntax '{syntax}'")]
    UnsupportedSelector { selector: String, syntax: String },

    #[error("invalid selector: empty")]
    EmptySelector,

    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("YAML error: {0}")]
    YamlError(String),
}

impl From<serde_yaml::Error> for MarkupError {
    fn from(err: serde_yaml::Error) -> Self {
        MarkupError::YamlError(err.to_string())
    }
}
