use thiserror::Error;

pub type LabResult<T> = Result<T, LabError>;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Unknown lesson '{id}'")]
    UnknownLesson { id: String },

    #[error("Unknown profile '{user_id}'")]
    UnknownProfile { user_id: String },

    #[error("Profile '{user_id}' already exists")]
    DuplicateProfile { user_id: String },

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Markup(#[from] codelab_markup::MarkupError),
}

impl LabError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        LabError::Io {
            path: path.into(),
            source,
        }
    }
}
