//! Error types for Nainny operations

use serde::{Deserialize, Serialize};

/// Result type for Nainny operations
pub type Result<T> = std::result::Result<T, NainnyError>;

/// Error types for the story analysis pipeline
#[derive(Debug, thiserror::Error)]
pub enum NainnyError {
    /// A language, embedding or generative model is not loaded
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Story text is below the configured minimum length
    #[error("Story too short: minimum {min} characters required, got {actual}")]
    StoryTooShort { min: usize, actual: usize },

    /// Parsing or saving an analysis failed
    #[error("Failed to process story{}: {message}", describe_story(.title, .story_id))]
    ParsingFailure {
        title: Option<String>,
        story_id: Option<u64>,
        message: String,
    },

    /// External relation lookup failed
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Referenced story or record does not exist
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Cultural knowledge base could not be read
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Text generation failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

fn describe_story(title: &Option<String>, story_id: &Option<u64>) -> String {
    match (title, story_id) {
        (Some(title), Some(id)) => format!(" '{}' (id {})", title, id),
        (Some(title), None) => format!(" '{}'", title),
        (None, Some(id)) => format!(" (id {})", id),
        (None, None) => String::new(),
    }
}

/// Stable error classification for interface layers.
///
/// Callers map these to status codes instead of matching on internal variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ModelUnavailable,
    StoryTooShort,
    ParsingFailure,
    EnrichmentFailure,
    MappingNotFound,
    RecordNotFound,
    InvalidConfiguration,
    Internal,
}

impl NainnyError {
    /// Wrap an error with the title of the story being parsed.
    pub fn parsing(title: impl Into<String>, message: impl Into<String>) -> Self {
        NainnyError::ParsingFailure {
            title: Some(title.into()),
            story_id: None,
            message: message.into(),
        }
    }

    /// Wrap an error with the id of the story being saved.
    pub fn saving(story_id: u64, message: impl Into<String>) -> Self {
        NainnyError::ParsingFailure {
            title: None,
            story_id: Some(story_id),
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NainnyError::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            NainnyError::StoryTooShort { .. } => ErrorKind::StoryTooShort,
            NainnyError::ParsingFailure { .. } => ErrorKind::ParsingFailure,
            NainnyError::Enrichment(_) | NainnyError::Http(_) => ErrorKind::EnrichmentFailure,
            NainnyError::RecordNotFound(_) => ErrorKind::RecordNotFound,
            NainnyError::Configuration(_) | NainnyError::KnowledgeBase(_) => {
                ErrorKind::InvalidConfiguration
            }
            NainnyError::Generation(_)
            | NainnyError::Serialization(_)
            | NainnyError::Yaml(_)
            | NainnyError::Io(_)
            | NainnyError::Other(_) => ErrorKind::Internal,
        }
    }
}

impl From<String> for NainnyError {
    fn from(s: String) -> Self {
        NainnyError::Other(s)
    }
}

impl From<&str> for NainnyError {
    fn from(s: &str) -> Self {
        NainnyError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for NainnyError {
    fn from(err: anyhow::Error) -> Self {
        NainnyError::Other(err.to_string())
    }
}
