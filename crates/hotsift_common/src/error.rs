//! Error types for hotsift.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Finding message must not be empty")]
    EmptyMessage,

    #[error("Bug tracker id must not be empty")]
    EmptyTrackerId,

    #[error("Unknown issue category: {0}")]
    UnknownCategory(String),

    #[error("Unknown bug tracker: {0}")]
    UnknownTracker(String),

    #[error("Unknown search expression: {0}")]
    UnknownExpression(String),

    #[error("Log format '{format}' has no {family} expression")]
    UnsupportedExpression {
        format: &'static str,
        family: &'static str,
    },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TriageError {
    /// Whether this error comes from a value outside one of the closed sets.
    pub fn is_invalid_variant(&self) -> bool {
        matches!(
            self,
            TriageError::UnknownCategory(_)
                | TriageError::UnknownTracker(_)
                | TriageError::UnknownExpression(_)
                | TriageError::UnsupportedExpression { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TriageError>;
