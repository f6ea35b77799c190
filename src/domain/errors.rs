//! Domain errors for the logsift autoclassification system.

use thiserror::Error;

/// Domain-level errors that can occur while classifying failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Job not found: {0}")]
    JobNotFound(i64),

    #[error("Text log error not found: {0}")]
    TextLogErrorNotFound(i64),

    #[error("Classified failure not found: {0}")]
    ClassifiedFailureNotFound(i64),

    #[error(
        "Duplicate match for text log error {text_log_error_id} \
         with matcher {matcher_name} and classified failure {classified_failure_id}"
    )]
    DuplicateMatch {
        text_log_error_id: i64,
        matcher_name: String,
        classified_failure_id: i64,
    },

    #[error("Matcher {name} failed: {message}")]
    MatcherFailed { name: String, message: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether this error is the expected duplicate-key condition from
    /// re-persisting an identical match triple.
    pub fn is_duplicate_match(&self) -> bool {
        matches!(self, Self::DuplicateMatch { .. })
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
