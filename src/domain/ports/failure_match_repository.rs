use crate::domain::errors::DomainResult;
use crate::domain::models::FailureMatch;
use async_trait::async_trait;

/// Repository port for match evidence persistence operations.
#[async_trait]
pub trait FailureMatchRepository: Send + Sync {
    /// Insert a match, returning it with its assigned id.
    ///
    /// An identical `(text_log_error, matcher, classified_failure)` triple
    /// from a prior run surfaces as `DomainError::DuplicateMatch`; callers
    /// re-processing at-least-once are expected to recover from it.
    async fn insert(&self, failure_match: &FailureMatch) -> DomainResult<FailureMatch>;

    /// All matches recorded for an error
    async fn for_error(&self, error_id: i64) -> DomainResult<Vec<FailureMatch>>;

    /// The error's best automatic match at or above `min_score`, ordered
    /// by score descending with ties broken by the larger classified
    /// failure id.
    async fn best_for_error(
        &self,
        error_id: i64,
        min_score: f64,
    ) -> DomainResult<Option<FailureMatch>>;

    /// All matches referencing a classified failure
    async fn for_classified_failure(
        &self,
        classified_failure_id: i64,
    ) -> DomainResult<Vec<FailureMatch>>;
}
