use crate::domain::errors::DomainResult;
use crate::domain::models::TextLogError;
use async_trait::async_trait;

/// Repository port for text log error persistence operations.
#[async_trait]
pub trait TextLogErrorRepository: Send + Sync {
    /// Insert a new error line, returning it with its assigned id
    async fn insert(&self, error: &TextLogError) -> DomainResult<TextLogError>;

    /// Get an error by id
    async fn get(&self, id: i64) -> DomainResult<Option<TextLogError>>;

    /// All error lines belonging to a job
    async fn for_job(&self, job_id: i64) -> DomainResult<Vec<TextLogError>>;

    /// Error lines of a job with no classified-failure references yet,
    /// regardless of metadata. The autoclassifier narrows these to the
    /// metadata-bearing ones for matching but measures coverage against
    /// the full set.
    async fn unmatched_for_job(&self, job_id: i64) -> DomainResult<Vec<TextLogError>>;

    /// Promote a classified failure as the error's best classification.
    /// Setting the same id twice is a no-op.
    async fn mark_best_classification(
        &self,
        error_id: i64,
        classified_failure_id: i64,
    ) -> DomainResult<()>;

    /// Number of metadata-bearing error lines of a job that still lack a
    /// best classification. Zero means the job is fully autoclassified.
    async fn count_missing_best_classification(&self, job_id: i64) -> DomainResult<i64>;

    /// Distinct best classifications of errors in *other* jobs whose raw
    /// line is identical to `line`. Used by the precise text matcher.
    async fn best_classifications_for_line(
        &self,
        line: &str,
        exclude_job_id: i64,
    ) -> DomainResult<Vec<i64>>;

    /// Best-classified errors in *other* jobs whose raw line contains the
    /// given fragment. Used by the crash signature matcher, which then
    /// compares extracted signatures exactly.
    async fn classified_errors_containing(
        &self,
        fragment: &str,
        exclude_job_id: i64,
    ) -> DomainResult<Vec<TextLogError>>;
}
