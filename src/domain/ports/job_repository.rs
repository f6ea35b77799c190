use crate::domain::errors::DomainResult;
use crate::domain::models::{AutoclassifyStatus, Job};
use async_trait::async_trait;

/// Repository port for job persistence operations.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new job, returning it with its assigned id
    async fn insert(&self, job: &Job) -> DomainResult<Job>;

    /// Get a job by id
    async fn get(&self, id: i64) -> DomainResult<Option<Job>>;

    /// Update only the autoclassify status of a job.
    ///
    /// This is the final side effect of every classification attempt and
    /// must succeed independently of whatever else the attempt did.
    async fn update_autoclassify_status(
        &self,
        id: i64,
        status: AutoclassifyStatus,
    ) -> DomainResult<()>;
}
