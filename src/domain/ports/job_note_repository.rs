use crate::domain::errors::DomainResult;
use crate::domain::models::JobNote;
use async_trait::async_trait;

/// Port for the job-note collaborator.
///
/// Note creation is delegated to whatever owns job annotations; this core
/// only guarantees it never asks for a second note on the same job.
#[async_trait]
pub trait JobNoteRepository: Send + Sync {
    /// Whether any note already exists for the job
    async fn exists_for_job(&self, job_id: i64) -> DomainResult<bool>;

    /// Record that the job was classified automatically
    async fn create_autoclassify_note(&self, job_id: i64) -> DomainResult<JobNote>;
}
