//! Bug assignment and duplicate-record merging.

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ClassifiedFailure;
use crate::domain::ports::{ClassifiedFailureRepository, TextLogErrorRepository};

/// Attaches bug numbers to classified failures, collapsing duplicate
/// records so at most one classified failure ever carries a given bug.
pub struct BugAssignment {
    classified_failure_repo: Arc<dyn ClassifiedFailureRepository>,
    error_repo: Arc<dyn TextLogErrorRepository>,
}

impl BugAssignment {
    pub fn new(
        classified_failure_repo: Arc<dyn ClassifiedFailureRepository>,
        error_repo: Arc<dyn TextLogErrorRepository>,
    ) -> Self {
        Self {
            classified_failure_repo,
            error_repo,
        }
    }

    /// Assign `bug_number` to a classified failure, returning the
    /// canonical record carrying the bug afterwards.
    ///
    /// When another record already carries the bug, the target is merged
    /// into it: match rows are re-pointed, per-(error, matcher) collisions
    /// keep the higher score, best-classification pointers follow, and the
    /// target record is deleted. The whole merge is one storage
    /// transaction; a half-migrated set of matches is never observable.
    pub async fn set_bug(
        &self,
        classified_failure_id: i64,
        bug_number: i64,
    ) -> DomainResult<ClassifiedFailure> {
        let target = self
            .classified_failure_repo
            .get(classified_failure_id)
            .await?
            .ok_or(DomainError::ClassifiedFailureNotFound(classified_failure_id))?;

        let existing = self.classified_failure_repo.for_bug(bug_number).await?;
        match existing {
            None => {
                self.classified_failure_repo
                    .set_bug_number(target.id, bug_number)
                    .await
            }
            Some(canonical) if canonical.id == target.id => Ok(canonical),
            Some(canonical) => {
                info!(
                    target_id = target.id,
                    canonical_id = canonical.id,
                    bug_number,
                    "merging duplicate classified failure"
                );
                self.classified_failure_repo
                    .merge_into(target.id, canonical.id)
                    .await?;
                Ok(canonical)
            }
        }
    }

    /// Forward a bug number filed against a job to its classification.
    ///
    /// Only meaningful when the job's failure is unambiguous: a single
    /// error line carrying a best classification. Returns the canonical
    /// classified failure when an update happened, `None` otherwise.
    pub async fn update_autoclassification_bug(
        &self,
        job_id: i64,
        bug_number: i64,
    ) -> DomainResult<Option<ClassifiedFailure>> {
        let errors = self.error_repo.for_job(job_id).await?;
        let [error] = errors.as_slice() else {
            return Ok(None);
        };
        let Some(classification_id) = error.best_classification else {
            return Ok(None);
        };

        let canonical = self.set_bug(classification_id, bug_number).await?;
        Ok(Some(canonical))
    }
}
