//! The job classification state machine.
//!
//! Gates when matching may run, drives the finder and persister, and
//! records the outcome on the job. The status write is the attempt's
//! final side effect and happens whether the attempt succeeded or raised.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AutoclassifyStatus, Job, TextLogError};
use crate::domain::ports::{JobNoteRepository, JobRepository, TextLogErrorRepository};
use crate::matchers::MatcherRegistry;
use crate::services::match_finder::find_best_matches;
use crate::services::match_persister::MatchPersister;
use crate::services::AUTOCLASSIFY_GOOD_ENOUGH_RATIO;

/// Runs autoclassification attempts for single jobs.
///
/// Per-job mutual exclusion is a caller-side guarantee (one worker claims
/// one job); within an attempt all writes go through the storage layer's
/// transactions.
pub struct Autoclassifier {
    job_repo: Arc<dyn JobRepository>,
    error_repo: Arc<dyn TextLogErrorRepository>,
    note_repo: Arc<dyn JobNoteRepository>,
    registry: MatcherRegistry,
    persister: MatchPersister,
}

impl Autoclassifier {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        error_repo: Arc<dyn TextLogErrorRepository>,
        note_repo: Arc<dyn JobNoteRepository>,
        registry: MatcherRegistry,
        persister: MatchPersister,
    ) -> Self {
        Self {
            job_repo,
            error_repo,
            note_repo,
            registry,
            persister,
        }
    }

    /// Attempt to autoclassify one job's error lines.
    ///
    /// Ineligible jobs (not yet crossreferenced, already autoclassified,
    /// or not failing) are skipped with a log line, not an error. A
    /// successful attempt ends with `Autoclassified`; any failure during
    /// matching or persisting ends with `Failed` and the error propagates
    /// to the caller, who owns retry policy. Eligibility checks are
    /// idempotent and already-written matches deduplicate, so a `Failed`
    /// job can simply be re-attempted.
    pub async fn match_errors(&self, job_id: i64) -> DomainResult<()> {
        let job = self
            .job_repo
            .get(job_id)
            .await?
            .ok_or(DomainError::JobNotFound(job_id))?;

        if job.autoclassify_status < AutoclassifyStatus::Crossreferenced {
            error!(job_id, "tried to autoclassify job without crossreferenced error lines");
            return Ok(());
        }
        if job.autoclassify_status == AutoclassifyStatus::Autoclassified {
            error!(job_id, "tried to autoclassify job which was already autoclassified");
            return Ok(());
        }
        // Error lines can appear even in jobs marked as passing; only
        // failing outcomes are classified.
        if !job.result.is_failure() {
            return Ok(());
        }

        let all_unmatched = self.error_repo.unmatched_for_job(job.id).await?;
        let errors: Vec<TextLogError> = all_unmatched
            .iter()
            .filter(|e| e.has_failure_line_metadata)
            .cloned()
            .collect();
        if errors.is_empty() {
            info!(job_id, "skipping autoclassify because job has no unmatched errors");
            return Ok(());
        }

        let outcome = self.classify(&job, &errors, &all_unmatched).await;

        let status = match &outcome {
            Ok(()) => {
                debug!(job_id, "autoclassification succeeded");
                AutoclassifyStatus::Autoclassified
            }
            Err(err) => {
                error!(job_id, %err, "autoclassification failed");
                AutoclassifyStatus::Failed
            }
        };
        self.job_repo
            .update_autoclassify_status(job.id, status)
            .await?;

        outcome
    }

    async fn classify(
        &self,
        job: &Job,
        errors: &[TextLogError],
        all_unmatched: &[TextLogError],
    ) -> DomainResult<()> {
        let matches = find_best_matches(errors, &self.registry).await?;
        if matches.is_empty() {
            return Ok(());
        }

        self.persister.persist(&matches).await?;

        // Did we find a conclusive match for every outstanding error?
        let matched_over_threshold: HashSet<i64> = matches
            .iter()
            .filter(|m| m.score >= AUTOCLASSIFY_GOOD_ENOUGH_RATIO)
            .map(|m| m.text_log_error_id)
            .collect();
        let all_matched = all_unmatched
            .iter()
            .all(|e| matched_over_threshold.contains(&e.id));

        self.create_note(job, all_matched).await
    }

    async fn create_note(&self, job: &Job, all_matched: bool) -> DomainResult<()> {
        if !(all_matched && self.is_fully_autoclassified(job).await?) {
            return Ok(());
        }

        // A note may already exist from a human or an earlier attempt;
        // never add a second one.
        if !self.note_repo.exists_for_job(job.id).await? {
            self.note_repo.create_autoclassify_note(job.id).await?;
            info!(job_id = job.id, "created autoclassification job note");
        }
        Ok(())
    }

    /// Whether every metadata-bearing error line of the job carries a best
    /// classification.
    async fn is_fully_autoclassified(&self, job: &Job) -> DomainResult<bool> {
        let missing = self
            .error_repo
            .count_missing_best_classification(job.id)
            .await?;
        Ok(missing == 0)
    }
}
