//! Idempotent persistence of best-match records.

use std::sync::Arc;

use tracing::warn;

use crate::domain::errors::DomainResult;
use crate::domain::models::FailureMatch;
use crate::domain::ports::{FailureMatchRepository, TextLogErrorRepository};
use crate::services::AUTOCLASSIFY_CUTOFF_RATIO;

/// Writes candidate matches and promotes best classifications once the
/// cutoff ratio is met.
pub struct MatchPersister {
    match_repo: Arc<dyn FailureMatchRepository>,
    error_repo: Arc<dyn TextLogErrorRepository>,
}

impl MatchPersister {
    pub fn new(
        match_repo: Arc<dyn FailureMatchRepository>,
        error_repo: Arc<dyn TextLogErrorRepository>,
    ) -> Self {
        Self {
            match_repo,
            error_repo,
        }
    }

    /// Save match records one at a time.
    ///
    /// Inserting one row per loop iteration instead of a bulk write lets a
    /// duplicate triple from an earlier attempt be caught and skipped while
    /// the remaining matches continue. After each successful-or-duplicate
    /// save, the match's classified failure is promoted as the error's best
    /// classification if the error's best automatic match now clears the
    /// cutoff ratio; setting the same id twice is a no-op.
    pub async fn persist(&self, matches: &[FailureMatch]) -> DomainResult<()> {
        for failure_match in matches {
            match self.match_repo.insert(failure_match).await {
                Ok(_) => {}
                Err(err) if err.is_duplicate_match() => {
                    warn!(
                        text_log_error_id = failure_match.text_log_error_id,
                        matcher = %failure_match.matcher_name,
                        classified_failure_id = failure_match.classified_failure_id,
                        "tried to create duplicate match"
                    );
                }
                Err(err) => return Err(err),
            }

            let best = self
                .match_repo
                .best_for_error(failure_match.text_log_error_id, AUTOCLASSIFY_CUTOFF_RATIO)
                .await?;
            if best.is_some() {
                self.error_repo
                    .mark_best_classification(
                        failure_match.text_log_error_id,
                        failure_match.classified_failure_id,
                    )
                    .await?;
            }
        }
        Ok(())
    }
}
