//! Best-match selection over matcher output.
//!
//! Pure selection logic: matchers may read storage, but nothing in this
//! module touches it, so the selection rules are testable with in-memory
//! candidates alone.

use futures::future::try_join_all;
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{FailureMatch, TextLogError};
use crate::matchers::MatcherRegistry;

/// Find the single best match for each error.
///
/// Every matcher runs for every error and the candidates are pooled, not
/// pipelined. Errors with zero candidates yield nothing. Returned matches
/// are unsaved.
pub async fn find_best_matches(
    errors: &[TextLogError],
    registry: &MatcherRegistry,
) -> DomainResult<Vec<FailureMatch>> {
    let mut best = Vec::new();
    for error in errors {
        let candidates = find_all_matches(error, registry).await?;
        debug!(
            error_id = error.id,
            candidates = candidates.len(),
            "collected match candidates"
        );
        if let Some(winner) = select_best(candidates) {
            best.push(winner);
        }
    }
    Ok(best)
}

/// Run every registered matcher against one error and flatten the results
/// into unsaved match records.
///
/// Matcher calls are independent reads, so they are joined concurrently.
pub async fn find_all_matches(
    error: &TextLogError,
    registry: &MatcherRegistry,
) -> DomainResult<Vec<FailureMatch>> {
    let results = try_join_all(
        registry
            .matchers()
            .iter()
            .map(|matcher| matcher.find_matches(error)),
    )
    .await?;

    let mut matches = Vec::new();
    for (matcher, candidates) in registry.matchers().iter().zip(results) {
        for candidate in candidates {
            matches.push(FailureMatch::unsaved(
                error.id,
                candidate.classified_failure_id,
                matcher.name(),
                candidate.score,
            ));
        }
    }
    Ok(matches)
}

/// Select the best candidate by `(-score, -classified_failure_id)`:
/// highest score wins, ties broken by the larger classified failure id.
/// The tie-break is deterministic but arbitrary, not a quality judgment.
pub fn select_best(candidates: Vec<FailureMatch>) -> Option<FailureMatch> {
    candidates.into_iter().max_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then_with(|| a.classified_failure_id.cmp(&b.classified_failure_id))
    })
}
