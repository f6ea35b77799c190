use crate::domain::errors::DomainResult;
use crate::domain::models::{MatchCandidate, TextLogError};
use async_trait::async_trait;

/// An independent scoring strategy mapping one error to candidate
/// `(score, classified_failure_id)` pairs.
///
/// Matchers are registered explicitly at startup rather than discovered by
/// naming convention, so adding one never touches the dispatch loop and
/// nothing non-matcher can slip into the set. Each call depends only on
/// its error and the known-failure corpus and must never mutate match or
/// job state (materializing a classified failure for a newly suggested
/// bug is the one allowed write), so matcher invocations over independent
/// errors carry no ordering requirement.
#[async_trait]
pub trait Matcher: Send + Sync {
    /// Stable name recorded on every match this matcher produces
    fn name(&self) -> &str;

    /// Score the error against known failures, yielding zero or more
    /// candidates
    async fn find_matches(&self, error: &TextLogError) -> DomainResult<Vec<MatchCandidate>>;
}
