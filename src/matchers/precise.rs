//! Exact-text matcher.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{MatchCandidate, TextLogError};
use crate::domain::ports::{Matcher, TextLogErrorRepository};
use crate::services::error_summary::get_cleaned_line;

/// Matches an error against previously classified errors in other jobs
/// whose cleaned line is identical.
///
/// An exact repeat of a known failure line is as strong as evidence gets,
/// so every candidate scores 1.0.
pub struct PreciseTextMatcher {
    error_repo: Arc<dyn TextLogErrorRepository>,
}

impl PreciseTextMatcher {
    pub fn new(error_repo: Arc<dyn TextLogErrorRepository>) -> Self {
        Self { error_repo }
    }
}

#[async_trait]
impl Matcher for PreciseTextMatcher {
    fn name(&self) -> &str {
        "precise"
    }

    async fn find_matches(&self, error: &TextLogError) -> DomainResult<Vec<MatchCandidate>> {
        let cleaned = get_cleaned_line(&error.line);
        if cleaned.is_empty() {
            return Ok(Vec::new());
        }

        let classifications = self
            .error_repo
            .best_classifications_for_line(&cleaned, error.job_id)
            .await?;

        Ok(classifications
            .into_iter()
            .map(|id| MatchCandidate::new(1.0, id))
            .collect())
    }
}
