//! Crash-signature matcher.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{MatchCandidate, TextLogError};
use crate::domain::ports::{Matcher, TextLogErrorRepository};
use crate::services::error_summary::{get_cleaned_line, get_crash_signature};

/// Matches crash lines (`... application crashed [@ sig]`) against
/// classified crashes in other jobs with the same signature.
///
/// Scores 1.0 when the whole cleaned line also matches, 0.8 when only the
/// signature does.
pub struct CrashSignatureMatcher {
    error_repo: Arc<dyn TextLogErrorRepository>,
}

impl CrashSignatureMatcher {
    pub fn new(error_repo: Arc<dyn TextLogErrorRepository>) -> Self {
        Self { error_repo }
    }
}

#[async_trait]
impl Matcher for CrashSignatureMatcher {
    fn name(&self) -> &str {
        "crash_signature"
    }

    async fn find_matches(&self, error: &TextLogError) -> DomainResult<Vec<MatchCandidate>> {
        let Some(signature) = get_crash_signature(&error.line) else {
            return Ok(Vec::new());
        };

        // The LIKE pre-filter over-matches; signatures are compared
        // exactly below.
        let fragment = format!("[@ {signature}]");
        let candidates = self
            .error_repo
            .classified_errors_containing(&fragment, error.job_id)
            .await?;

        let cleaned = get_cleaned_line(&error.line);
        let mut scores: HashMap<i64, f64> = HashMap::new();
        for other in candidates {
            let Some(classification) = other.best_classification else {
                continue;
            };
            if get_crash_signature(&other.line).as_deref() != Some(signature.as_str()) {
                continue;
            }

            let score = if get_cleaned_line(&other.line) == cleaned {
                1.0
            } else {
                0.8
            };
            let entry = scores.entry(classification).or_insert(score);
            if score > *entry {
                *entry = score;
            }
        }

        Ok(scores
            .into_iter()
            .map(|(id, score)| MatchCandidate::new(score, id))
            .collect())
    }
}
