//! Bug-search suggestion matcher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{MatchCandidate, TextLogError};
use crate::domain::ports::{BugSearch, ClassifiedFailureRepository, Matcher};
use crate::services::error_summary::{get_cleaned_line, get_error_search_term};

/// A deliberately conservative score: above the cutoff so the suggestion
/// can become a best classification, below the good-enough bar so a
/// bug-search hit alone never concludes a job.
const BUG_SUGGESTION_SCORE: f64 = 0.75;

/// Delegates to the full-text bug search with a cleaned search term and
/// maps each suggested bug onto its classified failure, creating the
/// record on first sight of the bug.
pub struct BugSuggestionMatcher {
    bug_search: Arc<dyn BugSearch>,
    classified_failure_repo: Arc<dyn ClassifiedFailureRepository>,
}

impl BugSuggestionMatcher {
    pub fn new(
        bug_search: Arc<dyn BugSearch>,
        classified_failure_repo: Arc<dyn ClassifiedFailureRepository>,
    ) -> Self {
        Self {
            bug_search,
            classified_failure_repo,
        }
    }
}

#[async_trait]
impl Matcher for BugSuggestionMatcher {
    fn name(&self) -> &str {
        "bug_suggestion"
    }

    async fn find_matches(&self, error: &TextLogError) -> DomainResult<Vec<MatchCandidate>> {
        let cleaned = get_cleaned_line(&error.line);
        let Some(term) = get_error_search_term(&cleaned) else {
            return Ok(Vec::new());
        };

        let suggestions = self.bug_search.search(&term).await?;
        debug!(
            error_id = error.id,
            term = %term,
            suggestions = suggestions.len(),
            "bug search returned"
        );

        let mut candidates = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            let classified = self
                .classified_failure_repo
                .get_or_create_for_bug(suggestion.bug_id)
                .await?;
            candidates.push(MatchCandidate::new(BUG_SUGGESTION_SCORE, classified.id));
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteBugscacheRepository, SqliteClassifiedFailureRepository,
    };
    use sqlx::SqlitePool;

    fn matcher(pool: &SqlitePool) -> BugSuggestionMatcher {
        BugSuggestionMatcher::new(
            Arc::new(SqliteBugscacheRepository::new(pool.clone())),
            Arc::new(SqliteClassifiedFailureRepository::new(pool.clone())),
        )
    }

    #[tokio::test]
    async fn test_suggestion_materializes_classified_failure() {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteBugscacheRepository::new(pool.clone())
            .upsert(4242, "Intermittent test_focus.html | waited too long", "open")
            .await
            .unwrap();

        let error = TextLogError::new(
            1,
            "TEST-UNEXPECTED-FAIL | dom/tests/test_focus.html | waited too long",
            1,
        );
        let candidates = matcher(&pool).find_matches(&error).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].score, BUG_SUGGESTION_SCORE);

        // The suggested bug now has a classified failure on record.
        let classified = SqliteClassifiedFailureRepository::new(pool.clone())
            .for_bug(4242)
            .await
            .unwrap()
            .expect("expected a classified failure for the suggested bug");
        assert_eq!(candidates[0].classified_failure_id, classified.id);
    }

    #[tokio::test]
    async fn test_repeat_suggestion_reuses_the_record() {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteBugscacheRepository::new(pool.clone())
            .upsert(4242, "Intermittent test_focus.html | waited too long", "open")
            .await
            .unwrap();

        let error = TextLogError::new(
            1,
            "TEST-UNEXPECTED-FAIL | dom/tests/test_focus.html | waited too long",
            1,
        );
        let m = matcher(&pool);
        let first = m.find_matches(&error).await.unwrap();
        let second = m.find_matches(&error).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(
            first[0].classified_failure_id,
            second[0].classified_failure_id
        );
    }

    #[tokio::test]
    async fn test_unsearchable_line_yields_nothing() {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteBugscacheRepository::new(pool.clone())
            .upsert(4242, "Return code: 1", "open")
            .await
            .unwrap();

        // No selective search term can be built from this line.
        let error = TextLogError::new(1, "Return code: 1", 1);
        let candidates = matcher(&pool).find_matches(&error).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_no_cached_bug_means_no_candidates() {
        let pool = create_migrated_test_pool().await.unwrap();

        let error = TextLogError::new(
            1,
            "TEST-UNEXPECTED-FAIL | dom/tests/test_focus.html | waited too long",
            1,
        );
        let candidates = matcher(&pool).find_matches(&error).await.unwrap();
        assert!(candidates.is_empty());
    }
}
