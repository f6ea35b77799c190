use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A bug returned by the full-text bug search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugSuggestion {
    pub bug_id: i64,
    pub summary: String,
}

/// Port for the bug-search collaborator.
///
/// Treated as an opaque `(search_term) -> bug candidates` call; the
/// backing index is out of scope.
#[async_trait]
pub trait BugSearch: Send + Sync {
    async fn search(&self, term: &str) -> DomainResult<Vec<BugSuggestion>>;
}
