//! SQLite-backed bug search.
//!
//! A local cache of bug summaries queried with a LIKE scan. Stands behind
//! the opaque `BugSearch` port; a deployment with a real bug tracker
//! index swaps this adapter out without touching the matcher.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::like_escape;
use crate::domain::errors::DomainResult;
use crate::domain::ports::{BugSearch, BugSuggestion};

#[derive(Clone)]
pub struct SqliteBugscacheRepository {
    pool: SqlitePool,
}

impl SqliteBugscacheRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or refresh a cached bug summary.
    pub async fn upsert(&self, bug_id: i64, summary: &str, status: &str) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO bugscache (bug_id, summary, status) VALUES (?, ?, ?)
               ON CONFLICT(bug_id) DO UPDATE SET summary = excluded.summary,
                                                 status = excluded.status"#,
        )
        .bind(bug_id)
        .bind(summary)
        .bind(status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BugSearch for SqliteBugscacheRepository {
    async fn search(&self, term: &str) -> DomainResult<Vec<BugSuggestion>> {
        let pattern = format!("%{}%", like_escape(term));
        let rows: Vec<(i64, String)> = sqlx::query_as(
            r#"SELECT bug_id, summary FROM bugscache
               WHERE summary LIKE ? ESCAPE '\' AND status != 'closed'
               ORDER BY bug_id"#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(bug_id, summary)| BugSuggestion { bug_id, summary })
            .collect())
    }
}
