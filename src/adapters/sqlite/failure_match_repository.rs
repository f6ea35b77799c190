//! SQLite implementation of the FailureMatchRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::FailureMatch;
use crate::domain::ports::FailureMatchRepository;

#[derive(Clone)]
pub struct SqliteFailureMatchRepository {
    pool: SqlitePool,
}

impl SqliteFailureMatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FailureMatchRepository for SqliteFailureMatchRepository {
    async fn insert(&self, failure_match: &FailureMatch) -> DomainResult<FailureMatch> {
        let result = sqlx::query(
            r#"INSERT INTO failure_matches
               (text_log_error_id, classified_failure_id, matcher_name, score)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(failure_match.text_log_error_id)
        .bind(failure_match.classified_failure_id)
        .bind(&failure_match.matcher_name)
        .bind(failure_match.score)
        .execute(&self.pool)
        .await
        .map_err(|err| match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => DomainError::DuplicateMatch {
                text_log_error_id: failure_match.text_log_error_id,
                matcher_name: failure_match.matcher_name.clone(),
                classified_failure_id: failure_match.classified_failure_id,
            },
            _ => DomainError::from(err),
        })?;

        Ok(FailureMatch {
            id: result.last_insert_rowid(),
            ..failure_match.clone()
        })
    }

    async fn for_error(&self, error_id: i64) -> DomainResult<Vec<FailureMatch>> {
        let rows: Vec<FailureMatchRow> = sqlx::query_as(
            "SELECT * FROM failure_matches WHERE text_log_error_id = ? ORDER BY id",
        )
        .bind(error_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn best_for_error(
        &self,
        error_id: i64,
        min_score: f64,
    ) -> DomainResult<Option<FailureMatch>> {
        let row: Option<FailureMatchRow> = sqlx::query_as(
            r#"SELECT * FROM failure_matches
               WHERE text_log_error_id = ? AND score >= ?
               ORDER BY score DESC, classified_failure_id DESC
               LIMIT 1"#,
        )
        .bind(error_id)
        .bind(min_score)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn for_classified_failure(
        &self,
        classified_failure_id: i64,
    ) -> DomainResult<Vec<FailureMatch>> {
        let rows: Vec<FailureMatchRow> = sqlx::query_as(
            "SELECT * FROM failure_matches WHERE classified_failure_id = ? ORDER BY id",
        )
        .bind(classified_failure_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FailureMatchRow {
    pub id: i64,
    pub text_log_error_id: i64,
    pub classified_failure_id: i64,
    pub matcher_name: String,
    pub score: f64,
    #[allow(dead_code)]
    pub created_at: String,
}

impl From<FailureMatchRow> for FailureMatch {
    fn from(row: FailureMatchRow) -> Self {
        FailureMatch {
            id: row.id,
            text_log_error_id: row.text_log_error_id,
            classified_failure_id: row.classified_failure_id,
            matcher_name: row.matcher_name,
            score: row.score,
        }
    }
}
