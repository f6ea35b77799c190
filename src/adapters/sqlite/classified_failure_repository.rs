//! SQLite implementation of the ClassifiedFailureRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::failure_match_repository::FailureMatchRow;
use crate::adapters::sqlite::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ClassifiedFailure, FailureMatch, MergePlan};
use crate::domain::ports::ClassifiedFailureRepository;

#[derive(Clone)]
pub struct SqliteClassifiedFailureRepository {
    pool: SqlitePool,
}

impl SqliteClassifiedFailureRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassifiedFailureRepository for SqliteClassifiedFailureRepository {
    async fn create(&self, bug_number: Option<i64>) -> DomainResult<ClassifiedFailure> {
        let created = ClassifiedFailure::new(bug_number);
        let result = sqlx::query(
            "INSERT INTO classified_failures (bug_number, created_at) VALUES (?, ?)",
        )
        .bind(created.bug_number)
        .bind(created.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(ClassifiedFailure {
            id: result.last_insert_rowid(),
            ..created
        })
    }

    async fn get(&self, id: i64) -> DomainResult<Option<ClassifiedFailure>> {
        let row: Option<ClassifiedFailureRow> =
            sqlx::query_as("SELECT * FROM classified_failures WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn for_bug(&self, bug_number: i64) -> DomainResult<Option<ClassifiedFailure>> {
        let row: Option<ClassifiedFailureRow> = sqlx::query_as(
            "SELECT * FROM classified_failures WHERE bug_number = ? ORDER BY id LIMIT 1",
        )
        .bind(bug_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_or_create_for_bug(&self, bug_number: i64) -> DomainResult<ClassifiedFailure> {
        if let Some(existing) = self.for_bug(bug_number).await? {
            return Ok(existing);
        }
        self.create(Some(bug_number)).await
    }

    async fn set_bug_number(&self, id: i64, bug_number: i64) -> DomainResult<ClassifiedFailure> {
        let result = sqlx::query("UPDATE classified_failures SET bug_number = ? WHERE id = ?")
            .bind(bug_number)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ClassifiedFailureNotFound(id));
        }

        self.get(id)
            .await?
            .ok_or(DomainError::ClassifiedFailureNotFound(id))
    }

    async fn merge_into(&self, target_id: i64, canonical_id: i64) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        for id in [target_id, canonical_id] {
            let exists: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM classified_failures WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_none() {
                return Err(DomainError::ClassifiedFailureNotFound(id));
            }
        }

        // Arena-style: load every match of both records up front, decide
        // all edits in memory, then apply them inside this transaction.
        let rows: Vec<FailureMatchRow> = sqlx::query_as(
            "SELECT * FROM failure_matches WHERE classified_failure_id IN (?, ?)",
        )
        .bind(target_id)
        .bind(canonical_id)
        .fetch_all(&mut *tx)
        .await?;

        let (target_matches, canonical_matches): (Vec<FailureMatch>, Vec<FailureMatch>) = rows
            .into_iter()
            .map(FailureMatch::from)
            .partition(|m| m.classified_failure_id == target_id);

        let plan = MergePlan::compute(&target_matches, &canonical_matches);

        // Collision losers go first so re-pointing never trips the unique
        // (error, matcher, classified_failure) constraint.
        for match_id in &plan.delete_match_ids {
            sqlx::query("DELETE FROM failure_matches WHERE id = ?")
                .bind(match_id)
                .execute(&mut *tx)
                .await?;
        }
        for match_id in &plan.repoint_match_ids {
            sqlx::query("UPDATE failure_matches SET classified_failure_id = ? WHERE id = ?")
                .bind(canonical_id)
                .bind(match_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "UPDATE text_log_errors SET best_classification = ? WHERE best_classification = ?",
        )
        .bind(canonical_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM classified_failures WHERE id = ?")
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ClassifiedFailureRow {
    id: i64,
    bug_number: Option<i64>,
    created_at: String,
}

impl TryFrom<ClassifiedFailureRow> for ClassifiedFailure {
    type Error = DomainError;

    fn try_from(row: ClassifiedFailureRow) -> Result<Self, Self::Error> {
        Ok(ClassifiedFailure {
            id: row.id,
            bug_number: row.bug_number,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
