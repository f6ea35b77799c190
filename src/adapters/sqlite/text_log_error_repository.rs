//! SQLite implementation of the TextLogErrorRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::like_escape;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::TextLogError;
use crate::domain::ports::TextLogErrorRepository;
use crate::services::error_summary::get_cleaned_line;

#[derive(Clone)]
pub struct SqliteTextLogErrorRepository {
    pool: SqlitePool,
}

impl SqliteTextLogErrorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TextLogErrorRepository for SqliteTextLogErrorRepository {
    async fn insert(&self, error: &TextLogError) -> DomainResult<TextLogError> {
        // The cleaned form is frozen at insert so the precise matcher can
        // join on it without re-cleaning every stored row per lookup.
        let cleaned_line = get_cleaned_line(&error.line);
        let result = sqlx::query(
            r#"INSERT INTO text_log_errors
               (job_id, line, cleaned_line, line_number, has_failure_line_metadata, best_classification)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(error.job_id)
        .bind(&error.line)
        .bind(&cleaned_line)
        .bind(i64::from(error.line_number))
        .bind(error.has_failure_line_metadata)
        .bind(error.best_classification)
        .execute(&self.pool)
        .await?;

        Ok(TextLogError {
            id: result.last_insert_rowid(),
            ..error.clone()
        })
    }

    async fn get(&self, id: i64) -> DomainResult<Option<TextLogError>> {
        let row: Option<TextLogErrorRow> =
            sqlx::query_as("SELECT * FROM text_log_errors WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn for_job(&self, job_id: i64) -> DomainResult<Vec<TextLogError>> {
        let rows: Vec<TextLogErrorRow> =
            sqlx::query_as("SELECT * FROM text_log_errors WHERE job_id = ? ORDER BY line_number")
                .bind(job_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn unmatched_for_job(&self, job_id: i64) -> DomainResult<Vec<TextLogError>> {
        let rows: Vec<TextLogErrorRow> = sqlx::query_as(
            r#"SELECT e.* FROM text_log_errors e
               LEFT JOIN failure_matches m ON m.text_log_error_id = e.id
               WHERE e.job_id = ? AND m.id IS NULL
               ORDER BY e.line_number"#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn mark_best_classification(
        &self,
        error_id: i64,
        classified_failure_id: i64,
    ) -> DomainResult<()> {
        let result = sqlx::query("UPDATE text_log_errors SET best_classification = ? WHERE id = ?")
            .bind(classified_failure_id)
            .bind(error_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TextLogErrorNotFound(error_id));
        }
        Ok(())
    }

    async fn count_missing_best_classification(&self, job_id: i64) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM text_log_errors
               WHERE job_id = ? AND has_failure_line_metadata = 1
                 AND best_classification IS NULL"#,
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn best_classifications_for_line(
        &self,
        line: &str,
        exclude_job_id: i64,
    ) -> DomainResult<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"SELECT DISTINCT best_classification FROM text_log_errors
               WHERE cleaned_line = ? AND job_id != ?
                 AND best_classification IS NOT NULL"#,
        )
        .bind(line)
        .bind(exclude_job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn classified_errors_containing(
        &self,
        fragment: &str,
        exclude_job_id: i64,
    ) -> DomainResult<Vec<TextLogError>> {
        let pattern = format!("%{}%", like_escape(fragment));
        let rows: Vec<TextLogErrorRow> = sqlx::query_as(
            r#"SELECT * FROM text_log_errors
               WHERE line LIKE ? ESCAPE '\' AND job_id != ?
                 AND best_classification IS NOT NULL"#,
        )
        .bind(&pattern)
        .bind(exclude_job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct TextLogErrorRow {
    id: i64,
    job_id: i64,
    line: String,
    #[allow(dead_code)]
    cleaned_line: String,
    line_number: i64,
    has_failure_line_metadata: bool,
    best_classification: Option<i64>,
    #[allow(dead_code)]
    created_at: String,
}

impl TryFrom<TextLogErrorRow> for TextLogError {
    type Error = DomainError;

    fn try_from(row: TextLogErrorRow) -> Result<Self, Self::Error> {
        let line_number = u32::try_from(row.line_number)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        Ok(TextLogError {
            id: row.id,
            job_id: row.job_id,
            line: row.line,
            line_number,
            has_failure_line_metadata: row.has_failure_line_metadata,
            best_classification: row.best_classification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::classified_failure_repository::SqliteClassifiedFailureRepository;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::adapters::sqlite::job_repository::SqliteJobRepository;
    use crate::domain::models::{Job, JobResult};
    use crate::domain::ports::{ClassifiedFailureRepository, JobRepository};

    async fn seed_job(pool: &SqlitePool) -> Job {
        SqliteJobRepository::new(pool.clone())
            .insert(&Job::new(JobResult::Testfailed))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteTextLogErrorRepository::new(pool.clone());
        let job = seed_job(&pool).await;

        let error = repo
            .insert(&TextLogError::new(job.id, "TEST-UNEXPECTED-FAIL | a | b", 12))
            .await
            .unwrap();

        let fetched = repo.get(error.id).await.unwrap().unwrap();
        assert_eq!(fetched.line, "TEST-UNEXPECTED-FAIL | a | b");
        assert_eq!(fetched.line_number, 12);
        assert!(fetched.best_classification.is_none());
    }

    #[tokio::test]
    async fn test_precise_lookup_uses_cleaned_line() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteTextLogErrorRepository::new(pool.clone());
        let cf_repo = SqliteClassifiedFailureRepository::new(pool.clone());

        let old_job = seed_job(&pool).await;
        let new_job = seed_job(&pool).await;

        // Same failure, different harness timestamp prefix.
        let old = repo
            .insert(&TextLogError::new(
                old_job.id,
                "10:00:01     INFO - TEST-UNEXPECTED-FAIL | test_a.py | boom",
                1,
            ))
            .await
            .unwrap();
        let classified = cf_repo.create(None).await.unwrap();
        repo.mark_best_classification(old.id, classified.id)
            .await
            .unwrap();

        let found = repo
            .best_classifications_for_line("TEST-UNEXPECTED-FAIL | test_a.py | boom", new_job.id)
            .await
            .unwrap();
        assert_eq!(found, vec![classified.id]);

        // Errors from the same job are excluded
        let same_job = repo
            .best_classifications_for_line("TEST-UNEXPECTED-FAIL | test_a.py | boom", old_job.id)
            .await
            .unwrap();
        assert!(same_job.is_empty());
    }

    #[tokio::test]
    async fn test_count_missing_best_classification_ignores_metadata_free_errors() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteTextLogErrorRepository::new(pool.clone());
        let job = seed_job(&pool).await;

        repo.insert(&TextLogError::new(job.id, "first error", 1))
            .await
            .unwrap();
        let mut no_meta = TextLogError::new(job.id, "second error", 2);
        no_meta.has_failure_line_metadata = false;
        repo.insert(&no_meta).await.unwrap();

        assert_eq!(
            repo.count_missing_best_classification(job.id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_fragment_lookup_treats_wildcards_literally() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteTextLogErrorRepository::new(pool.clone());
        let cf_repo = SqliteClassifiedFailureRepository::new(pool.clone());

        let old_job = seed_job(&pool).await;
        let new_job = seed_job(&pool).await;
        let classified = cf_repo.create(None).await.unwrap();

        let literal = repo
            .insert(&TextLogError::new(old_job.id, "crash [@ foo%bar]", 1))
            .await
            .unwrap();
        let lookalike = repo
            .insert(&TextLogError::new(old_job.id, "crash [@ fooXbar]", 2))
            .await
            .unwrap();
        for error in [&literal, &lookalike] {
            repo.mark_best_classification(error.id, classified.id)
                .await
                .unwrap();
        }

        let found = repo
            .classified_errors_containing("[@ foo%bar]", new_job.id)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, literal.id);
    }
}
