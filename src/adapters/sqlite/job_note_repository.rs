//! SQLite implementation of the JobNoteRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::adapters::sqlite::parse_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::JobNote;
use crate::domain::ports::JobNoteRepository;

const AUTOCLASSIFIER: &str = "autoclassifier";

#[derive(Clone)]
pub struct SqliteJobNoteRepository {
    pool: SqlitePool,
}

impl SqliteJobNoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn for_job(&self, job_id: i64) -> DomainResult<Vec<JobNote>> {
        let rows: Vec<JobNoteRow> =
            sqlx::query_as("SELECT * FROM job_notes WHERE job_id = ? ORDER BY id")
                .bind(job_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl JobNoteRepository for SqliteJobNoteRepository {
    async fn exists_for_job(&self, job_id: i64) -> DomainResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job_notes WHERE job_id = ?")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn create_autoclassify_note(&self, job_id: i64) -> DomainResult<JobNote> {
        let created_at = Utc::now();
        let text = "autoclassified intermittent";
        let result = sqlx::query(
            "INSERT INTO job_notes (job_id, who, text, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(job_id)
        .bind(AUTOCLASSIFIER)
        .bind(text)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(JobNote {
            id: result.last_insert_rowid(),
            job_id,
            who: AUTOCLASSIFIER.to_string(),
            text: text.to_string(),
            created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct JobNoteRow {
    id: i64,
    job_id: i64,
    who: String,
    text: String,
    created_at: String,
}

impl TryFrom<JobNoteRow> for JobNote {
    type Error = DomainError;

    fn try_from(row: JobNoteRow) -> Result<Self, Self::Error> {
        Ok(JobNote {
            id: row.id,
            job_id: row.job_id,
            who: row.who,
            text: row.text,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
