//! SQLite implementation of the JobRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AutoclassifyStatus, Job, JobResult};
use crate::domain::ports::JobRepository;

#[derive(Clone)]
pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn insert(&self, job: &Job) -> DomainResult<Job> {
        let result = sqlx::query(
            r#"INSERT INTO jobs (guid, result, autoclassify_status, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(job.guid.to_string())
        .bind(job.result.as_str())
        .bind(job.autoclassify_status.as_str())
        .bind(job.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Job {
            id: result.last_insert_rowid(),
            ..job.clone()
        })
    }

    async fn get(&self, id: i64) -> DomainResult<Option<Job>> {
        let row: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update_autoclassify_status(
        &self,
        id: i64,
        status: AutoclassifyStatus,
    ) -> DomainResult<()> {
        let result = sqlx::query("UPDATE jobs SET autoclassify_status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::JobNotFound(id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: i64,
    guid: String,
    result: String,
    autoclassify_status: String,
    created_at: String,
}

impl TryFrom<JobRow> for Job {
    type Error = DomainError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let guid: Uuid = parse_uuid(&row.guid)?;
        let result = JobResult::from_str(&row.result).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid job result: {}", row.result))
        })?;
        let autoclassify_status =
            AutoclassifyStatus::from_str(&row.autoclassify_status).ok_or_else(|| {
                DomainError::SerializationError(format!(
                    "Invalid autoclassify status: {}",
                    row.autoclassify_status
                ))
            })?;

        Ok(Job {
            id: row.id,
            guid,
            result,
            autoclassify_status,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
