//! Shared wiring for CLI commands.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::{
    initialize_database, SqliteBugscacheRepository, SqliteClassifiedFailureRepository,
    SqliteFailureMatchRepository, SqliteJobNoteRepository, SqliteJobRepository,
    SqliteTextLogErrorRepository,
};
use crate::config::ConfigLoader;
use crate::domain::models::Config;
use crate::matchers::MatcherRegistry;
use crate::services::{Autoclassifier, BugAssignment, MatchPersister};

/// Everything a command needs, wired against the configured database.
pub struct AppContext {
    pub pool: SqlitePool,
    pub job_repo: Arc<SqliteJobRepository>,
    pub error_repo: Arc<SqliteTextLogErrorRepository>,
    pub match_repo: Arc<SqliteFailureMatchRepository>,
    pub classified_failure_repo: Arc<SqliteClassifiedFailureRepository>,
    pub note_repo: Arc<SqliteJobNoteRepository>,
    pub autoclassifier: Autoclassifier,
    pub bug_assignment: BugAssignment,
}

impl AppContext {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let url = format!("sqlite:{}", config.database.path);
        let pool = initialize_database(&url)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?;
        Ok(Self::from_pool(pool))
    }

    pub async fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        Self::from_config(&config).await
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        let job_repo = Arc::new(SqliteJobRepository::new(pool.clone()));
        let error_repo = Arc::new(SqliteTextLogErrorRepository::new(pool.clone()));
        let match_repo = Arc::new(SqliteFailureMatchRepository::new(pool.clone()));
        let classified_failure_repo =
            Arc::new(SqliteClassifiedFailureRepository::new(pool.clone()));
        let note_repo = Arc::new(SqliteJobNoteRepository::new(pool.clone()));
        let bugscache = Arc::new(SqliteBugscacheRepository::new(pool.clone()));

        let registry = MatcherRegistry::with_default_matchers(
            error_repo.clone(),
            classified_failure_repo.clone(),
            bugscache,
        );
        let persister = MatchPersister::new(match_repo.clone(), error_repo.clone());
        let autoclassifier = Autoclassifier::new(
            job_repo.clone(),
            error_repo.clone(),
            note_repo.clone(),
            registry,
            persister,
        );
        let bug_assignment =
            BugAssignment::new(classified_failure_repo.clone(), error_repo.clone());

        Self {
            pool,
            job_repo,
            error_repo,
            match_repo,
            classified_failure_repo,
            note_repo,
            autoclassifier,
            bug_assignment,
        }
    }
}
