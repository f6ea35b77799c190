//! End-to-end autoclassification runs against a real in-memory database.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;

use helpers::database::setup_test_db;
use logsift::adapters::sqlite::{
    SqliteFailureMatchRepository, SqliteJobNoteRepository, SqliteJobRepository,
    SqliteTextLogErrorRepository,
};
use logsift::cli::context::AppContext;
use logsift::domain::errors::{DomainError, DomainResult};
use logsift::domain::models::{
    AutoclassifyStatus, Job, JobResult, MatchCandidate, TextLogError,
};
use logsift::domain::ports::{
    ClassifiedFailureRepository, FailureMatchRepository, JobRepository, Matcher,
    TextLogErrorRepository,
};
use logsift::matchers::MatcherRegistry;
use logsift::services::{Autoclassifier, MatchPersister};

async fn seed_job(ctx: &AppContext, result: JobResult, status: AutoclassifyStatus) -> Job {
    let mut job = Job::new(result);
    job.autoclassify_status = status;
    ctx.job_repo.insert(&job).await.expect("insert job")
}

async fn seed_error(ctx: &AppContext, job_id: i64, line: &str, line_number: u32) -> TextLogError {
    ctx.error_repo
        .insert(&TextLogError::new(job_id, line, line_number))
        .await
        .expect("insert error")
}

/// Seed a previously classified job carrying `line`, so the precise text
/// matcher has something to hit. Returns the classified failure id.
async fn seed_reference(ctx: &AppContext, line: &str) -> i64 {
    let reference = seed_job(ctx, JobResult::Testfailed, AutoclassifyStatus::Autoclassified).await;
    let error = seed_error(ctx, reference.id, line, 1).await;
    let cf = ctx
        .classified_failure_repo
        .create(None)
        .await
        .expect("create classified failure");
    ctx.error_repo
        .mark_best_classification(error.id, cf.id)
        .await
        .expect("mark best classification");
    cf.id
}

#[tokio::test]
async fn test_passing_job_is_never_matched() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let job = seed_job(&ctx, JobResult::Passed, AutoclassifyStatus::Crossreferenced).await;
    let error = seed_error(&ctx, job.id, "TEST-UNEXPECTED-FAIL | test.js | boom", 1).await;

    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    let job = ctx.job_repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.autoclassify_status, AutoclassifyStatus::Crossreferenced);
    assert!(ctx.match_repo.for_error(error.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unprocessed_job_is_skipped() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let job = seed_job(&ctx, JobResult::Testfailed, AutoclassifyStatus::Unprocessed).await;
    seed_error(&ctx, job.id, "TEST-UNEXPECTED-FAIL | test.js | boom", 1).await;

    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    let job = ctx.job_repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.autoclassify_status, AutoclassifyStatus::Unprocessed);
}

#[tokio::test]
async fn test_autoclassified_job_is_not_reprocessed() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let line = "TEST-UNEXPECTED-FAIL | test.js | boom";
    seed_reference(&ctx, line).await;
    let job = seed_job(&ctx, JobResult::Testfailed, AutoclassifyStatus::Autoclassified).await;
    let error = seed_error(&ctx, job.id, line, 1).await;

    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    // Even with a perfect candidate available, nothing is written.
    assert!(ctx.match_repo.for_error(error.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_job_is_an_error() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let err = ctx.autoclassifier.match_errors(9999).await.unwrap_err();
    assert!(matches!(err, DomainError::JobNotFound(9999)));
}

#[tokio::test]
async fn test_job_without_errors_is_left_untouched() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let job = seed_job(&ctx, JobResult::Testfailed, AutoclassifyStatus::Crossreferenced).await;

    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    // No errors means no attempt: the status write never happens.
    let job = ctx.job_repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.autoclassify_status, AutoclassifyStatus::Crossreferenced);
}

#[tokio::test]
async fn test_exact_line_matches_classify_the_whole_job() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let line_a = "TEST-UNEXPECTED-FAIL | dom/test_a.js | assertion failed";
    let line_b = "TEST-UNEXPECTED-FAIL | dom/test_b.js | timed out";
    let cf_a = seed_reference(&ctx, line_a).await;
    let cf_b = seed_reference(&ctx, line_b).await;

    let job = seed_job(&ctx, JobResult::Testfailed, AutoclassifyStatus::Crossreferenced).await;
    let error_a = seed_error(&ctx, job.id, line_a, 10).await;
    let error_b = seed_error(&ctx, job.id, line_b, 20).await;

    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    let job = ctx.job_repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.autoclassify_status, AutoclassifyStatus::Autoclassified);

    let error_a = ctx.error_repo.get(error_a.id).await.unwrap().unwrap();
    let error_b = ctx.error_repo.get(error_b.id).await.unwrap().unwrap();
    assert_eq!(error_a.best_classification, Some(cf_a));
    assert_eq!(error_b.best_classification, Some(cf_b));

    let matches = ctx.match_repo.for_error(error_a.id).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].matcher_name, "precise");
    assert_eq!(matches[0].score, 1.0);

    let notes = ctx.note_repo.for_job(job.id).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].who, "autoclassifier");
}

#[tokio::test]
async fn test_second_run_adds_nothing() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let line = "TEST-UNEXPECTED-FAIL | dom/test_a.js | assertion failed";
    seed_reference(&ctx, line).await;
    let job = seed_job(&ctx, JobResult::Testfailed, AutoclassifyStatus::Crossreferenced).await;
    let error = seed_error(&ctx, job.id, line, 1).await;

    ctx.autoclassifier.match_errors(job.id).await.unwrap();
    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    assert_eq!(ctx.match_repo.for_error(error.id).await.unwrap().len(), 1);
    assert_eq!(ctx.note_repo.for_job(job.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_partial_match_leaves_no_note() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let known_line = "TEST-UNEXPECTED-FAIL | dom/test_a.js | assertion failed";
    let cf = seed_reference(&ctx, known_line).await;

    let job = seed_job(&ctx, JobResult::Testfailed, AutoclassifyStatus::Crossreferenced).await;
    let known = seed_error(&ctx, job.id, known_line, 1).await;
    let unknown = seed_error(&ctx, job.id, "never seen before anywhere", 2).await;

    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    // The attempt itself succeeded, so the job is marked, but the job is
    // not fully classified and gets no note.
    let job = ctx.job_repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.autoclassify_status, AutoclassifyStatus::Autoclassified);

    let known = ctx.error_repo.get(known.id).await.unwrap().unwrap();
    let unknown = ctx.error_repo.get(unknown.id).await.unwrap().unwrap();
    assert_eq!(known.best_classification, Some(cf));
    assert_eq!(unknown.best_classification, None);

    assert!(ctx.note_repo.for_job(job.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_metadata_less_error_blocks_the_note() {
    let pool = setup_test_db().await;
    let ctx = AppContext::from_pool(pool);

    let line = "TEST-UNEXPECTED-FAIL | dom/test_a.js | assertion failed";
    seed_reference(&ctx, line).await;

    let job = seed_job(&ctx, JobResult::Testfailed, AutoclassifyStatus::Crossreferenced).await;
    seed_error(&ctx, job.id, line, 1).await;
    let mut bare = TextLogError::new(job.id, "stray log noise", 2);
    bare.has_failure_line_metadata = false;
    let bare = ctx.error_repo.insert(&bare).await.unwrap();

    ctx.autoclassifier.match_errors(job.id).await.unwrap();

    // The bare error is never matched and counts against completion.
    assert!(ctx.match_repo.for_error(bare.id).await.unwrap().is_empty());
    let job = ctx.job_repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.autoclassify_status, AutoclassifyStatus::Autoclassified);
    assert!(ctx.note_repo.for_job(job.id).await.unwrap().is_empty());
}

struct FailingMatcher;

#[async_trait]
impl Matcher for FailingMatcher {
    fn name(&self) -> &str {
        "failing"
    }

    async fn find_matches(&self, _error: &TextLogError) -> DomainResult<Vec<MatchCandidate>> {
        Err(DomainError::MatcherFailed {
            name: "failing".to_string(),
            message: "backing index unavailable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_matcher_failure_marks_job_failed() {
    let pool = setup_test_db().await;

    let job_repo = Arc::new(SqliteJobRepository::new(pool.clone()));
    let error_repo = Arc::new(SqliteTextLogErrorRepository::new(pool.clone()));
    let match_repo = Arc::new(SqliteFailureMatchRepository::new(pool.clone()));
    let note_repo = Arc::new(SqliteJobNoteRepository::new(pool.clone()));

    let mut registry = MatcherRegistry::new();
    registry.register(Arc::new(FailingMatcher));
    let persister = MatchPersister::new(match_repo.clone(), error_repo.clone());
    let autoclassifier = Autoclassifier::new(
        job_repo.clone(),
        error_repo.clone(),
        note_repo,
        registry,
        persister,
    );

    let mut job = Job::new(JobResult::Testfailed);
    job.autoclassify_status = AutoclassifyStatus::Crossreferenced;
    let job = job_repo.insert(&job).await.unwrap();
    let error = error_repo
        .insert(&TextLogError::new(job.id, "TEST-UNEXPECTED-FAIL | x | y", 1))
        .await
        .unwrap();

    let err = autoclassifier.match_errors(job.id).await.unwrap_err();
    assert!(matches!(err, DomainError::MatcherFailed { .. }));

    // The failure is recorded on the job and nothing else was written.
    let job = job_repo.get(job.id).await.unwrap().unwrap();
    assert_eq!(job.autoclassify_status, AutoclassifyStatus::Failed);
    assert!(match_repo.for_error(error.id).await.unwrap().is_empty());
}
