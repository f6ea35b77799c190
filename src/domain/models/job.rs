//! Job domain model.
//!
//! A job owns a set of text log errors and carries the autoclassification
//! state machine. Jobs themselves are produced by ingestion, which is out
//! of scope here; this crate only reads the result and mutates the
//! autoclassify status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress of a job through the autoclassification pipeline.
///
/// Ordering is meaningful: a job may only be matched once crossreferencing
/// has produced its error lines, so guards compare against
/// `Crossreferenced`. `Failed` signals the attempt must be retried by an
/// external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoclassifyStatus {
    /// Job ingested, error lines not yet crossreferenced
    Unprocessed,
    /// Structured failure lines linked to log errors; ready for matching
    Crossreferenced,
    /// Matching completed successfully
    Autoclassified,
    /// Matching raised; eligible for a retry by the caller
    Failed,
}

impl Default for AutoclassifyStatus {
    fn default() -> Self {
        Self::Unprocessed
    }
}

impl AutoclassifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unprocessed => "unprocessed",
            Self::Crossreferenced => "crossreferenced",
            Self::Autoclassified => "autoclassified",
            Self::Failed => "failed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unprocessed" => Some(Self::Unprocessed),
            "crossreferenced" => Some(Self::Crossreferenced),
            "autoclassified" => Some(Self::Autoclassified),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Outcome reported for a job by the CI system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobResult {
    Passed,
    Testfailed,
    Busted,
    Exception,
    Retry,
    Usercancel,
    Unknown,
}

impl Default for JobResult {
    fn default() -> Self {
        Self::Unknown
    }
}

impl JobResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Testfailed => "testfailed",
            Self::Busted => "busted",
            Self::Exception => "exception",
            Self::Retry => "retry",
            Self::Usercancel => "usercancel",
            Self::Unknown => "unknown",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "passed" | "success" => Some(Self::Passed),
            "testfailed" => Some(Self::Testfailed),
            "busted" => Some(Self::Busted),
            "exception" => Some(Self::Exception),
            "retry" => Some(Self::Retry),
            "usercancel" => Some(Self::Usercancel),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Only failing outcomes are eligible for autoclassification; passing
    /// jobs can still carry error lines but are never matched.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Testfailed | Self::Busted | Self::Exception)
    }
}

/// A CI job as seen by the autoclassifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub guid: Uuid,
    pub result: JobResult,
    pub autoclassify_status: AutoclassifyStatus,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(result: JobResult) -> Self {
        Self {
            id: 0,
            guid: Uuid::new_v4(),
            result,
            autoclassify_status: AutoclassifyStatus::Unprocessed,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_matches_pipeline() {
        assert!(AutoclassifyStatus::Unprocessed < AutoclassifyStatus::Crossreferenced);
        assert!(AutoclassifyStatus::Crossreferenced < AutoclassifyStatus::Autoclassified);
        // Failed jobs have been past crossreferencing, so a retry is legal
        assert!(AutoclassifyStatus::Failed > AutoclassifyStatus::Crossreferenced);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AutoclassifyStatus::Unprocessed,
            AutoclassifyStatus::Crossreferenced,
            AutoclassifyStatus::Autoclassified,
            AutoclassifyStatus::Failed,
        ] {
            assert_eq!(AutoclassifyStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_failing_results() {
        assert!(JobResult::Testfailed.is_failure());
        assert!(JobResult::Busted.is_failure());
        assert!(JobResult::Exception.is_failure());
        assert!(!JobResult::Passed.is_failure());
        assert!(!JobResult::Retry.is_failure());
    }
}
