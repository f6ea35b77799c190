//! Classified failure domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A canonical, reusable failure signature.
///
/// Many text log errors across many jobs may reference the same classified
/// failure through matches. The bug number is nullable until a human (or
/// downstream bot) triages the failure; two records carrying the same bug
/// number are collapsed by the merge engine, which is the only way a
/// classified failure is ever destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFailure {
    pub id: i64,
    pub bug_number: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl ClassifiedFailure {
    pub fn new(bug_number: Option<i64>) -> Self {
        Self {
            id: 0,
            bug_number,
            created_at: Utc::now(),
        }
    }
}

/// A note attached to a job once it has been fully autoclassified.
///
/// Created at most once per job; the autoclassifier checks for an existing
/// note before delegating to the note repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobNote {
    pub id: i64,
    pub job_id: i64,
    /// Who created the note ("autoclassifier" for notes from this crate)
    pub who: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
