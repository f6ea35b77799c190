//! Text log error domain model.

use serde::{Deserialize, Serialize};

/// One line from a job's log identified as an error by the log parser.
///
/// Created by the crossreferencing step (out of scope); immutable once
/// classified except for the best-classification back-reference, which
/// the match persister and merge engine mutate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLogError {
    pub id: i64,
    pub job_id: i64,
    /// Raw log line text
    pub line: String,
    pub line_number: u32,
    /// Whether crossreferencing linked this error to a structured failure
    /// line. Errors without metadata are never matched.
    pub has_failure_line_metadata: bool,
    /// Classified failure promoted as this error's authoritative
    /// attribution, once a match clears the cutoff ratio.
    pub best_classification: Option<i64>,
}

impl TextLogError {
    pub fn new(job_id: i64, line: impl Into<String>, line_number: u32) -> Self {
        Self {
            id: 0,
            job_id,
            line: line.into(),
            line_number,
            has_failure_line_metadata: true,
            best_classification: None,
        }
    }
}
