//! Domain models for the autoclassification engine.

pub mod classified_failure;
pub mod config;
pub mod failure_match;
pub mod job;
pub mod text_log_error;

pub use classified_failure::{ClassifiedFailure, JobNote};
pub use config::{Config, DatabaseConfig, LoggingConfig};
pub use failure_match::{FailureMatch, MatchCandidate, MergePlan};
pub use job::{AutoclassifyStatus, Job, JobResult};
pub use text_log_error::TextLogError;
