//! Logsift - CI failure autoclassification
//!
//! Logsift matches new test-log error lines against previously classified
//! failures and, when the evidence is strong enough, marks whole jobs as
//! autoclassified intermittents.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, repository ports, and errors
//! - **Service Layer** (`services`): Autoclassification orchestration
//! - **Matchers** (`matchers`): Pluggable match strategies
//! - **Adapters** (`adapters`): SQLite persistence
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod matchers;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AutoclassifyStatus, ClassifiedFailure, Config, DatabaseConfig, FailureMatch, Job, JobNote,
    JobResult, LoggingConfig, MatchCandidate, MergePlan, TextLogError,
};
pub use domain::ports::{
    BugSearch, ClassifiedFailureRepository, FailureMatchRepository, JobNoteRepository,
    JobRepository, Matcher, TextLogErrorRepository,
};
pub use matchers::MatcherRegistry;
pub use services::{
    Autoclassifier, BugAssignment, MatchPersister, AUTOCLASSIFY_CUTOFF_RATIO,
    AUTOCLASSIFY_GOOD_ENOUGH_RATIO,
};
