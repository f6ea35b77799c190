//! Ports (trait interfaces) between the domain and its adapters.

pub mod bug_search;
pub mod classified_failure_repository;
pub mod failure_match_repository;
pub mod job_note_repository;
pub mod job_repository;
pub mod matcher;
pub mod text_log_error_repository;

pub use bug_search::{BugSearch, BugSuggestion};
pub use classified_failure_repository::ClassifiedFailureRepository;
pub use failure_match_repository::FailureMatchRepository;
pub use job_note_repository::JobNoteRepository;
pub use job_repository::JobRepository;
pub use matcher::Matcher;
pub use text_log_error_repository::TextLogErrorRepository;
