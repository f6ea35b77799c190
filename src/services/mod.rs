//! Business logic for the autoclassification engine.

pub mod autoclassifier;
pub mod bug_assignment;
pub mod error_summary;
pub mod match_finder;
pub mod match_persister;

pub use autoclassifier::Autoclassifier;
pub use bug_assignment::BugAssignment;
pub use match_finder::{find_all_matches, find_best_matches, select_best};
pub use match_persister::MatchPersister;

/// The minimum goodness of match needed to ever mark a best classification.
pub const AUTOCLASSIFY_CUTOFF_RATIO: f64 = 0.7;

/// The bar above which an error counts as conclusively classified for
/// job-level completion purposes.
pub const AUTOCLASSIFY_GOOD_ENOUGH_RATIO: f64 = 0.9;
