//! Concrete matchers and the registry that dispatches them.

pub mod bug_suggestion;
pub mod crash_signature;
pub mod precise;
pub mod registry;

pub use bug_suggestion::BugSuggestionMatcher;
pub use crash_signature::CrashSignatureMatcher;
pub use precise::PreciseTextMatcher;
pub use registry::MatcherRegistry;
