//! Explicit matcher registration.

use std::sync::Arc;

use crate::domain::ports::{BugSearch, ClassifiedFailureRepository, Matcher, TextLogErrorRepository};
use crate::matchers::{BugSuggestionMatcher, CrashSignatureMatcher, PreciseTextMatcher};

/// An ordered set of matchers, built at startup.
///
/// Only values implementing `Matcher` can be registered, so nothing else
/// can accidentally end up in the dispatch set. Order carries no semantic
/// weight beyond "all run": candidates are pooled and ties resolved by
/// classified-failure id, never by registration order.
#[derive(Clone, Default)]
pub struct MatcherRegistry {
    matchers: Vec<Arc<dyn Matcher>>,
}

impl MatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard matcher set: exact text, crash signature, and
    /// bug-search suggestion.
    pub fn with_default_matchers(
        error_repo: Arc<dyn TextLogErrorRepository>,
        classified_failure_repo: Arc<dyn ClassifiedFailureRepository>,
        bug_search: Arc<dyn BugSearch>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PreciseTextMatcher::new(error_repo.clone())));
        registry.register(Arc::new(CrashSignatureMatcher::new(error_repo)));
        registry.register(Arc::new(BugSuggestionMatcher::new(
            bug_search,
            classified_failure_repo,
        )));
        registry
    }

    pub fn register(&mut self, matcher: Arc<dyn Matcher>) {
        self.matchers.push(matcher);
    }

    pub fn matchers(&self) -> &[Arc<dyn Matcher>] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
