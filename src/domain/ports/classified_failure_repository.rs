use crate::domain::errors::DomainResult;
use crate::domain::models::ClassifiedFailure;
use async_trait::async_trait;

/// Repository port for classified failure persistence operations.
#[async_trait]
pub trait ClassifiedFailureRepository: Send + Sync {
    /// Create a new classified failure, returning it with its assigned id
    async fn create(&self, bug_number: Option<i64>) -> DomainResult<ClassifiedFailure>;

    /// Get a classified failure by id
    async fn get(&self, id: i64) -> DomainResult<Option<ClassifiedFailure>>;

    /// The classified failure carrying `bug_number`, if any
    async fn for_bug(&self, bug_number: i64) -> DomainResult<Option<ClassifiedFailure>>;

    /// The classified failure carrying `bug_number`, created if absent
    async fn get_or_create_for_bug(&self, bug_number: i64) -> DomainResult<ClassifiedFailure>;

    /// Assign a bug number directly, without merge handling. Callers that
    /// need the one-record-per-bug invariant go through
    /// `BugAssignment::set_bug` instead.
    async fn set_bug_number(&self, id: i64, bug_number: i64) -> DomainResult<ClassifiedFailure>;

    /// Merge `target_id` into `canonical_id` atomically: re-point match
    /// rows, resolve per-(error, matcher) collisions by score, re-point
    /// best classifications, and delete the target record. Either every
    /// edit commits or none do.
    async fn merge_into(&self, target_id: i64, canonical_id: i64) -> DomainResult<()>;
}
