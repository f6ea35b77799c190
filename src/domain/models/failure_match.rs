//! Match evidence domain model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Scored evidence that a text log error corresponds to a classified
/// failure, tagged with the matcher that produced it.
///
/// At most one match may exist per
/// `(text_log_error_id, matcher_name, classified_failure_id)` triple;
/// the storage layer enforces this and re-persisting an identical triple
/// surfaces as `DomainError::DuplicateMatch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureMatch {
    /// Zero until persisted
    pub id: i64,
    pub text_log_error_id: i64,
    pub classified_failure_id: i64,
    pub matcher_name: String,
    /// Goodness of match, 0.0 to 1.0
    pub score: f64,
}

impl FailureMatch {
    /// Build an unsaved match record.
    pub fn unsaved(
        text_log_error_id: i64,
        classified_failure_id: i64,
        matcher_name: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            id: 0,
            text_log_error_id,
            classified_failure_id,
            matcher_name: matcher_name.into(),
            score,
        }
    }
}

/// One candidate produced by a matcher for a single error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Goodness of match, 0.0 to 1.0
    pub score: f64,
    pub classified_failure_id: i64,
}

impl MatchCandidate {
    pub fn new(score: f64, classified_failure_id: i64) -> Self {
        Self {
            score,
            classified_failure_id,
        }
    }
}

/// Edit list for merging one classified failure into another.
///
/// Computed over all match rows of both records loaded up front, so the
/// storage adapter can apply the whole edit inside a single transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Match ids to re-point from the target to the canonical record
    pub repoint_match_ids: Vec<i64>,
    /// Match ids to delete (collision losers)
    pub delete_match_ids: Vec<i64>,
}

impl MergePlan {
    /// Decide the fate of every match row when `target` is merged into
    /// `canonical`.
    ///
    /// Collisions are keyed on `(text_log_error_id, matcher_name)`: when
    /// both records hold a match for the same key, the higher score
    /// survives. Equal scores keep the canonical record's existing row.
    pub fn compute(target_matches: &[FailureMatch], canonical_matches: &[FailureMatch]) -> Self {
        let canonical_by_key: HashMap<(i64, &str), &FailureMatch> = canonical_matches
            .iter()
            .map(|m| ((m.text_log_error_id, m.matcher_name.as_str()), m))
            .collect();

        let mut plan = Self::default();
        for target in target_matches {
            match canonical_by_key.get(&(target.text_log_error_id, target.matcher_name.as_str())) {
                Some(existing) => {
                    if target.score > existing.score {
                        plan.delete_match_ids.push(existing.id);
                        plan.repoint_match_ids.push(target.id);
                    } else {
                        plan.delete_match_ids.push(target.id);
                    }
                }
                None => plan.repoint_match_ids.push(target.id),
            }
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(id: i64, error_id: i64, cf_id: i64, matcher: &str, score: f64) -> FailureMatch {
        FailureMatch {
            id,
            text_log_error_id: error_id,
            classified_failure_id: cf_id,
            matcher_name: matcher.to_string(),
            score,
        }
    }

    #[test]
    fn test_no_collision_repoints_everything() {
        let target = vec![saved(1, 10, 2, "precise", 0.9)];
        let plan = MergePlan::compute(&target, &[]);
        assert_eq!(plan.repoint_match_ids, vec![1]);
        assert!(plan.delete_match_ids.is_empty());
    }

    #[test]
    fn test_collision_keeps_higher_score() {
        // Target's 0.8 beats canonical's 0.7: canonical row is dropped,
        // the target row migrates.
        let target = vec![saved(2, 10, 2, "m1", 0.8)];
        let canonical = vec![saved(1, 10, 1, "m1", 0.7)];
        let plan = MergePlan::compute(&target, &canonical);
        assert_eq!(plan.repoint_match_ids, vec![2]);
        assert_eq!(plan.delete_match_ids, vec![1]);
    }

    #[test]
    fn test_collision_loser_is_discarded() {
        let target = vec![saved(2, 10, 2, "m1", 0.7)];
        let canonical = vec![saved(1, 10, 1, "m1", 0.8)];
        let plan = MergePlan::compute(&target, &canonical);
        assert!(plan.repoint_match_ids.is_empty());
        assert_eq!(plan.delete_match_ids, vec![2]);
    }

    #[test]
    fn test_equal_scores_keep_canonical_row() {
        let target = vec![saved(2, 10, 2, "m1", 0.8)];
        let canonical = vec![saved(1, 10, 1, "m1", 0.8)];
        let plan = MergePlan::compute(&target, &canonical);
        assert!(plan.repoint_match_ids.is_empty());
        assert_eq!(plan.delete_match_ids, vec![2]);
    }

    #[test]
    fn test_different_matchers_do_not_collide() {
        let target = vec![saved(2, 10, 2, "crash_signature", 0.6)];
        let canonical = vec![saved(1, 10, 1, "precise", 0.9)];
        let plan = MergePlan::compute(&target, &canonical);
        assert_eq!(plan.repoint_match_ids, vec![2]);
        assert!(plan.delete_match_ids.is_empty());
    }
}
