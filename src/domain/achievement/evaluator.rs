use std::collections::HashSet;

use super::definitions::ACHIEVEMENTS;
use super::entity::ActivityCounters;

/// Returns the achievements whose requirements hold and that are not yet
/// unlocked.
///
/// Pure and infallible. The result carries no ordering.
pub fn evaluate(
    counters: &ActivityCounters,
    already_unlocked: &HashSet<String>,
) -> HashSet<String> {
    ACHIEVEMENTS
        .iter()
        .filter(|definition| !already_unlocked.contains(definition.id))
        .filter(|definition| definition.is_satisfied_by(counters))
        .map(|definition| definition.id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_no_activity_unlocks_nothing() {
        let counters = ActivityCounters::default();
        assert!(evaluate(&counters, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_first_list_add_unlocks_first_add_mylist() {
        let counters = ActivityCounters {
            my_list_count: 1,
            ..Default::default()
        };
        let result = evaluate(&counters, &HashSet::new());
        assert!(result.contains("FIRST_ADD_MYLIST"));
        assert!(!result.contains("MYLIST_5"));
    }

    #[test]
    fn test_already_unlocked_is_excluded() {
        let counters = ActivityCounters {
            my_list_count: 5,
            ..Default::default()
        };
        let result = evaluate(&counters, &unlocked(&["FIRST_ADD_MYLIST"]));
        assert!(result.contains("MYLIST_5"));
        assert!(!result.contains("FIRST_ADD_MYLIST"));
    }

    #[test]
    fn test_trivia_total_score_threshold_is_inclusive() {
        let at_threshold = ActivityCounters {
            trivia_total_score: 10_000,
            ..Default::default()
        };
        assert!(evaluate(&at_threshold, &HashSet::new()).contains("TRIVIA_TOTAL_SCORE_100"));

        let below = ActivityCounters {
            trivia_total_score: 9_999,
            ..Default::default()
        };
        assert!(!evaluate(&below, &HashSet::new()).contains("TRIVIA_TOTAL_SCORE_100"));
    }

    #[test]
    fn test_review_and_streak_thresholds() {
        let counters = ActivityCounters {
            reviews_count: 15,
            trivia_longest_streak: 10,
            ..Default::default()
        };
        let result = evaluate(&counters, &HashSet::new());
        for id in ["FIRST_REVIEW", "REVIEW_PRO_15", "TRIVIA_STREAK_5", "TRIVIA_STREAK_10"] {
            assert!(result.contains(id), "expected {} to unlock", id);
        }
    }

    #[test]
    fn test_combined_requirements_need_every_counter() {
        let almost = ActivityCounters {
            my_list_count: 25,
            ratings_count: 50,
            reviews_count: 14,
            ..Default::default()
        };
        assert!(!evaluate(&almost, &HashSet::new()).contains("CINEPHILE"));

        let complete = ActivityCounters {
            reviews_count: 15,
            ..almost
        };
        assert!(evaluate(&complete, &HashSet::new()).contains("CINEPHILE"));
    }

    #[test]
    fn test_reevaluation_is_idempotent() {
        let counters = ActivityCounters {
            my_list_count: 30,
            ratings_count: 2,
            trivia_longest_streak: 6,
            ..Default::default()
        };
        let first = evaluate(&counters, &HashSet::new());
        assert!(!first.is_empty());

        let second = evaluate(&counters, &first);
        assert!(second.is_empty());
    }
}
