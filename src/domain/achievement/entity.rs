use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Activity counters an achievement can depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    MyList,
    Ratings,
    Reviews,
    ReviewsByGenre,
    SearchFilterUses,
    DecadesSearched,
    TriviaLongestStreak,
    TriviaTotalScore,
}

/// Read-only snapshot of a user's activity.
///
/// Missing fields deserialize as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityCounters {
    pub my_list_count: u64,
    pub ratings_count: u64,
    pub reviews_count: u64,
    /// Reviews written in the user's most-reviewed genre
    pub reviews_by_genre_count: u64,
    pub search_filter_uses_count: u64,
    /// Distinct decades the user has browsed
    pub decades_searched_count: u64,
    pub trivia_longest_streak: u64,
    pub trivia_total_score: u64,
}

impl ActivityCounters {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::MyList => self.my_list_count,
            Counter::Ratings => self.ratings_count,
            Counter::Reviews => self.reviews_count,
            Counter::ReviewsByGenre => self.reviews_by_genre_count,
            Counter::SearchFilterUses => self.search_filter_uses_count,
            Counter::DecadesSearched => self.decades_searched_count,
            Counter::TriviaLongestStreak => self.trivia_longest_streak,
            Counter::TriviaTotalScore => self.trivia_total_score,
        }
    }
}

/// `counter >= threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub counter: Counter,
    pub threshold: u64,
}

impl Requirement {
    pub const fn at_least(counter: Counter, threshold: u64) -> Self {
        Self { counter, threshold }
    }

    pub fn is_met(&self, counters: &ActivityCounters) -> bool {
        counters.get(self.counter) >= self.threshold
    }
}

/// Static description of an achievement. Unlocks when every requirement holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Secret achievements are not described until unlocked
    pub secret: bool,
    pub requirements: &'static [Requirement],
}

impl AchievementDefinition {
    pub fn is_satisfied_by(&self, counters: &ActivityCounters) -> bool {
        self.requirements.iter().all(|r| r.is_met(counters))
    }
}

/// Per-user unlock record. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub unlocked_ids: HashSet<String>,
    pub unlocked_dates: HashMap<String, DateTime<Utc>>,
}

impl AchievementProgress {
    pub fn is_unlocked(&self, achievement_id: &str) -> bool {
        self.unlocked_ids.contains(achievement_id)
    }

    /// Records an unlock; an existing unlock keeps its original date.
    pub fn record_unlock(&mut self, achievement_id: &str, unlocked_at: DateTime<Utc>) -> bool {
        if !self.unlocked_ids.insert(achievement_id.to_string()) {
            return false;
        }
        self.unlocked_dates
            .insert(achievement_id.to_string(), unlocked_at);
        true
    }

    pub fn unlocked_at(&self, achievement_id: &str) -> Option<DateTime<Utc>> {
        self.unlocked_dates.get(achievement_id).copied()
    }
}

/// An unlock that just happened, ready for a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_counters_default_to_zero() {
        let counters: ActivityCounters =
            serde_json::from_str(r#"{"my_list_count": 3}"#).unwrap();
        assert_eq!(counters.my_list_count, 3);
        assert_eq!(counters.trivia_total_score, 0);
    }

    #[test]
    fn test_progress_keeps_first_unlock_date() {
        let mut progress = AchievementProgress::default();
        let first = Utc::now();
        let later = first + chrono::Duration::hours(1);

        assert!(progress.record_unlock("FIRST_RATING", first));
        assert!(!progress.record_unlock("FIRST_RATING", later));
        assert_eq!(progress.unlocked_at("FIRST_RATING"), Some(first));
    }
}
