use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Points a correct trivia answer is worth when the game does not say otherwise
pub const DEFAULT_TRIVIA_POINTS: u32 = 100;

/// A user action that moves activity counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activity {
    AddedToMyList,
    /// List size never drops below zero
    RemovedFromMyList,
    Rated,
    /// Counts once overall and once for each genre of the movie
    Reviewed { genre_ids: Vec<u32> },
    SearchFilterUsed,
    /// `decade` is the first year, e.g. 1980. Repeats are not counted.
    DecadeSearched { decade: u16 },
    /// A correct answer extends the current streak and adds `points`;
    /// a wrong one resets the streak.
    TriviaAnswered { correct: bool, points: u32 },
}

impl Activity {
    pub fn trivia_answer(correct: bool) -> Self {
        Activity::TriviaAnswered {
            correct,
            points: DEFAULT_TRIVIA_POINTS,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Activity::AddedToMyList => "added_to_my_list",
            Activity::RemovedFromMyList => "removed_from_my_list",
            Activity::Rated => "rated",
            Activity::Reviewed { .. } => "reviewed",
            Activity::SearchFilterUsed => "search_filter_used",
            Activity::DecadeSearched { .. } => "decade_searched",
            Activity::TriviaAnswered { .. } => "trivia_answered",
        }
    }
}

/// Validates an activity before it touches any counter
pub fn validate_activity(activity: &Activity) -> DomainResult<()> {
    if let Activity::DecadeSearched { decade } = activity {
        if decade % 10 != 0 || *decade < 1870 {
            return Err(DomainError::InvariantViolation(format!(
                "Decade must be the first year of a decade, got {}",
                decade
            )));
        }
    }
    Ok(())
}
