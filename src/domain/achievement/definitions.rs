// src/domain/achievement/definitions.rs
//
// The achievement table. Process-wide, immutable.

use super::entity::{AchievementDefinition, Counter, Requirement};

pub static ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: "FIRST_ADD_MYLIST",
        name: "First Pick",
        description: "Add a movie to your list",
        secret: false,
        requirements: &[Requirement::at_least(Counter::MyList, 1)],
    },
    AchievementDefinition {
        id: "MYLIST_5",
        name: "Watchlist Starter",
        description: "Keep 5 movies in your list",
        secret: false,
        requirements: &[Requirement::at_least(Counter::MyList, 5)],
    },
    AchievementDefinition {
        id: "MYLIST_25",
        name: "Collector",
        description: "Keep 25 movies in your list",
        secret: false,
        requirements: &[Requirement::at_least(Counter::MyList, 25)],
    },
    AchievementDefinition {
        id: "FIRST_RATING",
        name: "Critic in Training",
        description: "Rate your first movie",
        secret: false,
        requirements: &[Requirement::at_least(Counter::Ratings, 1)],
    },
    AchievementDefinition {
        id: "RATINGS_50",
        name: "Seasoned Rater",
        description: "Rate 50 movies",
        secret: false,
        requirements: &[Requirement::at_least(Counter::Ratings, 50)],
    },
    AchievementDefinition {
        id: "FIRST_REVIEW",
        name: "Opening Night",
        description: "Write your first review",
        secret: false,
        requirements: &[Requirement::at_least(Counter::Reviews, 1)],
    },
    AchievementDefinition {
        id: "REVIEW_PRO_15",
        name: "Review Pro",
        description: "Write 15 reviews",
        secret: false,
        requirements: &[Requirement::at_least(Counter::Reviews, 15)],
    },
    AchievementDefinition {
        id: "GENRE_SPECIALIST",
        name: "Genre Specialist",
        description: "Review 5 movies of the same genre",
        secret: true,
        requirements: &[Requirement::at_least(Counter::ReviewsByGenre, 5)],
    },
    AchievementDefinition {
        id: "FILTER_EXPLORER",
        name: "Filter Explorer",
        description: "Use search filters 10 times",
        secret: false,
        requirements: &[Requirement::at_least(Counter::SearchFilterUses, 10)],
    },
    AchievementDefinition {
        id: "TIME_TRAVELER",
        name: "Time Traveler",
        description: "Browse movies from 5 different decades",
        secret: true,
        requirements: &[Requirement::at_least(Counter::DecadesSearched, 5)],
    },
    AchievementDefinition {
        id: "TRIVIA_STREAK_5",
        name: "On a Roll",
        description: "Answer 5 trivia questions in a row correctly",
        secret: false,
        requirements: &[Requirement::at_least(Counter::TriviaLongestStreak, 5)],
    },
    AchievementDefinition {
        id: "TRIVIA_STREAK_10",
        name: "Unstoppable",
        description: "Answer 10 trivia questions in a row correctly",
        secret: false,
        requirements: &[Requirement::at_least(Counter::TriviaLongestStreak, 10)],
    },
    AchievementDefinition {
        id: "TRIVIA_TOTAL_SCORE_100",
        name: "Trivia Centurion",
        description: "Score 10,000 trivia points",
        secret: false,
        requirements: &[Requirement::at_least(Counter::TriviaTotalScore, 10_000)],
    },
    AchievementDefinition {
        id: "CINEPHILE",
        name: "Cinephile",
        description: "Collect 25 movies, rate 50 and review 15",
        secret: true,
        requirements: &[
            Requirement::at_least(Counter::MyList, 25),
            Requirement::at_least(Counter::Ratings, 50),
            Requirement::at_least(Counter::Reviews, 15),
        ],
    },
];

pub fn all_definitions() -> &'static [AchievementDefinition] {
    ACHIEVEMENTS
}
