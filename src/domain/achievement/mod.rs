//! Achievement Invariants:
//!
//! 1. Definitions are static and loaded once
//! 2. Evaluation is pure: counters in, newly unlocked ids out
//! 3. Unlocks are one-time events and are never revoked
//! 4. Persisting an unlock is the caller's job

pub mod activity;
pub mod definitions;
pub mod entity;
pub mod evaluator;
pub mod invariants;

pub use activity::{validate_activity, Activity, DEFAULT_TRIVIA_POINTS};
pub use definitions::{all_definitions, ACHIEVEMENTS};
pub use entity::{
    AchievementDefinition, AchievementProgress, ActivityCounters, Counter, Requirement,
    UnlockedAchievement,
};
pub use evaluator::evaluate;
pub use invariants::validate_definitions;
