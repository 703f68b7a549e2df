// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO achievement evaluation
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod achievement_repository;
pub mod activity_repository;

pub use achievement_repository::{AchievementRepository, SqliteAchievementRepository};
pub use activity_repository::{ActivityRepository, SqliteActivityRepository};
