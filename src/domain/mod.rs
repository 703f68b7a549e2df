// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod achievement;
pub mod movie;
pub mod paging;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::{CatalogEndpoint, CatalogQuery, DateRange, ImageUrlBuilder, MovieItem, MovieListType};

// Paging Domain
pub use paging::{validate_page_state, PageResult, PageState, MAX_CATALOG_PAGES};

// Achievement Domain
pub use achievement::{
    evaluate, validate_activity, validate_definitions, AchievementDefinition,
    AchievementProgress, Activity, ActivityCounters, Counter, UnlockedAchievement, ACHIEVEMENTS,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
