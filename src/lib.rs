// src/lib.rs
// MovieHub - movie discovery core
//
// Architecture:
// - Domain-centric: list types, paging state and achievement rules live in domain
// - Services own the stateful parts: paged sources and activity tracking
// - Event-driven: services announce loads and unlocks on the event bus
// - Explicit: No implicit behavior, no magic
// - Application Layer: UI/CLI boundary

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    evaluate,
    validate_activity,
    validate_definitions,
    validate_page_state,
    // Achievements
    AchievementDefinition,
    AchievementProgress,
    Activity,
    ActivityCounters,
    // Movies
    CatalogQuery,
    Counter,
    ImageUrlBuilder,
    MovieItem,
    MovieListType,
    // Paging
    PageResult,
    PageState,
    UnlockedAchievement,
    ACHIEVEMENTS,
    MAX_CATALOG_PAGES,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult, CatalogError};

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::AppConfig;

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    AchievementUnlocked,
    ActivityRecorded,
    DomainEvent,
    EventBus,
    EventLogEntry,
    MoviePageLoaded,
    MovieSourceReleased,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    AchievementRepository,
    ActivityRepository,
    SqliteAchievementRepository,
    SqliteActivityRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AchievementService,
    AchievementStatus,
    LoadSignal,
    MovieCatalogService,
    PagedMovieSource,
    SourceStats,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

// Re-export application submodules
pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{CatalogApi, CatalogMovie, CatalogPage, TmdbClient};
