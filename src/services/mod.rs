// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod achievement_service;
pub mod movie_catalog_service;
pub mod paged_movie_source;

pub use achievement_service::{AchievementService, AchievementStatus};

pub use movie_catalog_service::MovieCatalogService;

pub use paged_movie_source::{LoadSignal, PagedMovieSource, SourceStats};
