// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::domain::{MovieItem, MovieListType, PageResult, UnlockedAchievement};
use crate::services::AchievementStatus;

// ============================================================================
// CATALOG DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadMoviePageDto {
    pub list_type: String,
    pub page: Option<u32>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePageDto {
    pub list_type: String,
    pub items: Vec<MovieDto>,
    pub current_page: u32,
    pub total_pages: u32,
    pub can_load_more: bool,
}

impl MoviePageDto {
    pub fn new(list_type: MovieListType, result: PageResult, can_load_more: bool) -> Self {
        Self {
            list_type: list_type.to_string(),
            items: result.items.into_iter().map(MovieDto::from).collect(),
            current_page: result.current_page,
            total_pages: result.total_pages,
            can_load_more,
        }
    }
}

// ============================================================================
// ACHIEVEMENT DTOs
// ============================================================================

/// Flat activity payload; `kind` picks which optional fields are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordActivityDto {
    pub user_id: String,
    pub kind: String,
    pub genre_ids: Option<Vec<u32>>,
    pub decade: Option<u16>,
    pub correct: Option<bool>,
    pub points: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockedAchievementDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub secret: bool,
    pub unlocked: bool,
    pub unlocked_at: Option<String>,
}

// ============================================================================
// RESPONSE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// CONVERSION HELPERS (Domain → DTO)
// ============================================================================

impl From<MovieItem> for MovieDto {
    fn from(movie: MovieItem) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            poster_url: movie.poster_url,
            backdrop_url: movie.backdrop_url,
            vote_average: movie.vote_average,
            release_date: movie.release_date,
            overview: movie.overview,
        }
    }
}

impl From<UnlockedAchievement> for UnlockedAchievementDto {
    fn from(achievement: UnlockedAchievement) -> Self {
        Self {
            id: achievement.id,
            name: achievement.name,
            description: achievement.description,
            unlocked_at: achievement.unlocked_at.to_rfc3339(),
        }
    }
}

impl From<AchievementStatus> for AchievementDto {
    fn from(status: AchievementStatus) -> Self {
        Self {
            id: status.id,
            name: status.name,
            description: status.description,
            secret: status.secret,
            unlocked: status.unlocked,
            unlocked_at: status.unlocked_at.map(|d| d.to_rfc3339()),
        }
    }
}
