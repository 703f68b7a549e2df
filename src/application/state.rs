// src/application/state.rs

use log::info;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, get_connection, initialize_database, verify_database_integrity,
    ConnectionPool,
};
use crate::domain::{validate_definitions, ACHIEVEMENTS};
use crate::error::AppResult;
use crate::events::{create_event_bus, EventBus};
use crate::integrations::{CatalogApi, TmdbClient};
use crate::repositories::{SqliteAchievementRepository, SqliteActivityRepository};
use crate::services::{AchievementService, MovieCatalogService};

/// Shared application state.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub pool: Arc<ConnectionPool>,
    pub catalog_service: Arc<MovieCatalogService>,
    pub achievement_service: Arc<AchievementService>,
}

impl AppState {
    /// Opens the database, runs migrations and wires every service.
    pub fn initialize(config: AppConfig) -> AppResult<Self> {
        info!("Opening database at {}", config.database_path.display());
        let pool = Arc::new(create_connection_pool(&config.database_path)?);
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
            verify_database_integrity(&conn)?;
        }
        validate_definitions(ACHIEVEMENTS)?;

        let api: Arc<dyn CatalogApi> = Arc::new(TmdbClient::new(&config.tmdb)?);
        Ok(Self::with_parts(pool, api, &config))
    }

    /// Wires the services over an existing pool and catalog client.
    pub fn with_parts(pool: Arc<ConnectionPool>, api: Arc<dyn CatalogApi>, config: &AppConfig) -> Self {
        let event_bus = Arc::new(create_event_bus());

        let catalog_service = Arc::new(MovieCatalogService::new(
            api,
            config.images.url_builder(),
            Arc::clone(&event_bus),
        ));

        let achievement_service = Arc::new(AchievementService::new(
            Arc::new(SqliteActivityRepository::new(Arc::clone(&pool))),
            Arc::new(SqliteAchievementRepository::new(Arc::clone(&pool))),
            Arc::clone(&event_bus),
        ));

        Self {
            event_bus,
            pool,
            catalog_service,
            achievement_service,
        }
    }
}
