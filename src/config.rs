// src/config.rs
//
// Runtime configuration
//
// Everything comes from environment variables; `main` loads an optional
// `.env` first. Only the catalog credentials are mandatory.

use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::ImageUrlBuilder;
use crate::error::{AppError, AppResult};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_POSTER_SIZE: &str = "w500";
pub const DEFAULT_BACKDROP_SIZE: &str = "w780";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 250;

/// How requests to the catalog authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmdbCredentials {
    /// v3 key, sent as the `api_key` query parameter
    ApiKey(String),
    /// v4 read access token, sent as a bearer token
    AccessToken(String),
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub credentials: TmdbCredentials,
    pub language: String,
    pub timeout_secs: u64,
    pub min_request_interval_ms: u64,
}

impl TmdbConfig {
    pub fn new(credentials: TmdbCredentials) -> Self {
        Self {
            base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            credentials,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_request_interval_ms: DEFAULT_MIN_REQUEST_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub base_url: String,
    pub poster_size: String,
    pub backdrop_size: String,
}

impl ImageConfig {
    pub fn url_builder(&self) -> ImageUrlBuilder {
        ImageUrlBuilder::new(&self.base_url, &self.poster_size, &self.backdrop_size)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            poster_size: DEFAULT_POSTER_SIZE.to_string(),
            backdrop_size: DEFAULT_BACKDROP_SIZE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub images: ImageConfig,
    pub database_path: PathBuf,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (environment, test map).
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let credentials = match (value("TMDB_ACCESS_TOKEN"), value("TMDB_API_KEY")) {
            (Some(token), _) => TmdbCredentials::AccessToken(token),
            (None, Some(key)) => TmdbCredentials::ApiKey(key),
            (None, None) => {
                return Err(AppError::Config(
                    "Set TMDB_API_KEY or TMDB_ACCESS_TOKEN".to_string(),
                ))
            }
        };

        let tmdb = TmdbConfig {
            base_url: value("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string()),
            credentials,
            language: value("TMDB_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            timeout_secs: parse_or("TMDB_TIMEOUT_SECS", value("TMDB_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?,
            min_request_interval_ms: parse_or(
                "TMDB_MIN_INTERVAL_MS",
                value("TMDB_MIN_INTERVAL_MS"),
                DEFAULT_MIN_REQUEST_INTERVAL_MS,
            )?,
        };

        let images = ImageConfig {
            base_url: value("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            poster_size: value("TMDB_POSTER_SIZE").unwrap_or_else(|| DEFAULT_POSTER_SIZE.to_string()),
            backdrop_size: value("TMDB_BACKDROP_SIZE")
                .unwrap_or_else(|| DEFAULT_BACKDROP_SIZE.to_string()),
        };

        let database_path = match value("MOVIEHUB_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => crate::db::get_database_path()?,
        };

        Ok(Self {
            tmdb,
            images,
            database_path,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> AppResult<T> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, raw))),
        None => Ok(default),
    }
}
