// src/integrations/tmdb/client.rs
//
// TMDB API Integration
//
// ARCHITECTURE:
// - REST client for the TMDB v3 API
// - Handles authentication and rate limiting
// - Decodes listings into catalog DTOs (NO page state)
// - Used by PagedMovieSource through the CatalogApi trait

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::{TmdbConfig, TmdbCredentials};
use crate::domain::CatalogQuery;
use crate::error::{AppError, AppResult};
use crate::integrations::catalog::{CatalogApi, CatalogPage};

const API_VERSION: &str = "3";

/// Error body TMDB sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

/// Rate limiter state
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    async fn wait_if_needed(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// TMDB API Client
pub struct TmdbClient {
    base_url: String,
    language: String,
    http_client: Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    credentials: TmdbCredentials,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ExternalService(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            http_client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(Duration::from_millis(
                config.min_request_interval_ms,
            )))),
            credentials: config.credentials.clone(),
        })
    }

    fn endpoint_url(&self, query: &CatalogQuery) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, query.endpoint.path())
    }

    /// Query string for one page of `query`.
    ///
    /// Listing endpoints only take the page and language; filters and the
    /// sort key go to the discover endpoint.
    pub(crate) fn query_params(
        query: &CatalogQuery,
        page: u32,
        language: &str,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("language", language.to_string())];

        if !query.endpoint.accepts_filters() {
            return params;
        }

        if let Some(genre_id) = query.genre_id {
            params.push(("with_genres", genre_id.to_string()));
        }
        if let Some(range) = query.release_dates {
            params.push(("primary_release_date.gte", range.from.format("%Y-%m-%d").to_string()));
            params.push(("primary_release_date.lte", range.to.format("%Y-%m-%d").to_string()));
        }
        if let Some(person_id) = query.person_id {
            params.push(("with_people", person_id.to_string()));
        }
        if let Some(min_vote) = query.min_vote_average {
            params.push(("vote_average.gte", min_vote.to_string()));
        }
        if let Some(sort_by) = &query.sort_by {
            params.push(("sort_by", sort_by.clone()));
        }
        params
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    async fn get_json<T>(&self, url: &str, params: &[(&'static str, String)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        {
            let mut limiter = self.rate_limiter.lock().await;
            limiter.wait_if_needed().await;
        }

        let mut request = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(params);

        request = match &self.credentials {
            TmdbCredentials::ApiKey(key) => request.query(&[("api_key", key)]),
            TmdbCredentials::AccessToken(token) => {
                request.header(header::AUTHORIZATION, format!("Bearer {}", token))
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("TMDB request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<TmdbErrorBody>()
                .await
                .ok()
                .and_then(|body| body.status_message)
                .unwrap_or_else(|| "no details".to_string());
            warn!("TMDB returned {} for {}: {}", status, url, message);
            return Err(AppError::ExternalService(format!(
                "TMDB returned status {}: {}",
                status, message
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse TMDB response: {}", e)))
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_page(&self, query: &CatalogQuery, page: u32) -> AppResult<CatalogPage> {
        let url = self.endpoint_url(query);
        let params = Self::query_params(query, page, &self.language);
        debug!("GET {} page={}", url, page);
        self.get_json(&url, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MovieListType;

    fn client() -> TmdbClient {
        TmdbClient::new(&TmdbConfig::new(TmdbCredentials::ApiKey("test_key".to_string()))).unwrap()
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client();
        assert_eq!(
            client.endpoint_url(&MovieListType::Popular.query(None)),
            "https://api.themoviedb.org/3/movie/popular"
        );
        assert_eq!(
            client.endpoint_url(&MovieListType::HorrorMovies.query(None)),
            "https://api.themoviedb.org/3/discover/movie"
        );
    }

    #[test]
    fn test_listing_params_skip_filters() {
        let params = TmdbClient::query_params(&MovieListType::TopRated.query(None), 2, "en-US");
        assert_eq!(param(&params, "page"), Some("2"));
        assert_eq!(param(&params, "language"), Some("en-US"));
        assert_eq!(param(&params, "sort_by"), None);
    }

    #[test]
    fn test_discover_params_for_decade() {
        let params = TmdbClient::query_params(
            &MovieListType::EightiesMovies.query(Some("vote_average.desc")),
            1,
            "de-DE",
        );
        assert_eq!(param(&params, "primary_release_date.gte"), Some("1980-01-01"));
        assert_eq!(param(&params, "primary_release_date.lte"), Some("1989-12-31"));
        assert_eq!(param(&params, "sort_by"), Some("vote_average.desc"));
        assert_eq!(param(&params, "with_genres"), None);
    }

    #[test]
    fn test_discover_params_for_person_and_genre() {
        let carpenter = TmdbClient::query_params(&MovieListType::CarpenterMovies.query(None), 3, "en-US");
        assert_eq!(param(&carpenter, "with_people"), Some("11770"));
        assert_eq!(param(&carpenter, "sort_by"), Some("release_date.desc"));

        let mut action_query = MovieListType::ActionMovies.query(None);
        action_query.min_vote_average = Some(7.5);
        let action = TmdbClient::query_params(&action_query, 1, "en-US");
        assert_eq!(param(&action, "with_genres"), Some("28"));
        assert_eq!(param(&action, "vote_average.gte"), Some("7.5"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let mut config = TmdbConfig::new(TmdbCredentials::AccessToken("token".to_string()));
        config.base_url = "http://localhost:8080/".to_string();
        let client = TmdbClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint_url(&MovieListType::NowPlaying.query(None)),
            "http://localhost:8080/3/movie/now_playing"
        );
    }

    #[tokio::test]
    async fn test_rate_limiter_spaces_requests() {
        let mut limiter = RateLimiter::new(Duration::from_millis(50));
        let start = Instant::now();
        limiter.wait_if_needed().await;
        limiter.wait_if_needed().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
