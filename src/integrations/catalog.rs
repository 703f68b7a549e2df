// src/integrations/catalog.rs
//
// The seam between paging logic and the remote catalog.
//
// Implementations only fetch and decode; they never touch page state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::CatalogQuery;
use crate::error::AppResult;

/// One page of a catalog listing, as the catalog sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

/// Raw movie record from a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches `page` (1-based) of the listing described by `query`.
    async fn fetch_page(&self, query: &CatalogQuery, page: u32) -> AppResult<CatalogPage>;
}
