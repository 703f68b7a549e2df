// src/services/movie_catalog_service.rs
//
// Owns one paged source per (list type, sort key) and announces loads
// on the event bus.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{ImageUrlBuilder, MovieItem, MovieListType, PageResult};
use crate::error::AppResult;
use crate::events::{EventBus, MoviePageLoaded, MovieSourceReleased};
use crate::integrations::CatalogApi;
use crate::services::paged_movie_source::{LoadSignal, PagedMovieSource};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    list_type: MovieListType,
    sort_by: Option<String>,
}

impl SourceKey {
    /// Sort keys only distinguish sources on lists that honour them.
    fn new(list_type: MovieListType, sort_by: Option<&str>) -> Self {
        let sort_by = sort_by
            .map(str::trim)
            .filter(|s| !s.is_empty() && list_type.accepts_custom_sort())
            .map(str::to_string);
        Self { list_type, sort_by }
    }
}

pub struct MovieCatalogService {
    api: Arc<dyn CatalogApi>,
    images: ImageUrlBuilder,
    event_bus: Arc<EventBus>,
    sources: Mutex<HashMap<SourceKey, Arc<PagedMovieSource>>>,
}

impl MovieCatalogService {
    pub fn new(api: Arc<dyn CatalogApi>, images: ImageUrlBuilder, event_bus: Arc<EventBus>) -> Self {
        Self {
            api,
            images,
            event_bus,
            sources: Mutex::new(HashMap::new()),
        }
    }

    /// The source for a list, created on first use.
    pub fn source(&self, list_type: MovieListType, sort_by: Option<&str>) -> Arc<PagedMovieSource> {
        let key = SourceKey::new(list_type, sort_by);
        let mut sources = self.lock_sources();
        let source = sources.entry(key).or_insert_with_key(|key| {
            debug!("Creating source for {} (sort: {:?})", key.list_type, key.sort_by);
            Arc::new(PagedMovieSource::new(
                key.list_type,
                key.sort_by.clone(),
                Arc::clone(&self.api),
                self.images.clone(),
            ))
        });
        Arc::clone(source)
    }

    pub async fn load_page(
        &self,
        list_type: MovieListType,
        sort_by: Option<&str>,
        page: u32,
    ) -> AppResult<PageResult> {
        let source = self.source(list_type, sort_by);
        let (result, signal) = source.load_page_with_signal(page).await?;
        self.announce(list_type, &result, signal);
        Ok(result)
    }

    pub async fn load_next(
        &self,
        list_type: MovieListType,
        sort_by: Option<&str>,
    ) -> AppResult<PageResult> {
        let source = self.source(list_type, sort_by);
        let (result, signal) = source.load_next_with_signal().await?;
        self.announce(list_type, &result, signal);
        Ok(result)
    }

    /// Everything loaded so far; empty if the list was never opened.
    pub fn loaded_items(&self, list_type: MovieListType, sort_by: Option<&str>) -> Vec<MovieItem> {
        self.existing(list_type, sort_by)
            .map(|source| source.loaded_items())
            .unwrap_or_default()
    }

    pub fn can_load_more(&self, list_type: MovieListType, sort_by: Option<&str>) -> bool {
        self.existing(list_type, sort_by)
            .map(|source| source.can_load_more())
            .unwrap_or(true)
    }

    /// Drops every source of `list_type`, whatever its sort key.
    /// In-flight loads on them fail with `Cancelled`.
    pub fn release(&self, list_type: MovieListType) -> u32 {
        let released: Vec<Arc<PagedMovieSource>> = {
            let mut sources = self.lock_sources();
            let keys: Vec<SourceKey> = sources
                .keys()
                .filter(|key| key.list_type == list_type)
                .cloned()
                .collect();
            keys.iter().filter_map(|key| sources.remove(key)).collect()
        };

        if released.is_empty() {
            return 0;
        }

        let pages_dropped: u32 = released.iter().map(|source| source.release()).sum();
        info!("Released {} ({} pages dropped)", list_type, pages_dropped);
        self.event_bus
            .emit(MovieSourceReleased::new(list_type, pages_dropped));
        pages_dropped
    }

    /// List types with a live source, in declaration order
    pub fn active_lists(&self) -> Vec<MovieListType> {
        let mut lists: Vec<MovieListType> =
            self.lock_sources().keys().map(|key| key.list_type).collect();
        lists.sort();
        lists.dedup();
        lists
    }

    fn existing(&self, list_type: MovieListType, sort_by: Option<&str>) -> Option<Arc<PagedMovieSource>> {
        self.lock_sources()
            .get(&SourceKey::new(list_type, sort_by))
            .cloned()
    }

    fn announce(&self, list_type: MovieListType, result: &PageResult, signal: LoadSignal) {
        if signal == LoadSignal::Fetched {
            self.event_bus.emit(MoviePageLoaded::new(
                list_type,
                result.current_page,
                result.items.len(),
                result.total_pages,
            ));
        }
    }

    fn lock_sources(&self) -> MutexGuard<'_, HashMap<SourceKey, Arc<PagedMovieSource>>> {
        self.sources.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
