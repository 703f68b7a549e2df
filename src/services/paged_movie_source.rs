// src/services/paged_movie_source.rs
//
// Paged Movie Source - incremental loading of one catalog slice
//
// RULES:
// - One source per (list type, sort key), owned by the consuming view
// - Loads on one source are single-flight: the gate is held for the
//   whole network call, and a waiter that finds its page loaded gets
//   the cached copy
// - Snapshots never wait on the network
// - A failed or cancelled load never touches loaded pages

use log::{debug, error, info, warn};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    validate_page_state, CatalogQuery, ImageUrlBuilder, MovieItem, MovieListType, PageResult,
    PageState, MAX_CATALOG_PAGES,
};
use crate::error::{AppError, AppResult, CatalogError};
use crate::integrations::{CatalogApi, CatalogMovie};

/// How a successful load was served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSignal {
    /// One network call was made
    Fetched,
    /// The page was already loaded (possibly by a concurrent caller); no call made
    DuplicateRequestSuppressed,
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub network_calls: u64,
    pub suppressed_duplicates: u64,
}

pub struct PagedMovieSource {
    list_type: MovieListType,
    query: CatalogQuery,
    api: Arc<dyn CatalogApi>,
    images: ImageUrlBuilder,
    state: RwLock<PageState>,
    load_gate: Mutex<()>,
    cancel: CancellationToken,
    network_calls: AtomicU64,
    suppressed_duplicates: AtomicU64,
}

impl fmt::Debug for PagedMovieSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("PagedMovieSource")
            .field("list_type", &self.list_type)
            .field("query", &self.query)
            .field("current_page", &state.current_page())
            .field("total_pages", &state.total_pages())
            .field("loaded_items", &state.loaded_items().len())
            .field("released", &self.cancel.is_cancelled())
            .field("stats", &self.stats())
            .finish()
    }
}

impl PagedMovieSource {
    pub fn new(
        list_type: MovieListType,
        sort_by: Option<String>,
        api: Arc<dyn CatalogApi>,
        images: ImageUrlBuilder,
    ) -> Self {
        let query = list_type.query(sort_by.as_deref());
        Self {
            list_type,
            state: RwLock::new(PageState::new(list_type, query.sort_by.clone())),
            query,
            api,
            images,
            load_gate: Mutex::new(()),
            cancel: CancellationToken::new(),
            network_calls: AtomicU64::new(0),
            suppressed_duplicates: AtomicU64::new(0),
        }
    }

    pub fn list_type(&self) -> MovieListType {
        self.list_type
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Loads `page` (1-based) and appends its items.
    pub async fn load_page(&self, page: u32) -> AppResult<PageResult> {
        self.load_page_with_signal(page).await.map(|(result, _)| result)
    }

    /// Loads the first page not loaded yet.
    pub async fn load_next(&self) -> AppResult<PageResult> {
        self.load_next_with_signal().await.map(|(result, _)| result)
    }

    pub async fn load_next_with_signal(&self) -> AppResult<(PageResult, LoadSignal)> {
        let next = self.next_page();
        self.load_page_with_signal(next).await
    }

    /// Like [`load_page`](Self::load_page), also reporting whether a
    /// network call was made.
    pub async fn load_page_with_signal(&self, page: u32) -> AppResult<(PageResult, LoadSignal)> {
        self.ensure_open(page)?;

        let cached = self.read_state().check_requestable(page)?;
        if let Some(cached) = cached {
            return Ok((self.suppressed(page, cached), LoadSignal::DuplicateRequestSuppressed));
        }

        let _gate = tokio::select! {
            guard = self.load_gate.lock() => guard,
            _ = self.cancel.cancelled() => return Err(CatalogError::Cancelled { page }.into()),
        };

        // A concurrent leader may have loaded the page while we waited
        self.ensure_open(page)?;
        let cached = self.read_state().check_requestable(page)?;
        if let Some(cached) = cached {
            return Ok((self.suppressed(page, cached), LoadSignal::DuplicateRequestSuppressed));
        }

        self.network_calls.fetch_add(1, Ordering::Relaxed);
        debug!("{}: fetching page {}", self.list_type, page);

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("{}: load of page {} cancelled", self.list_type, page);
                return Err(CatalogError::Cancelled { page }.into());
            }
            result = self.api.fetch_page(&self.query, page) => result,
        };

        let catalog_page = fetched.map_err(|e| {
            warn!("{}: page {} failed: {}", self.list_type, page, e);
            AppError::Catalog(CatalogError::LoadError {
                page,
                message: e.to_string(),
            })
        })?;

        let items: Vec<MovieItem> = catalog_page
            .results
            .into_iter()
            .map(|movie| self.to_movie_item(movie))
            .collect();

        let result = {
            let mut state = self.write_state();
            // Checked under the write lock so release() cannot interleave
            if self.cancel.is_cancelled() {
                return Err(CatalogError::Cancelled { page }.into());
            }
            let result = state.record_page(page, items, catalog_page.total_pages)?;
            if let Err(e) = validate_page_state(&state) {
                error!("{}: inconsistent page state ({}), starting over", self.list_type, e);
                state.clear();
                return Err(CatalogError::LoadError {
                    page,
                    message: e.to_string(),
                }
                .into());
            }
            result
        };

        if result.total_pages > catalog_page.total_pages.min(MAX_CATALOG_PAGES) {
            warn!(
                "{}: catalog now reports {} pages, list ends at page {}",
                self.list_type, catalog_page.total_pages, result.total_pages
            );
        }

        info!(
            "{}: loaded page {}/{} ({} items)",
            self.list_type,
            result.current_page,
            result.total_pages,
            result.items.len()
        );
        Ok((result, LoadSignal::Fetched))
    }

    /// Tears the source down: cancels any in-flight load, drops loaded
    /// pages and rejects further loads. Returns how many pages were dropped.
    pub fn release(&self) -> u32 {
        self.cancel.cancel();
        let mut state = self.write_state();
        let dropped = state.pages.len() as u32;
        state.clear();
        debug!("{}: released, {} pages dropped", self.list_type, dropped);
        dropped
    }

    pub fn is_released(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Snapshot of every item loaded so far, in arrival order
    pub fn loaded_items(&self) -> Vec<MovieItem> {
        self.read_state().loaded_items().to_vec()
    }

    pub fn current_page(&self) -> u32 {
        self.read_state().current_page()
    }

    /// Page a "load more" action requests
    pub fn next_page(&self) -> u32 {
        self.read_state().next_page()
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.read_state().total_pages()
    }

    pub fn is_exhausted(&self) -> bool {
        self.read_state().is_exhausted()
    }

    /// Whether a "load more" prompt should be shown
    pub fn can_load_more(&self) -> bool {
        !self.is_released() && !self.is_exhausted()
    }

    pub fn stats(&self) -> SourceStats {
        SourceStats {
            network_calls: self.network_calls.load(Ordering::Relaxed),
            suppressed_duplicates: self.suppressed_duplicates.load(Ordering::Relaxed),
        }
    }

    fn ensure_open(&self, page: u32) -> Result<(), CatalogError> {
        if self.cancel.is_cancelled() {
            return Err(CatalogError::Cancelled { page });
        }
        Ok(())
    }

    fn suppressed(&self, page: u32, cached: PageResult) -> PageResult {
        let waiters = self.suppressed_duplicates.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "{}: duplicate request for page {} suppressed (total suppressed: {})",
            self.list_type, page, waiters
        );
        cached
    }

    fn to_movie_item(&self, movie: CatalogMovie) -> MovieItem {
        MovieItem {
            id: movie.id,
            poster_url: self.images.poster_url(movie.poster_path.as_deref()),
            backdrop_url: self.images.backdrop_url(movie.backdrop_path.as_deref()),
            title: movie.title,
            vote_average: movie.vote_average,
            release_date: movie.release_date.filter(|d| !d.trim().is_empty()),
            overview: movie.overview.filter(|o| !o.trim().is_empty()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, PageState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, PageState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogEndpoint;
    use crate::integrations::catalog::{CatalogPage, MockCatalogApi};
    use async_trait::async_trait;
    use mockall::Sequence;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    fn catalog_movie(id: i64) -> CatalogMovie {
        CatalogMovie {
            id,
            title: format!("Movie {}", id),
            poster_path: Some(format!("/poster{}.jpg", id)),
            backdrop_path: None,
            vote_average: Some(6.5),
            release_date: Some(String::new()),
            overview: Some("A movie.".to_string()),
        }
    }

    fn catalog_page(page: u32, ids: &[i64], total_pages: u32) -> CatalogPage {
        CatalogPage {
            page,
            results: ids.iter().map(|id| catalog_movie(*id)).collect(),
            total_pages,
            total_results: u64::from(total_pages) * 20,
        }
    }

    fn source(list_type: MovieListType, api: impl CatalogApi + 'static) -> PagedMovieSource {
        PagedMovieSource::new(list_type, None, Arc::new(api), ImageUrlBuilder::default())
    }

    fn ids(items: &[MovieItem]) -> Vec<i64> {
        items.iter().map(|m| m.id).collect()
    }

    /// Blocks every fetch until the test hands out a permit.
    struct GatedCatalog {
        calls: AtomicUsize,
        permits: Semaphore,
    }

    impl GatedCatalog {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                permits: Semaphore::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogApi for Arc<GatedCatalog> {
        async fn fetch_page(&self, _query: &CatalogQuery, page: u32) -> AppResult<CatalogPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| AppError::Other(e.to_string()))?;
            permit.forget();
            Ok(catalog_page(page, &[1, 2, 3], 5))
        }
    }

    #[tokio::test]
    async fn test_two_pages_append_in_server_order() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .withf(|_, page| *page == 1)
            .times(1)
            .returning(|_, _| Ok(catalog_page(1, &[30, 10, 20], 3)));
        api.expect_fetch_page()
            .withf(|_, page| *page == 2)
            .times(1)
            .returning(|_, _| Ok(catalog_page(2, &[5, 40], 3)));

        let source = source(MovieListType::Popular, api);
        let first = source.load_page(1).await.unwrap();
        let second = source.load_page(2).await.unwrap();

        assert_eq!(first.items.len() + second.items.len(), 5);
        assert_eq!(ids(&source.loaded_items()), vec![30, 10, 20, 5, 40]);
        assert_eq!(second.current_page, 2);
        assert_eq!(second.total_pages, 3);
        assert!(source.can_load_more());
        assert_eq!(source.stats().network_calls, 2);
    }

    #[tokio::test]
    async fn test_page_past_total_is_end_of_data_without_network_call() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(catalog_page(1, &[1, 2], 1)));

        let source = source(MovieListType::TopRated, api);
        source.load_page(1).await.unwrap();

        let err = source.load_page(2).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Catalog(CatalogError::EndOfData { page: 2, total_pages: 1 })
        ));
        assert_eq!(ids(&source.loaded_items()), vec![1, 2]);
        assert!(source.is_exhausted());
        assert!(!source.can_load_more());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_network_call() {
        let catalog = Arc::new(GatedCatalog::new());
        let source = Arc::new(PagedMovieSource::new(
            MovieListType::HorrorMovies,
            None,
            Arc::new(Arc::clone(&catalog)),
            ImageUrlBuilder::default(),
        ));

        let first = tokio::spawn({
            let source = Arc::clone(&source);
            async move { source.load_page_with_signal(1).await }
        });
        let second = tokio::spawn({
            let source = Arc::clone(&source);
            async move { source.load_page_with_signal(1).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        catalog.permits.add_permits(1);

        let (a, a_signal) = first.await.unwrap().unwrap();
        let (b, b_signal) = second.await.unwrap().unwrap();

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, b);
        let mut signals = vec![a_signal, b_signal];
        signals.sort_by_key(|s| *s == LoadSignal::Fetched);
        assert_eq!(
            signals,
            vec![LoadSignal::DuplicateRequestSuppressed, LoadSignal::Fetched]
        );
        assert_eq!(source.loaded_items().len(), 3);
        assert_eq!(source.stats().suppressed_duplicates, 1);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_pages_untouched_and_is_retriable() {
        let mut api = MockCatalogApi::new();
        let mut seq = Sequence::new();
        api.expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(catalog_page(1, &[1, 2], 4)));
        api.expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(AppError::ExternalService("timed out".to_string())));
        api.expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(catalog_page(2, &[3], 4)));

        let source = source(MovieListType::ActionMovies, api);
        source.load_page(1).await.unwrap();

        let err = source.load_page(2).await.unwrap_err();
        match err {
            AppError::Catalog(e @ CatalogError::LoadError { .. }) => {
                assert_eq!(e.page(), Some(2));
                assert!(e.is_retriable());
            }
            other => panic!("expected LoadError, got {:?}", other),
        }
        assert_eq!(ids(&source.loaded_items()), vec![1, 2]);
        assert_eq!(source.current_page(), 1);

        source.load_page(2).await.unwrap();
        assert_eq!(ids(&source.loaded_items()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_reloading_a_page_does_not_duplicate_items() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(catalog_page(1, &[7, 8], 2)));

        let source = source(MovieListType::NowPlaying, api);
        let (_, first) = source.load_page_with_signal(1).await.unwrap();
        let (again, second) = source.load_page_with_signal(1).await.unwrap();

        assert_eq!(first, LoadSignal::Fetched);
        assert_eq!(second, LoadSignal::DuplicateRequestSuppressed);
        assert_eq!(ids(&again.items), vec![7, 8]);
        assert_eq!(source.loaded_items().len(), 2);
    }

    #[tokio::test]
    async fn test_load_next_walks_until_exhausted() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .times(2)
            .returning(|_, page| Ok(catalog_page(page, &[i64::from(page)], 2)));

        let source = source(MovieListType::Upcoming, api);
        source.load_next().await.unwrap();
        source.load_next().await.unwrap();
        let err = source.load_next().await.unwrap_err();

        assert!(matches!(err, AppError::Catalog(CatalogError::EndOfData { page: 3, .. })));
        assert_eq!(ids(&source.loaded_items()), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_query_is_bound_at_construction() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .withf(|query, _| {
                query.endpoint == CatalogEndpoint::Discover
                    && query.person_id == Some(11770)
                    && query.sort_by.as_deref() == Some("vote_average.desc")
            })
            .times(1)
            .returning(|_, _| Ok(catalog_page(1, &[1], 1)));

        let source = PagedMovieSource::new(
            MovieListType::CarpenterMovies,
            Some("vote_average.desc".to_string()),
            Arc::new(api),
            ImageUrlBuilder::default(),
        );
        source.load_page(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_items_are_mapped_to_view_models() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .returning(|_, _| Ok(catalog_page(1, &[42], 1)));

        let source = source(MovieListType::Popular, api);
        let result = source.load_page(1).await.unwrap();
        let item = &result.items[0];

        assert_eq!(
            item.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster42.jpg")
        );
        assert_eq!(item.backdrop_url, None);
        assert_eq!(item.release_date, None);
        assert_eq!(item.overview.as_deref(), Some("A movie."));
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected() {
        let api = MockCatalogApi::new();
        let source = source(MovieListType::Popular, api);
        let err = source.load_page(0).await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(CatalogError::InvalidPage)));
    }

    #[tokio::test]
    async fn test_release_cancels_in_flight_load() {
        let catalog = Arc::new(GatedCatalog::new());
        let source = Arc::new(PagedMovieSource::new(
            MovieListType::SciFiMovies,
            None,
            Arc::new(Arc::clone(&catalog)),
            ImageUrlBuilder::default(),
        ));

        let pending = tokio::spawn({
            let source = Arc::clone(&source);
            async move { source.load_page(1).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        source.release();

        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, AppError::Catalog(CatalogError::Cancelled { page: 1 })));
        assert!(source.loaded_items().is_empty());
        assert!(!source.can_load_more());

        let err = source.load_page(1).await.unwrap_err();
        assert!(matches!(err, AppError::Catalog(CatalogError::Cancelled { .. })));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_shrinking_total_ends_the_list() {
        let mut api = MockCatalogApi::new();
        let mut seq = Sequence::new();
        api.expect_fetch_page()
            .withf(|_, page| *page == 5)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(catalog_page(5, &[50, 51], 10)));
        api.expect_fetch_page()
            .withf(|_, page| *page == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(catalog_page(1, &[10], 2)));

        let source = source(MovieListType::NowPlaying, api);
        source.load_page(5).await.unwrap();
        let result = source.load_page(1).await.unwrap();

        assert_eq!(result.total_pages, 5);
        assert!(validate_page_state(&source.read_state()).is_ok());
        assert_eq!(ids(&source.loaded_items()), vec![50, 51, 10]);

        let err = source.load_page(6).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Catalog(CatalogError::EndOfData { page: 6, total_pages: 5 })
        ));
    }

    #[tokio::test]
    async fn test_load_next_fills_gaps_first() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .times(3)
            .returning(|_, page| Ok(catalog_page(page, &[i64::from(page)], 3)));

        let source = source(MovieListType::NinetiesMovies, api);
        source.load_page(3).await.unwrap();
        assert!(source.can_load_more());

        source.load_next().await.unwrap();
        source.load_next().await.unwrap();

        assert_eq!(ids(&source.loaded_items()), vec![3, 1, 2]);
        assert!(!source.can_load_more());
    }

    #[tokio::test]
    async fn test_state_stays_valid_across_loads() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .returning(|_, page| Ok(catalog_page(page, &[i64::from(page) * 10, i64::from(page) * 10 + 1], 3)));

        let source = source(MovieListType::EightiesMovies, api);
        source.load_page(2).await.unwrap();
        source.load_page(1).await.unwrap();
        source.load_page(3).await.unwrap();

        assert!(validate_page_state(&source.read_state()).is_ok());
        assert_eq!(ids(&source.loaded_items()), vec![20, 21, 10, 11, 30, 31]);
        assert!(source.is_exhausted());
    }
}
