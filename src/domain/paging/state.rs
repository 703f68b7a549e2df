use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::movie::{MovieItem, MovieListType};
use crate::error::CatalogError;

/// The catalog refuses to serve pages past this one, whatever `total_pages` says.
pub const MAX_CATALOG_PAGES: u32 = 500;

/// One page as handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<MovieItem>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Where a page's items sit inside the loaded sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageSlice {
    pub start: usize,
    pub len: usize,
}

/// Incremental load state of one list type.
///
/// Items are only ever appended, in the order pages arrive.
#[derive(Debug, Clone)]
pub struct PageState {
    list_type: MovieListType,
    sort_by: Option<String>,
    /// Highest page loaded so far; 0 before the first load
    current_page: u32,
    total_pages: Option<u32>,
    loaded_items: Vec<MovieItem>,
    pub(crate) pages: BTreeMap<u32, PageSlice>,
}

impl PageState {
    pub fn new(list_type: MovieListType, sort_by: Option<String>) -> Self {
        Self {
            list_type,
            sort_by,
            current_page: 0,
            total_pages: None,
            loaded_items: Vec::new(),
            pages: BTreeMap::new(),
        }
    }

    pub fn list_type(&self) -> MovieListType {
        self.list_type
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn loaded_items(&self) -> &[MovieItem] {
        &self.loaded_items
    }

    /// First page not loaded yet. Equals `current_page + 1` unless pages
    /// were requested out of order, in which case the lowest gap comes first.
    pub fn next_page(&self) -> u32 {
        (1..=self.current_page)
            .find(|page| !self.pages.contains_key(page))
            .unwrap_or(self.current_page + 1)
    }

    /// True once every page up to the reported total has been loaded.
    pub fn is_exhausted(&self) -> bool {
        match self.total_pages {
            Some(total) => self.next_page() > total.max(1),
            None => false,
        }
    }

    pub fn is_loaded(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Decides whether `page` needs a network call.
    ///
    /// Returns the cached result when the page is already loaded, `None` when
    /// it must be fetched, and an error when it can never be served.
    pub fn check_requestable(&self, page: u32) -> Result<Option<PageResult>, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidPage);
        }
        if let Some(cached) = self.cached_page(page) {
            return Ok(Some(cached));
        }
        if let Some(total_pages) = self.total_pages {
            if page > total_pages {
                return Err(CatalogError::EndOfData { page, total_pages });
            }
        }
        if page > MAX_CATALOG_PAGES {
            return Err(CatalogError::EndOfData {
                page,
                total_pages: MAX_CATALOG_PAGES,
            });
        }
        Ok(None)
    }

    pub fn cached_page(&self, page: u32) -> Option<PageResult> {
        let slice = self.pages.get(&page)?;
        Some(PageResult {
            items: self.loaded_items[slice.start..slice.start + slice.len].to_vec(),
            current_page: page,
            total_pages: self.total_pages.unwrap_or(0),
        })
    }

    /// Appends a freshly fetched page.
    ///
    /// A page the server says does not exist (past `total_pages`) only
    /// updates the known total and is reported as `EndOfData`; page 1 of an
    /// empty list is kept as an empty page. A total that shrank below a
    /// page already loaded is raised to that page, so the list ends there.
    pub fn record_page(
        &mut self,
        page: u32,
        items: Vec<MovieItem>,
        reported_total_pages: u32,
    ) -> Result<PageResult, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidPage);
        }
        let total_pages = reported_total_pages
            .min(MAX_CATALOG_PAGES)
            .max(self.current_page);
        self.total_pages = Some(total_pages);

        if page > total_pages.max(1) {
            return Err(CatalogError::EndOfData { page, total_pages });
        }
        if let Some(cached) = self.cached_page(page) {
            return Ok(cached);
        }

        let slice = PageSlice {
            start: self.loaded_items.len(),
            len: items.len(),
        };
        self.loaded_items.extend(items.iter().cloned());
        self.pages.insert(page, slice);
        self.current_page = self.current_page.max(page);

        Ok(PageResult {
            items,
            current_page: page,
            total_pages,
        })
    }

    /// Drops everything loaded; the next load starts from scratch.
    pub fn clear(&mut self) {
        self.current_page = 0;
        self.total_pages = None;
        self.loaded_items.clear();
        self.pages.clear();
    }
}
