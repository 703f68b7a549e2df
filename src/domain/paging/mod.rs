//! Paging invariants:
//!
//! 1. Pages are requested by number, starting at 1
//! 2. A page past the known total is never fetched
//! 3. Loaded items are append-only
//! 4. A page is fetched at most once per source lifetime

pub mod invariants;
pub mod state;

pub use invariants::validate_page_state;
pub use state::{PageResult, PageState, MAX_CATALOG_PAGES};
