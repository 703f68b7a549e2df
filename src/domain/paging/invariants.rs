use super::state::PageState;
use crate::domain::{DomainError, DomainResult};

/// Validates all PageState invariants
pub fn validate_page_state(state: &PageState) -> DomainResult<()> {
    validate_current_page(state)?;
    validate_page_slices(state)?;
    Ok(())
}

/// current_page never runs more than one past total_pages
fn validate_current_page(state: &PageState) -> DomainResult<()> {
    if let Some(total) = state.total_pages() {
        if state.current_page() > total + 1 {
            return Err(DomainError::InvariantViolation(format!(
                "Current page {} exceeds total pages {} + 1",
                state.current_page(),
                total
            )));
        }
    }
    Ok(())
}

/// Page slices tile the loaded sequence without gaps or overlaps
fn validate_page_slices(state: &PageState) -> DomainResult<()> {
    let mut slices: Vec<_> = state.pages.values().copied().collect();
    slices.sort_by_key(|s| s.start);

    let mut expected_start = 0;
    for slice in slices {
        if slice.start != expected_start {
            return Err(DomainError::InvariantViolation(format!(
                "Page slice starts at {} but {} items precede it",
                slice.start, expected_start
            )));
        }
        expected_start += slice.len;
    }

    if expected_start != state.loaded_items().len() {
        return Err(DomainError::InvariantViolation(format!(
            "Pages cover {} items but {} are loaded",
            expected_start,
            state.loaded_items().len()
        )));
    }
    Ok(())
}

/// Invariants that must hold for a page state:
///
/// 1. current_page <= total_pages + 1
/// 2. Loaded items are append-only, grouped by page in arrival order
/// 3. Once exhausted, no further page is requestable
/// 4. A failed load leaves the state untouched

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::movie::{MovieItem, MovieListType};

    fn movie(id: i64) -> MovieItem {
        MovieItem {
            id,
            title: "Halloween".to_string(),
            poster_url: None,
            backdrop_url: None,
            vote_average: None,
            release_date: Some("1978-10-25".to_string()),
            overview: None,
        }
    }

    #[test]
    fn test_fresh_state_is_valid() {
        let state = PageState::new(MovieListType::CarpenterMovies, None);
        assert!(validate_page_state(&state).is_ok());
    }

    #[test]
    fn test_out_of_order_pages_stay_valid() {
        let mut state = PageState::new(MovieListType::CarpenterMovies, None);
        state.record_page(2, vec![movie(3), movie(4)], 3).unwrap();
        state.record_page(1, vec![movie(1)], 3).unwrap();
        assert!(validate_page_state(&state).is_ok());
    }
}
