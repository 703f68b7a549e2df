// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::{
    dto::*,
    error_handling::{ErrorResponse, ToErrorResponse},
    state::AppState,
};
use crate::domain::MovieListType;

fn parse_list_type(raw: &str) -> Result<MovieListType, ErrorResponse> {
    raw.parse::<MovieListType>()
        .map_err(|e| ErrorResponse::validation(e.to_string()))
}

/// Load one page of a list. Without a page number, loads the first.
pub async fn load_movie_page(
    dto: LoadMoviePageDto,
    state: &AppState,
) -> Result<MoviePageDto, ErrorResponse> {
    let list_type = parse_list_type(&dto.list_type)?;
    let sort_by = dto.sort_by.as_deref();

    let result = state
        .catalog_service
        .load_page(list_type, sort_by, dto.page.unwrap_or(1))
        .await
        .to_error_response()?;

    let can_load_more = state.catalog_service.can_load_more(list_type, sort_by);
    Ok(MoviePageDto::new(list_type, result, can_load_more))
}

/// Load the page after the last one loaded ("load more")
pub async fn load_next_movie_page(
    list_type: String,
    sort_by: Option<String>,
    state: &AppState,
) -> Result<MoviePageDto, ErrorResponse> {
    let list_type = parse_list_type(&list_type)?;
    let sort_by = sort_by.as_deref();

    let result = state
        .catalog_service
        .load_next(list_type, sort_by)
        .await
        .to_error_response()?;

    let can_load_more = state.catalog_service.can_load_more(list_type, sort_by);
    Ok(MoviePageDto::new(list_type, result, can_load_more))
}

/// Everything loaded so far for a list
pub async fn get_loaded_movies(
    list_type: String,
    sort_by: Option<String>,
    state: &AppState,
) -> Result<Vec<MovieDto>, ErrorResponse> {
    let list_type = parse_list_type(&list_type)?;
    let items = state
        .catalog_service
        .loaded_items(list_type, sort_by.as_deref());

    Ok(items.into_iter().map(MovieDto::from).collect())
}

/// Called when the view showing a list goes away
pub async fn release_movie_list(list_type: String, state: &AppState) -> Result<u32, ErrorResponse> {
    let list_type = parse_list_type(&list_type)?;
    Ok(state.catalog_service.release(list_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error_handling::ErrorType;
    use crate::config::AppConfig;
    use crate::db::{create_connection_pool, initialize_database};
    use crate::integrations::catalog::{CatalogMovie, CatalogPage, MockCatalogApi};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn state(api: MockCatalogApi) -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("moviehub.db");
        let config = AppConfig::from_lookup(|key| match key {
            "TMDB_API_KEY" => Some("test-key".to_string()),
            "MOVIEHUB_DB_PATH" => Some(db_path.display().to_string()),
            _ => None,
        })
        .unwrap();

        let pool = Arc::new(create_connection_pool(&config.database_path).unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        (dir, AppState::with_parts(pool, Arc::new(api), &config))
    }

    fn one_page(page: u32) -> CatalogPage {
        CatalogPage {
            page,
            results: vec![CatalogMovie {
                id: 1,
                title: "The Thing".to_string(),
                poster_path: Some("/thing.jpg".to_string()),
                backdrop_path: None,
                vote_average: Some(8.1),
                release_date: Some("1982-06-25".to_string()),
                overview: None,
            }],
            total_pages: 1,
            total_results: 1,
        }
    }

    #[tokio::test]
    async fn test_load_then_load_more_reports_end() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .times(1)
            .returning(|_, page| Ok(one_page(page)));
        let (_dir, state) = state(api);

        let page = load_movie_page(
            LoadMoviePageDto {
                list_type: "carpenter-movies".to_string(),
                page: None,
                sort_by: None,
            },
            &state,
        )
        .await
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(!page.can_load_more);

        let err = load_next_movie_page("carpenter_movies".to_string(), None, &state)
            .await
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::EndOfData);

        let loaded = get_loaded_movies("carpenter_movies".to_string(), None, &state)
            .await
            .unwrap();
        assert_eq!(loaded[0].title, "The Thing");

        assert_eq!(
            release_movie_list("carpenter_movies".to_string(), &state).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_unknown_list_is_a_validation_error() {
        let (_dir, state) = state(MockCatalogApi::new());
        let err = release_movie_list("westerns".to_string(), &state)
            .await
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::Validation);
    }
}
