use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

pub const HORROR_GENRE_ID: u32 = 27;
pub const ACTION_GENRE_ID: u32 = 28;
pub const SCIENCE_FICTION_GENRE_ID: u32 = 878;
pub const JOHN_CARPENTER_PERSON_ID: u64 = 11770;

pub const SORT_POPULARITY_DESC: &str = "popularity.desc";
pub const SORT_VOTE_AVERAGE_DESC: &str = "vote_average.desc";
pub const SORT_RELEASE_DATE_DESC: &str = "release_date.desc";

/// A fixed slice of the catalog. Each variant drives one paged source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieListType {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    HorrorMovies,
    ActionMovies,
    SciFiMovies,
    EightiesMovies,
    NinetiesMovies,
    CarpenterMovies,
}

/// Remote endpoint a list type is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEndpoint {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    Discover,
}

impl CatalogEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            CatalogEndpoint::Popular => "movie/popular",
            CatalogEndpoint::TopRated => "movie/top_rated",
            CatalogEndpoint::NowPlaying => "movie/now_playing",
            CatalogEndpoint::Upcoming => "movie/upcoming",
            CatalogEndpoint::Discover => "discover/movie",
        }
    }

    /// Only the discover endpoint honours filters and sort keys.
    pub fn accepts_filters(&self) -> bool {
        matches!(self, CatalogEndpoint::Discover)
    }
}

/// Inclusive release date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// The ten years starting at `first_year`, e.g. 1980-01-01..1989-12-31.
    pub fn decade(first_year: i32) -> Option<Self> {
        Some(Self {
            from: NaiveDate::from_ymd_opt(first_year, 1, 1)?,
            to: NaiveDate::from_ymd_opt(first_year + 9, 12, 31)?,
        })
    }
}

/// Query parameters derived from a list type plus the caller's sort choice.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub endpoint: CatalogEndpoint,
    pub genre_id: Option<u32>,
    pub release_dates: Option<DateRange>,
    pub person_id: Option<u64>,
    pub min_vote_average: Option<f32>,
    pub sort_by: Option<String>,
}

impl CatalogQuery {
    fn listing(endpoint: CatalogEndpoint, sort_by: Option<&str>) -> Self {
        Self {
            endpoint,
            genre_id: None,
            release_dates: None,
            person_id: None,
            min_vote_average: None,
            sort_by: sort_by.map(str::to_string),
        }
    }

    fn discover(sort_by: &str) -> Self {
        Self::listing(CatalogEndpoint::Discover, Some(sort_by))
    }
}

impl MovieListType {
    pub const ALL: [MovieListType; 10] = [
        MovieListType::Popular,
        MovieListType::TopRated,
        MovieListType::NowPlaying,
        MovieListType::Upcoming,
        MovieListType::HorrorMovies,
        MovieListType::ActionMovies,
        MovieListType::SciFiMovies,
        MovieListType::EightiesMovies,
        MovieListType::NinetiesMovies,
        MovieListType::CarpenterMovies,
    ];

    /// Whether a caller-supplied sort key replaces the default.
    pub fn accepts_custom_sort(&self) -> bool {
        matches!(
            self,
            MovieListType::EightiesMovies
                | MovieListType::NinetiesMovies
                | MovieListType::CarpenterMovies
        )
    }

    pub fn default_sort(&self) -> Option<&'static str> {
        match self {
            MovieListType::Popular => Some(SORT_POPULARITY_DESC),
            MovieListType::TopRated => Some(SORT_VOTE_AVERAGE_DESC),
            MovieListType::NowPlaying | MovieListType::Upcoming => None,
            MovieListType::CarpenterMovies => Some(SORT_RELEASE_DATE_DESC),
            _ => Some(SORT_POPULARITY_DESC),
        }
    }

    /// Builds the fixed query for this list type.
    ///
    /// `sort_by` is ignored (and the default kept) for list types whose
    /// ordering is fixed.
    pub fn query(&self, sort_by: Option<&str>) -> CatalogQuery {
        let sort = match sort_by {
            Some(custom) if self.accepts_custom_sort() && !custom.trim().is_empty() => {
                Some(custom.trim())
            }
            _ => self.default_sort(),
        };

        match self {
            MovieListType::Popular => CatalogQuery::listing(CatalogEndpoint::Popular, sort),
            MovieListType::TopRated => CatalogQuery::listing(CatalogEndpoint::TopRated, sort),
            MovieListType::NowPlaying => CatalogQuery::listing(CatalogEndpoint::NowPlaying, sort),
            MovieListType::Upcoming => CatalogQuery::listing(CatalogEndpoint::Upcoming, sort),
            MovieListType::HorrorMovies => CatalogQuery {
                genre_id: Some(HORROR_GENRE_ID),
                ..CatalogQuery::discover(SORT_POPULARITY_DESC)
            },
            MovieListType::ActionMovies => CatalogQuery {
                genre_id: Some(ACTION_GENRE_ID),
                ..CatalogQuery::discover(SORT_POPULARITY_DESC)
            },
            MovieListType::SciFiMovies => CatalogQuery {
                genre_id: Some(SCIENCE_FICTION_GENRE_ID),
                ..CatalogQuery::discover(SORT_POPULARITY_DESC)
            },
            MovieListType::EightiesMovies => CatalogQuery {
                release_dates: DateRange::decade(1980),
                ..CatalogQuery::discover(sort.unwrap_or(SORT_POPULARITY_DESC))
            },
            MovieListType::NinetiesMovies => CatalogQuery {
                release_dates: DateRange::decade(1990),
                ..CatalogQuery::discover(sort.unwrap_or(SORT_POPULARITY_DESC))
            },
            MovieListType::CarpenterMovies => CatalogQuery {
                person_id: Some(JOHN_CARPENTER_PERSON_ID),
                ..CatalogQuery::discover(sort.unwrap_or(SORT_RELEASE_DATE_DESC))
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovieListType::Popular => "popular",
            MovieListType::TopRated => "top_rated",
            MovieListType::NowPlaying => "now_playing",
            MovieListType::Upcoming => "upcoming",
            MovieListType::HorrorMovies => "horror_movies",
            MovieListType::ActionMovies => "action_movies",
            MovieListType::SciFiMovies => "sci_fi_movies",
            MovieListType::EightiesMovies => "eighties_movies",
            MovieListType::NinetiesMovies => "nineties_movies",
            MovieListType::CarpenterMovies => "carpenter_movies",
        }
    }
}

impl fmt::Display for MovieListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieListType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        MovieListType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| DomainError::InvariantViolation(format!("Unknown list type: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_types_use_dedicated_endpoints() {
        assert_eq!(MovieListType::Popular.query(None).endpoint, CatalogEndpoint::Popular);
        assert_eq!(MovieListType::TopRated.query(None).endpoint, CatalogEndpoint::TopRated);
        let now_playing = MovieListType::NowPlaying.query(None);
        assert_eq!(now_playing.endpoint, CatalogEndpoint::NowPlaying);
        assert_eq!(now_playing.sort_by, None);
    }

    #[test]
    fn test_genre_lists_filter_by_genre() {
        let horror = MovieListType::HorrorMovies.query(None);
        assert_eq!(horror.endpoint, CatalogEndpoint::Discover);
        assert_eq!(horror.genre_id, Some(HORROR_GENRE_ID));
        assert_eq!(horror.sort_by.as_deref(), Some(SORT_POPULARITY_DESC));

        let action = MovieListType::ActionMovies.query(None);
        assert_eq!(action.genre_id, Some(ACTION_GENRE_ID));
    }

    #[test]
    fn test_eighties_uses_decade_window_and_caller_sort() {
        let query = MovieListType::EightiesMovies.query(Some("vote_average.desc"));
        let range = query.release_dates.unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(1980, 1, 1).unwrap());
        assert_eq!(range.to, NaiveDate::from_ymd_opt(1989, 12, 31).unwrap());
        assert_eq!(query.sort_by.as_deref(), Some("vote_average.desc"));

        let default = MovieListType::EightiesMovies.query(None);
        assert_eq!(default.sort_by.as_deref(), Some(SORT_POPULARITY_DESC));
    }

    #[test]
    fn test_carpenter_defaults_to_release_date() {
        let query = MovieListType::CarpenterMovies.query(None);
        assert_eq!(query.person_id, Some(JOHN_CARPENTER_PERSON_ID));
        assert_eq!(query.sort_by.as_deref(), Some(SORT_RELEASE_DATE_DESC));
    }

    #[test]
    fn test_fixed_lists_ignore_custom_sort() {
        let query = MovieListType::HorrorMovies.query(Some("release_date.asc"));
        assert_eq!(query.sort_by.as_deref(), Some(SORT_POPULARITY_DESC));
    }

    #[test]
    fn test_parse_round_trips_names() {
        for list_type in MovieListType::ALL {
            assert_eq!(list_type.as_str().parse::<MovieListType>().unwrap(), list_type);
        }
        assert_eq!("Top-Rated".parse::<MovieListType>().unwrap(), MovieListType::TopRated);
        assert!("documentaries".parse::<MovieListType>().is_err());
    }
}
