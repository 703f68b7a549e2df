use serde::{Deserialize, Serialize};

/// A movie as the presentation layer shows it in a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieItem {
    /// Catalog identifier
    pub id: i64,

    pub title: String,

    /// Absolute poster URL, `None` when the catalog has no poster
    pub poster_url: Option<String>,

    /// Absolute backdrop URL, `None` when the catalog has no backdrop
    pub backdrop_url: Option<String>,

    /// Average user vote (0-10), if the catalog reported one
    pub vote_average: Option<f64>,

    /// Release date as reported by the catalog (YYYY-MM-DD)
    pub release_date: Option<String>,

    pub overview: Option<String>,
}

/// Turns catalog image paths into absolute URLs.
///
/// The catalog returns paths like `/abc.jpg`; the URL is
/// `{base_url}/{size}{path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    base_url: String,
    poster_size: String,
    backdrop_size: String,
}

impl ImageUrlBuilder {
    pub fn new(base_url: &str, poster_size: &str, backdrop_size: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            poster_size: poster_size.trim_matches('/').to_string(),
            backdrop_size: backdrop_size.trim_matches('/').to_string(),
        }
    }

    pub fn poster_url(&self, path: Option<&str>) -> Option<String> {
        self.build(&self.poster_size, path)
    }

    pub fn backdrop_url(&self, path: Option<&str>) -> Option<String> {
        self.build(&self.backdrop_size, path)
    }

    fn build(&self, size: &str, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        let path = path.trim_start_matches('/');
        Some(format!("{}/{}/{}", self.base_url, size, path))
    }
}

impl Default for ImageUrlBuilder {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p", "w500", "w780")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url_prefixes_base_and_size() {
        let images = ImageUrlBuilder::default();
        assert_eq!(
            images.poster_url(Some("/kXfqcdQKsToO0OUXHcrrNCHDBzO.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/kXfqcdQKsToO0OUXHcrrNCHDBzO.jpg")
        );
        assert_eq!(
            images.backdrop_url(Some("/back.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w780/back.jpg")
        );
    }

    #[test]
    fn test_missing_path_yields_no_url() {
        let images = ImageUrlBuilder::default();
        assert_eq!(images.poster_url(None), None);
        assert_eq!(images.poster_url(Some("")), None);
        assert_eq!(images.backdrop_url(Some("   ")), None);
    }

    #[test]
    fn test_slashes_are_normalized() {
        let images = ImageUrlBuilder::new("https://img.example.com/t/p/", "/w342/", "original");
        assert_eq!(
            images.poster_url(Some("poster.png")).as_deref(),
            Some("https://img.example.com/t/p/w342/poster.png")
        );
    }
}
