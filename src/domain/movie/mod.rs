pub mod entity;
pub mod list_type;

pub use entity::{ImageUrlBuilder, MovieItem};
pub use list_type::{CatalogEndpoint, CatalogQuery, DateRange, MovieListType};
