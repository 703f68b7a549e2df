// src/integrations/mod.rs
//
// External Integrations Module

pub mod catalog;
pub mod tmdb;

pub use catalog::{CatalogApi, CatalogMovie, CatalogPage};
pub use tmdb::TmdbClient;
