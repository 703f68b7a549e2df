// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

/// Failures of a paged catalog load.
///
/// Only `LoadError` is worth retrying: `EndOfData` means the list is
/// finished, and a cancelled load belongs to a source that was released.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("page {page} is past the last page ({total_pages})")]
    EndOfData { page: u32, total_pages: u32 },

    #[error("failed to load page {page}: {message}")]
    LoadError { page: u32, message: String },

    #[error("page numbers start at 1")]
    InvalidPage,

    #[error("load of page {page} was cancelled")]
    Cancelled { page: u32 },
}

impl CatalogError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, CatalogError::LoadError { .. })
    }

    /// The page the failed request asked for, when there was one.
    pub fn page(&self) -> Option<u32> {
        match self {
            CatalogError::EndOfData { page, .. }
            | CatalogError::LoadError { page, .. }
            | CatalogError::Cancelled { page } => Some(*page),
            CatalogError::InvalidPage => None,
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
