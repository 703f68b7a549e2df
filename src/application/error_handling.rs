// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides consistent error format for the UI
// - Never exposes internal implementation details
// - Logs errors for debugging

use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, CatalogError};

/// Standard error response for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
    /// Whether a "try again" action makes sense
    pub retriable: bool,
}

/// Error categories for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Invalid input/validation error (400)
    Validation,

    /// Domain invariant violation (422)
    DomainError,

    /// The list has no more pages; hide the "load more" prompt
    EndOfData,

    /// The list was closed while loading; nothing to show
    Cancelled,

    /// Database/persistence error (500)
    Database,

    /// Catalog or other remote service error (502)
    ExternalService,

    /// Missing or invalid settings
    Configuration,

    /// File system error (500)
    FileSystem,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
            retriable: false,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Catalog(catalog_error) => Self::from_catalog_error(catalog_error),

            AppError::ExternalService(message) => {
                warn!("External service error: {}", message);
                Self {
                    retriable: true,
                    ..Self::new(
                        ErrorType::ExternalService,
                        "External service error",
                        Some(message),
                    )
                }
            }

            AppError::Config(message) => Self::new(
                ErrorType::Configuration,
                "Configuration error",
                Some(message),
            ),

            AppError::Database(db_error) => {
                // Log full error for debugging
                error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Serialization(serde_error) => {
                error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Other(message) => {
                error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    fn from_catalog_error(catalog_error: CatalogError) -> Self {
        match catalog_error {
            CatalogError::EndOfData { .. } => Self::new(
                ErrorType::EndOfData,
                "No more movies in this list",
                Some(catalog_error.to_string()),
            ),
            CatalogError::LoadError { .. } => {
                warn!("{}", catalog_error);
                Self {
                    retriable: true,
                    ..Self::new(
                        ErrorType::ExternalService,
                        "Could not load movies",
                        Some(catalog_error.to_string()),
                    )
                }
            }
            CatalogError::InvalidPage => Self::validation(catalog_error.to_string()),
            CatalogError::Cancelled { .. } => Self::new(
                ErrorType::Cancelled,
                "Loading was cancelled",
                Some(catalog_error.to_string()),
            ),
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}
