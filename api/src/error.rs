//! Unified error types for the Skyport API
//!
//! This module defines error types for each layer:
//! - `CatalogError`: Unknown plan tiers or feature keys (configuration errors)
//! - `DomainError`: Validation failures in domain values
//! - `StorageError` / `StoreError`: Profile persistence errors
//! - `BackendError`: Backing API client errors, classified by `ErrorCategory`
//! - `AppError`: Application layer errors (wraps the above for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Plan catalog lookups that name something outside the closed enumerations.
///
/// These are programmer errors; they only surface at string boundaries
/// (HTTP bodies, billing handoff).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown plan tier: {0}")]
    UnknownTier(String),

    #[error("Unknown feature key: {0}")]
    UnknownFeature(String),

    #[error("Feature '{0}' is not a countable limit")]
    NotCountable(String),

    #[error("Feature '{0}' is not a boolean flag")]
    NotAFlag(String),

    #[error("Invalid limit value: {0}")]
    InvalidLimit(i64),
}

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Raw persistence failures reported by a `ProfileStorage` adapter
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by profile mutations in the user data store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to persist profile: {0}")]
    Persist(#[from] StorageError),

    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Category a collaborator failure is sorted into before choosing a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    PermissionDenied,
    NotFound,
    Transient,
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::PermissionDenied => write!(f, "permission denied"),
            ErrorCategory::NotFound => write!(f, "not found"),
            ErrorCategory::Transient => write!(f, "transient"),
            ErrorCategory::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Backing API client errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("{0}")]
    Catalog(#[from] CatalogError),
}

impl BackendError {
    /// Sort this failure into one of the known categories
    pub fn category(&self) -> ErrorCategory {
        match self {
            BackendError::Api { status, code, .. } => {
                crate::adapters::backend::classify_backend_error(code.as_deref(), Some(*status))
            }
            BackendError::Request(e) if e.is_timeout() || e.is_connect() => {
                ErrorCategory::Transient
            }
            BackendError::Request(e) => crate::adapters::backend::classify_backend_error(
                None,
                e.status().map(|s| s.as_u16()),
            ),
            BackendError::Deserialization(_) | BackendError::Catalog(_) => ErrorCategory::Unknown,
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Catalog(CatalogError::UnknownTier(tier)) => (
                StatusCode::NOT_FOUND,
                "Unknown plan",
                Some(tier.clone()),
            ),
            AppError::Catalog(e) => (
                StatusCode::BAD_REQUEST,
                "Invalid feature",
                Some(e.to_string()),
            ),
            AppError::Store(e) => {
                tracing::error!("Profile store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save profile. Please try again.",
                    None,
                )
            }
            AppError::Backend(e) => {
                let category = e.category();
                tracing::warn!(%category, "Backend error: {}", e);
                match category {
                    ErrorCategory::PermissionDenied => {
                        (StatusCode::FORBIDDEN, "Permission denied", None)
                    }
                    ErrorCategory::NotFound => (StatusCode::NOT_FOUND, "Not found", None),
                    ErrorCategory::Transient => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Service temporarily unavailable",
                        None,
                    ),
                    ErrorCategory::Unknown => (StatusCode::BAD_GATEWAY, "Unknown error", None),
                }
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
