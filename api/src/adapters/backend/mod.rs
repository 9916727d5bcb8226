//! Backing API adapter
//!
//! HTTP wrapper around the hosted backend plus the rules for sorting its
//! failures into the categories callers branch on.

pub mod client;

pub use client::{BackendClient, USER_ID_HEADER};

use crate::error::{BackendError, ErrorCategory};

/// Sort a backend failure by its PostgREST/Postgres error code, falling back
/// to the HTTP status when the code is missing or unrecognised.
pub fn classify_backend_error(code: Option<&str>, status: Option<u16>) -> ErrorCategory {
    match code {
        // No rows returned for a single-row select
        Some("PGRST116") => return ErrorCategory::NotFound,
        // Undefined table
        Some("42P01") => return ErrorCategory::NotFound,
        // Insufficient privilege (row level security)
        Some("42501") => return ErrorCategory::PermissionDenied,
        // JWT expired / invalid
        Some("PGRST301") => return ErrorCategory::PermissionDenied,
        _ => {}
    }

    match status {
        Some(401) | Some(403) => ErrorCategory::PermissionDenied,
        Some(404) => ErrorCategory::NotFound,
        Some(408) | Some(429) => ErrorCategory::Transient,
        Some(s) if (500..600).contains(&s) => ErrorCategory::Transient,
        _ => ErrorCategory::Unknown,
    }
}

/// Swap a failed collaborator call for a safe fallback value.
///
/// The failure is logged at warn with its category; it never reaches the
/// caller.
pub fn with_fallback<T>(result: Result<T, BackendError>, fallback: T, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            let category = e.category();
            tracing::warn!(%category, error = %e, "{} failed, using fallback", context);
            fallback
        }
    }
}
