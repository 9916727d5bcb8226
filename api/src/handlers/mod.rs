//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod domains;
pub mod entitlements;
pub mod plans;
pub mod profile;
pub mod session;

pub use domains::validate_domain;
pub use entitlements::{check_limit, gate_domain, gate_project};
pub use plans::{get_plan, list_plans};
pub use profile::{clear_profile, get_profile, update_avatar, update_profile};
pub use session::{end_session, start_session};

use crate::error::AppError;

/// Run store work that touches the filesystem off the async workers
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}
