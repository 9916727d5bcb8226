//! Session handlers
//!
//! Handoff points for the authentication provider. Credentials are checked
//! upstream; these endpoints only learn who signed in or out.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use super::blocking;
use crate::adapters::backend::with_fallback;
use crate::app::SessionEvent;
use crate::domain::entities::UserProfile;
use crate::error::AppError;
use crate::AppState;

/// Request body for a newly established session
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub user_id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /session
///
/// Merge the session identity into the profile, then refresh the plan from
/// billing. A billing failure keeps the cached plan.
pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let event = SessionEvent::Established {
        user_id: request.user_id,
        email: request.email.trim().to_string(),
        name: request.name,
    };
    let store = state.store.clone();
    let profile = blocking(move || Ok(store.handle_session(event)?)).await?;

    state.billing.begin_session(&request.user_id.to_string());
    let plan = with_fallback(state.billing.fetch_plan().await, profile.plan, "Fetching plan");

    if plan == profile.plan {
        return Ok(Json(profile));
    }
    tracing::info!(user_id = %request.user_id, %plan, "Plan changed by billing");
    let store = state.store.clone();
    let profile = blocking(move || Ok(store.set_plan(plan)?)).await?;
    Ok(Json(profile))
}

/// DELETE /session
pub async fn end_session(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.billing.end_session();
    let store = state.store.clone();
    blocking(move || Ok(store.handle_session(SessionEvent::Ended)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
