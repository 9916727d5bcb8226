//! Profile handlers
//!
//! Read and edit the cached profile of the signed-in user. Edits go through
//! a `UserDataHook` the same way a settings page would.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::blocking;
use crate::app::UserDataHook;
use crate::domain::entities::{ProfilePatch, UserProfile};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: String,
}

/// GET /profile
pub async fn get_profile(State(state): State<AppState>) -> Result<Json<UserProfile>, AppError> {
    let profile = blocking(move || Ok(state.store.get())).await?;
    Ok(Json(profile))
}

/// PATCH /profile
///
/// Shallow merge: keys present in the body replace stored values, absent
/// keys are kept. The plan tier cannot be changed here.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = blocking(move || {
        let hook = UserDataHook::mount(state.store.clone());
        hook.update_profile(patch).map_err(|e| {
            state.presenter.present_unexpected_error("save your profile");
            AppError::from(e)
        })
    })
    .await?;
    Ok(Json(profile))
}

/// PUT /profile/avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    Json(request): Json<AvatarRequest>,
) -> Result<Json<UserProfile>, AppError> {
    if request.avatar.trim().is_empty() {
        return Err(AppError::BadRequest("Avatar must not be empty".to_string()));
    }

    let profile = blocking(move || {
        let hook = UserDataHook::mount(state.store.clone());
        hook.update_avatar(request.avatar).map_err(|e| {
            state.presenter.present_unexpected_error("update your avatar");
            AppError::from(e)
        })
    })
    .await?;
    Ok(Json(profile))
}

/// DELETE /profile
///
/// Reset the cached profile to defaults.
pub async fn clear_profile(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    blocking(move || Ok(state.store.clear()?)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_avatar_request() {
        let request: AvatarRequest =
            serde_json::from_str(r#"{"avatar": "avatars/me.png"}"#).unwrap();
        assert_eq!(request.avatar, "avatars/me.png");
    }

    #[test]
    fn parse_avatar_request_missing_avatar() {
        let result: Result<AvatarRequest, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
