//! Skyport API
//!
//! Plan entitlements and the cached user profile behind the Skyport
//! deployment dashboard. Uses hexagonal (ports & adapters) architecture for
//! clean separation of concerns.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{FileProfileStorage, TracingNotifier};
use app::{NotificationPresenter, UserDataStore};
use domain::ports::BillingProvider;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserDataStore<FileProfileStorage>>,
    pub presenter: Arc<NotificationPresenter<TracingNotifier>>,
    pub billing: Arc<dyn BillingProvider>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router over `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Plan catalog
        .route("/plans", get(handlers::list_plans))
        .route("/plans/:tier", get(handlers::get_plan))
        // Entitlements
        .route("/entitlements/check", post(handlers::check_limit))
        .route("/entitlements/projects", post(handlers::gate_project))
        .route("/entitlements/domains", post(handlers::gate_domain))
        // Custom domains
        .route("/domains/validate", post(handlers::validate_domain))
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile)
                .patch(handlers::update_profile)
                .delete(handlers::clear_profile),
        )
        .route("/profile/avatar", put(handlers::update_avatar))
        // Auth provider handoff
        .route(
            "/session",
            post(handlers::start_session).delete(handlers::end_session),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
