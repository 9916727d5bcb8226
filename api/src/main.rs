//! Skyport API Server
//!
//! Serves the plan catalog, entitlement checks and the cached user profile
//! to the Skyport dashboard.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyport_api::adapters::{BackendClient, FileProfileStorage, TracingNotifier};
use skyport_api::app::{NotificationPresenter, UserDataStore};
use skyport_api::config::Config;
use skyport_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,skyport_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Skyport API...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(data_dir = %config.data_dir.display(), backend = %config.backend_url, "Configuration loaded");

    // Create adapters
    let storage = Arc::new(FileProfileStorage::new(config.data_dir.clone()));
    let notifier = Arc::new(TracingNotifier);
    let billing = Arc::new(BackendClient::new(config.backend_url.clone()));

    // Create application services
    let store = Arc::new(UserDataStore::new(storage));
    let profile = store.get();
    tracing::info!(plan = %profile.plan, "Profile cache ready");

    let presenter = Arc::new(
        NotificationPresenter::new(notifier).with_thresholds(config.warning_thresholds),
    );

    let state = AppState {
        store,
        presenter,
        billing,
    };

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
