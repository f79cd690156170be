pub mod error;
pub mod handlers;
pub mod submission;
pub mod workspace;

use crate::config::TomlConfig;
use crate::core::ConfigProvider;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TomlConfig>,
}

impl AppState {
    pub fn new(config: TomlConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/", get(handlers::index).post(handlers::generate_labels))
        .route("/return_home", get(handlers::return_home))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: TomlConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(config.output_root())?;
    let addr = config.bind_address();
    let app = build_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Label service listening on http://{}", addr);
    tracing::info!("  - GET  /             (upload form)");
    tracing::info!("  - POST /             (generate archive)");
    tracing::info!("  - GET  /return_home  (redirect)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Label service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
