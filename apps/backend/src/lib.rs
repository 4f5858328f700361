pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    routing::{get, post},
    Router,
};
use question_core::{Capabilities, ModuleStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::{ApiError, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<dyn ModuleStore>>,
    pub capabilities: Capabilities,
}

impl AppState {
    pub fn new(store: impl ModuleStore + 'static, capabilities: Capabilities) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            capabilities,
        }
    }

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, dyn ModuleStore + 'static>> {
        self.store
            .read()
            .map_err(|_| ApiError::Internal("module store lock poisoned".to_string()))
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, dyn ModuleStore + 'static>> {
        self.store
            .write()
            .map_err(|_| ApiError::Internal("module store lock poisoned".to_string()))
    }
}

/// Build the router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Module routes
        .route("/api/modules", get(routes::modules::list))
        .route(
            "/api/modules/:module_id",
            get(routes::modules::get_one)
                .put(routes::modules::save)
                .delete(routes::modules::remove),
        )
        // Question routes
        .route(
            "/api/modules/:module_id/questions/:question_id",
            get(routes::questions::get_one)
                .put(routes::questions::save)
                .delete(routes::questions::remove),
        )
        .route(
            "/api/modules/:module_id/questions/:question_id/evaluate",
            post(routes::practice::evaluate),
        )
        // Editor routes
        .route("/api/gap-text/decode", post(routes::editor::decode))
        .route("/api/gap-text/encode", post(routes::editor::encode))
        .route("/api/gap-text/remove-gaps", post(routes::editor::remove_gaps))
        .route("/api/questions/validate", post(routes::editor::validate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if !config.capabilities.gap_text_authoring {
        tracing::warn!("Gap text authoring is disabled");
    }

    tracing::info!("Using in-memory module store");
    let state = AppState::new(question_core::InMemoryModuleStore::new(), config.capabilities);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
