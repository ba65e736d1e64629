//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Trailing slashes trimmed before routing (`/users/` == `/users`)
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::{Router, ServiceExt};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use super::routes;
use crate::db::{MemoryStore, PgAvatarRepo, PgItemRepo, PgQuestRepo, PgUserRepo};
use crate::services::{AvatarService, ItemService, QuestService, UserService};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
        }
    }
}

/// Shared application state: one service per entity.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub avatars: AvatarService,
    pub items: ItemService,
    pub quests: QuestService,
    /// Backend name reported by `/health`.
    pub store: &'static str,
}

impl AppState {
    /// Services backed by PostgreSQL repositories sharing `pool`.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: UserService::new(Arc::new(PgUserRepo::new(pool.clone())), info_span!("users")),
            avatars: AvatarService::new(
                Arc::new(PgAvatarRepo::new(pool.clone())),
                info_span!("avatars"),
            ),
            items: ItemService::new(Arc::new(PgItemRepo::new(pool.clone())), info_span!("items")),
            quests: QuestService::new(Arc::new(PgQuestRepo::new(pool)), info_span!("quests")),
            store: "postgres",
        }
    }

    /// Services backed by a fresh in-process store.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: UserService::new(store.clone(), info_span!("users")),
            avatars: AvatarService::new(store.clone(), info_span!("avatars")),
            items: ItemService::new(store.clone(), info_span!("items")),
            quests: QuestService::new(store, info_span!("quests")),
            store: "memory",
        }
    }
}

/// The routed application, with paths normalized before they reach the router.
pub type App = NormalizePath<Router>;

/// Build the application router with all routes.
///
/// Normalization has to wrap the router: layers added with `Router::layer`
/// only run once a route has matched.
pub fn build_router(state: AppState, cors_permissive: bool) -> App {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:8000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:8000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .merge(routes::avatars::router())
        .merge(routes::items::router())
        .merge(routes::quests::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// run_server(AppState::postgres(pool), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(store = state.store, "services ready");
    let app = build_router(state, config.cors_permissive);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
///
/// A handler that cannot be installed never fires; the other one still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
