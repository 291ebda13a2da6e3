//! Axum server setup
//!
//! Server skeleton with:
//! - Local frontend origins allowed by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::{Router, ServiceExt};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::Store;

/// Origins the bundled frontend is served from during development
const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = local frontend only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_permissive: false,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(DEFAULT_ORIGINS.map(HeaderValue::from_static))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
}

/// Assemble every resource router with CORS and tracing.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::members::router())
        .merge(routes::teams::router())
        .merge(routes::feedback::router())
        .layer(cors_layer(cors_permissive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router wrapped so `/members/` and `/members` hit the same handler.
///
/// Path normalisation has to run before routing, so it wraps the router
/// instead of being added with `Router::layer`.
pub fn build_app(state: AppState, cors_permissive: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, cors_permissive))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(PgStore::new(connect(&database_url, &PoolSettings::default()).await?));
/// run_server(store, ServerConfig::default()).await?;
/// ```
pub async fn run_server(store: Arc<dyn Store>, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_app(AppState::new(store), config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
