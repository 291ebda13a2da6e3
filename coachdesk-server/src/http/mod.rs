//! HTTP layer
//!
//! Axum server with:
//! - CORS (local frontend origins by default)
//! - Request tracing
//! - Trailing-slash normalisation
//! - Graceful shutdown
//! - JSON error responses

pub mod server;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_app, build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;
