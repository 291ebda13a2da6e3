//! coachdesk-server: HTTP API for coaching staff
//!
//! Manages team members, teams with many-to-many membership, and feedback
//! attached to either a team or a member. Persistence is PostgreSQL via sqlx,
//! with an in-memory store for tests and local demos.

pub mod db;
pub mod http;
pub mod models;

pub use db::{connect, DbError, MemoryStore, PgStore, PoolSettings, Store};
pub use http::{build_app, build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
