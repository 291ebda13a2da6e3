//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": "<message>"}` with a status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Unique constraint violated (500, per the wire contract)
    Conflict {
        resource: &'static str,
        field: &'static str,
    },

    /// Team association clear failed, team left intact (500)
    AssociationClear { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } | Self::AssociationClear { .. } | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `error` field.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { resource, .. } => format!("{} not found", capitalize(resource)),
            Self::Conflict { resource, field } => {
                format!("{} with this {} already exists", resource, field)
            }
            Self::AssociationClear { message } => {
                format!("Failed to clear team members association: {}", message)
            }
            Self::Database(_) => "an internal error occurred".to_owned(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
            }
            Self::AssociationClear { message } => {
                tracing::error!(%message, "failed to clear team members association");
            }
            Self::Conflict { resource, field } => {
                tracing::warn!(resource, field, "unique constraint violated");
            }
            Self::Validation(_) | Self::NotFound { .. } => {}
        }

        let body = json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { resource, field } => Self::Conflict { resource, field },
            DbError::AssociationClear(source) => Self::AssociationClear {
                message: source.to_string(),
            },
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}
