//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body with case-insensitive field names.
///
/// Top-level keys are lower-cased and stripped of `_` before deserializing,
/// so `PictureURL`, `pictureUrl` and `picture_url` all land on `pictureurl`.
/// No content type is required.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.body_text(),
            })
        })?;

        decode_body(&bytes).map(Self).map_err(ApiError::Validation)
    }
}

/// Request body read but not yet decoded.
///
/// Lets a handler confirm the target row exists before the body is judged,
/// so a missing id is reported as such whatever the payload looks like.
pub struct RawBody(pub Bytes);

impl RawBody {
    /// Decode with the same key folding as [`JsonBody`].
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode_body(&self.0).map_err(ApiError::Validation)
    }
}

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state).await.map(Self).map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.body_text(),
            })
        })
    }
}

/// Parse a request body, folding object keys before deserializing.
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ValidationError> {
    let malformed = |e: serde_json::Error| ValidationError::MalformedBody {
        reason: e.to_string(),
    };

    let value: Value = serde_json::from_slice(bytes).map_err(malformed)?;
    let value = match value {
        Value::Object(map) => Value::Object(fold_keys(map)),
        other => other,
    };

    serde_json::from_value(value).map_err(malformed)
}

fn fold_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key.replace('_', "").to_lowercase(), value))
        .collect()
}

/// Distinguish "field absent" (`None`) from "field is null" (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "present")]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_id(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "must be a numeric id",
    })
}

/// Extract a numeric `{id}` from the path
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        Ok(Self(parse_id("id", &id)?))
    }
}

/// Query string parameters; rejections become JSON 400s
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ApiError::Validation(ValidationError::MalformedQuery {
                    reason: e.body_text(),
                })
            })?;

        Ok(Self(params))
    }
}

/// Extract `{id}/{member_id}` for membership routes
pub struct MembershipPath {
    pub team_id: i64,
    pub member_id: i64,
}

impl<S> FromRequestParts<S> for MembershipPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((team_id, member_id)): Path<(String, String)> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        Ok(Self {
            team_id: parse_id("id", &team_id)?,
            member_id: parse_id("member_id", &member_id)?,
        })
    }
}
