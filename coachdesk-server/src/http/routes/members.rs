//! Team member endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{present, IdPath, JsonBody, RawBody};
use crate::http::server::AppState;
use crate::models::{Member, MemberPatch, NewMember};

/// Create member request
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: Option<String>,
    #[serde(rename = "pictureurl")]
    pub picture_url: Option<String>,
    pub email: Option<String>,
}

/// Update member request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    #[serde(rename = "pictureurl", default, deserialize_with = "present")]
    pub picture_url: Option<Option<String>>,
    pub email: Option<String>,
}

/// Member response
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PictureURL")]
    pub picture_url: String,
    #[serde(rename = "Email")]
    pub email: String,
}

impl From<Member> for MemberResponse {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            name: m.name,
            picture_url: m.picture_url.unwrap_or_default(),
            email: m.email,
        }
    }
}

/// GET /members - list all members
async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.store.list_members().await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// POST /members - create a member
async fn create_member(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let new = NewMember::new(req.name, req.picture_url, req.email)?;
    let member = state.store.create_member(new).await?;

    tracing::info!(member_id = member.id, "member created");
    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

/// GET /members/{id}
async fn get_member(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = state.store.get_member(id).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// PUT /members/{id} - merge supplied fields
///
/// The member is looked up before the body is decoded, so an unknown id is
/// 404 even when the payload is also bad.
async fn update_member(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    body: RawBody,
) -> Result<Json<MemberResponse>, ApiError> {
    state.store.get_member(id).await?;

    let req: UpdateMemberRequest = body.decode()?;
    let patch = MemberPatch::new(req.name, req.picture_url, req.email)?;
    if patch.is_empty() {
        tracing::debug!(member_id = id, "update carried no fields");
    }
    let member = state.store.update_member(id, patch).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// DELETE /members/{id}
async fn delete_member(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.store.delete_member(id).await?;

    tracing::info!(member_id = id, "member deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Member routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route(
            "/members/{id}",
            get(get_member).put(update_member).delete(delete_member),
        )
}
