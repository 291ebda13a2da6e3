//! Team endpoints, including membership assignment

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::members::MemberResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{present, IdPath, JsonBody, MembershipPath, RawBody};
use crate::http::server::AppState;
use crate::models::{NewTeam, Team, TeamPatch};

/// Create team request
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: Option<String>,
    #[serde(rename = "logourl")]
    pub logo_url: Option<String>,
}

/// Update team request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    #[serde(rename = "logourl", default, deserialize_with = "present")]
    pub logo_url: Option<Option<String>>,
}

/// Team response with embedded members
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "LogoURL")]
    pub logo_url: String,
    #[serde(rename = "Members")]
    pub members: Vec<MemberResponse>,
}

impl From<Team> for TeamResponse {
    fn from(t: Team) -> Self {
        Self {
            id: t.id,
            name: t.name,
            logo_url: t.logo_url.unwrap_or_default(),
            members: t.members.into_iter().map(MemberResponse::from).collect(),
        }
    }
}

/// Acknowledgement for membership changes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /teams - list teams with members
async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state.store.list_teams().await?;
    Ok(Json(teams.into_iter().map(TeamResponse::from).collect()))
}

/// POST /teams - create a team
async fn create_team(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let new = NewTeam::new(req.name, req.logo_url)?;
    let team = state.store.create_team(new).await?;

    tracing::info!(team_id = team.id, "team created");
    Ok((StatusCode::CREATED, Json(TeamResponse::from(team))))
}

/// GET /teams/{id} - team with members
async fn get_team(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.store.get_team(id).await?;
    Ok(Json(TeamResponse::from(team)))
}

/// PUT /teams/{id} - merge supplied fields, unknown id checked first
async fn update_team(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    body: RawBody,
) -> Result<Json<TeamResponse>, ApiError> {
    state.store.get_team(id).await?;

    let req: UpdateTeamRequest = body.decode()?;
    let patch = TeamPatch::new(req.name, req.logo_url)?;
    if patch.is_empty() {
        tracing::debug!(team_id = id, "update carried no fields");
    }
    let team = state.store.update_team(id, patch).await?;
    Ok(Json(TeamResponse::from(team)))
}

/// DELETE /teams/{id} - clear memberships, then delete
async fn delete_team(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.store.delete_team(id).await?;

    tracing::info!(team_id = id, "team deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /teams/{id}/assign/{member_id}
async fn assign_member(
    State(state): State<AppState>,
    path: MembershipPath,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .assign_member(path.team_id, path.member_id)
        .await?;

    tracing::info!(
        team_id = path.team_id,
        member_id = path.member_id,
        "member assigned"
    );
    Ok(Json(MessageResponse {
        message: "Member assigned to team successfully",
    }))
}

/// DELETE /teams/{id}/remove/{member_id}
async fn remove_member(
    State(state): State<AppState>,
    path: MembershipPath,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .remove_member(path.team_id, path.member_id)
        .await?;

    tracing::info!(
        team_id = path.team_id,
        member_id = path.member_id,
        "member removed"
    );
    Ok(Json(MessageResponse {
        message: "Member removed from team successfully",
    }))
}

/// Team routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/teams/{id}/assign/{member_id}", post(assign_member))
        .route(
            "/teams/{id}/members/{member_id}",
            post(assign_member).delete(remove_member),
        )
        .route("/teams/{id}/remove/{member_id}", delete(remove_member))
}
