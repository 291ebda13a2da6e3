//! Feedback endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, QueryParams};
use crate::http::server::AppState;
use crate::models::{Feedback, NewFeedback, Target, TargetKind, ValidationError};

/// Create feedback request
#[derive(Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    pub content: Option<String>,
    #[serde(rename = "targetid")]
    pub target_id: Option<i64>,
    #[serde(rename = "targettype")]
    pub target_type: Option<String>,
}

/// Query parameters for GET /feedback
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackQuery {
    pub member_id: Option<String>,
    pub team_id: Option<String>,
}

impl FeedbackQuery {
    /// Resolve to a single target filter.
    ///
    /// Empty values count as absent. Exactly one of `member_id`/`team_id`
    /// narrows the listing; both or neither return everything.
    pub fn target(&self) -> Result<Option<Target>, ValidationError> {
        let member = parse_filter("member_id", self.member_id.as_deref())?;
        let team = parse_filter("team_id", self.team_id.as_deref())?;

        Ok(match (member, team) {
            (Some(id), None) => Some(TargetKind::Member.with_id(id)),
            (None, Some(id)) => Some(TargetKind::Team.with_id(id)),
            _ => None,
        })
    }
}

fn parse_filter(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidFormat {
                field,
                reason: "must be a numeric id",
            }),
    }
}

/// Feedback response
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "TargetID")]
    pub target_id: i64,
    #[serde(rename = "TargetType")]
    pub target_type: &'static str,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            content: f.content,
            target_id: f.target.id(),
            target_type: f.target.kind().as_str(),
        }
    }
}

/// POST /feedback - attach feedback to a team or member
async fn create_feedback(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let new = NewFeedback::new(req.content, req.target_id, req.target_type)?;
    let feedback = state.store.create_feedback(new).await?;

    tracing::info!(
        feedback_id = feedback.id,
        target_type = %feedback.target.kind(),
        target_id = feedback.target.id(),
        "feedback created"
    );
    Ok((StatusCode::CREATED, Json(FeedbackResponse::from(feedback))))
}

/// GET /feedback?member_id=..|team_id=..
async fn list_feedback(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FeedbackQuery>,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    let target = query.target()?;
    let entries = state.store.list_feedback(target).await?;
    Ok(Json(entries.into_iter().map(FeedbackResponse::from).collect()))
}

/// Feedback routes
pub fn router() -> Router<AppState> {
    Router::new().route("/feedback", get(list_feedback).post(create_feedback))
}
