//! End-to-end router tests against the in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use coachdesk_server::{build_app, AppState, MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;

fn app() -> NormalizePath<Router> {
    build_app(AppState::new(Arc::new(MemoryStore::new())), false)
}

async fn send(
    app: &NormalizePath<Router>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_member(app: &NormalizePath<Router>, name: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/members",
        Some(json!({ "name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    body["ID"].as_i64().unwrap()
}

async fn create_team(app: &NormalizePath<Router>, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/teams", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    body["ID"].as_i64().unwrap()
}

#[tokio::test]
async fn health_endpoint() {
    let (status, body) = send(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn member_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "name": "Ada", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({ "ID": 1, "Name": "Ada", "PictureURL": "", "Email": "ada@example.com" })
    );

    let (status, fetched) = send(&app, "GET", "/members/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, renamed) = send(&app, "PUT", "/members/1", Some(json!({ "name": "B" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["Name"], "B");
    assert_eq!(renamed["Email"], "ada@example.com");

    let (status, updated) = send(
        &app,
        "PUT",
        "/members/1",
        Some(json!({ "pictureURL": "ada.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["Name"], "B");
    assert_eq!(updated["PictureURL"], "ada.png");

    let (status, list) = send(&app, "GET", "/members", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", "/members/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/members/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Team member not found" }));
}

#[tokio::test]
async fn update_with_null_picture_clears_it() {
    let app = app();
    send(
        &app,
        "POST",
        "/members",
        Some(json!({ "name": "Ada", "email": "ada@example.com", "pictureurl": "a.png" })),
    )
    .await;

    let (status, body) = send(&app, "PUT", "/members/1", Some(json!({ "pictureurl": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["PictureURL"], "");
    assert_eq!(body["Email"], "ada@example.com");
}

#[tokio::test]
async fn update_blank_picture_keeps_it() {
    let app = app();
    send(
        &app,
        "POST",
        "/members",
        Some(json!({ "name": "Ada", "email": "ada@example.com", "pictureurl": "a.png" })),
    )
    .await;

    let (status, body) = send(&app, "PUT", "/members/1", Some(json!({ "pictureurl": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["PictureURL"], "a.png");
}

async fn send_raw(app: &NormalizePath<Router>, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn updating_missing_id_is_404_whatever_the_body() {
    let app = app();

    let (status, body) = send(&app, "PUT", "/members/99", Some(json!({ "name": "B" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Team member not found");

    let (status, _) = send(&app, "PUT", "/members/99", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_raw(&app, "PUT", "/members/99", "{not json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PUT", "/teams/99", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Team not found");

    let (status, _) = send_raw(&app, "PUT", "/teams/99", "{not json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updating_existing_id_still_validates_body() {
    let app = app();
    create_member(&app, "Ada", "ada@example.com").await;
    create_team(&app, "Falcons").await;

    let (status, body) = send(&app, "PUT", "/members/1", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name cannot be empty");

    let (status, body) = send_raw(&app, "PUT", "/teams/1", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid request body"));
}

#[tokio::test]
async fn field_names_are_case_insensitive() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "Name": "Ada", "EMAIL": "ada@example.com", "PictureURL": "a.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["PictureURL"], "a.png");

    let (status, body) = send(
        &app,
        "POST",
        "/teams",
        Some(json!({ "NAME": "Falcons", "logo_url": "f.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["LogoURL"], "f.png");
    assert_eq!(body["Members"], json!([]));
}

#[tokio::test]
async fn missing_required_field_is_400() {
    let app = app();

    let (status, body) = send(&app, "POST", "/members", Some(json!({ "name": "Ada" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");

    let (status, _) = send(&app, "POST", "/teams", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_400() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/members")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = app();

    let (status, body) = send(&app, "GET", "/members/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("numeric"));

    let (status, _) = send(&app, "POST", "/teams/1/assign/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicates_are_server_errors() {
    let app = app();
    create_member(&app, "Ada", "ada@example.com").await;
    create_team(&app, "Falcons").await;

    let (status, body) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "name": "Other Ada", "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "POST", "/teams", Some(json!({ "name": "Falcons" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn nonexistent_records_are_404() {
    let app = app();

    for (method, uri) in [
        ("GET", "/members/99"),
        ("DELETE", "/members/99"),
        ("GET", "/teams/99"),
        ("DELETE", "/teams/99"),
    ] {
        let (status, _) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
    }

    let (status, body) = send(&app, "PUT", "/teams/99", Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Team not found");

    let (status, body) = send(
        &app,
        "PUT",
        "/members/99",
        Some(json!({ "name": "X", "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Team member not found");
}

#[tokio::test]
async fn assign_and_remove_membership() {
    let app = app();
    let member = create_member(&app, "Ada", "ada@example.com").await;
    let team = create_team(&app, "Falcons").await;

    let uri = format!("/teams/{}/assign/{}", team, member);
    let (status, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member assigned to team successfully");

    // second assignment keeps a single membership
    let (status, _) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, team_body) = send(&app, "GET", &format!("/teams/{}", team), None).await;
    let members = team_body["Members"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["Name"], "Ada");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/teams/{}/remove/{}", team, member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member removed from team successfully");

    let (_, team_body) = send(&app, "GET", &format!("/teams/{}", team), None).await;
    assert_eq!(team_body["Members"], json!([]));
}

#[tokio::test]
async fn membership_alias_routes() {
    let app = app();
    let member = create_member(&app, "Ada", "ada@example.com").await;
    let team = create_team(&app, "Falcons").await;
    let uri = format!("/teams/{}/members/{}", team, member);

    let (status, _) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = send(&app, "GET", "/teams", None).await;
    assert_eq!(list[0]["Members"][0]["ID"], member);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn assign_reports_missing_team_before_member() {
    let app = app();
    let member = create_member(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(&app, "POST", "/teams/42/assign/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Team not found");

    let team = create_team(&app, "Falcons").await;
    let (status, body) = send(&app, "POST", &format!("/teams/{}/assign/77", team), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Team member not found");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/teams/42/remove/{}", member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_team_keeps_its_members() {
    let app = app();
    let member = create_member(&app, "Ada", "ada@example.com").await;
    let team = create_team(&app, "Falcons").await;
    send(&app, "POST", &format!("/teams/{}/assign/{}", team, member), None).await;

    let (status, _) = send(&app, "DELETE", &format!("/teams/{}", team), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/teams/{}", team), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &format!("/members/{}", member), None).await;
    assert_eq!(status, StatusCode::OK);

    // the name is free again
    create_team(&app, "Falcons").await;
}

#[tokio::test]
async fn deleting_member_drops_it_from_teams() {
    let app = app();
    let member = create_member(&app, "Ada", "ada@example.com").await;
    let team = create_team(&app, "Falcons").await;
    send(&app, "POST", &format!("/teams/{}/assign/{}", team, member), None).await;

    send(&app, "DELETE", &format!("/members/{}", member), None).await;

    let (_, team_body) = send(&app, "GET", &format!("/teams/{}", team), None).await;
    assert_eq!(team_body["Members"], json!([]));
}

#[tokio::test]
async fn feedback_targets_teams_and_members() {
    let app = app();
    let member = create_member(&app, "Ada", "ada@example.com").await;
    let team = create_team(&app, "Falcons").await;

    let (status, body) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "content": "Great hustle", "targetID": member, "targetType": "member" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "ID": 1, "Content": "Great hustle", "TargetID": member, "TargetType": "member" })
    );

    let (status, _) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "content": "Tight defence", "targetid": team, "targettype": "team" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = send(&app, "GET", "/feedback", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, for_member) = send(&app, "GET", &format!("/feedback?member_id={}", member), None).await;
    let for_member = for_member.as_array().unwrap();
    assert_eq!(for_member.len(), 1);
    assert_eq!(for_member[0]["Content"], "Great hustle");

    let (_, for_team) = send(&app, "GET", &format!("/feedback?team_id={}", team), None).await;
    assert_eq!(for_team[0]["TargetType"], "team");

    let (_, empty) = send(&app, "GET", "/feedback?team_id=99", None).await;
    assert_eq!(empty, json!([]));

    let (_, both) = send(&app, "GET", "/feedback?member_id=1&team_id=1", None).await;
    assert_eq!(both.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn feedback_validation() {
    let app = app();
    let team = create_team(&app, "Falcons").await;

    let (status, body) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "content": "Hi", "targetid": team, "targettype": "coach" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("coach"));

    let (status, body) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "content": "Hi", "targetid": 55, "targettype": "team" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Target team not found");

    let (status, body) = send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "content": "Hi", "targetid": 55, "targettype": "member" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Target member not found");

    let (status, body) = send(&app, "GET", "/feedback?member_id=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // repeated key fails query decoding; still a JSON error body
    let (status, body) = send(&app, "GET", "/feedback?member_id=1&member_id=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid query string"));

    let (_, all) = send(&app, "GET", "/feedback", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn feedback_survives_target_deletion() {
    let app = app();
    let member = create_member(&app, "Ada", "ada@example.com").await;
    send(
        &app,
        "POST",
        "/feedback",
        Some(json!({ "content": "Great hustle", "targetid": member, "targettype": "member" })),
    )
    .await;

    send(&app, "DELETE", &format!("/members/{}", member), None).await;

    let (_, all) = send(&app, "GET", "/feedback", None).await;
    assert_eq!(all[0]["TargetID"], member);
}

#[tokio::test]
async fn trailing_slash_is_ignored() {
    let app = app();
    create_member(&app, "Ada", "ada@example.com").await;

    let (status, list) = send(&app, "GET", "/members/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/members/1/", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/teams/", Some(json!({ "name": "Falcons" }))).await;
    assert_eq!(status, StatusCode::CREATED);
}
