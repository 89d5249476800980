//! Router tests over in-memory backends
//!
//! Every request goes through the full middleware stack with
//! `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{call, create_user, memory_app, send};
use serde_json::json;

async fn create_board(app: &axum::Router, user_id: i64, name: &str) -> serde_json::Value {
    let response = call(
        app,
        "POST",
        &format!("/api/users/{user_id}/boards"),
        Some(json!({ "name": name, "description": format!("{name} feature development") })),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body
}

#[tokio::test]
async fn test_deposit_then_withdraw_positions() {
    let app = memory_app();
    create_user(&app, "first@example.com").await;
    let owner = create_user(&app, "second@example.com").await;

    let deposit = create_board(&app, owner, "Deposit").await;
    let withdraw = create_board(&app, owner, "Withdraw").await;
    assert_eq!(deposit["position"], 1);
    assert_eq!(withdraw["position"], 2);

    let id = withdraw["id"].as_i64().unwrap();
    let response = call(&app, "GET", &format!("/api/users/{owner}/boards/{id}"), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Withdraw");
    assert_eq!(response.body["position"], 2);
    assert_eq!(response.body["user_id"], owner);
}

#[tokio::test]
async fn test_list_boards_in_position_order() {
    let app = memory_app();
    let owner = create_user(&app, "owner@example.com").await;
    let other = create_user(&app, "other@example.com").await;

    create_board(&app, owner, "Deposit").await;
    let withdraw = create_board(&app, owner, "Withdraw").await;
    create_board(&app, owner, "Transfer").await;
    create_board(&app, other, "Elsewhere").await;

    let boards_uri = format!("/api/users/{owner}/boards");
    let listed = call(&app, "GET", &boards_uri, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let names: Vec<&str> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|board| board["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Deposit", "Withdraw", "Transfer"]);

    let id = withdraw["id"].as_i64().unwrap();
    let deleted = call(&app, "DELETE", &format!("{boards_uri}/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let listed = call(&app, "GET", &boards_uri, None).await;
    let positions: Vec<i64> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|board| board["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, [1, 3]);
}

#[tokio::test]
async fn test_list_boards_of_unknown_user_is_empty() {
    let app = memory_app();

    let response = call(&app, "GET", "/api/users/999/boards", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_missing_board_is_404() {
    let app = memory_app();
    let owner = create_user(&app, "owner@example.com").await;

    let response = call(&app, "GET", &format!("/api/users/{owner}/boards/999"), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "error": "board not found" }));
}

#[tokio::test]
async fn test_board_of_another_owner_is_404() {
    let app = memory_app();
    let alice = create_user(&app, "alice@example.com").await;
    let bob = create_user(&app, "bob@example.com").await;
    let board = create_board(&app, alice, "Deposit").await;

    let id = board["id"].as_i64().unwrap();
    let response = call(&app, "GET", &format!("/api/users/{bob}/boards/{id}"), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_400_json() {
    let app = memory_app();

    let response = call(&app, "GET", "/api/users/abc/boards/1", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = memory_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let response = send(&app, request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_blank_board_name_is_400_and_row_unchanged() {
    let app = memory_app();
    let owner = create_user(&app, "owner@example.com").await;
    let board = create_board(&app, owner, "Deposit").await;
    let uri = format!("/api/users/{owner}/boards/{}", board["id"]);

    let response = call(&app, "PUT", &uri, Some(json!({ "name": "   " }))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "name: must not be empty");

    let response = call(&app, "PUT", &uri, Some(json!({ "name": "" }))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let unchanged = call(&app, "GET", &uri, None).await;
    assert_eq!(unchanged.body, board);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = memory_app();
    let request = Request::builder()
        .uri("/api/users/1")
        .header("x-request-id", "abc123")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.request_id(), "abc123");
}

#[tokio::test]
async fn test_request_id_is_generated_when_missing_or_unusable() {
    let app = memory_app();

    let generated = call(&app, "GET", "/api/users/1", None).await;
    assert_eq!(generated.request_id().len(), 36);

    let request = Request::builder()
        .uri("/api/users/1")
        .header("x-request-id", "has space")
        .body(Body::empty())
        .unwrap();
    let replaced = send(&app, request).await;
    assert_ne!(replaced.request_id(), "has space");
    assert_eq!(replaced.request_id().len(), 36);
}

#[tokio::test]
async fn test_user_lifecycle() {
    let app = memory_app();

    let created = call(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "email": "Ada@Example.com", "username": "ada", "password": "secret-password" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["email"], "ada@example.com");
    assert!(created.body.get("password_hash").is_none());
    assert!(created.body.get("password").is_none());

    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/api/users/{id}");

    let updated = call(
        &app,
        "PUT",
        &uri,
        Some(json!({ "email": "ada@example.com", "username": "countess" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["username"], "countess");

    let deleted = call(&app, "DELETE", &uri, None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = call(&app, "DELETE", &uri, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body["error"], "user not found");
}

#[tokio::test]
async fn test_duplicate_email_is_409() {
    let app = memory_app();
    create_user(&app, "owner@example.com").await;

    let response = call(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "email": "owner@example.com", "username": "other", "password": "secret-password" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_user_body_is_400() {
    let app = memory_app();

    let response = call(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "email": "not-an-email", "username": "ada", "password": "abc" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.body["error"].as_str().unwrap();
    assert!(error.contains("email"), "{error}");
    assert!(error.contains("password"), "{error}");
}

#[tokio::test]
async fn test_columns_and_tasks_flow() {
    let app = memory_app();
    let owner = create_user(&app, "owner@example.com").await;
    let board = create_board(&app, owner, "Board").await;
    let board_id = board["id"].as_i64().unwrap();

    let todo = call(&app, "POST", &format!("/api/boards/{board_id}/columns"), Some(json!({ "name": "To Do" }))).await;
    let done = call(&app, "POST", &format!("/api/boards/{board_id}/columns"), Some(json!({ "name": "Done" }))).await;
    assert_eq!(todo.status, StatusCode::CREATED);
    assert_eq!((todo.body["position"].as_i64(), done.body["position"].as_i64()), (Some(1), Some(2)));

    let column_id = todo.body["id"].as_i64().unwrap();
    let tasks_uri = format!("/api/columns/{column_id}/tasks");

    let first = call(&app, "POST", &tasks_uri, Some(json!({ "title": "Write tests", "assignee_id": owner }))).await;
    let second = call(&app, "POST", &tasks_uri, Some(json!({ "title": "Ship it" }))).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["position"], 1);
    assert_eq!(first.body["assignee_id"], owner);
    assert_eq!(second.body["position"], 2);
    assert!(second.body["assignee_id"].is_null());

    let task_uri = format!("{tasks_uri}/{}", first.body["id"]);
    let deleted = call(&app, "DELETE", &task_uri, None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_null());

    let second_uri = format!("{tasks_uri}/{}", second.body["id"]);
    let remaining = call(&app, "GET", &second_uri, None).await;
    assert_eq!(remaining.body["position"], 2);

    let renamed = call(
        &app,
        "PUT",
        &format!("/api/boards/{board_id}/columns/{column_id}"),
        Some(json!({ "name": "Doing" })),
    )
    .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "Doing");
    assert_eq!(renamed.body["position"], 1);
}

#[tokio::test]
async fn test_unknown_assignee_is_404() {
    let app = memory_app();
    let owner = create_user(&app, "owner@example.com").await;
    let board = create_board(&app, owner, "Board").await;
    let column = call(
        &app,
        "POST",
        &format!("/api/boards/{}/columns", board["id"]),
        Some(json!({ "name": "To Do" })),
    )
    .await;

    let response = call(
        &app,
        "POST",
        &format!("/api/columns/{}/tasks", column.body["id"]),
        Some(json!({ "title": "Orphan", "assignee_id": 999 })),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_user_removes_their_boards() {
    let app = memory_app();
    let owner = create_user(&app, "owner@example.com").await;
    let board = create_board(&app, owner, "Deposit").await;

    let deleted = call(&app, "DELETE", &format!("/api/users/{owner}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let response = call(&app, "GET", &format!("/api/users/{owner}/boards/{}", board["id"]), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_404_json() {
    let app = memory_app();

    let response = call(&app, "GET", "/api/projects", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "route not found");
}

#[tokio::test]
async fn test_health_reports_disconnected_database() {
    let app = memory_app();

    let response = call(&app, "GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["database"], "disconnected");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}
