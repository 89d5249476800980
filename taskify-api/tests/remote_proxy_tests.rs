//! Gateway in remote-proxy mode against real gRPC servers
//!
//! users-service and boards-service run on ephemeral ports over a shared
//! `MemoryStore`; columns and tasks stay local on the same store. Tests run
//! on the current-thread runtime, so the servers' tasks log through the
//! subscriber installed with `set_default`.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{app_with, call, send};
use serde_json::json;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use taskify_api::app::Gateways;
use taskify_api::gateway::remote::lazy_channel;
use taskify_api::gateway::{LocalColumns, LocalTasks, LocalUsers, RemoteBoards, RemoteUsers};
use taskify_services::grpc::{BoardsGrpc, UsersGrpc};
use taskify_services::server::serve;
use taskify_shared::error::{DomainError, DomainResult};
use taskify_shared::models::board::{Board, CreateBoard, UpdateBoard};
use taskify_shared::services::{BoardService, MemoryStore};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

const RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Boards backend that answers only after the gateway deadline has passed.
struct SlowBoards;

const SLOW_REPLY: Duration = Duration::from_secs(3);

#[async_trait::async_trait]
impl BoardService for SlowBoards {
    async fn create_board(&self, _input: CreateBoard) -> DomainResult<Board> {
        tokio::time::sleep(SLOW_REPLY).await;
        Err(DomainError::NotFound("user"))
    }

    async fn get_board(&self, _user_id: i64, _id: i64) -> DomainResult<Board> {
        tokio::time::sleep(SLOW_REPLY).await;
        Err(DomainError::NotFound("board"))
    }

    async fn list_boards(&self, _user_id: i64) -> DomainResult<Vec<Board>> {
        tokio::time::sleep(SLOW_REPLY).await;
        Ok(Vec::new())
    }

    async fn update_board(
        &self,
        _user_id: i64,
        _id: i64,
        _changes: UpdateBoard,
    ) -> DomainResult<Board> {
        tokio::time::sleep(SLOW_REPLY).await;
        Err(DomainError::NotFound("board"))
    }

    async fn delete_board(&self, _user_id: i64, _id: i64) -> DomainResult<()> {
        tokio::time::sleep(SLOW_REPLY).await;
        Err(DomainError::NotFound("board"))
    }
}

async fn spawn_services(store: &MemoryStore) -> (String, String) {
    let users_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let users_url = format!("http://{}", users_listener.local_addr().unwrap());
    let users = UsersGrpc::new(Arc::new(store.clone())).into_server();
    tokio::spawn(serve("users-service", users, users_listener, std::future::pending()));

    let boards_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let boards_url = format!("http://{}", boards_listener.local_addr().unwrap());
    let boards = BoardsGrpc::new(Arc::new(store.clone())).into_server();
    tokio::spawn(serve("boards-service", boards, boards_listener, std::future::pending()));

    (users_url, boards_url)
}

fn remote_gateways(store: &MemoryStore, users_url: &str, boards_url: &str) -> Gateways {
    Gateways {
        users: Arc::new(RemoteUsers::new(
            lazy_channel(users_url, RPC_TIMEOUT).unwrap(),
            RPC_TIMEOUT,
        )),
        boards: Arc::new(RemoteBoards::new(
            lazy_channel(boards_url, RPC_TIMEOUT).unwrap(),
            RPC_TIMEOUT,
        )),
        columns: Arc::new(LocalColumns::new(Arc::new(store.clone()))),
        tasks: Arc::new(LocalTasks::new(Arc::new(store.clone()))),
    }
}

async fn remote_app() -> Router {
    let store = MemoryStore::new();
    let (users_url, boards_url) = spawn_services(&store).await;
    app_with(remote_gateways(&store, &users_url, &boards_url))
}

fn post_with_id(uri: &str, request_id: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", request_id)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_user(app: &Router, email: &str) -> i64 {
    let response = call(
        app,
        "POST",
        "/api/users",
        Some(json!({ "email": email, "username": "owner", "password": "secret-password" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_request_id_reaches_service_logs() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(
            "taskify_api=debug,taskify_services=debug,taskify_shared=debug",
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(logs.clone())
                .with_ansi(false),
        );
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = remote_app().await;
    let owner = create_user(&app, "owner@example.com").await;

    let response = send(
        &app,
        post_with_id(
            &format!("/api/users/{owner}/boards"),
            "abc123",
            json!({ "name": "Deposit" }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.request_id(), "abc123");

    let lines = logs.lines();
    let line_with = |needle: &str| {
        lines
            .iter()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no log line contains {needle:?}:\n{}", lines.join("\n")))
            .clone()
    };

    let gateway = line_with("forwarding CreateBoard");
    assert!(gateway.contains("api-gateway"), "{gateway}");
    assert!(gateway.contains("req_id=abc123"), "{gateway}");

    let service = line_with("CreateBoard called");
    assert!(service.contains("boards-service"), "{service}");
    assert!(service.contains("req_id=abc123"), "{service}");

    let use_case = line_with("board created");
    assert!(use_case.contains("req_id=abc123"), "{use_case}");
}

#[tokio::test]
async fn test_remote_positions_and_fetch() {
    let app = remote_app().await;
    let owner = create_user(&app, "owner@example.com").await;
    let boards_uri = format!("/api/users/{owner}/boards");

    let deposit = call(&app, "POST", &boards_uri, Some(json!({ "name": "Deposit" }))).await;
    let withdraw = call(&app, "POST", &boards_uri, Some(json!({ "name": "Withdraw" }))).await;
    assert_eq!(deposit.body["position"], 1);
    assert_eq!(withdraw.body["position"], 2);

    let fetched = call(&app, "GET", &format!("{boards_uri}/{}", withdraw.body["id"]), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Withdraw");
    assert_eq!(fetched.body["position"], 2);
}

#[tokio::test]
async fn test_remote_not_found_is_404() {
    let app = remote_app().await;
    let owner = create_user(&app, "owner@example.com").await;

    let board = call(&app, "GET", &format!("/api/users/{owner}/boards/999"), None).await;
    assert_eq!(board.status, StatusCode::NOT_FOUND);
    assert_eq!(board.body, json!({ "error": "board not found" }));

    let user = call(&app, "GET", "/api/users/999", None).await;
    assert_eq!(user.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remote_invalid_argument_is_400() {
    let app = remote_app().await;
    let owner = create_user(&app, "owner@example.com").await;
    let board = call(
        &app,
        "POST",
        &format!("/api/users/{owner}/boards"),
        Some(json!({ "name": "Deposit" })),
    )
    .await;
    let uri = format!("/api/users/{owner}/boards/{}", board.body["id"]);

    let response = call(&app, "PUT", &uri, Some(json!({ "name": "  " }))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let unchanged = call(&app, "GET", &uri, None).await;
    assert_eq!(unchanged.body, board.body);
}

#[tokio::test]
async fn test_remote_duplicate_email_is_409() {
    let app = remote_app().await;
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
async fn test_unreachable_service_is_opaque_500() {
    let store = MemoryStore::new();
    let app = app_with(remote_gateways(&store, "http://127.0.0.1:1", "http://127.0.0.1:1"));

    let response = call(&app, "GET", "/api/users/1", None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({ "error": "internal error" }));
}

#[tokio::test]
async fn test_local_columns_under_remote_board() {
    let app = remote_app().await;
    let owner = create_user(&app, "owner@example.com").await;
    let board = call(
        &app,
        "POST",
        &format!("/api/users/{owner}/boards"),
        Some(json!({ "name": "Board" })),
    )
    .await;

    let column = call(
        &app,
        "POST",
        &format!("/api/boards/{}/columns", board.body["id"]),
        Some(json!({ "name": "To Do" })),
    )
    .await;

    assert_eq!(column.status, StatusCode::CREATED);
    assert_eq!(column.body["position"], 1);
    assert_eq!(column.body["board_id"], board.body["id"]);
}

#[tokio::test]
async fn test_remote_list_is_position_ordered() {
    let app = remote_app().await;
    let owner = create_user(&app, "owner@example.com").await;
    let boards_uri = format!("/api/users/{owner}/boards");

    for name in ["Deposit", "Withdraw", "Transfer"] {
        call(&app, "POST", &boards_uri, Some(json!({ "name": name }))).await;
    }
    let listed = call(&app, "GET", &boards_uri, None).await;
    let withdraw_id = listed.body[1]["id"].clone();
    call(&app, "DELETE", &format!("{boards_uri}/{withdraw_id}"), None).await;

    let listed = call(&app, "GET", &boards_uri, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let entries: Vec<(String, i64)> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| (b["name"].as_str().unwrap().to_string(), b["position"].as_i64().unwrap()))
        .collect();
    assert_eq!(
        entries,
        vec![("Deposit".to_string(), 1), ("Transfer".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_slow_service_hits_deadline_as_opaque_500() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let boards_url = format!("http://{}", listener.local_addr().unwrap());
    let boards = BoardsGrpc::new(Arc::new(SlowBoards)).into_server();
    tokio::spawn(serve("boards-service", boards, listener, std::future::pending()));

    let deadline = Duration::from_millis(200);
    let store = MemoryStore::new();
    let app = app_with(Gateways {
        users: Arc::new(LocalUsers::new(Arc::new(store.clone()))),
        boards: Arc::new(RemoteBoards::new(
            lazy_channel(&boards_url, RPC_TIMEOUT).unwrap(),
            deadline,
        )),
        columns: Arc::new(LocalColumns::new(Arc::new(store.clone()))),
        tasks: Arc::new(LocalTasks::new(Arc::new(store))),
    });

    let started = Instant::now();
    let response = call(&app, "GET", "/api/users/1/boards/1", None).await;
    let elapsed = started.elapsed();

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({ "error": "internal error" }));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}
