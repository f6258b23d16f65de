//! Reusable test helpers for HTTP integration tests.
//!
//! Provides a stub Telegram Bot API server that captures outbound
//! `sendMessage` calls, plus a builder wiring the full application router
//! to it. Tests get their own migrated `SQLite` database from
//! `#[sqlx::test]`, so no external services are required.
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tokio::sync::mpsc;

use hermod_server::api::{create_router, AppState};
use hermod_server::config::Config;
use hermod_server::db::TopicStore;
use hermod_server::telegram::TelegramClient;

/// A running stub Bot API server.
///
/// `sent` yields the JSON body of every `sendMessage` call the server
/// receives, in order.
pub struct StubTelegram {
    pub addr: SocketAddr,
    pub sent: mpsc::UnboundedReceiver<Value>,
}

#[derive(Clone)]
struct StubState {
    tx: mpsc::UnboundedSender<Value>,
    fail: bool,
}

async fn send_message(
    State(state): State<StubState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let _ = state.tx.send(body);
    if state.fail {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"ok": false, "description": "stub failure"})),
        )
    } else {
        (StatusCode::OK, Json(json!({"ok": true, "result": {}})))
    }
}

/// Spawn a stub Bot API on an ephemeral port.
///
/// The route matches the `test-token` from `Config::default_for_test`.
/// With `fail` set, every delivery attempt gets a 500.
pub async fn spawn_stub_telegram(fail: bool) -> StubTelegram {
    let (tx, rx) = mpsc::unbounded_channel();
    let router = Router::new()
        .route("/bottest-token/sendMessage", post(send_message))
        .with_state(StubState { tx, fail });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub server crashed");
    });

    StubTelegram { addr, sent: rx }
}

/// Build the application router against the given pool and stub backend.
///
/// Returns the store handle as well so tests can seed topics directly.
pub fn test_app(pool: SqlitePool, stub_addr: SocketAddr) -> (Router, TopicStore) {
    let mut config = Config::default_for_test();
    config.telegram_api_base = format!("http://{stub_addr}");

    let store = TopicStore::new(pool);
    let telegram = TelegramClient::new(&config).expect("Failed to build Telegram client");
    let state = AppState::new(store.clone(), telegram, config);

    (create_router(state), store)
}

/// Build a `POST /{topic}` request with an optional content type.
pub fn post_request(path: &str, content_type: Option<&str>, body: &[u8]) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    builder
        .body(Body::from(body.to_vec()))
        .expect("Failed to build request")
}

/// Read a response body into a string.
pub async fn body_to_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}
