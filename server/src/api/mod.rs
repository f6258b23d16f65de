//! API Router and Application State
//!
//! Central routing configuration and shared state.

mod ingest;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::TopicStore;
use crate::telegram::TelegramClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Topic registry handle
    pub store: TopicStore,
    /// Telegram Bot API client
    pub telegram: TelegramClient,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(store: TopicStore, telegram: TelegramClient, config: Config) -> Self {
        Self {
            store,
            telegram,
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
///
/// `/health` is registered before the topic capture so it stays reachable
/// no matter what names exist in the registry.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/{topic_name}", post(ingest::receive_notification))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness endpoint. Never touches the store.
async fn health_check(State(_state): State<AppState>) -> &'static str {
    "OK"
}
