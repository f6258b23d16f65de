//! Inbound Webhook Handler
//!
//! `POST /{topic_name}` is the external-service entry point. Processing
//! order: topic lookup (404 before the body is even read), body read,
//! normalization, dispatch. Every failure maps to a status code here; no
//! fault escapes the handler.

use axum::body::{to_bytes, Body};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use tracing::{info, instrument};

use super::AppState;
use crate::notify::{self, DispatchError};

#[instrument(skip(state, headers, body))]
pub async fn receive_notification(
    State(state): State<AppState>,
    Path(topic_name): Path<String>,
    headers: HeaderMap,
    body: Body,
) -> Result<&'static str, (StatusCode, String)> {
    info!(topic = %topic_name, "Webhook request received");

    // Unknown topics are rejected without reading the body
    state
        .store
        .lookup(&topic_name)
        .await
        .map_err(DispatchError::Database)?
        .ok_or(DispatchError::TopicNotFound)?;

    let raw = to_bytes(body, state.config.max_body_size)
        .await
        .map_err(|e| {
            tracing::error!(topic = %topic_name, "Failed to read request body: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let payload = notify::normalize(&raw, content_type, &state.config.markdown_escape_chars);

    // Dispatch resolves the topic again; it can vanish between the early
    // 404 check and the send, and both misses map to 404.
    notify::dispatch(&state.store, &state.telegram, &topic_name, &payload).await?;

    Ok("Notification sent")
}
