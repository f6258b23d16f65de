//! Notification Dispatch
//!
//! Resolves a topic and performs the one-shot backend send. At most one
//! `sendMessage` call per inbound request; failures surface synchronously
//! to the original poster, with no queueing or retry.

use axum::http::StatusCode;
use thiserror::Error;
use tracing::info;

use super::normalize::Normalized;
use crate::db::TopicStore;
use crate::telegram::{ParseMode, TelegramClient, TelegramError};

/// Dispatch failures, mapped to HTTP statuses at the gateway boundary.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Topic not found")]
    TopicNotFound,
    #[error("No message provided")]
    EmptyPayload,
    #[error("Failed to send notification: {0}")]
    DeliveryFailed(#[from] TelegramError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DispatchError> for (StatusCode, String) {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::TopicNotFound => {
                (StatusCode::NOT_FOUND, "Topic not found".to_string())
            }
            DispatchError::EmptyPayload => {
                (StatusCode::BAD_REQUEST, "No message provided".to_string())
            }
            DispatchError::DeliveryFailed(e) => {
                tracing::error!("Failed to send notification: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send notification".to_string(),
                )
            }
            DispatchError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

/// Compose the outbound text: attention marker, topic name, blank line,
/// message body. Fixed template; the body is already renderer-safe.
#[must_use]
pub fn compose_notification(topic_name: &str, body: &str) -> String {
    format!("🔔 **{topic_name}**\n\n{body}")
}

/// Resolve `topic_name` and deliver the normalized payload to its chat.
///
/// The topic row is read first and no store state is held across the
/// network call. An empty payload is refused before any backend
/// invocation.
pub async fn dispatch(
    store: &TopicStore,
    telegram: &TelegramClient,
    topic_name: &str,
    payload: &Normalized,
) -> Result<(), DispatchError> {
    let topic = store
        .lookup(topic_name)
        .await?
        .ok_or(DispatchError::TopicNotFound)?;

    let body = match payload {
        Normalized::Empty => return Err(DispatchError::EmptyPayload),
        Normalized::Message(text) => text,
    };

    let text = compose_notification(topic_name, body);
    telegram
        .send_message(topic.chat_id, &text, ParseMode::Markdown)
        .await?;

    info!(topic = %topic_name, chat_id = topic.chat_id, "Notification delivered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_notification_template() {
        let text = compose_notification("alerts-1", "disk full");
        assert_eq!(text, "🔔 **alerts-1**\n\ndisk full");
    }

    #[test]
    fn test_status_mapping() {
        let (status, body): (StatusCode, String) = DispatchError::TopicNotFound.into();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Topic not found");

        let (status, body): (StatusCode, String) = DispatchError::EmptyPayload.into();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "No message provided");

        let (status, body): (StatusCode, String) =
            DispatchError::DeliveryFailed(TelegramError::Status(502)).into();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Failed to send notification");

        let (status, body): (StatusCode, String) =
            DispatchError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }
}
