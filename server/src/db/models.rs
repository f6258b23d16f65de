//! Database Models

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered topic: a globally unique name routing inbound webhooks to a
/// Telegram chat.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Topic {
    /// Global routing key, unique across all owners
    pub name: String,
    /// Telegram user who registered the topic
    pub owner_id: i64,
    /// Telegram chat notifications are delivered to
    pub chat_id: i64,
    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,
}
