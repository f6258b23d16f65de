//! Topic Registry
//!
//! All topic persistence operations. Uses runtime queries (`sqlx::query` /
//! `sqlx::query_as`) to avoid requiring a live database at compile time.

use chrono::Utc;
use sqlx::SqlitePool;

use super::models::Topic;

/// Handle to the durable topic registry.
///
/// Cloneable; every component that needs topic data receives its own handle
/// rather than reaching for global state. The database is the sole source
/// of truth; there is no cache layer in front of it.
#[derive(Debug, Clone)]
pub struct TopicStore {
    pool: SqlitePool,
}

impl TopicStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a topic.
    ///
    /// Returns `false` without mutating anything if the name is already
    /// taken anywhere in the store. The primary key resolves concurrent
    /// registrations of the same name; there is no check-then-insert window.
    pub async fn add(&self, name: &str, owner_id: i64, chat_id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO topics (name, owner_id, chat_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name) DO NOTHING
            ",
        )
        .bind(name)
        .bind(owner_id)
        .bind(chat_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolve a topic by name.
    ///
    /// No ownership check: knowing the name is the capability to post to it.
    pub async fn lookup(&self, name: &str) -> sqlx::Result<Option<Topic>> {
        sqlx::query_as::<_, Topic>(
            r"
            SELECT name, owner_id, chat_id, created_at
            FROM topics
            WHERE name = ?1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// List an owner's topics, newest first.
    pub async fn list_by_owner(&self, owner_id: i64) -> sqlx::Result<Vec<Topic>> {
        sqlx::query_as::<_, Topic>(
            r"
            SELECT name, owner_id, chat_id, created_at
            FROM topics
            WHERE owner_id = ?1
            ORDER BY created_at DESC
            ",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete a topic.
    ///
    /// Both owner and name must match; a non-owner cannot delete someone
    /// else's topic of the same name. Returns `true` iff a row was removed.
    pub async fn delete(&self, owner_id: i64, name: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM topics WHERE owner_id = ?1 AND name = ?2")
            .bind(owner_id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
