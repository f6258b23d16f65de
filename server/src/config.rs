//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Default set of characters escaped in outbound free-text messages.
///
/// Telegram's legacy Markdown mode reserves these; the full reserved set is
/// renderer-dependent, so it stays overridable via `MARKDOWN_ESCAPE_CHARS`.
pub const DEFAULT_ESCAPE_CHARS: &str = "_*[]`";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// `SQLite` connection URL
    pub database_url: String,

    /// Telegram bot token
    pub bot_token: String,

    /// Telegram Bot API base URL (overridable for self-hosted API servers
    /// and tests)
    pub telegram_api_base: String,

    /// Public base URL shown in registration replies
    pub public_url: String,

    /// Characters escaped when embedding free text in outbound messages
    pub markdown_escape_chars: Vec<char>,

    /// Maximum inbound webhook body size in bytes (default: 256KB)
    pub max_body_size: usize,

    /// Long-poll timeout for `getUpdates`, in seconds (default: 30)
    pub poll_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://hermod.db".into()),
            bot_token: env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?,
            telegram_api_base: env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".into()),
            public_url: env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
            markdown_escape_chars: env::var("MARKDOWN_ESCAPE_CHARS")
                .unwrap_or_else(|_| DEFAULT_ESCAPE_CHARS.into())
                .chars()
                .collect(),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256 * 1024), // 256KB
            poll_timeout_secs: env::var("POLL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a default configuration for testing.
    ///
    /// Uses an in-memory database and a placeholder token; tests that
    /// exercise delivery point `telegram_api_base` at a local stub server.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            database_url: "sqlite::memory:".into(),
            bot_token: "test-token".into(),
            telegram_api_base: "https://api.telegram.org".into(),
            public_url: "http://localhost:8080".into(),
            markdown_escape_chars: DEFAULT_ESCAPE_CHARS.chars().collect(),
            max_body_size: 256 * 1024,
            poll_timeout_secs: 30,
        }
    }
}
