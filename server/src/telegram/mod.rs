//! Telegram Bot API Client
//!
//! Thin HTTP client for the two Bot API methods this server needs:
//! `sendMessage` (outbound delivery and bot replies) and `getUpdates`
//! (command polling). Authenticated by the process-level bot token.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extra slack on top of the long-poll timeout before the transport gives up.
const POLL_TIMEOUT_SLACK_SECS: u64 = 10;

/// Telegram Bot API errors.
#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Telegram API returned HTTP {0}")]
    Status(u16),
    #[error("Telegram API rejected the request: {0}")]
    Api(String),
}

/// Rendering mode for an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Plain text, no markup interpretation
    Plain,
    /// Legacy Markdown: backtick fences render literal blocks, escaped
    /// characters render verbatim
    Markdown,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
}

/// Envelope every Bot API response arrives in.
#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// An incoming update from `getUpdates`.
///
/// Unknown fields are ignored; this server only consumes text messages.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

/// The sender of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

/// The chat a message arrived in (and where replies go).
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Client for the Telegram Bot API.
///
/// Cloneable; the underlying `reqwest` client pools connections. The token
/// is embedded in request URLs only and never logged.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    method_base: String,
}

impl TelegramClient {
    /// Create a client from the configured API base and bot token.
    pub fn new(config: &crate::config::Config) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            method_base: format!(
                "{}/bot{}",
                config.telegram_api_base.trim_end_matches('/'),
                config.bot_token
            ),
        })
    }

    /// Send a message to a chat.
    ///
    /// Success is a 2xx response; anything else, including transport
    /// failure, is an error. One attempt, no retry.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: match parse_mode {
                ParseMode::Plain => None,
                ParseMode::Markdown => Some("Markdown"),
            },
        };

        let response = self
            .http
            .post(format!("{}/sendMessage", self.method_base))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TelegramError::Status(response.status().as_u16()));
        }

        Ok(())
    }

    /// Long-poll for updates past `offset`.
    ///
    /// Blocks up to `timeout_secs` server-side; the transport timeout is
    /// widened accordingly so the poll is not cut short.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
        };

        let response = self
            .http
            .post(format!("{}/getUpdates", self.method_base))
            .timeout(Duration::from_secs(timeout_secs + POLL_TIMEOUT_SLACK_SECS))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TelegramError::Status(response.status().as_u16()));
        }

        let body: ApiResponse<Vec<Update>> = response.json().await?;
        if !body.ok {
            return Err(TelegramError::Api(
                body.description.unwrap_or_else(|| "unknown error".into()),
            ));
        }

        Ok(body.result.unwrap_or_default())
    }
}
