//! Telegram Command Front End
//!
//! Long-polling loop that drives the topic registry from chat commands.
//! Runs as its own task alongside the HTTP listener; the two share nothing
//! but the store handle.

pub mod commands;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::TopicStore;
use crate::telegram::{Message, ParseMode, TelegramClient};

/// Run the command loop. Never returns: every failure is logged, backed
/// off, and retried. A bad update or a Telegram outage must not take the
/// front end down.
pub async fn run(store: TopicStore, telegram: TelegramClient, config: Arc<Config>) {
    info!("Telegram bot polling started");

    let mut offset: Option<i64> = None;

    // Commands are interactive; ones that accumulated while the process
    // was down should not fire on restart. Ask for the newest backlog
    // entry and start past it.
    match telegram.get_updates(Some(-1), 0).await {
        Ok(updates) => {
            if let Some(last) = updates.last() {
                offset = Some(last.update_id + 1);
            }
        }
        Err(e) => warn!("Failed to drop pending updates: {}", e),
    }

    let mut consecutive_errors: u32 = 0;

    loop {
        let updates = match telegram.get_updates(offset, config.poll_timeout_secs).await {
            Ok(updates) => {
                consecutive_errors = 0;
                updates
            }
            Err(e) => {
                consecutive_errors += 1;
                let backoff_secs = 1u64 << consecutive_errors.min(6); // 2, 4, 8, ... 64
                error!(
                    consecutive_errors,
                    backoff_secs, "Failed to poll for updates, backing off: {}", e
                );
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };

            // Each command runs on its own task; a slow database or reply
            // send must not stall the poll loop.
            let store = store.clone();
            let telegram = telegram.clone();
            let config = Arc::clone(&config);
            tokio::spawn(async move {
                handle_message(&store, &telegram, &config, message).await;
            });
        }
    }
}

/// Handle one incoming chat message end to end: parse, execute, reply.
async fn handle_message(
    store: &TopicStore,
    telegram: &TelegramClient,
    config: &Config,
    message: Message,
) {
    let Some(text) = message.text.as_deref() else {
        return;
    };
    let Some(command) = commands::parse(text) else {
        return;
    };
    let Some(user) = message.from.as_ref() else {
        return;
    };
    let chat_id = message.chat.id;

    let (reply, parse_mode) =
        match commands::execute(store, config, command, user.id, chat_id).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id = user.id, "Command failed: {}", e);
                (
                    "❌ Something went wrong. Please try again.".to_string(),
                    ParseMode::Plain,
                )
            }
        };

    if let Err(e) = telegram.send_message(chat_id, &reply, parse_mode).await {
        error!(chat_id, "Failed to send reply: {}", e);
    }
}
