//! Chat Command Parsing and Execution
//!
//! The registry front end: parses `/register`-style commands out of chat
//! messages and runs them against the topic store, returning the reply to
//! send back. Name-format validation lives here, upstream of the store.

use crate::config::Config;
use crate::db::TopicStore;
use crate::telegram::ParseMode;

/// A recognized chat command. Argument-carrying variants hold the raw
/// argument text; validation happens at execution time so the reply can
/// explain what was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Register(String),
    Unregister(String),
    List,
}

const USAGE: &str = "🤖 Welcome to the Notification Bot!\n\n\
    Commands:\n\
    • /register <topic_name> - Register a new topic\n\
    • /unregister <topic_name> - Unregister a topic\n\
    • /list - List your registered topics\n\
    • /help - Show this help message\n\n\
    After registering a topic, external services can send you notifications \
    by POSTing to its webhook endpoint.";

/// Parse a message text into a command.
///
/// Returns `None` for non-commands and unknown commands; both are
/// ignored, not answered. The command token may carry a `@BotName`
/// suffix (group chats); everything after the token is the argument.
pub fn parse(text: &str) -> Option<Command> {
    let mut parts = text.trim().split_whitespace();
    let head = parts.next()?;
    let name = head.strip_prefix('/')?.split('@').next()?;
    let arg = parts.collect::<Vec<_>>().join(" ");

    match name {
        "start" => Some(Command::Start),
        "help" => Some(Command::Help),
        "register" => Some(Command::Register(arg)),
        "unregister" => Some(Command::Unregister(arg)),
        "list" => Some(Command::List),
        _ => None,
    }
}

/// Check a topic name: letters, digits, hyphen, underscore only, and at
/// least one non-separator character. Names go straight into URL paths,
/// so nothing else is allowed through.
pub fn is_valid_topic_name(name: &str) -> bool {
    let mut has_alphanumeric = false;
    for c in name.chars() {
        match c {
            '-' | '_' => {}
            c if c.is_alphanumeric() => has_alphanumeric = true,
            _ => return false,
        }
    }
    has_alphanumeric
}

/// Execute a command for the given user and produce the reply.
pub async fn execute(
    store: &TopicStore,
    config: &Config,
    command: Command,
    user_id: i64,
    chat_id: i64,
) -> sqlx::Result<(String, ParseMode)> {
    match command {
        Command::Start | Command::Help => Ok((USAGE.to_string(), ParseMode::Plain)),

        Command::Register(name) => {
            if name.is_empty() {
                return Ok((
                    "Please provide a topic name: /register <topic_name>".into(),
                    ParseMode::Plain,
                ));
            }
            if !is_valid_topic_name(&name) {
                return Ok((
                    "❌ Topic name can only contain letters, numbers, hyphens, and underscores."
                        .into(),
                    ParseMode::Plain,
                ));
            }

            if store.add(&name, user_id, chat_id).await? {
                Ok((
                    format!(
                        "✅ Topic '{name}' registered!\n\n\
                         🔗 Webhook endpoint: `/{name}`\n\n\
                         Others can now POST to: `{}/{name}`",
                        config.public_url.trim_end_matches('/')
                    ),
                    ParseMode::Markdown,
                ))
            } else {
                Ok((
                    format!("❌ Topic '{name}' is already taken. Please choose a different name."),
                    ParseMode::Plain,
                ))
            }
        }

        Command::Unregister(name) => {
            if name.is_empty() {
                return Ok((
                    "Please provide a topic name: /unregister <topic_name>".into(),
                    ParseMode::Plain,
                ));
            }

            if store.delete(user_id, &name).await? {
                Ok((format!("✅ Topic '{name}' unregistered!"), ParseMode::Plain))
            } else {
                Ok((format!("❌ Topic '{name}' not found!"), ParseMode::Plain))
            }
        }

        Command::List => {
            let topics = store.list_by_owner(user_id).await?;
            if topics.is_empty() {
                return Ok(("📋 You have no registered topics.".into(), ParseMode::Plain));
            }

            let lines: Vec<String> = topics.iter().map(|t| format!("• `{}`", t.name)).collect();
            Ok((
                format!("📋 Your registered topics:\n\n{}", lines.join("\n")),
                ParseMode::Markdown,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("/start"), Some(Command::Start));
        assert_eq!(parse("/help"), Some(Command::Help));
        assert_eq!(parse("/list"), Some(Command::List));
        assert_eq!(
            parse("/register alerts-1"),
            Some(Command::Register("alerts-1".into()))
        );
        assert_eq!(
            parse("/unregister alerts-1"),
            Some(Command::Unregister("alerts-1".into()))
        );
    }

    #[test]
    fn test_parse_missing_argument_kept_empty() {
        // Validation happens at execution time, with a usage reply
        assert_eq!(parse("/register"), Some(Command::Register(String::new())));
        assert_eq!(parse("/register   "), Some(Command::Register(String::new())));
    }

    #[test]
    fn test_parse_multi_word_argument_joined() {
        assert_eq!(
            parse("/register my topic"),
            Some(Command::Register("my topic".into()))
        );
    }

    #[test]
    fn test_parse_bot_name_suffix() {
        assert_eq!(
            parse("/register@NotifierBot alerts-1"),
            Some(Command::Register("alerts-1".into()))
        );
    }

    #[test]
    fn test_parse_ignores_non_commands() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("/frobnicate"), None);
    }

    #[test]
    fn test_topic_name_validation() {
        assert!(is_valid_topic_name("alerts-1"));
        assert!(is_valid_topic_name("build_status"));
        assert!(is_valid_topic_name("a"));

        assert!(!is_valid_topic_name(""));
        assert!(!is_valid_topic_name("---"));
        assert!(!is_valid_topic_name("my topic"));
        assert!(!is_valid_topic_name("a/b"));
        assert!(!is_valid_topic_name("a.b"));
        assert!(!is_valid_topic_name("émoji!"));
    }
}
