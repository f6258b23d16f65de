//! Hermod Server - Main Entry Point
//!
//! Webhook-to-Telegram notification relay.

use anyhow::Result;
use tracing::info;

use hermod_server::{api, bot, config, db, telegram};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hermod_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Hermod Server"
    );

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;
    let store = db::TopicStore::new(db_pool);

    // Telegram Bot API client (shared by the gateway and the bot loop)
    let telegram = telegram::TelegramClient::new(&config)?;

    // Build application state
    let state = api::AppState::new(store.clone(), telegram.clone(), config.clone());

    // Command front end: independent task over the same store
    tokio::spawn(bot::run(store, telegram, state.config.clone()));

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Webhook server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
