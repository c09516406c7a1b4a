//! Ostromag bot binary.
//!
//! Composition root that assembles:
//! 1. Configuration from the environment (and `.env`)
//! 2. Logging
//! 3. The runtime, wired to the console transport
//!
//! # Examples
//!
//! ```bash
//! OSTROMAG_GAME_CHAT_ID=-1001 OSTROMAG_REPORT_CHAT_ID=42 cargo run -p ostromag-client
//! # then type: 42 /start
//! ```
mod console;
mod logging;

use anyhow::Result;
use tokio::sync::mpsc;

use console::ConsoleChatClient;
use runtime::{Runtime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    let _log_guard = logging::setup_logging()?;
    let config = RuntimeConfig::from_env();

    tracing::info!("Starting Ostromag bot");
    tracing::info!(
        "Game chat: {}, guild chat: {}, reports to: {}",
        config.game_chat_id,
        config.guild_chat_id,
        config.report_chat_id
    );
    tracing::info!("Log level: {}, autostart: {}", config.log_level, config.autostart);

    let (inbound_tx, inbound_rx) = mpsc::channel(config.command_buffer_size);
    let runtime = Runtime::builder()
        .config(config)
        .chat_client(ConsoleChatClient)
        .inbound(inbound_rx)
        .build()
        .await?;

    tracing::info!("Runtime started, reading `<chat_id> <text>` lines from stdin");

    let reader = tokio::spawn(async move {
        if let Err(err) = console::forward_stdin(inbound_tx).await {
            tracing::error!("stdin closed with error: {err}");
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupted");
    reader.abort();

    runtime.shutdown().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
