//! Remitbot — Telegram bot quoting ZMW↔RUB transfer fees.
//!
//! Reads the current rate from a published Google Sheet (CSV export), looks
//! up the flat fee from the fixed bracket table and replies with a
//! bidirectional quote. Runs in long-polling mode by default, or webhook
//! mode with `run --webhook`.

use std::env;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::{webhooks, Polling};

use remitbot::cli::{Cli, Commands};
use remitbot::logging::init_logger;
use remitbot::{create_bot, schema, setup_bot_commands, HandlerDeps};
use remitcore::{ConfigError, RateSource, SessionStore, Settings};

/// Default port for the webhook HTTP listener.
const DEFAULT_WEBHOOK_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before anything reads
    // the environment.
    let _ = dotenv();

    let log_file_path = env::var("LOG_FILE_PATH").unwrap_or_else(|_| "remitbot.log".to_string());
    init_logger(&log_file_path)?;

    match cli.command {
        Some(Commands::Run { webhook }) => run_bot(webhook).await,
        None => run_bot(false).await,
    }
}

async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting remitbot (webhook: {})", use_webhook);

    // Missing configuration is fatal here, before any update is accepted.
    let settings = Settings::from_env()?;
    let token = env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .map_err(|_| ConfigError::Missing("BOT_TOKEN"))?;

    let rate_source = Arc::new(RateSource::new(&settings.sheet_url, settings.fetch_timeout)?);
    log::info!("Rate source CSV URL: {}", rate_source.csv_url());
    if settings.agent_phone.is_none() {
        log::info!("WHATSAPP_AGENT_PHONE not set; quotes are rendered without the agent handoff link");
    }

    let bot = create_bot(&token)?;
    setup_bot_commands(&bot).await?;

    let deps = HandlerDeps::new(Arc::new(settings), rate_source, Arc::new(SessionStore::new()));
    let handler = schema(deps);

    if use_webhook {
        let webhook_url = env::var("WEBHOOK_URL").map_err(|_| ConfigError::Missing("WEBHOOK_URL"))?;
        let url = url::Url::parse(&webhook_url)?;
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_WEBHOOK_PORT);
        let addr = ([0, 0, 0, 0], port).into();

        log::info!("Starting bot in webhook mode at {} (listening on port {})", url, port);
        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url)).await?;

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        log::info!("Starting bot in long polling mode");
        let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }

    Ok(())
}
