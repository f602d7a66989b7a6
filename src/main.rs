use std::sync::Arc;
use std::time::Duration;

use miette::IntoDiagnostic;
use tracing::{info, warn};

use aroodes::config::AppConfig;
use aroodes::core::mirror::{GeminiClient, MirrorChat};
use aroodes::core::progression::ProgressionEngine;
use aroodes::database::Database;
use aroodes::discord::DiscordClient;
use aroodes::web::{self, AppState};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let _log_guard = aroodes::core::logging::init();
    info!("Aroodes v{} starting", aroodes::VERSION);

    let config = AppConfig::load();
    if config.discord.application_id.is_empty() {
        warn!("No Discord application ID configured; registration and OAuth will fail");
    }
    if config.gemini.api_key.is_empty() {
        warn!("No Gemini API key configured; mirror commands will fail");
    }

    let database = Database::new(&config.data_dir()).await.into_diagnostic()?;

    let discord = Arc::new(DiscordClient::new(&config.discord));
    let engine = Arc::new(
        ProgressionEngine::new(Arc::new(database.clone())).with_notifier(discord.clone()),
    );
    let mirror = Arc::new(MirrorChat::new(
        GeminiClient::new(
            config.gemini.api_key.clone(),
            config.gemini.model.clone(),
            config.gemini.api_base.clone(),
            Duration::from_secs(config.gemini.timeout_secs),
        ),
        Duration::from_secs(config.gemini.ask_cooldown_secs),
        config.gemini.chat_history_limit,
    ));

    // Registration failures are survivable: a previous run usually already
    // registered the commands and metadata schema.
    match discord.register_commands().await {
        Ok(count) => info!("Registered {} slash commands", count),
        Err(e) => warn!("Failed to register slash commands: {}", e),
    }
    match discord.register_metadata().await {
        Ok(()) => info!("Registered role-connection metadata schema"),
        Err(e) => warn!("Failed to register metadata schema: {}", e),
    }

    let state = Arc::new(AppState::new(engine, mirror, discord, &config.discord));
    web::serve(state, &config.web.host, config.web.port)
        .await
        .into_diagnostic()?;

    info!("Aroodes shut down");
    Ok(())
}
