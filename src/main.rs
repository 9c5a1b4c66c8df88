// This is the entry point of the XP bot.
//
// **Architecture Overview:**
// - `core/` = Dispatch engine, handlers and the XP ledger (platform-agnostic)
// - `infra/` = Implementations of core traits (ledger stores, latency probe)
// - `discord/` = Discord-specific adapters (event translation, delivery)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework and hand every gateway event to the engine

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::commands::handlers::{
    BotInformationHandler, LeaderboardHandler, LeaveHandler, LevelHandler, PingHandler,
    WelcomeHandler,
};
use crate::core::commands::{
    default_descriptors, CommandHandler, CommandRegistry, DispatchEngine, HandlerVariant,
};
use crate::core::config::{BotConfig, LedgerBackend};
use crate::core::leveling::{LevelingService, Progression, SharedLedgerStore};
use crate::discord::delivery::SerenityDelivery;
use crate::discord::directory::SerenityDirectory;
use crate::discord::{events, presence, Data, Error};
use crate::infra::leveling::{JsonLedgerStore, SqliteLedgerStore};
use crate::infra::platform::GatewayProbe;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Every gateway event goes through the dispatch engine. Failures are logged
/// here and never take the bot down.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    let Some(inbound) = events::translate(ctx, event) else {
        return Ok(());
    };

    let directory = SerenityDirectory::new(ctx.cache.clone(), ctx.http.clone());
    let sink = SerenityDelivery::new(ctx.http.clone());

    match data.dispatcher.dispatch(&inbound, &directory, &sink).await {
        Ok(report) => {
            if report.delivery_failures > 0 || report.handler_failures > 0 {
                tracing::warn!(
                    handler_failures = report.handler_failures,
                    delivery_failures = report.delivery_failures,
                    "Event dispatched with failures"
                );
            }
        }
        Err(e) => tracing::error!("Error dispatching event: {}", e),
    }

    Ok(())
}

async fn open_ledger_store(config: &BotConfig) -> anyhow::Result<SharedLedgerStore> {
    let store: SharedLedgerStore = match config.ledger_backend {
        LedgerBackend::Json => Arc::new(
            JsonLedgerStore::new(config.ledger_dir())
                .context("Failed to create the XP ledger directory")?,
        ),
        LedgerBackend::Sqlite => {
            let path = config.sqlite_path();
            Arc::new(
                SqliteLedgerStore::new(&path.to_string_lossy())
                    .await
                    .context("Failed to initialize SQLite ledger store")?,
            )
        }
    };
    Ok(store)
}

fn build_registry(config: &BotConfig) -> anyhow::Result<CommandRegistry> {
    let probe = GatewayProbe::new().context("Failed to create the latency probe")?;

    let mut handlers: HashMap<HandlerVariant, Arc<dyn CommandHandler>> = HashMap::new();
    handlers.insert(HandlerVariant::Ping, Arc::new(PingHandler));
    handlers.insert(
        HandlerVariant::BotInformation,
        Arc::new(BotInformationHandler::new(
            probe,
            config.developer.clone(),
            chrono::Utc::now(),
        )),
    );
    handlers.insert(HandlerVariant::Level, Arc::new(LevelHandler));
    handlers.insert(HandlerVariant::Leaderboard, Arc::new(LeaderboardHandler));

    Ok(CommandRegistry::build(default_descriptors(), &handlers)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let token = std::env::var("DISCORD_TOKEN").context(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    )?;
    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let store = open_ledger_store(&config).await?;
    let progression = Progression::new(config.level_base)?;
    let leveling = Arc::new(LevelingService::new(store, progression));

    let registry = build_registry(&config)?;
    anyhow::ensure!(!registry.is_empty(), "No commands registered");
    tracing::info!(commands = registry.len(), prefix = %config.prefix, "Command registry built");

    let dispatcher = DispatchEngine::new(
        registry,
        leveling,
        Arc::new(WelcomeHandler::new(config.welcome_channel_id)),
        Arc::new(LeaveHandler::new(config.leave_channel_id)),
        config.dispatch_settings(),
    );

    let data = Data {
        dispatcher: Arc::new(dispatcher),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Prefix commands are routed by the dispatch engine, not poise
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Bot is ready");
                presence::on_ready(ctx, &data.dispatcher.settings().prefix);
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
