pub mod config;
pub mod discord;
pub mod logging;
pub mod roster;

use std::sync::Arc;
use log::info;
use crate::config::Config;
use crate::discord::DiscordClient;
use crate::roster::RosterStore;

pub struct BotClients {
    pub discord: DiscordClient,
}

/// Loads persisted rosters and builds the Discord client. A malformed roster
/// file stops startup here rather than failing later lookups.
pub async fn init(config: &Config) -> Result<BotClients, Box<dyn std::error::Error + Send + Sync>> {
    let store = Arc::new(RosterStore::load(&config.rosters_file)?);
    let discord = DiscordClient::new(config, store).await?;

    Ok(BotClients { discord })
}

pub async fn run(clients: BotClients) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Bot is now running. Press Ctrl+C to exit.");

    tokio::select! {
        result = clients.discord.start() => {
            result?;
            info!("Discord client has stopped.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down.");
            clients.discord.shutdown().await;
        }
    }

    info!("Bot has shut down.");
    Ok(())
}
