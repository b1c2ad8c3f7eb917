// src/discord/client.rs

use serenity::gateway::ShardManager;
use serenity::prelude::*;
use crate::config::Config;
use crate::roster::RosterStore;
use std::sync::Arc;
use std::time::Duration;
use log::{info, warn};
use tokio::sync::Mutex;

use super::events::EventHandler;

pub struct DiscordClient {
    client: Mutex<Option<Client>>,
    shard_manager: Arc<ShardManager>,
}

impl DiscordClient {
    pub async fn new(config: &Config, store: Arc<RosterStore>) -> Result<Self, serenity::Error> {
        // Role membership is read from the member cache.
        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

        let client = Client::builder(&config.token, intents)
            .event_handler(EventHandler::new(store, config.command_guild_id))
            .await?;

        Ok(Self {
            shard_manager: client.shard_manager.clone(),
            client: Mutex::new(Some(client)),
        })
    }

    pub async fn shutdown(&self) {
        info!("Shutting down DiscordClient...");
        match tokio::time::timeout(Duration::from_secs(10), self.shard_manager.shutdown_all()).await {
            Ok(_) => info!("Discord shards shut down successfully"),
            Err(_) => warn!("Timed out while shutting down Discord shards"),
        }
        info!("DiscordClient shutdown complete.");
    }

    /// Runs the gateway until it disconnects or `shutdown` is called.
    pub async fn start(&self) -> Result<(), serenity::Error> {
        let client = self.client.lock().await.take();
        match client {
            Some(mut client) => client.start().await,
            None => Err(serenity::Error::Other("Discord client has already been started")),
        }
    }
}
