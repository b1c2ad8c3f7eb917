use serenity::async_trait;
use serenity::gateway::ChunkGuildFilter;
use serenity::model::prelude::*;
use serenity::prelude::*;
use crate::roster::{sync_guild, GuildSnapshot, HttpMessenger, RosterStore};
use std::sync::Arc;
use log::{debug, error, info, warn};
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use crate::discord::commands::{role, rolelist};

pub struct EventHandler {
    store: Arc<RosterStore>,
    command_guild: Option<GuildId>,
}

impl EventHandler {
    pub fn new(store: Arc<RosterStore>, command_guild: Option<GuildId>) -> Self {
        Self { store, command_guild }
    }

    /// Rebuilds every roster tracked in `guild_id` from the cached guild state.
    async fn sync_rosters(&self, ctx: &Context, guild_id: GuildId) {
        if !self.store.has_rosters(guild_id).await {
            return;
        }

        let Some(snapshot) = ctx.cache.guild(guild_id).map(|guild| GuildSnapshot::from(&*guild)) else {
            warn!("Guild {} is not cached, skipping roster sync", guild_id);
            return;
        };

        let messenger = HttpMessenger::new(ctx.http.clone());
        let outcomes = sync_guild(&self.store, &snapshot, &messenger).await;

        let mut failed = 0;
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                failed += 1;
                warn!(
                    "Error updating roster {} in channel {}: {}",
                    outcome.record.message_id, outcome.record.channel_id, e
                );
            }
        }
        debug!(
            "Synced {} roster(s) in guild {}, {} failed",
            outcomes.len(),
            guild_id,
            failed
        );
    }
}

#[async_trait]
impl serenity::client::EventHandler for EventHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.tag());

        let commands = vec![role::register(), rolelist::register()];
        let synced = match self.command_guild {
            Some(guild_id) => guild_id.set_commands(&ctx.http, commands).await,
            None => Command::set_global_commands(&ctx.http, commands).await,
        };

        match synced {
            Ok(commands) => info!("Slash commands synced: {}", commands.len()),
            Err(e) => error!("Error syncing commands: {}", e),
        }
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        // Large guilds only ship online members on connect.
        if guild.large {
            debug!("Requesting member chunks for guild {}", guild.id);
            ctx.shard.chunk_guild(guild.id, None, false, ChunkGuildFilter::None, None);
        }
    }

    async fn guild_member_update(
        &self,
        ctx: Context,
        _old_if_available: Option<Member>,
        _new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        self.sync_rosters(&ctx, event.guild_id).await;
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        _user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.sync_rosters(&ctx, guild_id).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            debug!("Received /{} from {}", command.data.name, command.user.id);

            let result = match command.data.name.as_str() {
                "role" => role::run(&ctx, &command, &self.store).await,
                "rolelist" => rolelist::run(&ctx, &command, &self.store).await,
                _ => {
                    command.create_response(&ctx.http, CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content("Command not implemented")
                            .ephemeral(true)
                    )).await
                }
            };

            if let Err(why) = result {
                error!("Cannot respond to slash command: {}", why);
            }
        }
    }
}
