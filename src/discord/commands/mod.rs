// src/discord/commands/mod.rs

pub mod role;
pub mod rolelist;

use log::{error, info};
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::model::mention::Mentionable;
use serenity::model::prelude::*;
use serenity::prelude::*;
use thiserror::Error;

use crate::roster::{build_roster_embed, GuildSnapshot, RosterMessenger, RosterRecord, RosterStore, StoreError};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("This command can only be used in a server.")]
    NotInGuild,

    #[error("Server data is not available yet, try again in a moment.")]
    GuildUnavailable,

    #[error("You must mention at least one role.")]
    NoRoles,

    #[error("`{0}` is not a role in this server.")]
    InvalidRole(String),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Roster storage error: {0}")]
    Store(#[from] StoreError),
}

impl CommandError {
    /// Errors caused by the invoker, shown to them verbatim.
    fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotInGuild | Self::GuildUnavailable | Self::NoRoles | Self::InvalidRole(_)
        )
    }
}

/// Posts a new roster for `role_ids` in `channel` and starts tracking it.
/// Nothing is posted or stored when `role_ids` is empty or names a role the
/// guild does not have.
pub async fn create_roster<M>(
    store: &RosterStore,
    messenger: &M,
    guild: &GuildSnapshot,
    channel: ChannelId,
    role_ids: Vec<RoleId>,
) -> Result<RosterRecord, CommandError>
where
    M: RosterMessenger + ?Sized,
{
    if role_ids.is_empty() {
        return Err(CommandError::NoRoles);
    }
    if let Some(unknown) = role_ids.iter().find(|&&role| guild.role_name(role).is_none()) {
        return Err(CommandError::InvalidRole(unknown.mention().to_string()));
    }

    let embed = build_roster_embed(guild, &role_ids);
    let message_id = messenger.send_roster(channel, &embed).await?;

    let record = RosterRecord {
        channel_id: channel,
        message_id,
        role_ids,
    };
    store.track(guild.id(), record.clone()).await?;

    info!(
        "Tracking roster {} in guild {} channel {} for {} role(s)",
        message_id,
        guild.id(),
        channel,
        record.role_ids.len()
    );
    Ok(record)
}

pub(crate) fn guild_snapshot(ctx: &Context, command: &CommandInteraction) -> Result<GuildSnapshot, CommandError> {
    let guild_id = command.guild_id.ok_or(CommandError::NotInGuild)?;
    ctx.cache
        .guild(guild_id)
        .map(|guild| GuildSnapshot::from(&*guild))
        .ok_or(CommandError::GuildUnavailable)
}

/// Answers the invoker privately with either the confirmation or the error.
pub(crate) async fn respond(
    ctx: &Context,
    command: &CommandInteraction,
    result: Result<String, CommandError>,
) -> Result<(), serenity::Error> {
    let content = match result {
        Ok(content) => content,
        Err(e) if e.is_user_error() => e.to_string(),
        Err(e) => {
            error!("/{} failed: {}", command.data.name, e);
            "Something went wrong while creating the roster.".to_string()
        }
    };

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await
}
