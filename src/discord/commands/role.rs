// src/discord/commands/role.rs

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::mention::Mentionable;
use serenity::model::prelude::*;
use serenity::prelude::*;

use super::{create_roster, guild_snapshot, respond, CommandError};
use crate::roster::{HttpMessenger, RosterStore};

pub fn register() -> CreateCommand {
    CreateCommand::new("role")
        .description("Create a roster embed for one role")
        .dm_permission(false)
        .add_option(
            CreateCommandOption::new(CommandOptionType::Role, "role", "The role to list")
                .required(true),
        )
}

pub async fn run(ctx: &Context, command: &CommandInteraction, store: &RosterStore) -> Result<(), serenity::Error> {
    let result = create(ctx, command, store).await;
    respond(ctx, command, result).await
}

async fn create(ctx: &Context, command: &CommandInteraction, store: &RosterStore) -> Result<String, CommandError> {
    let role = command
        .data
        .options()
        .into_iter()
        .find_map(|option| match option.value {
            ResolvedValue::Role(role) if option.name == "role" => Some(role.id),
            _ => None,
        })
        .ok_or(CommandError::NoRoles)?;

    let guild = guild_snapshot(ctx, command)?;
    let messenger = HttpMessenger::new(ctx.http.clone());
    create_roster(store, &messenger, &guild, command.channel_id, vec![role]).await?;

    Ok(format!("Roster created for {}", role.mention()))
}
