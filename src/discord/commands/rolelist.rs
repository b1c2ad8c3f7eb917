// src/discord/commands/rolelist.rs

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::prelude::*;
use serenity::prelude::*;
use serenity::utils::parse_role_mention;

use super::{create_roster, guild_snapshot, respond, CommandError};
use crate::roster::{HttpMessenger, RosterStore};

pub fn register() -> CreateCommand {
    CreateCommand::new("rolelist")
        .description("Create a roster embed for multiple roles")
        .dm_permission(false)
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "roles",
            "Roles to list, e.g. @Admins @Mods",
        ))
}

pub async fn run(ctx: &Context, command: &CommandInteraction, store: &RosterStore) -> Result<(), serenity::Error> {
    let result = create(ctx, command, store).await;
    respond(ctx, command, result).await
}

async fn create(ctx: &Context, command: &CommandInteraction, store: &RosterStore) -> Result<String, CommandError> {
    let input = command
        .data
        .options()
        .into_iter()
        .find_map(|option| match option.value {
            ResolvedValue::String(value) if option.name == "roles" => Some(value),
            _ => None,
        })
        .unwrap_or_default();

    // Reject bad input before touching the guild or the store.
    let role_ids = parse_role_list(input)?;
    if role_ids.is_empty() {
        return Err(CommandError::NoRoles);
    }

    let guild = guild_snapshot(ctx, command)?;
    let messenger = HttpMessenger::new(ctx.http.clone());
    create_roster(store, &messenger, &guild, command.channel_id, role_ids).await?;

    Ok("Multi-role roster created!".to_string())
}

/// Role mentions (`<@&id>`) or bare ids, separated by whitespace or commas,
/// in the order given. Whether the roles exist is checked by `create_roster`.
pub fn parse_role_list(input: &str) -> Result<Vec<RoleId>, CommandError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            parse_role_mention(token)
                .or_else(|| token.parse::<u64>().ok().filter(|id| *id != 0).map(RoleId::new))
                .ok_or_else(|| CommandError::InvalidRole(token.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mentions_and_ids_in_order() {
        let roles = parse_role_list("<@&30> 10,<@&20>\n 40").unwrap();
        assert_eq!(
            roles,
            vec![RoleId::new(30), RoleId::new(10), RoleId::new(20), RoleId::new(40)]
        );
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(parse_role_list("").unwrap().is_empty());
        assert!(parse_role_list(" , ").unwrap().is_empty());
    }

    #[test]
    fn user_mentions_are_rejected() {
        let err = parse_role_list("<@&30> <@42>").unwrap_err();
        assert!(matches!(err, CommandError::InvalidRole(token) if token == "<@42>"));
        assert!(matches!(parse_role_list("0"), Err(CommandError::InvalidRole(_))));
    }
}
