// src/roster/embed.rs

use log::warn;
use serenity::builder::CreateEmbed;
use serenity::model::id::{RoleId, UserId};
use serenity::model::mention::Mentionable;
use serenity::model::Colour;

use super::guild::GuildSnapshot;

pub const ROSTER_TITLE: &str = "Role Roster";
pub const NO_MEMBERS: &str = "*No members*";

// Discord rejects embeds past these limits.
const MAX_FIELDS: usize = 25;
const MAX_FIELD_VALUE: usize = 1024;
const MAX_EMBED_TOTAL: usize = 6000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterField {
    pub name: String,
    pub value: String,
}

/// Rendered roster, one field per role still present in the guild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterEmbed {
    pub fields: Vec<RosterField>,
}

impl RosterEmbed {
    pub fn to_create_embed(&self) -> CreateEmbed {
        self.fields.iter().fold(
            CreateEmbed::new().title(ROSTER_TITLE).colour(Colour::BLUE),
            |embed, field| embed.field(&field.name, &field.value, false),
        )
    }
}

/// Renders the roster for `role_ids` in the given order. Roles that no longer
/// exist are skipped. Member lists are shortened so every field and the
/// embed as a whole stay within Discord's size limits.
pub fn build_roster_embed(guild: &GuildSnapshot, role_ids: &[RoleId]) -> RosterEmbed {
    let mut budget = MAX_EMBED_TOTAL - ROSTER_TITLE.chars().count();
    let mut fields = Vec::new();
    let mut dropped = 0;

    for &role in role_ids {
        let Some(name) = guild.role_name(role) else {
            continue;
        };
        if fields.len() == MAX_FIELDS {
            dropped += 1;
            continue;
        }

        let name_len = name.chars().count();
        let limit = MAX_FIELD_VALUE.min(budget.saturating_sub(name_len));
        match member_list(&guild.members_with_role(role), limit) {
            Some(value) => {
                budget -= name_len + value.chars().count();
                fields.push(RosterField {
                    name: name.to_string(),
                    value,
                });
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(
            "Roster in guild {} has no room for {} of its roles",
            guild.id(),
            dropped
        );
    }

    RosterEmbed { fields }
}

fn overflow_tail(hidden: usize, after_mentions: bool) -> String {
    let separator = if after_mentions { "\n" } else { "" };
    format!("{separator}*…and {hidden} more*")
}

/// Mentions of `members`, cut to at most `limit` characters. `None` when not
/// even the overflow tail fits.
fn member_list(members: &[UserId], limit: usize) -> Option<String> {
    if members.is_empty() {
        return (NO_MEMBERS.chars().count() <= limit).then(|| NO_MEMBERS.to_string());
    }

    // Mentions are ASCII, so byte length is character count.
    let mentions: Vec<String> = members.iter().map(|user| user.mention().to_string()).collect();
    let full = mentions.join("\n");
    if full.len() <= limit {
        return Some(full);
    }

    let mut value = String::new();
    let mut shown = 0;
    for mention in &mentions {
        let separator = usize::from(shown > 0);
        let tail = overflow_tail(mentions.len() - shown - 1, true).chars().count();
        if value.len() + separator + mention.len() + tail > limit {
            break;
        }
        if shown > 0 {
            value.push('\n');
        }
        value.push_str(mention);
        shown += 1;
    }

    let tail = overflow_tail(mentions.len() - shown, shown > 0);
    (value.len() + tail.chars().count() <= limit).then(|| value + &tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::GuildId;

    fn guild() -> GuildSnapshot {
        GuildSnapshot::new(GuildId::new(10))
            .with_role(RoleId::new(1), "Admin")
            .with_role(RoleId::new(2), "Mods")
            .with_role(RoleId::new(3), "Lurkers")
            .with_member(UserId::new(100), [RoleId::new(1), RoleId::new(2)])
            .with_member(UserId::new(200), [RoleId::new(2)])
    }

    #[test]
    fn sections_follow_input_order() {
        let embed = build_roster_embed(&guild(), &[RoleId::new(2), RoleId::new(1)]);

        assert_eq!(
            embed.fields,
            vec![
                RosterField {
                    name: "Mods".into(),
                    value: "<@100>\n<@200>".into(),
                },
                RosterField {
                    name: "Admin".into(),
                    value: "<@100>".into(),
                },
            ]
        );
    }

    #[test]
    fn empty_role_uses_placeholder() {
        let embed = build_roster_embed(&guild(), &[RoleId::new(3)]);
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.fields[0].value, NO_MEMBERS);
    }

    #[test]
    fn missing_roles_are_skipped() {
        let embed = build_roster_embed(&guild(), &[RoleId::new(99), RoleId::new(1), RoleId::new(98)]);
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.fields[0].name, "Admin");

        assert!(build_roster_embed(&guild(), &[RoleId::new(99)]).fields.is_empty());
    }

    #[test]
    fn long_member_lists_are_cut_to_field_limit() {
        let snapshot = (1..=200u64).fold(
            GuildSnapshot::new(GuildId::new(10)).with_role(RoleId::new(1), "Everyone Busy"),
            |g, n| g.with_member(UserId::new(10_u64.pow(18) + n), [RoleId::new(1)]),
        );

        let embed = build_roster_embed(&snapshot, &[RoleId::new(1)]);
        let value = &embed.fields[0].value;

        assert!(value.chars().count() <= MAX_FIELD_VALUE);
        assert!(value.starts_with("<@1000000000000000001>"));
        assert!(value.ends_with("more*"));
    }

    fn embed_chars(embed: &RosterEmbed) -> usize {
        ROSTER_TITLE.chars().count()
            + embed
                .fields
                .iter()
                .map(|field| field.name.chars().count() + field.value.chars().count())
                .sum::<usize>()
    }

    #[test]
    fn large_rosters_stay_within_embed_total() {
        let mut snapshot = GuildSnapshot::new(GuildId::new(10));
        for role in 1..=7u64 {
            snapshot = snapshot.with_role(RoleId::new(role), format!("role-{role}"));
            for n in 0..60u64 {
                let user = UserId::new(1_000_000_000_000_000 + role * 1000 + n);
                snapshot = snapshot.with_member(user, [RoleId::new(role)]);
            }
        }
        let roles: Vec<RoleId> = (1..=7u64).map(RoleId::new).collect();

        let embed = build_roster_embed(&snapshot, &roles);

        assert!(embed_chars(&embed) <= MAX_EMBED_TOTAL);
        assert!(embed.fields.len() >= 5);
        for field in &embed.fields {
            assert!(field.value.chars().count() <= MAX_FIELD_VALUE);
            assert!(field.value.ends_with("more*"));
        }
    }

    #[test]
    fn overflow_tail_alone_when_no_mention_fits() {
        let members = [UserId::new(10_u64.pow(18)), UserId::new(10_u64.pow(18) + 1)];
        assert_eq!(member_list(&members, 20).as_deref(), Some("*…and 2 more*"));
        assert_eq!(member_list(&members, 5), None);
        assert_eq!(member_list(&[], 5), None);
    }

    #[test]
    fn at_most_twenty_five_sections() {
        let snapshot = (1..=30u64).fold(GuildSnapshot::new(GuildId::new(10)), |g, n| {
            g.with_role(RoleId::new(n), format!("role-{n}"))
        });
        let roles: Vec<RoleId> = (1..=30u64).map(RoleId::new).collect();

        let embed = build_roster_embed(&snapshot, &roles);
        assert_eq!(embed.fields.len(), MAX_FIELDS);
        assert_eq!(embed.fields[24].name, "role-25");
    }
}
