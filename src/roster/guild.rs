// src/roster/guild.rs

use serenity::model::guild::Guild;
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Owned copy of the guild state a roster needs.
///
/// Taken from the serenity cache so the cache guard is never held across an
/// await point, and so rosters can be rendered without a live gateway.
#[derive(Debug, Clone)]
pub struct GuildSnapshot {
    id: GuildId,
    roles: HashMap<RoleId, String>,
    members: BTreeMap<UserId, Vec<RoleId>>,
    channels: HashSet<ChannelId>,
}

impl GuildSnapshot {
    pub fn new(id: GuildId) -> Self {
        Self {
            id,
            roles: HashMap::new(),
            members: BTreeMap::new(),
            channels: HashSet::new(),
        }
    }

    pub fn with_role(mut self, id: RoleId, name: impl Into<String>) -> Self {
        self.roles.insert(id, name.into());
        self
    }

    pub fn with_member(mut self, user: UserId, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.members.insert(user, roles.into_iter().collect());
        self
    }

    pub fn with_channel(mut self, id: ChannelId) -> Self {
        self.channels.insert(id);
        self
    }

    pub fn id(&self) -> GuildId {
        self.id
    }

    pub fn role_name(&self, id: RoleId) -> Option<&str> {
        self.roles.get(&id).map(String::as_str)
    }

    /// Members holding `role`, ordered by user id. The `@everyone` role shares
    /// the guild's id and is implicitly held by every member.
    pub fn members_with_role(&self, role: RoleId) -> Vec<UserId> {
        let everyone = role.get() == self.id.get();
        self.members
            .iter()
            .filter(|(_, roles)| everyone || roles.contains(&role))
            .map(|(user, _)| *user)
            .collect()
    }

    pub fn has_channel(&self, id: ChannelId) -> bool {
        self.channels.contains(&id)
    }
}

impl From<&Guild> for GuildSnapshot {
    fn from(guild: &Guild) -> Self {
        Self {
            id: guild.id,
            roles: guild
                .roles
                .iter()
                .map(|(id, role)| (*id, role.name.clone()))
                .collect(),
            members: guild
                .members
                .iter()
                .map(|(id, member)| (*id, member.roles.clone()))
                .collect(),
            channels: guild
                .channels
                .keys()
                .copied()
                .chain(guild.threads.iter().map(|thread| thread.id))
                .collect(),
        }
    }
}
