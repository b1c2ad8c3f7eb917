// src/roster/messenger.rs

use async_trait::async_trait;
use serenity::builder::{CreateMessage, EditMessage};
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};
use std::sync::Arc;

use super::embed::RosterEmbed;

/// The Discord calls rosters need: posting a new roster and rewriting an
/// existing one.
#[async_trait]
pub trait RosterMessenger: Send + Sync {
    async fn send_roster(&self, channel: ChannelId, embed: &RosterEmbed) -> Result<MessageId, serenity::Error>;

    async fn refresh_roster(
        &self,
        channel: ChannelId,
        message: MessageId,
        embed: &RosterEmbed,
    ) -> Result<(), serenity::Error>;
}

pub struct HttpMessenger {
    http: Arc<Http>,
}

impl HttpMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RosterMessenger for HttpMessenger {
    async fn send_roster(&self, channel: ChannelId, embed: &RosterEmbed) -> Result<MessageId, serenity::Error> {
        let message = channel
            .send_message(&self.http, CreateMessage::new().embed(embed.to_create_embed()))
            .await?;
        Ok(message.id)
    }

    async fn refresh_roster(
        &self,
        channel: ChannelId,
        message: MessageId,
        embed: &RosterEmbed,
    ) -> Result<(), serenity::Error> {
        let mut message = channel.message(&self.http, message).await?;
        message
            .edit(&self.http, EditMessage::new().embed(embed.to_create_embed()))
            .await
    }
}
