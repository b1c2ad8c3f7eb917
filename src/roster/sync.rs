// src/roster/sync.rs

use super::embed::build_roster_embed;
use super::errors::SyncError;
use super::guild::GuildSnapshot;
use super::messenger::RosterMessenger;
use super::store::{RosterRecord, RosterStore};

#[derive(Debug)]
pub struct SyncOutcome {
    pub record: RosterRecord,
    pub result: Result<(), SyncError>,
}

/// Rebuilds every roster tracked for the snapshot's guild. Each record is
/// attempted independently; failures are returned, not raised.
pub async fn sync_guild<M>(store: &RosterStore, guild: &GuildSnapshot, messenger: &M) -> Vec<SyncOutcome>
where
    M: RosterMessenger + ?Sized,
{
    let records = store.records(guild.id()).await;
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let result = refresh(guild, messenger, &record).await;
        outcomes.push(SyncOutcome { record, result });
    }

    outcomes
}

async fn refresh<M>(guild: &GuildSnapshot, messenger: &M, record: &RosterRecord) -> Result<(), SyncError>
where
    M: RosterMessenger + ?Sized,
{
    if !guild.has_channel(record.channel_id) {
        return Err(SyncError::ChannelMissing(record.channel_id));
    }

    let embed = build_roster_embed(guild, &record.role_ids);
    messenger
        .refresh_roster(record.channel_id, record.message_id, &embed)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::messenger::fake::FakeMessenger;
    use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId, UserId};

    fn record(channel: u64, message: u64, roles: &[u64]) -> RosterRecord {
        RosterRecord {
            channel_id: ChannelId::new(channel),
            message_id: MessageId::new(message),
            role_ids: roles.iter().copied().map(RoleId::new).collect(),
        }
    }

    fn guild() -> GuildSnapshot {
        GuildSnapshot::new(GuildId::new(10))
            .with_channel(ChannelId::new(20))
            .with_role(RoleId::new(1), "Admin")
            .with_member(UserId::new(100), [RoleId::new(1)])
    }

    #[tokio::test]
    async fn untracked_guild_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::load(dir.path().join("rosters.json")).unwrap();
        let messenger = FakeMessenger::default();

        assert!(sync_guild(&store, &guild(), &messenger).await.is_empty());
        assert!(messenger.refresh_attempts().is_empty());
    }

    #[tokio::test]
    async fn failure_does_not_stop_later_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::load(dir.path().join("rosters.json")).unwrap();
        for message in [30, 31, 32] {
            store.track(GuildId::new(10), record(20, message, &[1])).await.unwrap();
        }
        let messenger = FakeMessenger::with_deleted([MessageId::new(31)]);

        let outcomes = sync_guild(&store, &guild(), &messenger).await;

        assert_eq!(
            messenger.refresh_attempts(),
            vec![MessageId::new(30), MessageId::new(31), MessageId::new(32)]
        );
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(SyncError::Discord(_))));
        assert!(outcomes[2].result.is_ok());

        let refreshed = messenger.refreshed.lock().unwrap();
        assert_eq!(refreshed[0].2.fields[0].value, "<@100>");
    }

    #[tokio::test]
    async fn record_in_foreign_channel_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::load(dir.path().join("rosters.json")).unwrap();
        store.track(GuildId::new(10), record(99, 30, &[1])).await.unwrap();
        store.track(GuildId::new(10), record(20, 31, &[1])).await.unwrap();
        let messenger = FakeMessenger::default();

        let outcomes = sync_guild(&store, &guild(), &messenger).await;

        assert!(matches!(
            outcomes[0].result,
            Err(SyncError::ChannelMissing(id)) if id == ChannelId::new(99)
        ));
        assert!(outcomes[1].result.is_ok());
        assert_eq!(messenger.refresh_attempts(), vec![MessageId::new(31)]);
    }
}
