// src/roster/store.rs

use log::{debug, info};
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::errors::StoreError;

/// A posted roster message that is kept in sync with the guild's roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub role_ids: Vec<RoleId>,
}

// On-disk shape. Ids are plain JSON integers, guild ids are object keys.
#[derive(Debug, serde::Serialize, Deserialize)]
struct StoredRecord {
    channel_id: u64,
    message_id: u64,
    role_ids: Vec<u64>,
}

impl From<&RosterRecord> for StoredRecord {
    fn from(record: &RosterRecord) -> Self {
        Self {
            channel_id: record.channel_id.get(),
            message_id: record.message_id.get(),
            role_ids: record.role_ids.iter().map(|id| id.get()).collect(),
        }
    }
}

impl StoredRecord {
    fn validate(self, guild: u64, index: usize) -> Result<RosterRecord, StoreError> {
        let invalid = |reason| StoreError::InvalidRecord { guild, index, reason };

        if self.channel_id == 0 {
            return Err(invalid("channel_id must be non-zero"));
        }
        if self.message_id == 0 {
            return Err(invalid("message_id must be non-zero"));
        }
        if self.role_ids.contains(&0) {
            return Err(invalid("role_ids must be non-zero"));
        }

        Ok(RosterRecord {
            channel_id: ChannelId::new(self.channel_id),
            message_id: MessageId::new(self.message_id),
            role_ids: self.role_ids.into_iter().map(RoleId::new).collect(),
        })
    }
}

type Rosters = BTreeMap<GuildId, Vec<RosterRecord>>;

struct StoredRosters<'a>(&'a Rosters);

impl Serialize for StoredRosters<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(guild, records)| {
            (
                guild.get().to_string(),
                records.iter().map(StoredRecord::from).collect::<Vec<_>>(),
            )
        }))
    }
}

/// Guild to tracked-roster mapping, mirrored to a JSON file after every change.
pub struct RosterStore {
    path: PathBuf,
    rosters: RwLock<Rosters>,
}

impl RosterStore {
    /// Reads the roster file, starting empty when it does not exist yet.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let rosters = match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No roster file at {:?}, starting empty", path);
                Rosters::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Loaded {} tracked rosters across {} guilds from {:?}",
            rosters.values().map(Vec::len).sum::<usize>(),
            rosters.len(),
            path
        );

        Ok(Self {
            path,
            rosters: RwLock::new(rosters),
        })
    }

    fn parse(contents: &str) -> Result<Rosters, StoreError> {
        let stored: HashMap<String, Vec<StoredRecord>> = serde_json::from_str(contents)?;
        let mut rosters = Rosters::new();

        for (key, records) in stored {
            let guild = key
                .parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .ok_or_else(|| StoreError::InvalidGuildKey(key.clone()))?;

            let records = records
                .into_iter()
                .enumerate()
                .map(|(index, record)| record.validate(guild, index))
                .collect::<Result<Vec<_>, _>>()?;

            rosters.insert(GuildId::new(guild), records);
        }

        Ok(rosters)
    }

    /// Tracked rosters for `guild` in the order they were created.
    pub async fn records(&self, guild: GuildId) -> Vec<RosterRecord> {
        self.rosters
            .read()
            .await
            .get(&guild)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_rosters(&self, guild: GuildId) -> bool {
        self.rosters.read().await.contains_key(&guild)
    }

    pub async fn all(&self) -> BTreeMap<GuildId, Vec<RosterRecord>> {
        self.rosters.read().await.clone()
    }

    /// Appends `record` under `guild` and rewrites the file. The write lock is
    /// held across both steps; if the write fails the record is dropped again.
    pub async fn track(&self, guild: GuildId, record: RosterRecord) -> Result<(), StoreError> {
        let mut rosters = self.rosters.write().await;
        rosters.entry(guild).or_default().push(record);

        if let Err(e) = Self::write(&self.path, &rosters) {
            if let Some(records) = rosters.get_mut(&guild) {
                records.pop();
                if records.is_empty() {
                    rosters.remove(&guild);
                }
            }
            return Err(e);
        }

        Ok(())
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        let rosters = self.rosters.read().await;
        Self::write(&self.path, &rosters)
    }

    fn write(path: &Path, rosters: &Rosters) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        StoredRosters(rosters).serialize(&mut serializer)?;

        fs::write(path, buf)?;
        debug!("Roster file written to {:?}", path);
        Ok(())
    }
}
