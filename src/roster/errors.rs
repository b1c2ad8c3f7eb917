use serenity::model::id::ChannelId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed roster file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid guild key {0:?} in roster file")]
    InvalidGuildKey(String),

    #[error("Invalid roster record #{index} for guild {guild}: {reason}")]
    InvalidRecord {
        guild: u64,
        index: usize,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Channel {0} is not part of this guild")]
    ChannelMissing(ChannelId),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}
