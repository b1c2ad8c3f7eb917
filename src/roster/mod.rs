// src/roster/mod.rs
mod embed;
mod errors;
mod guild;
mod messenger;
mod store;
mod sync;

pub use embed::{build_roster_embed, RosterEmbed, RosterField, NO_MEMBERS};
pub use errors::{StoreError, SyncError};
pub use guild::GuildSnapshot;
pub use messenger::{HttpMessenger, RosterMessenger};
pub use store::{RosterRecord, RosterStore};
pub use sync::{sync_guild, SyncOutcome};

#[cfg(test)]
pub(crate) use messenger::fake as messenger_fake;
