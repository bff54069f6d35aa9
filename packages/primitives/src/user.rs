//! User accounts, as seen by the tracker.
//!
//! Users are owned by the account subsystem. Peers reference them by id.
use serde::{Deserialize, Serialize};

use crate::UserId;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    /// Access token embedded in the announce URL.
    pub passkey: String,
    pub up_multiplier: f64,
    pub down_multiplier: f64,
    /// Maximum number of torrents the user may leech at once. `0` means unlimited.
    pub slots: i64,
    pub slots_used: i64,
    pub snatches: u64,
}

impl User {
    /// Whether the user may start leeching one more torrent.
    #[must_use]
    pub fn has_free_slot(&self) -> bool {
        self.slots == 0 || self.slots_used < self.slots
    }
}
