//! Primitive types for the [Torrust Tracker](https://docs.rs/torrust-tracker)
//! swarm store.
//!
//! This module contains the basic data structures shared by the swarm store
//! crate and its configuration: users, torrents, the peers announcing to them
//! and the scope tags that partition a torrent's peer collections.
use serde::{Deserialize, Serialize};

pub mod info_hash;
pub mod peer;
pub mod scope;
pub mod torrent;
pub mod user;

/// Identifier of a torrent in the tracker database.
pub type TorrentId = u64;

/// Identifier of a user account.
pub type UserId = u64;

/// Seconds since the Unix Epoch.
pub type UnixTimestamp = i64;

/// The backend used to persist the swarms.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, derive_more::Display, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    /// A shared Redis instance. This is the production driver.
    #[display("Redis")]
    Redis,
    /// An in-process store. Data does not survive the process.
    #[display("Memory")]
    Memory,
}
