//! Key naming.
//!
//! Every key starts with the configured prefix so that several deployments
//! can share one store:
//!
//! Key                 | Format                                          | Example
//! ---|---|---
//! Peer record         | `<prefix>peer:<peer_id>:<user_id>:<torrent_id>` | `torrust:peer:-qB00000000000000000:7:42`
//! Peer set            | `<prefix><scope><torrent_id>`                   | `torrust:seeders:42`
//!
//! The members of a peer set are canonical peer keys without prefix
//! (`-qB00000000000000000:7:42`). A member names both the peer and its
//! record.
//!
//! Only the identity of a peer goes into its keys, so a peer keeps the same
//! record when its counters or its endpoint change.
//!
//! Keys do not collide: a [`Scope`] tag never ends with a digit, so the
//! torrent id of a set key is the trailing run of digits, and never starts
//! with the peer record tag.
use std::str::FromStr;

use torrust_tracker_primitives::peer;
use torrust_tracker_primitives::scope::{self, Scope};
use torrust_tracker_primitives::TorrentId;

/// The tag of peer record keys.
pub const PEER_RECORD_TAG: &str = scope::RESERVED_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn peer_record_key(&self, key: &peer::Key) -> String {
        format!("{}{PEER_RECORD_TAG}{key}", self.prefix)
    }

    #[must_use]
    pub fn membership_set_key(&self, torrent_id: TorrentId, scope: &Scope) -> String {
        format!("{}{scope}{torrent_id}", self.prefix)
    }

    #[must_use]
    pub fn member(key: &peer::Key) -> String {
        key.to_string()
    }

    /// The peer named by a peer set member, or `None` if the member was not
    /// written by this codec.
    #[must_use]
    pub fn parse_member(member: &str) -> Option<peer::Key> {
        peer::Key::from_str(member).ok()
    }
}
