//! Peer struct used by the swarm store.
//!
//! A sample peer:
//!
//! ```rust
//! use std::net::{IpAddr, Ipv4Addr};
//! use torrust_tracker_primitives::peer;
//!
//! let peer = peer::Peer {
//!     id: "-qB00000000000000000".to_owned(),
//!     user_id: 7,
//!     torrent_id: 42,
//!     ip: IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)),
//!     port: 6889,
//!     uploaded: 1024,
//!     downloaded: 3000,
//!     left: 4200,
//!     last_announce: 1_669_397_478,
//! };
//!
//! assert_eq!(peer.key().to_string(), "-qB00000000000000000:7:42");
//! ```
use std::net::IpAddr;
use std::panic::Location;
use std::str::FromStr;

use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TorrentId, UnixTimestamp, UserId};

/// Separator between the parts of the canonical [`Key`] string.
pub const KEY_SEPARATOR: char = ':';

/// Peer struct used by the swarm store.
///
/// The identity of a peer is the triple returned by [`Peer::key`]. Every
/// other field is an attribute that is overwritten on each announce.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Peer {
    /// ID sent by the client in the announce request.
    pub id: String,
    /// The user account the client announced with.
    pub user_id: UserId,
    /// The torrent the peer is part of.
    pub torrent_id: TorrentId,
    /// The IP this peer is listening on.
    pub ip: IpAddr,
    /// The port this peer is listening on.
    pub port: u16,
    /// The total amount of bytes uploaded by this peer so far.
    pub uploaded: u64,
    /// The total amount of bytes downloaded by this peer so far.
    pub downloaded: u64,
    /// The number of bytes this peer still has to download.
    pub left: u64,
    /// The last time the tracker received an announce request from this peer.
    pub last_announce: UnixTimestamp,
}

impl Peer {
    /// The composite identity of the peer.
    #[must_use]
    pub fn key(&self) -> Key {
        Key::new(self.id.clone(), self.user_id, self.torrent_id)
    }

    /// A seeder is a peer with nothing left to download.
    #[must_use]
    pub fn is_seeder(&self) -> bool {
        self.left == 0
    }
}

/// The composite identity of a [`Peer`]: peer id, user id and torrent id.
///
/// Two peers with the same key are the same peer, whatever their counters or
/// endpoint say. The canonical string form is `<peer_id>:<user_id>:<torrent_id>`.
/// It is parsed from the right, so the peer id itself may contain `:`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Constructor)]
pub struct Key {
    pub peer_id: String,
    pub user_id: UserId,
    pub torrent_id: TorrentId,
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.peer_id, self.user_id, self.torrent_id
        )
    }
}

/// Error returned when a string is not a canonical peer [`Key`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("missing {part} in peer key `{key}`, {location}")]
    MissingPart {
        location: &'static Location<'static>,
        key: String,
        part: &'static str,
    },
    #[error("invalid {part} in peer key `{key}`, {location}")]
    InvalidNumber {
        location: &'static Location<'static>,
        key: String,
        part: &'static str,
    },
}

impl FromStr for Key {
    type Err = KeyParseError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let location = Location::caller();

        let missing = |part| KeyParseError::MissingPart {
            location,
            key: s.to_owned(),
            part,
        };
        let invalid = |part| KeyParseError::InvalidNumber {
            location,
            key: s.to_owned(),
            part,
        };

        let mut parts = s.rsplitn(3, KEY_SEPARATOR);

        let torrent_id = parts.next().ok_or_else(|| missing("torrent id"))?;
        let user_id = parts.next().ok_or_else(|| missing("user id"))?;
        let peer_id = parts.next().ok_or_else(|| missing("peer id"))?;

        Ok(Self {
            peer_id: peer_id.to_owned(),
            user_id: user_id.parse().map_err(|_| invalid("user id"))?,
            torrent_id: torrent_id.parse().map_err(|_| invalid("torrent id"))?,
        })
    }
}

impl From<&Peer> for Key {
    fn from(peer: &Peer) -> Self {
        peer.key()
    }
}

pub mod fixture {
    use std::net::{IpAddr, Ipv4Addr};

    use super::Peer;
    use crate::{TorrentId, UnixTimestamp, UserId};

    #[derive(PartialEq, Debug)]
    pub struct PeerBuilder {
        peer: Peer,
    }

    #[allow(clippy::derivable_impls)]
    impl Default for PeerBuilder {
        fn default() -> Self {
            Self { peer: Peer::default() }
        }
    }

    impl PeerBuilder {
        /// A peer that has completed the download.
        #[must_use]
        pub fn seeder() -> Self {
            let peer = Peer {
                id: "-qB00000000000000001".to_owned(),
                left: 0,
                ..Peer::default()
            };

            Self { peer }
        }

        /// A peer that still has bytes to download.
        #[must_use]
        pub fn leecher() -> Self {
            let peer = Peer {
                id: "-qB00000000000000002".to_owned(),
                ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)),
                left: 4200,
                ..Peer::default()
            };

            Self { peer }
        }

        #[must_use]
        pub fn with_id(mut self, id: &str) -> Self {
            self.peer.id = id.to_owned();
            self
        }

        #[must_use]
        pub fn with_user_id(mut self, user_id: UserId) -> Self {
            self.peer.user_id = user_id;
            self
        }

        #[must_use]
        pub fn with_torrent_id(mut self, torrent_id: TorrentId) -> Self {
            self.peer.torrent_id = torrent_id;
            self
        }

        #[must_use]
        pub fn with_ip(mut self, ip: IpAddr) -> Self {
            self.peer.ip = ip;
            self
        }

        #[must_use]
        pub fn with_port(mut self, port: u16) -> Self {
            self.peer.port = port;
            self
        }

        #[must_use]
        pub fn with_uploaded(mut self, uploaded: u64) -> Self {
            self.peer.uploaded = uploaded;
            self
        }

        #[must_use]
        pub fn with_bytes_pending_to_download(mut self, left: u64) -> Self {
            self.peer.left = left;
            self
        }

        #[must_use]
        pub fn last_announced_at(mut self, timestamp: UnixTimestamp) -> Self {
            self.peer.last_announce = timestamp;
            self
        }

        #[must_use]
        pub fn build(self) -> Peer {
            self.into()
        }

        #[must_use]
        pub fn into(self) -> Peer {
            self.peer
        }
    }

    impl Default for Peer {
        fn default() -> Self {
            Self {
                id: "-qB00000000000000000".to_owned(),
                user_id: 1,
                torrent_id: 1,
                ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
                port: 6889,
                uploaded: 1024,
                downloaded: 3000,
                left: 4200,
                last_announce: 1_669_397_478,
            }
        }
    }
}
