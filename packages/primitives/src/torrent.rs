//! A torrent and its swarm.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::info_hash::InfoHash;
use crate::peer::{self, Peer};
use crate::{TorrentId, UnixTimestamp};

/// Peers of one collection, indexed by their composite identity.
pub type PeerMap = BTreeMap<peer::Key, Peer>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Torrent {
    pub id: TorrentId,
    #[serde(skip)]
    pub info_hash: InfoHash,
    pub active: bool,
    pub seeders: PeerMap,
    pub leechers: PeerMap,
    /// How many times the torrent has been completely downloaded.
    pub snatches: u64,
    pub up_multiplier: f64,
    pub down_multiplier: f64,
    pub last_action: UnixTimestamp,
}

impl Torrent {
    #[must_use]
    pub fn new(id: TorrentId, info_hash: InfoHash) -> Self {
        Self {
            id,
            info_hash,
            active: true,
            up_multiplier: 1.0,
            down_multiplier: 1.0,
            ..Default::default()
        }
    }

    /// Puts the peer in the collection its remaining bytes imply and takes it
    /// out of the other one.
    pub fn upsert_peer(&mut self, peer: Peer) {
        let key = peer.key();

        if peer.is_seeder() {
            self.leechers.remove(&key);
            self.seeders.insert(key, peer);
        } else {
            self.seeders.remove(&key);
            self.leechers.insert(key, peer);
        }
    }

    pub fn remove_peer(&mut self, key: &peer::Key) -> Option<Peer> {
        self.seeders.remove(key).or_else(|| self.leechers.remove(key))
    }

    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.seeders.len() + self.leechers.len()
    }
}
