//! The swarm store.
//!
//! [`SwarmStore`] implements the [`SwarmRepository`] operations on top of a
//! [`Pool`] of connections and a key [`Namespace`].
//!
//! Each operation checks out one connection and sends one write batch, or
//! one read of the peer set followed by one read of all the peer records.
//! Writes for distinct peers are pipelined, not transactional. With
//! `atomic_batches` a batch that does not reach the store completely is not
//! applied at all, but a write the store rejects still does not undo the
//! others. Every write operation can be retried in full.
use std::panic::Location;

use torrust_tracker_configuration::{DanglingMembers, Store, SwarmPolicy};
use torrust_tracker_primitives::peer::Peer;
use torrust_tracker_primitives::scope::Scope;
use torrust_tracker_primitives::torrent::{PeerMap, Torrent};
use torrust_tracker_primitives::{StoreDriver, TorrentId};

use super::backend::{Connection, Connector, WriteBatch};
use super::error::Error;
use super::keys::Namespace;
use super::pool::{Pool, PooledConnection};
use super::{record, SwarmRepository};

pub struct SwarmStore<C: Connector> {
    pool: Pool<C>,
    namespace: Namespace,
    policy: SwarmPolicy,
}

impl<C: Connector> SwarmStore<C> {
    /// It builds the store. No connection is dialed yet.
    #[must_use]
    pub fn new(config: &Store, connector: C) -> Self {
        Self {
            pool: Pool::new(&config.pool, connector),
            namespace: Namespace::new(&config.prefix),
            policy: config.swarm.clone(),
        }
    }

    #[must_use]
    pub fn pool(&self) -> &Pool<C> {
        &self.pool
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn new_batch(&self) -> WriteBatch {
        WriteBatch::new(self.policy.atomic_batches)
    }

    /// Writes the peer record and adds the peer to the set of its own torrent.
    fn put_peer(&self, batch: &mut WriteBatch, peer: &Peer, scope: &Scope) {
        let key = peer.key();
        let record_key = self.namespace.peer_record_key(&key);

        batch.put_record(record_key.clone(), record::encode(peer));

        if let Some(ttl) = self.policy.peer_ttl() {
            batch.expire_record(record_key, ttl);
        }

        batch.add_member(
            self.namespace.membership_set_key(peer.torrent_id, scope),
            Namespace::member(&key),
        );
    }

    fn write(&self, batch: &WriteBatch) -> Result<(), Error> {
        let mut connection = self.pool.acquire()?;

        connection.write(batch)?;

        self.pool.release(connection);

        Ok(())
    }

    /// Removes the members that no longer have a record. A failure is only
    /// logged.
    fn repair(&self, connection: &mut PooledConnection<C>, set_key: &str, dangling: Vec<String>) {
        let mut batch = self.new_batch();

        for member in dangling {
            batch.remove_member(set_key.to_owned(), member);
        }

        match connection.write(&batch) {
            Ok(()) => tracing::debug!(set = set_key, removed = batch.len(), "dangling members removed"),
            Err(error) => tracing::warn!(set = set_key, %error, "failed to remove dangling members"),
        }
    }
}

impl<C: Connector> SwarmRepository for SwarmStore<C> {
    fn driver(&self) -> StoreDriver {
        self.pool.driver()
    }

    fn add_peers(&self, peers: &PeerMap, scope: &Scope) -> Result<(), Error> {
        if peers.is_empty() {
            return Ok(());
        }

        let mut batch = self.new_batch();

        for peer in peers.values() {
            self.put_peer(&mut batch, peer, scope);
        }

        self.write(&batch)?;

        tracing::debug!(%scope, peers = peers.len(), writes = batch.len(), "peers added");

        Ok(())
    }

    fn get_peers(&self, torrent_id: TorrentId, scope: &Scope) -> Result<PeerMap, Error> {
        let set_key = self.namespace.membership_set_key(torrent_id, scope);

        let mut connection = self.pool.acquire()?;

        let mut members = vec![];
        let mut record_keys = vec![];

        for member in connection.members(&set_key)? {
            match Namespace::parse_member(&member) {
                Some(key) if key.torrent_id == torrent_id => {
                    record_keys.push(self.namespace.peer_record_key(&key));
                    members.push((member, key));
                }
                Some(_) => tracing::warn!(set = %set_key, %member, "skipping a member of another torrent"),
                None => tracing::warn!(set = %set_key, %member, "skipping a member that does not name a peer"),
            }
        }

        let records = connection.read_records(&record_keys)?;

        let mut peers = PeerMap::new();
        let mut dangling = vec![];

        for ((member, key), (record_key, record)) in members.into_iter().zip(record_keys.iter().zip(records)) {
            let Some(record) = record else {
                dangling.push(member);
                continue;
            };

            let peer = record::decode(record_key, &record, self.driver())?;

            if peer.key() != key {
                return Err(Error::MalformedRecord {
                    key: record_key.clone(),
                    reason: format!("it holds peer `{}`", peer.key()),
                    driver: self.driver(),
                    location: Location::caller(),
                });
            }

            peers.insert(key, peer);
        }

        if !dangling.is_empty() {
            tracing::debug!(set = %set_key, dangling = dangling.len(), "members without a peer record");

            if self.policy.dangling_members == DanglingMembers::Repair {
                self.repair(&mut connection, &set_key, dangling);
            }
        }

        self.pool.release(connection);

        tracing::debug!(torrent_id, %scope, peers = peers.len(), "peers read");

        Ok(peers)
    }

    fn remove_peers(&self, torrent_id: TorrentId, peers: &PeerMap, scope: &Scope) -> Result<(), Error> {
        if peers.is_empty() {
            return Ok(());
        }

        let set_key = self.namespace.membership_set_key(torrent_id, scope);
        let mut batch = self.new_batch();

        for peer in peers.values() {
            let key = peer.key();

            batch
                .remove_member(set_key.clone(), Namespace::member(&key))
                .delete_record(self.namespace.peer_record_key(&key));
        }

        self.write(&batch)?;

        tracing::debug!(torrent_id, %scope, peers = peers.len(), "peers removed");

        Ok(())
    }

    fn announce(&self, peer: &Peer) -> Result<(), Error> {
        let scope = Scope::for_peer(peer);
        let mut batch = self.new_batch();

        self.put_peer(&mut batch, peer, &scope);

        if let Some(other) = scope.opposite() {
            batch.remove_member(
                self.namespace.membership_set_key(peer.torrent_id, &other),
                Namespace::member(&peer.key()),
            );
        }

        self.write(&batch)?;

        tracing::debug!(torrent_id = peer.torrent_id, %scope, "peer announced");

        Ok(())
    }

    fn save_swarm(&self, torrent: &Torrent) -> Result<(), Error> {
        let mut batch = self.new_batch();

        for peer in torrent.seeders.values() {
            self.put_peer(&mut batch, peer, &Scope::SEEDERS);
        }

        for peer in torrent.leechers.values() {
            self.put_peer(&mut batch, peer, &Scope::LEECHERS);
        }

        if batch.is_empty() {
            return Ok(());
        }

        self.write(&batch)?;

        tracing::debug!(
            torrent_id = torrent.id,
            seeders = torrent.seeders.len(),
            leechers = torrent.leechers.len(),
            "swarm saved"
        );

        Ok(())
    }

    fn load_swarm(&self, torrent: &mut Torrent) -> Result<(), Error> {
        let seeders = self.get_peers(torrent.id, &Scope::SEEDERS)?;
        let leechers = self.get_peers(torrent.id, &Scope::LEECHERS)?;

        torrent.seeders = seeders;
        torrent.leechers = leechers;

        Ok(())
    }
}
