//! The swarm store.
//!
//! It persists the peers of every torrent in a shared key-value store. Two
//! linked structures are kept for each torrent:
//!
//! - One peer set per scope (seeders, leechers) listing the identities of the
//!   peers in that scope.
//! - One peer record per peer holding its attributes.
//!
//! ```text
//! torrust:seeders:42  ->  { "-qB00000000000000001:7:42", "-qB00000000000000002:8:42" }
//!
//! torrust:peer:-qB00000000000000001:7:42  ->  { ip: 126.0.0.1, port: 6889, left: 0, ... }
//! torrust:peer:-qB00000000000000002:8:42  ->  { ip: 126.0.0.2, port: 6881, left: 0, ... }
//! ```
//!
//! The sets reference the records but nothing enforces it. A record may
//! expire or be deleted while its identity is still in a set. Reads skip
//! those members instead of failing, and can optionally remove them.
//!
//! The parts:
//!
//! - [`pool`]: the bounded connection pool with borrow-time liveness probes.
//! - [`keys`]: key naming.
//! - [`record`]: the peer record codec.
//! - [`store`]: the [`SwarmRepository`] implementation.
//! - [`backend`]: the store drivers, Redis and in-memory.
//!
//! Use [`build`] to get a store for the configured driver.
pub mod backend;
pub mod error;
pub mod keys;
pub mod pool;
pub mod record;
pub mod store;

use std::sync::Arc;

use torrust_tracker_configuration::Store;
use torrust_tracker_primitives::peer::Peer;
use torrust_tracker_primitives::scope::Scope;
use torrust_tracker_primitives::torrent::{PeerMap, Torrent};
use torrust_tracker_primitives::{StoreDriver, TorrentId};

use self::backend::memory::Memory;
use self::backend::redis::Redis;
use self::error::Error;
use self::store::SwarmStore;

/// It builds the swarm store for the configured driver.
///
/// ```rust,no_run
/// use torrust_tracker_configuration::Store;
/// use torrust_tracker_swarm_store::swarm;
///
/// let swarms = swarm::build(&Store::default()).expect("the store address should be valid");
/// ```
///
/// No connection is opened until the first operation.
///
/// # Errors
///
/// Will return `Error::InvalidAddress` if the configured address cannot be
/// used to reach the store.
pub fn build(config: &Store) -> Result<Arc<dyn SwarmRepository>, Error> {
    let swarms: Arc<dyn SwarmRepository> = match config.driver {
        StoreDriver::Redis => Arc::new(SwarmStore::new(config, Redis::new(config)?)),
        StoreDriver::Memory => Arc::new(SwarmStore::new(config, Memory::new())),
    };

    tracing::info!(driver = %config.driver, prefix = %config.prefix, "swarm store ready");

    Ok(swarms)
}

/// The swarm store operations.
///
/// Every write operation is idempotent and can be retried in full after a
/// failure. Concurrent operations on the same torrent are not ordered: a read
/// racing a removal may or may not see the removed peers, and concurrent
/// additions of disjoint peers end up with all of them.
pub trait SwarmRepository: Sync + Send {
    fn driver(&self) -> StoreDriver;

    /// It writes the record of every peer and adds it to the `scope` set of
    /// its own torrent.
    ///
    /// All the writes go in one batch. A failure may leave some peers written
    /// and others not.
    ///
    /// # Errors
    ///
    /// Will return a connection error if no connection could be checked out,
    /// or a storage command error if a write failed.
    fn add_peers(&self, peers: &PeerMap, scope: &Scope) -> Result<(), Error>;

    /// It returns the peers of the torrent in the `scope` set.
    ///
    /// Members of the set without a peer record are left out of the result.
    /// They are also removed from the set when the dangling members policy
    /// is `repair`.
    ///
    /// # Errors
    ///
    /// Will return a connection error if no connection could be checked out,
    /// or a storage command error if a read failed or a record does not hold
    /// the peer its key names.
    fn get_peers(&self, torrent_id: TorrentId, scope: &Scope) -> Result<PeerMap, Error>;

    /// It removes the peers from the `scope` set of the torrent and deletes
    /// their records. Peers already gone are not an error.
    ///
    /// # Errors
    ///
    /// Will return a connection error if no connection could be checked out,
    /// or a storage command error if a write failed.
    fn remove_peers(&self, torrent_id: TorrentId, peers: &PeerMap, scope: &Scope) -> Result<(), Error>;

    /// It stores the peer under the scope its remaining bytes imply and
    /// removes it from the other well-known scope, in one batch.
    ///
    /// # Errors
    ///
    /// Will return a connection error if no connection could be checked out,
    /// or a storage command error if a write failed.
    fn announce(&self, peer: &Peer) -> Result<(), Error>;

    /// It stores the seeders and leechers of the torrent.
    ///
    /// # Errors
    ///
    /// Will return a connection error if no connection could be checked out,
    /// or a storage command error if a write failed.
    fn save_swarm(&self, torrent: &Torrent) -> Result<(), Error>;

    /// It replaces the seeders and leechers of the torrent with the stored
    /// ones. The torrent is left untouched on error.
    ///
    /// # Errors
    ///
    /// Same as [`SwarmRepository::get_peers`].
    fn load_swarm(&self, torrent: &mut Torrent) -> Result<(), Error>;
}
