//! A swarm store plus a side door to the data it stores.
use torrust_tracker_configuration::Store;
use torrust_tracker_primitives::peer;
use torrust_tracker_primitives::scope::Scope;
use torrust_tracker_primitives::TorrentId;
use torrust_tracker_swarm_store::swarm::backend::memory::Memory;
use torrust_tracker_swarm_store::swarm::backend::redis::Redis;
use torrust_tracker_swarm_store::swarm::backend::{Connection as _, Connector, WriteBatch};
use torrust_tracker_swarm_store::swarm::store::SwarmStore;
use torrust_tracker_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};

const RUN_REDIS_TESTS: &str = "TORRUST_SWARM_STORE_RUN_REDIS_TESTS";

pub struct Harness<C: Connector> {
    pub swarms: SwarmStore<C>,
    connector: C,
}

impl<C: Connector + Clone> Harness<C> {
    pub fn new(config: &Store, connector: C) -> Self {
        INIT.call_once(|| tracing_stderr_init(LevelFilter::ERROR));

        Self {
            swarms: SwarmStore::new(config, connector.clone()),
            connector,
        }
    }

    /// Deletes the record of a peer on a connection of its own, as an expiry
    /// or another tracker instance would.
    pub fn delete_record_out_of_band(&self, key: &peer::Key) {
        let mut batch = WriteBatch::new(false);
        batch.delete_record(self.swarms.namespace().peer_record_key(key));

        self.connector
            .dial()
            .expect("it should dial the store")
            .write(&batch)
            .expect("it should delete the record");
    }

    /// The raw members of a peer set.
    pub fn members(&self, torrent_id: TorrentId, scope: &Scope) -> Vec<String> {
        let mut members = self
            .connector
            .dial()
            .expect("it should dial the store")
            .members(&self.swarms.namespace().membership_set_key(torrent_id, scope))
            .expect("it should list the members");

        members.sort();
        members
    }
}

pub fn memory_with(config: &Store) -> (Harness<Memory>, Memory) {
    let memory = Memory::new();
    (Harness::new(config, memory.clone()), memory)
}

pub fn memory() -> (Harness<Memory>, Memory) {
    memory_with(&configuration::ephemeral().store)
}

/// `None` unless the Redis tests were asked for.
pub fn redis() -> Option<Harness<Redis>> {
    if std::env::var(RUN_REDIS_TESTS).is_err() {
        println!("Skipping the Redis tests. Set {RUN_REDIS_TESTS} to run them.");
        return None;
    }

    let config = configuration::ephemeral_with_redis().store;
    let connector = Redis::new(&config).expect("the Redis address should be valid");

    Some(Harness::new(&config, connector))
}
