//! Tracker configuration factories for testing.
use torrust_tracker_configuration::{Configuration, Threshold};
use torrust_tracker_primitives::StoreDriver;

use crate::random;

/// This configuration is used for testing. It uses the in-memory store and a
/// random key prefix so that tests running at the same time never see each
/// other's swarms, even when they share a store.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off; // Change to `debug` for tests debugging

    config.store.driver = StoreDriver::Memory;
    config.store.prefix = format!("test:{}:", random::string(8));

    // Fail fast when a test breaks the store on purpose.
    config.store.pool.max_idle_connections = 4;
    config.store.pool.connection_timeout = 200;

    config
}

/// Ephemeral configuration against the Redis instance given by the
/// `TORRUST_SWARM_STORE_REDIS_ADDRESS` env var (`127.0.0.1:6379` when missing).
#[must_use]
pub fn ephemeral_with_redis() -> Configuration {
    let mut config = ephemeral();

    config.store.driver = StoreDriver::Redis;

    if let Ok(address) = std::env::var("TORRUST_SWARM_STORE_REDIS_ADDRESS") {
        config.store.address = address;
    }

    config
}

/// Ephemeral configuration where reads remove dangling members from the
/// peer sets.
#[must_use]
pub fn ephemeral_with_dangling_members_repair() -> Configuration {
    let mut config = ephemeral();

    config.store.swarm.dangling_members = torrust_tracker_configuration::DanglingMembers::Repair;

    config
}
