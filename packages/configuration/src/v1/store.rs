use std::time::Duration;

use serde::{Deserialize, Serialize};
use torrust_tracker_primitives::StoreDriver;

/// Where and how the swarms are persisted.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Store {
    /// Store driver. Possible values are: `redis` and `memory`.
    #[serde(default = "Store::default_driver")]
    pub driver: StoreDriver,

    /// The `host:port` the store listens on. Ignored by the `memory` driver.
    #[serde(default = "Store::default_address")]
    pub address: String,

    /// Password sent when dialing. No authentication when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Logical database selected after dialing.
    #[serde(default)]
    pub database: u16,

    /// Prepended to every key so that several deployments can share one
    /// store instance.
    #[serde(default = "Store::default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub pool: Pool,

    #[serde(default)]
    pub swarm: SwarmPolicy,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            driver: Self::default_driver(),
            address: Self::default_address(),
            password: None,
            database: 0,
            prefix: Self::default_prefix(),
            pool: Pool::default(),
            swarm: SwarmPolicy::default(),
        }
    }
}

impl Store {
    fn default_driver() -> StoreDriver {
        StoreDriver::Redis
    }

    fn default_address() -> String {
        String::from("127.0.0.1:6379")
    }

    fn default_prefix() -> String {
        String::from("torrust:")
    }
}

/// Connection pool settings.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Pool {
    /// Maximum number of connections of the pool, idle or checked out. When
    /// all of them are checked out, getting one waits up to
    /// `connection_timeout`. `0` is raised to `1`.
    #[serde(default = "Pool::default_max_idle_connections")]
    pub max_idle_connections: u32,

    /// Seconds a connection may sit idle before the pool closes it. `0`
    /// keeps idle connections forever.
    #[serde(default = "Pool::default_idle_timeout")]
    pub idle_timeout: u64,

    /// Milliseconds to wait for a connection before giving up.
    #[serde(default = "Pool::default_timeout_millis")]
    pub connection_timeout: u64,

    /// Milliseconds to wait for the store to accept a new connection.
    #[serde(default = "Pool::default_timeout_millis")]
    pub dial_timeout: u64,

    /// Milliseconds to wait for the reply to a batch of commands.
    #[serde(default = "Pool::default_timeout_millis")]
    pub command_timeout: u64,
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            max_idle_connections: Self::default_max_idle_connections(),
            idle_timeout: Self::default_idle_timeout(),
            connection_timeout: Self::default_timeout_millis(),
            dial_timeout: Self::default_timeout_millis(),
            command_timeout: Self::default_timeout_millis(),
        }
    }
}

impl Pool {
    fn default_max_idle_connections() -> u32 {
        10
    }

    fn default_idle_timeout() -> u64 {
        240
    }

    fn default_timeout_millis() -> u64 {
        #[allow(clippy::cast_possible_truncation)]
        let millis = crate::DEFAULT_TIMEOUT.as_millis() as u64;
        millis
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout > 0).then(|| Duration::from_secs(self.idle_timeout))
    }

    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout)
    }

    #[must_use]
    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.dial_timeout)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout)
    }
}

/// How the swarm store keeps peer sets and peer records consistent.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct SwarmPolicy {
    /// Seconds a peer record lives after its last write. `0` means peer
    /// records never expire and are only removed on `stopped` announces.
    #[serde(default)]
    pub peer_ttl: u64,

    /// Wrap every write batch in a store transaction. Without it a batch is
    /// only pipelined and may be applied partially.
    #[serde(default)]
    pub atomic_batches: bool,

    /// What a read does with members whose peer record is gone.
    #[serde(default)]
    pub dangling_members: DanglingMembers,
}

impl SwarmPolicy {
    #[must_use]
    pub fn peer_ttl(&self) -> Option<Duration> {
        (self.peer_ttl > 0).then(|| Duration::from_secs(self.peer_ttl))
    }
}

/// Policy for members of a peer set whose peer record has expired or was
/// removed concurrently.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum DanglingMembers {
    /// Leave them in the set. Reads skip them.
    #[default]
    Ignore,
    /// Remove them from the set when a read finds them.
    Repair,
}
