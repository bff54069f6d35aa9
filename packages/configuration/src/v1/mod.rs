//! Version `1` for [Torrust Tracker](https://docs.rs/torrust-tracker) swarm
//! store configuration data structures.
//!
//! The configuration has two sections:
//!
//! - [`logging`]: how verbose the store is.
//! - [`store`]: where the swarms are persisted, how connections are pooled
//!   and the consistency policy between peer sets and peer records.
//!
//! This is the default configuration:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//! style = "full"
//!
//! [store]
//! driver = "redis"
//! address = "127.0.0.1:6379"
//! database = 0
//! prefix = "torrust:"
//!
//! [store.pool]
//! max_idle_connections = 10
//! idle_timeout = 240
//! connection_timeout = 1000
//! dial_timeout = 1000
//! command_timeout = 1000
//!
//! [store.swarm]
//! peer_ttl = 0
//! atomic_batches = false
//! dangling_members = "ignore"
//! ```
//!
//! The `password` field of the `store` section is optional. When it is set
//! the connection authenticates right after dialing.
pub mod logging;
pub mod store;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use self::logging::Logging;
use self::store::Store;
use crate::{Error, Info, CONFIG_OVERRIDE_PREFIX, CONFIG_OVERRIDE_SEPARATOR};

/// Core configuration for the swarm store.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Configuration {
    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,

    /// Store configuration
    #[serde(default)]
    pub store: Store,
}

impl Configuration {
    /// Loads the configuration from the `Info` struct. Values missing in the
    /// TOML document take their default, and the environment overrides win
    /// over both.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the TOML document or an override cannot be
    /// parsed into the configuration.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = Figment::from(Serialized::defaults(Configuration::default()));

        let figment = match &info.config_toml {
            Some(config_toml) => figment.merge(Toml::string(config_toml)),
            None => figment.merge(Toml::file(&info.config_toml_path)),
        };

        let config: Configuration = figment
            .merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR))
            .extract()?;

        Ok(config)
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configuration cannot be represented in TOML.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }
}
