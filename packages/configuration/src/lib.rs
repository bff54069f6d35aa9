//! Configuration data structures for the Torrust Tracker swarm store.
//!
//! This module contains the configuration data structures for the swarm
//! store, the component persisting the peers of every torrent in a shared
//! key-value store.
//!
//! The current version for configuration is [`v1`].
//!
//! The configuration is loaded from a [TOML](https://toml.io/en/) file or
//! from the `TORRUST_SWARM_STORE_CONFIG_TOML` environment variable, and
//! any value can be overridden with an environment variable prefixed with
//! `TORRUST_SWARM_STORE_CONFIG_OVERRIDE_`. Nested sections are separated
//! with a double underscore, for example:
//!
//! ```text
//! TORRUST_SWARM_STORE_CONFIG_OVERRIDE_STORE__POOL__MAX_IDLE_CONNECTIONS=20
//! ```
pub mod v1;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Default timeout for dialing the store and for each command round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

// Environment variables

/// The whole `swarm-store.toml` file content. It has priority over the config file.
/// Even if the file is not on the default path.
const ENV_VAR_CONFIG_TOML: &str = "TORRUST_SWARM_STORE_CONFIG_TOML";

/// The `swarm-store.toml` file location.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "TORRUST_SWARM_STORE_CONFIG_TOML_PATH";

/// Prefix for the environment variables overriding single values.
pub const CONFIG_OVERRIDE_PREFIX: &str = "TORRUST_SWARM_STORE_CONFIG_OVERRIDE_";

/// Separator between nested sections in the override variables.
pub const CONFIG_OVERRIDE_SEPARATOR: &str = "__";

pub type Configuration = v1::Configuration;
pub type Logging = v1::logging::Logging;
pub type Threshold = v1::logging::Threshold;
pub type LogStyle = v1::logging::Style;
pub type Store = v1::store::Store;
pub type Pool = v1::store::Pool;
pub type SwarmPolicy = v1::store::SwarmPolicy;
pub type DanglingMembers = v1::store::DanglingMembers;

pub type DynError = Arc<dyn std::error::Error + Send + Sync>;

/// Information required for loading config
#[derive(Debug, Default, Clone)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: String,
}

impl Info {
    /// Build Configuration Info
    ///
    /// The `TORRUST_SWARM_STORE_CONFIG_TOML` variable wins over the file.
    /// The file path is taken from `TORRUST_SWARM_STORE_CONFIG_TOML_PATH`
    /// when set, or from `default_config_toml_path` otherwise.
    #[must_use]
    pub fn new(default_config_toml_path: String) -> Self {
        let config_toml = env::var(ENV_VAR_CONFIG_TOML).ok();

        let config_toml_path = env::var(ENV_VAR_CONFIG_TOML_PATH).unwrap_or(default_config_toml_path);

        Self {
            config_toml,
            config_toml_path,
        }
    }

    /// Configuration info from an in-memory TOML document.
    #[must_use]
    pub fn from_toml(config_toml: &str) -> Self {
        Self {
            config_toml: Some(config_toml.to_owned()),
            config_toml_path: String::new(),
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Unable to merge or extract the configuration sources.
    #[error("Failed processing the configuration: {source}")]
    ConfigError { source: DynError },

    /// The configuration cannot be serialized back to TOML.
    #[error("Failed serializing the configuration: {source}")]
    SerializationError { source: DynError },
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigError { source: Arc::new(err) }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::SerializationError { source: Arc::new(err) }
    }
}
