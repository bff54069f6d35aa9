//! Swarm store errors.
//!
//! This module contains the [Swarm store errors](crate::swarm::error::Error).
//!
//! Errors fall in two kinds, see [`ErrorKind`]:
//!
//! - Connection errors: no connection could be checked out, because dialing
//!   failed, the pool was exhausted or no connection passed the liveness
//!   probe. Nothing was sent.
//! - Storage command errors: a command failed or the connection broke while
//!   running it. Some writes of the same batch may have landed.
//!
//! A missing peer record or peer set member is never an error.
use std::panic::Location;
use std::sync::Arc;

use torrust_tracker_primitives::StoreDriver;

pub type DynError = Arc<dyn std::error::Error + Send + Sync>;

/// The two failure classes callers can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dialing failed, the pool is exhausted or no live connection was found.
    Connection,
    /// A store command failed, returned something unexpected or lost its
    /// connection.
    StorageCommand,
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// Unable to open a new connection to the store.
    #[error("Failed to connect to {driver} store: {source}, {location}")]
    ConnectionFailed {
        source: DynError,
        driver: StoreDriver,
        location: &'static Location<'static>,
    },

    /// The store address in the configuration cannot be turned into a
    /// connection target.
    #[error("Invalid {driver} store address `{address}`: {reason}, {location}")]
    InvalidAddress {
        address: String,
        reason: String,
        driver: StoreDriver,
        location: &'static Location<'static>,
    },

    /// No connection could be handed out before the connection timeout.
    #[error("Failed to get a connection from the {driver} pool: {source}, {location}")]
    ConnectionPool {
        source: Arc<r2d2::Error>,
        driver: StoreDriver,
        location: &'static Location<'static>,
    },

    /// A connection did not answer the liveness probe.
    #[error("The {driver} connection failed the liveness probe: {source}, {location}")]
    LivenessProbeFailed {
        source: DynError,
        driver: StoreDriver,
        location: &'static Location<'static>,
    },

    /// A command failed or its connection broke. Other writes of the batch
    /// may have been applied.
    #[error("The {driver} store command failed: {source}, {location}")]
    CommandFailed {
        source: DynError,
        driver: StoreDriver,
        location: &'static Location<'static>,
    },

    /// A peer record exists but does not hold a peer.
    #[error("Malformed peer record `{key}` in {driver} store: {reason}, {location}")]
    MalformedRecord {
        key: String,
        reason: String,
        driver: StoreDriver,
        location: &'static Location<'static>,
    },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConnectionFailed { .. }
            | Error::InvalidAddress { .. }
            | Error::ConnectionPool { .. }
            | Error::LivenessProbeFailed { .. } => ErrorKind::Connection,
            Error::CommandFailed { .. } | Error::MalformedRecord { .. } => ErrorKind::StorageCommand,
        }
    }

    #[must_use]
    pub fn driver(&self) -> StoreDriver {
        match self {
            Error::ConnectionFailed { driver, .. }
            | Error::InvalidAddress { driver, .. }
            | Error::ConnectionPool { driver, .. }
            | Error::LivenessProbeFailed { driver, .. }
            | Error::CommandFailed { driver, .. }
            | Error::MalformedRecord { driver, .. } => *driver,
        }
    }

    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }

    #[must_use]
    pub fn is_storage_command_error(&self) -> bool {
        self.kind() == ErrorKind::StorageCommand
    }

    #[track_caller]
    pub(crate) fn connection_failed<E>(err: E, driver: StoreDriver) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConnectionFailed {
            source: Arc::new(err),
            driver,
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub(crate) fn command_failed<E>(err: E, driver: StoreDriver) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::CommandFailed {
            source: Arc::new(err),
            driver,
            location: Location::caller(),
        }
    }

    /// Turns a failed command on a pooled connection into a probe failure.
    #[track_caller]
    pub(crate) fn into_liveness_probe_failure(self) -> Self {
        let location = Location::caller();

        match self {
            Error::ConnectionFailed { source, driver, .. } | Error::CommandFailed { source, driver, .. } => {
                Error::LivenessProbeFailed {
                    source,
                    driver,
                    location,
                }
            }
            other => other,
        }
    }
}

impl From<(r2d2::Error, StoreDriver)> for Error {
    #[track_caller]
    fn from(e: (r2d2::Error, StoreDriver)) -> Self {
        let (err, driver) = e;
        Self::ConnectionPool {
            source: Arc::new(err),
            driver,
            location: Location::caller(),
        }
    }
}

impl From<redis::RedisError> for Error {
    /// A failure on an established connection. Dialing errors are built with
    /// [`Error::connection_failed`] instead.
    #[track_caller]
    fn from(err: redis::RedisError) -> Self {
        Self::command_failed(err, StoreDriver::Redis)
    }
}
