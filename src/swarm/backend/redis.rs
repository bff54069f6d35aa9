//! The Redis driver.
//!
//! Peer records are Redis hashes and peer sets are Redis sets:
//!
//! Write                              | Command
//! ---|---
//! [`PutRecord`](Write::PutRecord)       | `HSET key field value [field value ...]`
//! [`ExpireRecord`](Write::ExpireRecord) | `EXPIRE key seconds`
//! [`DeleteRecord`](Write::DeleteRecord) | `DEL key`
//! [`AddMember`](Write::AddMember)       | `SADD set member`
//! [`RemoveMember`](Write::RemoveMember) | `SREM set member`
//!
//! Reads use `SMEMBERS` and one `HGETALL` per record, and the liveness probe
//! is `PING`. Every batch is sent as a pipeline: Redis runs each command
//! even when an earlier one failed. Atomic batches are wrapped in
//! `MULTI`/`EXEC`, so nothing runs unless `EXEC` arrives, but Redis does not
//! roll back a transaction when one of its commands fails (`WRONGTYPE`).
//!
//! Any failure on an established connection, I/O included, is a command
//! error: part of a pipeline may already have been applied.
use std::panic::Location;
use std::time::Duration;

use ::redis::{Commands as _, ConnectionLike as _};
use torrust_tracker_configuration::Store;
use torrust_tracker_primitives::StoreDriver;
use url::Url;

use super::{Connection, Connector, Record, Write, WriteBatch};
use crate::swarm::error::Error;

const DRIVER: StoreDriver = StoreDriver::Redis;

/// Dials Redis connections.
#[derive(Debug, Clone)]
pub struct Redis {
    client: ::redis::Client,
    dial_timeout: Duration,
    command_timeout: Duration,
}

impl Redis {
    /// It instantiates the Redis connector. No connection is opened yet.
    ///
    /// # Errors
    ///
    /// Will return `Error::InvalidAddress` if the address, database or
    /// password cannot be combined into a Redis URL.
    pub fn new(config: &Store) -> Result<Self, Error> {
        let url = connection_url(config)?;

        let client = ::redis::Client::open(url.as_str()).map_err(|err| Error::InvalidAddress {
            address: config.address.clone(),
            reason: err.to_string(),
            driver: DRIVER,
            location: Location::caller(),
        })?;

        Ok(Self {
            client,
            dial_timeout: config.pool.dial_timeout(),
            command_timeout: config.pool.command_timeout(),
        })
    }
}

/// Builds `redis://[:password@]address/database`. The password is
/// percent-encoded.
fn connection_url(config: &Store) -> Result<Url, Error> {
    let invalid = |reason: String| Error::InvalidAddress {
        address: config.address.clone(),
        reason,
        driver: DRIVER,
        location: Location::caller(),
    };

    let mut url = Url::parse(&format!("redis://{}/{}", config.address, config.database)).map_err(|err| invalid(err.to_string()))?;

    if let Some(password) = &config.password {
        url.set_password(Some(password))
            .map_err(|()| invalid("the address cannot carry a password".to_owned()))?;
    }

    Ok(url)
}

impl Connector for Redis {
    type Connection = RedisConnection;

    fn driver(&self) -> StoreDriver {
        DRIVER
    }

    fn dial(&self) -> Result<RedisConnection, Error> {
        let connection = self
            .client
            .get_connection_with_timeout(self.dial_timeout)
            .map_err(|err| Error::connection_failed(err, DRIVER))?;

        connection
            .set_read_timeout(Some(self.command_timeout))
            .and_then(|()| connection.set_write_timeout(Some(self.command_timeout)))
            .map_err(|err| Error::connection_failed(err, DRIVER))?;

        Ok(RedisConnection { connection })
    }
}

pub struct RedisConnection {
    connection: ::redis::Connection,
}

impl Connection for RedisConnection {
    fn ping(&mut self) -> Result<(), Error> {
        let _: String = ::redis::cmd("PING").query(&mut self.connection)?;
        Ok(())
    }

    fn write(&mut self, batch: &WriteBatch) -> Result<(), Error> {
        let mut pipe = ::redis::pipe();

        if batch.is_atomic() {
            pipe.atomic();
        }

        for write in batch {
            match write {
                Write::PutRecord { key, fields } => {
                    pipe.hset_multiple(key.as_str(), fields.as_slice()).ignore();
                }
                Write::ExpireRecord { key, ttl } => {
                    pipe.cmd("EXPIRE").arg(key.as_str()).arg(ttl.as_secs()).ignore();
                }
                Write::DeleteRecord { key } => {
                    pipe.del(key.as_str()).ignore();
                }
                Write::AddMember { set, member } => {
                    pipe.sadd(set.as_str(), member.as_str()).ignore();
                }
                Write::RemoveMember { set, member } => {
                    pipe.srem(set.as_str(), member.as_str()).ignore();
                }
            }
        }

        pipe.query::<()>(&mut self.connection)?;

        Ok(())
    }

    fn members(&mut self, set: &str) -> Result<Vec<String>, Error> {
        let members: Vec<String> = self.connection.smembers(set)?;
        Ok(members)
    }

    fn read_records(&mut self, keys: &[String]) -> Result<Vec<Option<Record>>, Error> {
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let mut pipe = ::redis::pipe();

        for key in keys {
            pipe.hgetall(key.as_str());
        }

        let records: Vec<Record> = pipe.query(&mut self.connection)?;

        // `HGETALL` answers an empty hash for a missing key.
        Ok(records.into_iter().map(|record| (!record.is_empty()).then_some(record)).collect())
    }

    fn is_broken(&self) -> bool {
        !self.connection.is_open()
    }
}
