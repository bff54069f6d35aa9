//! The command surface of the backing key-value store.
//!
//! The swarm store needs very little from the store:
//!
//! - Hash-style write, read and delete of a peer record by key. A write
//!   always carries every field, so it overwrites the whole record.
//! - Set-style add, remove and list of the members of a peer set.
//! - An expiry on peer records.
//! - A cheap liveness probe, used by the [pool](crate::swarm::pool) when it
//!   hands out a connection it had kept idle.
//!
//! A [`Connector`] dials new connections and a [`Connection`] runs commands.
//! Writes are grouped in a [`WriteBatch`] so that a driver can send them in a
//! single round trip.
//!
//! There are two drivers:
//!
//! - [`redis`]: the production driver.
//! - [`memory`]: an in-process store for development and tests.
pub mod memory;
pub mod redis;

use std::collections::BTreeMap;
use std::time::Duration;

use torrust_tracker_primitives::StoreDriver;

use super::error::Error;

/// A peer record as stored: a flat field to value map.
pub type Record = BTreeMap<String, String>;

/// Dials new connections to the store.
pub trait Connector: Send + Sync + 'static {
    type Connection: Connection;

    fn driver(&self) -> StoreDriver;

    /// Opens a new connection.
    ///
    /// # Errors
    ///
    /// Will return a connection [`Error`] if the store cannot be reached
    /// within the dial timeout.
    fn dial(&self) -> Result<Self::Connection, Error>;
}

/// A single connection to the store. It is only used by one operation at a
/// time.
#[cfg_attr(test, mockall::automock)]
pub trait Connection: Send + 'static {
    /// The liveness probe.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the store does not answer.
    fn ping(&mut self) -> Result<(), Error>;

    /// Sends every write of the batch in one round trip. Writes are applied
    /// in order. A write the store rejects does not stop the following ones,
    /// atomic batch or not. If the connection fails midway, the writes that
    /// reached the store stay applied unless the batch is atomic.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a write was rejected or the connection failed.
    /// Some writes of the batch may have been applied anyway.
    fn write(&mut self, batch: &WriteBatch) -> Result<(), Error>;

    /// Lists the members of a set. A missing set has no members.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the command fails or the key does not hold a set.
    fn members(&mut self, set: &str) -> Result<Vec<String>, Error>;

    /// Reads several records in one round trip. The result has one entry per
    /// key, in the same order, `None` for the keys holding no record.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a command fails or a key does not hold a record.
    fn read_records(&mut self, keys: &[String]) -> Result<Vec<Option<Record>>, Error>;

    /// Whether the driver knows the connection cannot be used anymore. It
    /// must not do any I/O.
    fn is_broken(&self) -> bool;
}

/// A single write command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Sets every field of a record.
    PutRecord { key: String, fields: Vec<(String, String)> },
    /// Sets the time to live of a record.
    ExpireRecord { key: String, ttl: Duration },
    /// Deletes a record. Deleting a missing record is not an error.
    DeleteRecord { key: String },
    /// Adds a member to a set, creating the set if needed.
    AddMember { set: String, member: String },
    /// Removes a member from a set. Removing a missing member is not an error.
    RemoveMember { set: String, member: String },
}

/// Writes sent together in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<Write>,
    atomic: bool,
}

impl WriteBatch {
    /// An empty batch. When `atomic` is set the driver sends it as a
    /// transaction: nothing is applied unless the whole batch reaches the
    /// store. A write the store rejects while running the transaction does
    /// not undo the others.
    #[must_use]
    pub fn new(atomic: bool) -> Self {
        Self {
            writes: vec![],
            atomic,
        }
    }

    pub fn put_record(&mut self, key: String, fields: Vec<(String, String)>) -> &mut Self {
        self.writes.push(Write::PutRecord { key, fields });
        self
    }

    pub fn expire_record(&mut self, key: String, ttl: Duration) -> &mut Self {
        self.writes.push(Write::ExpireRecord { key, ttl });
        self
    }

    pub fn delete_record(&mut self, key: String) -> &mut Self {
        self.writes.push(Write::DeleteRecord { key });
        self
    }

    pub fn add_member(&mut self, set: String, member: String) -> &mut Self {
        self.writes.push(Write::AddMember { set, member });
        self
    }

    pub fn remove_member(&mut self, set: String, member: String) -> &mut Self {
        self.writes.push(Write::RemoveMember { set, member });
        self
    }

    #[must_use]
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Write> {
        self.writes.iter()
    }
}

impl<'a> IntoIterator for &'a WriteBatch {
    type Item = &'a Write;
    type IntoIter = std::slice::Iter<'a, Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
