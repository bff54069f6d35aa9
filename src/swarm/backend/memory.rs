//! An in-process store.
//!
//! It behaves like the Redis driver as far as the swarm store can tell:
//! records are field maps, sets are unordered, writing a record merges its
//! fields and keeps its expiry, and removing something that does not exist is
//! not an error.
//!
//! All the connections dialed from the same [`Memory`] connector share the
//! same data. The connector also lets tests break the store:
//!
//! - [`Memory::kill_connections`] closes every connection dialed so far.
//! - [`Memory::set_unavailable`] refuses new connections and commands.
//! - [`Memory::cut_connections_after`] lets a number of writes reach the
//!   store and closes the connection sending the next ones, like a network
//!   failure in the middle of a pipeline.
//! - [`Memory::reject_writes_to`] makes the store refuse the writes to a key,
//!   like Redis answering `WRONGTYPE`.
//!
//! Failures follow Redis: a rejected write does not stop the rest of the
//! batch, even an atomic one, and an atomic batch cut in transit is not
//! applied at all because `EXEC` never arrived.
//!
//! Time can be moved forward with [`Memory::advance_clock`] to expire
//! records without waiting.
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use torrust_tracker_primitives::StoreDriver;

use super::{Connection, Connector, Record, Write, WriteBatch};
use crate::swarm::error::Error;

const DRIVER: StoreDriver = StoreDriver::Memory;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    #[error("the memory store is unavailable")]
    Unavailable,
    #[error("the connection was closed")]
    Closed,
    #[error("the connection was cut while sending a batch")]
    Cut,
    #[error("the store rejected a write")]
    WriteRejected,
}

#[derive(Debug)]
struct Entry {
    record: Record,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct State {
    records: HashMap<String, Entry>,
    sets: HashMap<String, BTreeSet<String>>,
    clock_offset: Duration,
    generation: u64,
    unavailable: bool,
    writes_left: Option<usize>,
    rejected_keys: HashSet<String>,
    dials: usize,
}

impl State {
    fn now(&self) -> Instant {
        Instant::now() + self.clock_offset
    }

    fn live_record(&mut self, key: &str) -> Option<&mut Entry> {
        let now = self.now();

        if self
            .records
            .get(key)
            .is_some_and(|entry| entry.expires_at.is_some_and(|deadline| deadline <= now))
        {
            self.records.remove(key);
        }

        self.records.get_mut(key)
    }

    /// Applies the writes of the batch that reach the store.
    fn transmit(&mut self, batch: &WriteBatch) -> Result<(), Fault> {
        let sent = match self.writes_left {
            Some(left) if left < batch.len() => {
                self.writes_left = Some(0);
                left
            }
            Some(left) => {
                self.writes_left = Some(left - batch.len());
                batch.len()
            }
            None => batch.len(),
        };

        let cut = sent < batch.len();

        if cut && batch.is_atomic() {
            return Err(Fault::Cut);
        }

        let mut rejected = false;

        for write in batch.iter().take(sent) {
            if self.rejected_keys.contains(target(write)) {
                rejected = true;
            } else {
                self.apply(write);
            }
        }

        if cut {
            Err(Fault::Cut)
        } else if rejected {
            Err(Fault::WriteRejected)
        } else {
            Ok(())
        }
    }

    fn apply(&mut self, write: &Write) {
        match write {
            Write::PutRecord { key, fields } => {
                let fields = fields.iter().cloned();

                if let Some(entry) = self.live_record(key) {
                    entry.record.extend(fields);
                } else {
                    self.records.insert(
                        key.clone(),
                        Entry {
                            record: fields.collect(),
                            expires_at: None,
                        },
                    );
                }
            }
            Write::ExpireRecord { key, ttl } => {
                let deadline = self.now() + *ttl;

                if let Some(entry) = self.live_record(key) {
                    entry.expires_at = Some(deadline);
                }
            }
            Write::DeleteRecord { key } => {
                self.records.remove(key);
            }
            Write::AddMember { set, member } => {
                self.sets.entry(set.clone()).or_default().insert(member.clone());
            }
            Write::RemoveMember { set, member } => {
                if let Some(members) = self.sets.get_mut(set) {
                    members.remove(member);

                    if members.is_empty() {
                        self.sets.remove(set);
                    }
                }
            }
        }
    }
}

/// The key a write changes.
fn target(write: &Write) -> &str {
    match write {
        Write::PutRecord { key, .. } | Write::ExpireRecord { key, .. } | Write::DeleteRecord { key } => key,
        Write::AddMember { set, .. } | Write::RemoveMember { set, .. } => set,
    }
}

/// The in-process store and the connector to it.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    state: Arc<Mutex<State>>,
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes every connection dialed so far. The next command they run fails.
    pub fn kill_connections(&self) {
        self.state.lock().generation += 1;
    }

    /// While unavailable, dialing fails with a connection error and every
    /// command fails.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    /// Lets `writes` more writes reach the store. A connection sending more
    /// is closed in the middle of its batch, until [`Memory::heal`] is called.
    /// The writes sent before the cut stay applied unless the batch is atomic.
    pub fn cut_connections_after(&self, writes: usize) {
        self.state.lock().writes_left = Some(writes);
    }

    /// Rejects every write to `key` until [`Memory::heal`] is called. The
    /// other writes of the same batch are still applied.
    pub fn reject_writes_to(&self, key: &str) {
        self.state.lock().rejected_keys.insert(key.to_owned());
    }

    /// Removes every injected fault. Killed connections stay closed.
    pub fn heal(&self) {
        let mut state = self.state.lock();
        state.unavailable = false;
        state.writes_left = None;
        state.rejected_keys.clear();
    }

    /// Moves the store clock forward.
    pub fn advance_clock(&self, by: Duration) {
        self.state.lock().clock_offset += by;
    }

    /// How many connections have been dialed.
    #[must_use]
    pub fn dials(&self) -> usize {
        self.state.lock().dials
    }

    /// Reads a record without going through a connection.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<Record> {
        self.state.lock().live_record(key).map(|entry| entry.record.clone())
    }

    /// Whether the record has an expiry.
    #[must_use]
    pub fn expires(&self, key: &str) -> bool {
        self.state
            .lock()
            .live_record(key)
            .is_some_and(|entry| entry.expires_at.is_some())
    }

    /// Reads the members of a set without going through a connection.
    #[must_use]
    pub fn set_members(&self, set: &str) -> BTreeSet<String> {
        self.state.lock().sets.get(set).cloned().unwrap_or_default()
    }

    /// Replaces a record without going through a connection.
    pub fn insert_record(&self, key: &str, record: Record) {
        self.state.lock().records.insert(
            key.to_owned(),
            Entry {
                record,
                expires_at: None,
            },
        );
    }

    /// Deletes a record without going through a connection, as if it had
    /// expired.
    pub fn delete_record(&self, key: &str) {
        self.state.lock().records.remove(key);
    }

    /// Adds a set member without going through a connection.
    pub fn insert_member(&self, set: &str, member: &str) {
        self.state
            .lock()
            .sets
            .entry(set.to_owned())
            .or_default()
            .insert(member.to_owned());
    }
}

impl Connector for Memory {
    type Connection = MemoryConnection;

    fn driver(&self) -> StoreDriver {
        DRIVER
    }

    fn dial(&self) -> Result<MemoryConnection, Error> {
        let mut state = self.state.lock();

        if state.unavailable {
            return Err(Error::connection_failed(Fault::Unavailable, DRIVER));
        }

        state.dials += 1;

        Ok(MemoryConnection {
            state: self.state.clone(),
            generation: state.generation,
            closed: false,
        })
    }
}

pub struct MemoryConnection {
    state: Arc<Mutex<State>>,
    generation: u64,
    closed: bool,
}

impl MemoryConnection {
    /// Runs `command` on the shared state if the connection is still usable.
    fn run<T>(&mut self, command: impl FnOnce(&mut State) -> Result<T, Error>) -> Result<T, Error> {
        let mut state = self.state.lock();

        if self.closed || state.generation != self.generation {
            self.closed = true;
            return Err(Error::command_failed(Fault::Closed, DRIVER));
        }

        if state.unavailable {
            return Err(Error::command_failed(Fault::Unavailable, DRIVER));
        }

        command(&mut state)
    }
}

impl Connection for MemoryConnection {
    fn ping(&mut self) -> Result<(), Error> {
        self.run(|_| Ok(()))
    }

    fn write(&mut self, batch: &WriteBatch) -> Result<(), Error> {
        let outcome = self.run(|state| Ok(state.transmit(batch)))?;

        if outcome == Err(Fault::Cut) {
            self.closed = true;
        }

        outcome.map_err(|fault| Error::command_failed(fault, DRIVER))
    }

    fn members(&mut self, set: &str) -> Result<Vec<String>, Error> {
        self.run(|state| Ok(state.sets.get(set).map(|members| members.iter().cloned().collect()).unwrap_or_default()))
    }

    fn read_records(&mut self, keys: &[String]) -> Result<Vec<Option<Record>>, Error> {
        self.run(|state| {
            Ok(keys
                .iter()
                .map(|key| state.live_record(key).map(|entry| entry.record.clone()))
                .collect())
        })
    }

    fn is_broken(&self) -> bool {
        self.closed
    }
}
