//! The connection pool.
//!
//! A bounded [`r2d2`] pool of store connections:
//!
//! - Connections are dialed on demand. Building the pool does not dial.
//! - A connection that was sitting idle is probed with the driver liveness
//!   probe before it is handed out. If the probe fails the connection is
//!   closed and another one is taken or dialed, so callers never get a dead
//!   connection.
//! - A connection is used by one operation at a time. It goes back to the
//!   pool when the [`PooledConnection`] guard is dropped or passed to
//!   [`Pool::release`], unless the driver reports it broken.
//! - Idle connections are closed after the configured idle timeout.
//! - `max_idle_connections` bounds every connection of the pool, idle or
//!   checked out. A released connection always fits back in, so it is never
//!   closed for lack of room.
//!
//! Waiting longer than the connection timeout for a connection fails with
//! [`Error::ConnectionPool`].
use std::time::Duration;

use torrust_tracker_configuration::Pool as PoolConfig;
use torrust_tracker_primitives::StoreDriver;

use super::backend::{Connection, Connector};
use super::error::Error;

/// A checked out connection. It derefs to the driver connection.
pub type PooledConnection<C> = r2d2::PooledConnection<ConnectionManager<C>>;

/// Adapts a [`Connector`] to the [`r2d2`] connection manager interface.
pub struct ConnectionManager<C> {
    connector: C,
}

impl<C: Connector> r2d2::ManageConnection for ConnectionManager<C> {
    type Connection = C::Connection;
    type Error = Error;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        self.connector.dial()
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.ping().map_err(|err| err.into_liveness_probe_failure())
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        conn.is_broken()
    }
}

/// Sends the errors r2d2 swallows (failed dials, failed probes) to the log.
#[derive(Debug)]
struct TracingErrorHandler;

impl r2d2::HandleError<Error> for TracingErrorHandler {
    fn handle_error(&self, error: Error) {
        tracing::warn!(driver = %error.driver(), %error, "swarm store connection error");
    }
}

pub struct Pool<C: Connector> {
    inner: r2d2::Pool<ConnectionManager<C>>,
    driver: StoreDriver,
}

impl<C: Connector> Pool<C> {
    /// It builds the pool. No connection is dialed yet.
    ///
    /// A zero `max_idle_connections` or `connection_timeout` is raised to the
    /// smallest usable value. A zero `idle_timeout` keeps idle connections
    /// forever.
    #[must_use]
    pub fn new(config: &PoolConfig, connector: C) -> Self {
        let driver = connector.driver();
        let max_size = config.max_idle_connections.max(1);
        let connection_timeout = config.connection_timeout().max(Duration::from_millis(1));

        let inner = r2d2::Pool::builder()
            .max_size(max_size)
            .min_idle(Some(0))
            .idle_timeout(config.idle_timeout())
            .connection_timeout(connection_timeout)
            .test_on_check_out(true)
            .error_handler(Box::new(TracingErrorHandler))
            .build_unchecked(ConnectionManager { connector });

        tracing::info!(%driver, max_size, ?connection_timeout, idle_timeout = ?config.idle_timeout(), "swarm store pool created");

        Self { inner, driver }
    }

    /// Checks out a live connection.
    ///
    /// # Errors
    ///
    /// Will return `Error::ConnectionPool` if no live connection could be
    /// taken or dialed before the connection timeout.
    pub fn acquire(&self) -> Result<PooledConnection<C>, Error> {
        self.inner.get().map_err(|e| (e, self.driver).into())
    }

    /// Gives a connection back. A broken connection is closed instead.
    pub fn release(&self, connection: PooledConnection<C>) {
        tracing::trace!(driver = %self.driver, "connection released");
        drop(connection);
    }

    /// The number of open connections and how many of them are idle.
    #[must_use]
    pub fn state(&self) -> (u32, u32) {
        let state = self.inner.state();
        (state.connections, state.idle_connections)
    }

    #[must_use]
    pub fn driver(&self) -> StoreDriver {
        self.driver
    }
}
