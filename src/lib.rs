//! **Torrust Tracker Swarm Store** keeps the swarms of a
//! [Torrust Tracker](https://github.com/torrust/torrust-tracker) in a shared
//! key-value store, so that several tracker instances can serve the same
//! torrents.
//!
//! A swarm is the set of peers announcing a torrent. For every torrent the
//! store keeps a set of seeders, a set of leechers and one record per peer.
//! Request handlers call the [`SwarmRepository`](crate::swarm::SwarmRepository)
//! operations:
//!
//! ```rust,no_run
//! use torrust_tracker_configuration::{Configuration, Info};
//! use torrust_tracker_primitives::peer::fixture::PeerBuilder;
//! use torrust_tracker_primitives::scope::Scope;
//! use torrust_tracker_swarm_store::{bootstrap, swarm};
//!
//! let configuration = Configuration::load(&Info::new("./share/default/config/swarm-store.toml".to_owned()))
//!     .expect("the configuration should load");
//!
//! bootstrap::logging::setup(&configuration);
//!
//! let swarms = swarm::build(&configuration.store).expect("the store address should be valid");
//!
//! let peer = PeerBuilder::leecher().with_torrent_id(42).build();
//!
//! swarms.announce(&peer).expect("the store should be reachable");
//!
//! let leechers = swarms.get_peers(42, &Scope::LEECHERS).expect("the store should be reachable");
//! ```
//!
//! The production driver is Redis. An in-memory driver is available for
//! development and tests.
//!
//! Refer to the [`swarm`] module for the storage layout and the consistency
//! guarantees, and to the
//! [configuration crate](https://docs.rs/torrust-tracker-configuration) for
//! the available options.
pub mod bootstrap;
pub mod swarm;
