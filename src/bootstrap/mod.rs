//! Swarm store bootstrapping.
//!
//! The store itself is built with [`swarm::build`](crate::swarm::build). This
//! module only contains what a host process sets up once, before using it.
pub mod logging;
