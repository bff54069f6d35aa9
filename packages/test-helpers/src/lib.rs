//! Testing helpers for the Torrust Tracker swarm store.
//!
//! A collection of functions to help with testing the swarm store and its
//! packages.
pub mod configuration;
pub mod ids;
pub mod random;
