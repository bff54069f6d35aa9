//! Scope tags partition the peer collections of a torrent.
//!
//! A tracker keeps one collection per torrent for seeders and one for
//! leechers. The tag is part of the key naming the collection in the store:
//! the torrent id is appended to it. So that no two `(tag, torrent id)` pairs
//! name the same key, a tag:
//!
//! - Is not empty.
//! - Does not end with a digit. `seed` + `42` and `seed4` + `2` would both
//!   be `seed42`.
//! - Does not start with [`RESERVED_PREFIX`], the tag of peer record keys.
use std::borrow::Cow;
use std::panic::Location;
use std::str::FromStr;

use thiserror::Error;

use crate::peer::Peer;

/// Keys starting with this tag hold peer records.
pub const RESERVED_PREFIX: &str = "peer:";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scope(Cow<'static, str>);

/// Error returned when a tag cannot be used as a [`Scope`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("empty scope tag, {location}")]
    Empty { location: &'static Location<'static> },
    #[error("scope tag `{tag}` ends with a digit, {location}")]
    EndsWithDigit {
        location: &'static Location<'static>,
        tag: String,
    },
    #[error("scope tag `{tag}` starts with the reserved `{RESERVED_PREFIX}`, {location}")]
    Reserved {
        location: &'static Location<'static>,
        tag: String,
    },
}

impl Scope {
    /// Peers with nothing left to download.
    pub const SEEDERS: Scope = Scope(Cow::Borrowed("seeders:"));

    /// Peers still downloading.
    pub const LEECHERS: Scope = Scope(Cow::Borrowed("leechers:"));

    /// # Errors
    ///
    /// Will return a [`ScopeError`] if the tag is empty, ends with a digit or
    /// starts with [`RESERVED_PREFIX`].
    #[track_caller]
    pub fn new(tag: impl Into<String>) -> Result<Self, ScopeError> {
        let location = Location::caller();
        let tag = tag.into();

        match tag.chars().last() {
            None => Err(ScopeError::Empty { location }),
            Some(last) if last.is_ascii_digit() => Err(ScopeError::EndsWithDigit { location, tag }),
            Some(_) if tag.starts_with(RESERVED_PREFIX) => Err(ScopeError::Reserved { location, tag }),
            Some(_) => Ok(Self(Cow::Owned(tag))),
        }
    }

    /// The scope a peer belongs to according to the bytes it has left.
    #[must_use]
    pub fn for_peer(peer: &Peer) -> Self {
        if peer.is_seeder() {
            Self::SEEDERS
        } else {
            Self::LEECHERS
        }
    }

    /// The other well-known scope, if this is one of them.
    #[must_use]
    pub fn opposite(&self) -> Option<Self> {
        if *self == Self::SEEDERS {
            Some(Self::LEECHERS)
        } else if *self == Self::LEECHERS {
            Some(Self::SEEDERS)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Scope {
    type Err = ScopeError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
