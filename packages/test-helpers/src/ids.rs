//! Unique identifiers for test fixtures.
//!
//! Each generator is a process-wide counter, so ids never repeat within a
//! test binary even when tests run on parallel threads.
use std::sync::atomic::{AtomicU64, Ordering};

use torrust_tracker_primitives::{TorrentId, UserId};

static NEXT_TORRENT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_USER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_PEER_ID: AtomicU64 = AtomicU64::new(1);

#[must_use]
pub fn torrent_id() -> TorrentId {
    NEXT_TORRENT_ID.fetch_add(1, Ordering::Relaxed)
}

#[must_use]
pub fn user_id() -> UserId {
    NEXT_USER_ID.fetch_add(1, Ordering::Relaxed)
}

/// A peer id in the format clients send, padded to 20 bytes.
#[must_use]
pub fn peer_id() -> String {
    format!("-TP0001-{:012}", NEXT_PEER_ID.fetch_add(1, Ordering::Relaxed))
}
