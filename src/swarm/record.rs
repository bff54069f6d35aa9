//! Peer record codec.
//!
//! A [`Peer`] is stored as a flat record with one field per attribute. All
//! values are written in their `Display` form:
//!
//! Field           | Example
//! ---|---
//! `id`            | `-qB00000000000000000`
//! `user_id`       | `7`
//! `torrent_id`    | `42`
//! `ip`            | `126.0.0.1`
//! `port`          | `6889`
//! `uploaded`      | `1024`
//! `downloaded`    | `3000`
//! `left`          | `4200`
//! `last_announce` | `1669397478`
//!
//! Every field is written on every put, so a put replaces the whole record.
//! Extra fields in a stored record are ignored.
use std::panic::Location;
use std::str::FromStr;

use torrust_tracker_primitives::peer::Peer;
use torrust_tracker_primitives::StoreDriver;

use super::backend::Record;
use super::error::Error;

const ID: &str = "id";
const USER_ID: &str = "user_id";
const TORRENT_ID: &str = "torrent_id";
const IP: &str = "ip";
const PORT: &str = "port";
const UPLOADED: &str = "uploaded";
const DOWNLOADED: &str = "downloaded";
const LEFT: &str = "left";
const LAST_ANNOUNCE: &str = "last_announce";

#[must_use]
pub fn encode(peer: &Peer) -> Vec<(String, String)> {
    vec![
        (ID.to_owned(), peer.id.clone()),
        (USER_ID.to_owned(), peer.user_id.to_string()),
        (TORRENT_ID.to_owned(), peer.torrent_id.to_string()),
        (IP.to_owned(), peer.ip.to_string()),
        (PORT.to_owned(), peer.port.to_string()),
        (UPLOADED.to_owned(), peer.uploaded.to_string()),
        (DOWNLOADED.to_owned(), peer.downloaded.to_string()),
        (LEFT.to_owned(), peer.left.to_string()),
        (LAST_ANNOUNCE.to_owned(), peer.last_announce.to_string()),
    ]
}

/// It decodes the record stored under `key`.
///
/// # Errors
///
/// Will return `Error::MalformedRecord` if a field is missing or does not
/// parse.
#[track_caller]
pub fn decode(key: &str, record: &Record, driver: StoreDriver) -> Result<Peer, Error> {
    let location = Location::caller();

    let peer = || -> Result<Peer, String> {
        Ok(Peer {
            id: field::<String>(record, ID)?,
            user_id: field(record, USER_ID)?,
            torrent_id: field(record, TORRENT_ID)?,
            ip: field(record, IP)?,
            port: field(record, PORT)?,
            uploaded: field(record, UPLOADED)?,
            downloaded: field(record, DOWNLOADED)?,
            left: field(record, LEFT)?,
            last_announce: field(record, LAST_ANNOUNCE)?,
        })
    };

    peer().map_err(|reason| Error::MalformedRecord {
        key: key.to_owned(),
        reason,
        driver,
        location,
    })
}

fn field<T: FromStr>(record: &Record, name: &str) -> Result<T, String> {
    let value = record.get(name).ok_or_else(|| format!("missing field `{name}`"))?;

    value
        .parse()
        .map_err(|_| format!("invalid value `{value}` for field `{name}`"))
}
