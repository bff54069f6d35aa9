use std::panic::Location;

use thiserror::Error;

pub const INFO_HASH_BYTES_LEN: usize = 20;

/// `BitTorrent` Info Hash v1
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct InfoHash(pub [u8; INFO_HASH_BYTES_LEN]);

impl std::fmt::Display for InfoHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut chars = [0u8; INFO_HASH_BYTES_LEN * 2];
        binascii::bin2hex(&self.0, &mut chars).map_err(|_| std::fmt::Error)?;
        f.write_str(std::str::from_utf8(&chars).map_err(|_| std::fmt::Error)?)
    }
}

/// Error returned when a string is not a 40 char hex info hash.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid info hash `{value}`, {location}")]
pub struct InfoHashParseError {
    location: &'static Location<'static>,
    value: String,
}

impl std::str::FromStr for InfoHash {
    type Err = InfoHashParseError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut info_hash = Self::default();

        if s.len() != INFO_HASH_BYTES_LEN * 2 || binascii::hex2bin(s.as_bytes(), &mut info_hash.0).is_err() {
            return Err(InfoHashParseError {
                location: Location::caller(),
                value: s.to_owned(),
            });
        }

        Ok(info_hash)
    }
}

impl From<[u8; INFO_HASH_BYTES_LEN]> for InfoHash {
    fn from(bytes: [u8; INFO_HASH_BYTES_LEN]) -> Self {
        Self(bytes)
    }
}
