use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use torrust_tracker_primitives::info_hash::InfoHash;

/// Returns a random alphanumeric string of a certain size.
#[must_use]
pub fn string(size: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(size).map(char::from).collect()
}

#[must_use]
pub fn info_hash() -> InfoHash {
    InfoHash(thread_rng().gen())
}
