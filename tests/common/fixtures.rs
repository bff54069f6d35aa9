use torrust_tracker_primitives::peer::fixture::PeerBuilder;
use torrust_tracker_primitives::peer::Peer;
use torrust_tracker_primitives::torrent::PeerMap;
use torrust_tracker_primitives::TorrentId;
use torrust_tracker_test_helpers::ids;

/// A leecher with a peer id and a user never used before.
pub fn a_leecher(torrent_id: TorrentId) -> Peer {
    PeerBuilder::leecher()
        .with_id(&ids::peer_id())
        .with_user_id(ids::user_id())
        .with_torrent_id(torrent_id)
        .build()
}

/// A seeder with a peer id and a user never used before.
pub fn a_seeder(torrent_id: TorrentId) -> Peer {
    PeerBuilder::seeder()
        .with_id(&ids::peer_id())
        .with_user_id(ids::user_id())
        .with_torrent_id(torrent_id)
        .build()
}

pub fn leechers(torrent_id: TorrentId, count: usize) -> PeerMap {
    peer_map((0..count).map(|_| a_leecher(torrent_id)))
}

pub fn peer_map(peers: impl IntoIterator<Item = Peer>) -> PeerMap {
    peers.into_iter().map(|peer| (peer.key(), peer)).collect()
}
