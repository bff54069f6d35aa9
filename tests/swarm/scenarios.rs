//! Behaviour every driver has to show. Each scenario uses torrents no other
//! test uses.
use std::thread;

use torrust_tracker_primitives::scope::Scope;
use torrust_tracker_primitives::torrent::{PeerMap, Torrent};
use torrust_tracker_swarm_store::swarm::backend::Connector;
use torrust_tracker_swarm_store::swarm::SwarmRepository as _;
use torrust_tracker_test_helpers::{ids, random};

use super::harness::Harness;
use crate::common::fixtures::{a_leecher, a_seeder, leechers, peer_map};

pub fn it_should_return_exactly_the_added_peers<C: Connector + Clone>(harness: &Harness<C>) {
    let torrent_id = ids::torrent_id();
    let added = leechers(torrent_id, 5);

    harness.swarms.add_peers(&added, &Scope::LEECHERS).expect("it should add the peers");

    let found = harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers");

    assert_eq!(found, added);
}

pub fn it_should_keep_the_latest_attributes_of_a_peer<C: Connector + Clone>(harness: &Harness<C>) {
    let torrent_id = ids::torrent_id();
    let first = a_leecher(torrent_id);
    let mut latest = first.clone();
    latest.uploaded += 16_384;
    latest.left = 1_024;
    latest.last_announce += 1800;

    harness.swarms.announce(&first).expect("it should announce the peer");
    harness.swarms.announce(&latest).expect("it should announce the peer again");

    let found = harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers");

    assert_eq!(found, peer_map([latest]));
}

pub fn it_should_leave_out_peers_whose_record_is_gone<C: Connector + Clone>(harness: &Harness<C>) {
    let torrent_id = ids::torrent_id();
    let added = leechers(torrent_id, 4);
    let gone = added.keys().next().cloned().expect("there should be peers");

    harness.swarms.add_peers(&added, &Scope::LEECHERS).expect("it should add the peers");
    harness.delete_record_out_of_band(&gone);

    let found = harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("a missing record should not be an error");

    assert_eq!(found.len(), 3);
    assert!(!found.contains_key(&gone));
}

pub fn it_should_allow_removing_the_same_peers_twice<C: Connector + Clone>(harness: &Harness<C>) {
    let torrent_id = ids::torrent_id();
    let added = leechers(torrent_id, 2);

    harness.swarms.add_peers(&added, &Scope::LEECHERS).expect("it should add the peers");

    harness
        .swarms
        .remove_peers(torrent_id, &added, &Scope::LEECHERS)
        .expect("it should remove the peers");
    harness
        .swarms
        .remove_peers(torrent_id, &added, &Scope::LEECHERS)
        .expect("removing peers already gone should not be an error");

    assert!(harness.members(torrent_id, &Scope::LEECHERS).is_empty());
    assert!(harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers")
        .is_empty());
}

pub fn it_should_end_up_with_all_the_peers_added_concurrently<C: Connector + Clone>(harness: &Harness<C>) {
    let torrent_id = ids::torrent_id();
    let batches: Vec<PeerMap> = (0..4).map(|_| leechers(torrent_id, 10)).collect();

    thread::scope(|s| {
        for batch in &batches {
            s.spawn(move || {
                harness
                    .swarms
                    .add_peers(batch, &Scope::LEECHERS)
                    .expect("it should add the peers");
            });
        }
    });

    let union: PeerMap = batches.into_iter().flatten().collect();

    let found = harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers");

    assert_eq!(found.len(), 40);
    assert_eq!(found, union);
}

/// Three peers seed, a fourth joins and loses its record, then all of them
/// leave.
pub fn it_should_follow_a_swarm_that_loses_a_record<C: Connector + Clone>(harness: &Harness<C>) {
    let torrent_id = ids::torrent_id();
    let scope = Scope::new("seed").expect("`seed` should be a valid scope tag");
    let original = peer_map((0..3).map(|_| a_seeder(torrent_id)));

    harness.swarms.add_peers(&original, &scope).expect("it should add the peers");

    assert_eq!(harness.swarms.get_peers(torrent_id, &scope).expect("it should get the peers").len(), 3);

    let fourth = a_seeder(torrent_id);
    harness
        .swarms
        .add_peers(&peer_map([fourth.clone()]), &scope)
        .expect("it should add the fourth peer");
    harness.delete_record_out_of_band(&fourth.key());

    assert_eq!(harness.swarms.get_peers(torrent_id, &scope).expect("it should get the peers").len(), 3);

    let mut everyone = original;
    everyone.insert(fourth.key(), fourth);

    harness
        .swarms
        .remove_peers(torrent_id, &everyone, &scope)
        .expect("it should remove every peer, gone or not");

    assert!(harness
        .swarms
        .get_peers(torrent_id, &scope)
        .expect("it should get the peers")
        .is_empty());
}

pub fn it_should_move_a_leecher_that_completes_to_the_seeders<C: Connector + Clone>(harness: &Harness<C>) {
    let torrent_id = ids::torrent_id();
    let leecher = a_leecher(torrent_id);
    let mut completed = leecher.clone();
    completed.downloaded += completed.left;
    completed.left = 0;

    harness.swarms.announce(&leecher).expect("it should announce the leecher");
    harness.swarms.announce(&completed).expect("it should announce the seeder");

    assert!(harness.members(torrent_id, &Scope::LEECHERS).is_empty());
    assert_eq!(
        harness
            .swarms
            .get_peers(torrent_id, &Scope::SEEDERS)
            .expect("it should get the seeders"),
        peer_map([completed])
    );
}

pub fn it_should_load_the_swarm_it_saved<C: Connector + Clone>(harness: &Harness<C>) {
    let mut torrent = Torrent::new(ids::torrent_id(), random::info_hash());

    for _ in 0..2 {
        torrent.upsert_peer(a_seeder(torrent.id));
    }
    for _ in 0..3 {
        torrent.upsert_peer(a_leecher(torrent.id));
    }

    harness.swarms.save_swarm(&torrent).expect("it should save the swarm");

    let mut loaded = Torrent::new(torrent.id, torrent.info_hash);
    harness.swarms.load_swarm(&mut loaded).expect("it should load the swarm");

    assert_eq!(loaded, torrent);
}
