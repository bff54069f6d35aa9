use std::time::Duration;

use rstest::{fixture, rstest};
use torrust_tracker_configuration::Store;
use torrust_tracker_primitives::scope::Scope;
use torrust_tracker_swarm_store::swarm::backend::memory::Memory;
use torrust_tracker_swarm_store::swarm::error::ErrorKind;
use torrust_tracker_swarm_store::swarm::SwarmRepository as _;
use torrust_tracker_test_helpers::{configuration, ids};

use super::harness::{self, Harness};
use super::scenarios;
use crate::common::fixtures::{a_leecher, leechers, peer_map};

#[fixture]
fn ephemeral() -> Store {
    configuration::ephemeral().store
}

#[fixture]
fn atomic() -> Store {
    let mut config = configuration::ephemeral().store;
    config.swarm.atomic_batches = true;
    config
}

#[fixture]
fn repair() -> Store {
    configuration::ephemeral_with_dangling_members_repair().store
}

#[fixture]
fn expiring() -> Store {
    let mut config = configuration::ephemeral().store;
    config.swarm.peer_ttl = 1800;
    config
}

#[rstest]
fn it_should_return_exactly_the_added_peers(#[values(ephemeral(), atomic(), repair(), expiring())] config: Store) {
    scenarios::it_should_return_exactly_the_added_peers(&harness::memory_with(&config).0);
}

#[rstest]
fn it_should_keep_the_latest_attributes_of_a_peer(#[values(ephemeral(), atomic(), expiring())] config: Store) {
    scenarios::it_should_keep_the_latest_attributes_of_a_peer(&harness::memory_with(&config).0);
}

#[rstest]
fn it_should_leave_out_peers_whose_record_is_gone(#[values(ephemeral(), atomic(), repair())] config: Store) {
    scenarios::it_should_leave_out_peers_whose_record_is_gone(&harness::memory_with(&config).0);
}

#[rstest]
fn it_should_allow_removing_the_same_peers_twice(#[values(ephemeral(), atomic())] config: Store) {
    scenarios::it_should_allow_removing_the_same_peers_twice(&harness::memory_with(&config).0);
}

#[rstest]
fn it_should_end_up_with_all_the_peers_added_concurrently(#[values(ephemeral(), atomic())] config: Store) {
    scenarios::it_should_end_up_with_all_the_peers_added_concurrently(&harness::memory_with(&config).0);
}

#[rstest]
fn it_should_follow_a_swarm_that_loses_a_record(#[values(ephemeral(), repair())] config: Store) {
    scenarios::it_should_follow_a_swarm_that_loses_a_record(&harness::memory_with(&config).0);
}

#[rstest]
fn it_should_move_a_leecher_that_completes_to_the_seeders(#[values(ephemeral(), atomic())] config: Store) {
    scenarios::it_should_move_a_leecher_that_completes_to_the_seeders(&harness::memory_with(&config).0);
}

#[rstest]
fn it_should_load_the_swarm_it_saved(#[values(ephemeral(), expiring())] config: Store) {
    scenarios::it_should_load_the_swarm_it_saved(&harness::memory_with(&config).0);
}

#[rstest]
fn a_read_should_remove_dangling_members_when_configured(repair: Store) {
    let (harness, _) = harness::memory_with(&repair);
    let torrent_id = ids::torrent_id();
    let added = leechers(torrent_id, 3);
    let gone = added.keys().next().cloned().expect("there should be peers");

    harness.swarms.add_peers(&added, &Scope::LEECHERS).expect("it should add the peers");
    harness.delete_record_out_of_band(&gone);

    harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers");

    assert_eq!(harness.members(torrent_id, &Scope::LEECHERS).len(), 2);
    assert!(!harness.members(torrent_id, &Scope::LEECHERS).contains(&gone.to_string()));
}

#[rstest]
fn a_read_should_keep_dangling_members_by_default(ephemeral: Store) {
    let (harness, _) = harness::memory_with(&ephemeral);
    let torrent_id = ids::torrent_id();
    let added = leechers(torrent_id, 3);
    let gone = added.keys().next().cloned().expect("there should be peers");

    harness.swarms.add_peers(&added, &Scope::LEECHERS).expect("it should add the peers");
    harness.delete_record_out_of_band(&gone);

    harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers");

    assert_eq!(harness.members(torrent_id, &Scope::LEECHERS).len(), 3);
}

#[rstest]
fn peers_that_stop_announcing_should_age_out(expiring: Store) {
    let (harness, memory) = harness::memory_with(&expiring);
    let torrent_id = ids::torrent_id();
    let (quiet, active) = (a_leecher(torrent_id), a_leecher(torrent_id));

    harness.swarms.announce(&quiet).expect("it should announce");
    harness.swarms.announce(&active).expect("it should announce");

    memory.advance_clock(Duration::from_secs(1000));
    harness.swarms.announce(&active).expect("it should announce again");
    memory.advance_clock(Duration::from_secs(1000));

    let found = harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers");

    assert_eq!(found, peer_map([active]));
}

#[test]
fn a_batch_failing_midway_should_be_safe_to_retry_in_full() {
    let (harness, memory) = harness::memory();
    let torrent_id = ids::torrent_id();
    let added = leechers(torrent_id, 3);

    memory.cut_connections_after(3);

    let error = harness
        .swarms
        .add_peers(&added, &Scope::LEECHERS)
        .expect_err("the batch should fail");

    assert_eq!(error.kind(), ErrorKind::StorageCommand);
    assert!(harness.members(torrent_id, &Scope::LEECHERS).len() < 3);

    memory.heal();

    harness.swarms.add_peers(&added, &Scope::LEECHERS).expect("the retry should succeed");

    assert_eq!(
        harness
            .swarms
            .get_peers(torrent_id, &Scope::LEECHERS)
            .expect("it should get the peers"),
        added
    );
}

#[rstest]
fn an_atomic_batch_cut_in_transit_should_write_nothing(atomic: Store) {
    let (harness, memory) = harness::memory_with(&atomic);
    let torrent_id = ids::torrent_id();

    memory.cut_connections_after(3);

    assert!(harness.swarms.add_peers(&leechers(torrent_id, 3), &Scope::LEECHERS).is_err());

    memory.heal();

    assert!(harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers")
        .is_empty());
}

#[rstest]
fn a_rejected_write_should_not_undo_the_rest_of_the_batch(#[values(ephemeral(), atomic())] config: Store) {
    let (harness, memory) = harness::memory_with(&config);
    let torrent_id = ids::torrent_id();
    let (rejected, written) = (a_leecher(torrent_id), a_leecher(torrent_id));

    memory.reject_writes_to(&harness.swarms.namespace().peer_record_key(&rejected.key()));

    let error = harness
        .swarms
        .add_peers(&peer_map([rejected.clone(), written.clone()]), &Scope::LEECHERS)
        .expect_err("the batch should fail");

    assert_eq!(error.kind(), ErrorKind::StorageCommand);
    assert_eq!(harness.members(torrent_id, &Scope::LEECHERS).len(), 2);
    assert_eq!(
        harness
            .swarms
            .get_peers(torrent_id, &Scope::LEECHERS)
            .expect("it should get the peers"),
        peer_map([written])
    );
}

#[test]
fn operations_should_keep_working_after_the_store_drops_every_connection() {
    let (harness, memory) = harness::memory();
    let torrent_id = ids::torrent_id();
    let added = leechers(torrent_id, 2);

    harness.swarms.add_peers(&added, &Scope::LEECHERS).expect("it should add the peers");
    let dials = memory.dials();

    memory.kill_connections();

    let found = harness
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("a dead idle connection should be replaced");

    assert_eq!(found, added);
    assert!(memory.dials() > dials);
}

#[test]
fn every_operation_should_fail_with_a_connection_error_while_the_store_is_unreachable() {
    let (harness, memory) = harness::memory();
    let torrent_id = ids::torrent_id();
    let some = leechers(torrent_id, 1);

    memory.set_unavailable(true);

    let errors = [
        harness.swarms.add_peers(&some, &Scope::LEECHERS).err(),
        harness.swarms.get_peers(torrent_id, &Scope::LEECHERS).err(),
        harness.swarms.remove_peers(torrent_id, &some, &Scope::LEECHERS).err(),
        harness.swarms.announce(&a_leecher(torrent_id)).err(),
    ];

    for error in errors {
        assert_eq!(error.expect("the operation should fail").kind(), ErrorKind::Connection);
    }

    memory.set_unavailable(false);

    assert!(harness.swarms.add_peers(&some, &Scope::LEECHERS).is_ok());
}

#[test]
fn stores_with_different_prefixes_should_not_see_each_others_peers() {
    let memory = Memory::new();
    let a = Harness::new(&configuration::ephemeral().store, memory.clone());
    let b = Harness::new(&configuration::ephemeral().store, memory);
    let torrent_id = ids::torrent_id();

    a.swarms
        .add_peers(&leechers(torrent_id, 2), &Scope::LEECHERS)
        .expect("it should add the peers");

    assert!(b
        .swarms
        .get_peers(torrent_id, &Scope::LEECHERS)
        .expect("it should get the peers")
        .is_empty());
}
