//! The same scenarios against a real Redis instance.
use super::harness;
use super::scenarios;

#[test]
fn it_should_return_exactly_the_added_peers() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_return_exactly_the_added_peers(&harness);
}

#[test]
fn it_should_keep_the_latest_attributes_of_a_peer() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_keep_the_latest_attributes_of_a_peer(&harness);
}

#[test]
fn it_should_leave_out_peers_whose_record_is_gone() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_leave_out_peers_whose_record_is_gone(&harness);
}

#[test]
fn it_should_allow_removing_the_same_peers_twice() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_allow_removing_the_same_peers_twice(&harness);
}

#[test]
fn it_should_end_up_with_all_the_peers_added_concurrently() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_end_up_with_all_the_peers_added_concurrently(&harness);
}

#[test]
fn it_should_follow_a_swarm_that_loses_a_record() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_follow_a_swarm_that_loses_a_record(&harness);
}

#[test]
fn it_should_move_a_leecher_that_completes_to_the_seeders() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_move_a_leecher_that_completes_to_the_seeders(&harness);
}

#[test]
fn it_should_load_the_swarm_it_saved() {
    let Some(harness) = harness::redis() else { return };
    scenarios::it_should_load_the_swarm_it_saved(&harness);
}
