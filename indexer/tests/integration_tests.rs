//! Integration tests exercising the full ingestion pipeline:
//! creation event → info read → vote power read → status and public view.
//!
//! The ingester runs against the nullable store and a controlled clock, so
//! every status is checked at a time the test chose.

use govwatch_governance::{
    LifecycleStatus, ProposalCreatedEvent, ProposalInfoRead, ProposalKey, VotePowerRead,
    VoterPower, VotingStatus,
};
use govwatch_indexer::{ChainEvent, IndexerConfig, IngestOutcome, IngestReport, ProposalIngester};
use govwatch_nullables::{NullClock, NullProposalStore};
use govwatch_store::ProposalStore;
use govwatch_types::{ChainId, ProposalId, Timestamp, VotePower};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ACCEPT_CONTRACT: &str = "0xc000000000000000000000000000000000000001";
const REJECT_CONTRACT: &str = "0xc000000000000000000000000000000000000002";

fn config() -> IndexerConfig {
    IndexerConfig::from_toml_str(&format!(
        r#"
        chain_id = 14
        refresh_grace_secs = 50

        [[contracts]]
        address = "{ACCEPT_CONTRACT}"
        polling_type = "accept"

        [[contracts]]
        address = "{REJECT_CONTRACT}"
        polling_type = "reject"
    "#
    ))
    .expect("valid config")
}

fn ingester() -> ProposalIngester<NullProposalStore> {
    ProposalIngester::new(&config(), NullProposalStore::new()).expect("ingester")
}

/// A `ProposalCreated` event as the chain client delivers it: mixed numeric
/// and string encodings, thresholds 20% / 50%, voting window [100, 200).
fn created_json(contract: &str, proposal_id: &str) -> String {
    format!(
        r#"{{
            "address": "{contract}",
            "blockNumber": 5000,
            "returnValues": {{
                "proposalId": "{proposal_id}",
                "proposer": "0xb000000000000000000000000000000000000002",
                "targets": ["0x1000000000000000000000000000000000000003"],
                "values": [0],
                "signatures": ["setFee(uint256)"],
                "calldatas": ["0x69fe0e2d"],
                "startTime": "100",
                "endTime": 200,
                "description": "Lower the fee",
                "votePowerBlock": "4990",
                "wrappingThreshold": 3000,
                "absoluteThreshold": "2000",
                "relativeThreshold": "5000"
            }}
        }}"#
    )
}

fn created(contract: &str, proposal_id: &str) -> ChainEvent {
    ChainEvent::ProposalCreated {
        event: ProposalCreatedEvent::from_json(&created_json(contract, proposal_id))
            .expect("valid event json"),
        vote_power_block_ts: Timestamp::new(90),
    }
}

fn key(contract: &str, proposal_id: &str) -> ProposalKey {
    ProposalKey::new(
        ChainId::new(14),
        contract.parse().expect("address"),
        proposal_id.parse::<ProposalId>().expect("proposal id"),
    )
}

fn info(key: ProposalKey, json: &str) -> ChainEvent {
    ChainEvent::ProposalInfo {
        key,
        read: ProposalInfoRead::from_json(json).expect("valid info json"),
    }
}

fn vote_power(key: ProposalKey, total: u64, for_votes: u64, against: u64) -> ChainEvent {
    ChainEvent::VotePower {
        key,
        read: VotePowerRead::from_json(&format!(
            r#"{{"_totalVP": "{total}", "_for": "{for_votes:#x}", "_against": {against}, "_abstain": "0"}}"#
        ))
        .expect("valid vote power json"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn full_lifecycle_of_an_executable_accept_proposal() {
    let ingester = ingester();
    let clock = NullClock::new(50);
    let key = key(ACCEPT_CONTRACT, "7");

    assert_eq!(
        ingester.process(&created(ACCEPT_CONTRACT, "7")),
        IngestOutcome::Created
    );
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Pending);

    // Voting opens; the first reads arrive.
    clock.set(150);
    let report = ingester.process_batch(&[
        info(
            key,
            r#"{"_proposer": "0xb000000000000000000000000000000000000002",
                "_votePowerBlock": "4990", "_voteStartTime": 100, "_voteEndTime": 200,
                "_execStartTime": 300, "_execEndTime": 400,
                "_executableOnChain": true, "_executed": false}"#,
        ),
        vote_power(key, 1_000, 250, 100),
    ]);
    assert_eq!(
        report,
        IngestReport {
            info_applied: 1,
            vote_power_applied: 1,
            ..IngestReport::default()
        }
    );

    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.exec_start_time(), Timestamp::new(300));
    assert!(record.executable_on_chain());
    assert_eq!(record.voting_status(clock.now()), VotingStatus::Active);
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Active);

    // Voting closed: quorum 200 met by 250, and 250 > 100.
    clock.set(250);
    assert_eq!(record.voting_status(clock.now()), VotingStatus::Succeeded);
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Succeeded);
    assert!(!record.is_execution_eligible(clock.now()));

    clock.set(300);
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Queued);
    assert!(record.is_execution_eligible(clock.now()));
    assert_eq!(ingester.proposals_to_refresh(clock.now()).unwrap(), vec![key]);

    // The proposal is executed on chain; a later read reports it.
    ingester.process(&info(key, r#"{"_executed": true}"#));
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Executed);
    assert!(!record.is_execution_eligible(clock.now()));
    // The sparse read did not clear what was already known.
    assert_eq!(record.exec_end_time(), Timestamp::new(400));
    assert!(record.executable_on_chain());
    assert!(ingester.proposals_to_refresh(clock.now()).unwrap().is_empty());
}

#[test]
fn missed_execution_window_expires() {
    let ingester = ingester();
    let clock = NullClock::new(0);
    let key = key(ACCEPT_CONTRACT, "8");
    ingester.process_batch(&[
        created(ACCEPT_CONTRACT, "8"),
        info(
            key,
            r#"{"_execStartTime": 300, "_execEndTime": 400, "_executableOnChain": true}"#,
        ),
        vote_power(key, 1_000, 600, 0),
    ]);

    clock.advance(399);
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Queued);
    clock.advance(1);
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Expired);
    // A late `_executed` read may still arrive during the grace period.
    assert_eq!(ingester.proposals_to_refresh(clock.now()).unwrap(), vec![key]);
    clock.advance(50);
    assert!(ingester.proposals_to_refresh(clock.now()).unwrap().is_empty());
}

#[test]
fn final_vote_power_read_after_close_is_still_scheduled() {
    let ingester = ingester();
    let clock = NullClock::new(0);
    let key = key(ACCEPT_CONTRACT, "9");
    ingester.process(&created(ACCEPT_CONTRACT, "9"));

    // Voting closed before any vote power read landed: the stored tally is
    // empty, so the record looks Defeated.
    clock.set(200);
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Defeated);
    assert_eq!(ingester.proposals_to_refresh(clock.now()).unwrap(), vec![key]);

    assert_eq!(
        ingester.process(&vote_power(key, 1_000, 600, 0)),
        IngestOutcome::VotePowerApplied
    );
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Queued);

    clock.set(250);
    assert!(ingester.proposals_to_refresh(clock.now()).unwrap().is_empty());
}

#[test]
fn execution_at_the_end_of_the_window_is_still_observed() {
    let ingester = ingester();
    let clock = NullClock::new(0);
    let key = key(ACCEPT_CONTRACT, "10");
    ingester.process_batch(&[
        created(ACCEPT_CONTRACT, "10"),
        info(
            key,
            r#"{"_execStartTime": 300, "_execEndTime": 400, "_executableOnChain": true}"#,
        ),
        vote_power(key, 1_000, 600, 0),
    ]);

    // Executed on chain at 399; the indexer only reads it after the window.
    clock.set(400);
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Expired);
    assert_eq!(ingester.proposals_to_refresh(clock.now()).unwrap(), vec![key]);

    ingester.process(&info(key, r#"{"_executed": true}"#));
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.lifecycle_status(clock.now()), LifecycleStatus::Executed);
    assert!(ingester.proposals_to_refresh(clock.now()).unwrap().is_empty());
}

#[test]
fn reject_proposal_without_opposition_is_queued() {
    let ingester = ingester();
    let key = key(REJECT_CONTRACT, "1");
    ingester.process_batch(&[
        created(REJECT_CONTRACT, "1"),
        vote_power(key, 1_000, 0, 150),
    ]);
    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    let after = Timestamp::new(200);
    // 150 against misses the 200 quorum, so the rejection fails.
    assert_eq!(record.voting_status(after), VotingStatus::Succeeded);
    assert_eq!(record.lifecycle_status(after), LifecycleStatus::Queued);
    assert!(!record.is_execution_eligible(after));
}

#[test]
fn malformed_events_are_skipped_without_stopping_the_batch() {
    let ingester = ingester();
    let good = key(ACCEPT_CONTRACT, "1");
    let mut bad_event = ProposalCreatedEvent::from_json(&created_json(ACCEPT_CONTRACT, "2"))
        .expect("valid event json");
    bad_event.return_values.end_time = Some("soon".into());

    let report = ingester.process_batch(&[
        created(ACCEPT_CONTRACT, "1"),
        ChainEvent::ProposalCreated {
            event: bad_event,
            vote_power_block_ts: Timestamp::new(90),
        },
        info(good, r#"{"_voteStartTime": "not a number"}"#),
        ChainEvent::VotePower {
            key: good,
            read: VotePowerRead::from_json(r#"{"_totalVP": "0xzz", "_for": 1, "_against": 0, "_abstain": 0}"#)
                .expect("valid vote power json"),
        },
        vote_power(good, 1_000, 300, 0),
    ]);

    assert_eq!(
        report,
        IngestReport {
            created: 1,
            vote_power_applied: 1,
            skipped: 3,
            ..IngestReport::default()
        }
    );
    assert_eq!(ingester.store().proposal_count().unwrap(), 1);
    let record = ingester.store().get_proposal(&good).unwrap().unwrap();
    // The rejected info read left the creation-time window untouched.
    assert_eq!(record.start_time(), Timestamp::new(100));
    assert_eq!(record.tally().for_votes, VotePower::from(300u64));
    assert_eq!(ingester.stats().get(IngestOutcome::Skipped), 3);
}

#[test]
fn reads_for_unknown_proposals_are_skipped() {
    let ingester = ingester();
    let unknown = key(ACCEPT_CONTRACT, "99");
    let report = ingester.process_batch(&[
        info(unknown, r#"{"_executed": true}"#),
        vote_power(unknown, 10, 10, 0),
    ]);
    assert_eq!(report.skipped, 2);
    assert_eq!(ingester.store().proposal_count().unwrap(), 0);
}

#[test]
fn events_from_untracked_contracts_are_skipped() {
    let ingester = ingester();
    let outcome = ingester.process(&created(
        "0xc000000000000000000000000000000000000003",
        "1",
    ));
    assert_eq!(outcome, IngestOutcome::Skipped);
    assert_eq!(ingester.store().proposal_count().unwrap(), 0);
}

#[test]
fn replayed_creation_keeps_the_refreshed_record() {
    let ingester = ingester();
    let key = key(ACCEPT_CONTRACT, "3");
    ingester.process_batch(&[
        created(ACCEPT_CONTRACT, "3"),
        info(key, r#"{"_execStartTime": 300, "_execEndTime": 400}"#),
        vote_power(key, 1_000, 500, 0),
    ]);
    assert_eq!(
        ingester.process(&created(ACCEPT_CONTRACT, "3")),
        IngestOutcome::Duplicate
    );

    let record = ingester.store().get_proposal(&key).unwrap().unwrap();
    assert_eq!(record.exec_end_time(), Timestamp::new(400));
    assert_eq!(record.tally().total_vote_power, VotePower::from(1_000u64));
    assert_eq!(ingester.stats().get(IngestOutcome::Duplicate), 1);
}

#[test]
fn same_id_on_two_contracts_are_distinct_proposals() {
    let ingester = ingester();
    let report = ingester.process_batch(&[
        created(ACCEPT_CONTRACT, "5"),
        created(REJECT_CONTRACT, "5"),
    ]);
    assert_eq!(report.created, 2);
    let mut keys = ingester.proposals_to_refresh(Timestamp::new(0)).unwrap();
    keys.sort();
    let mut expected = vec![key(ACCEPT_CONTRACT, "5"), key(REJECT_CONTRACT, "5")];
    expected.sort();
    assert_eq!(keys, expected);
}

#[test]
fn public_view_reflects_stored_state_and_voter() {
    let ingester = ingester();
    let proposal = key(ACCEPT_CONTRACT, "0x2a");
    ingester.process_batch(&[
        created(ACCEPT_CONTRACT, "42"),
        vote_power(proposal, 1_000, 100, 0),
    ]);

    let voter = VoterPower {
        address: "0xa000000000000000000000000000000000000009".parse().unwrap(),
        vote_power: VotePower::from(40u64),
    };
    let view = ingester
        .public_view(&proposal, Timestamp::new(250), Some(voter))
        .unwrap();
    assert_eq!(view.status, VotingStatus::Defeated);
    assert_eq!(view.description, "Lower the fee");
    assert_eq!(view.values.len(), 1);
    assert_eq!(view.vote_power_block.block_number, 4_990);
    assert_eq!(view.vote_power_block.block_ts, Timestamp::new(90));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["for"], "0x64");
    assert_eq!(json["voterVotePower"], "0x28");
    assert_eq!(json["pollingType"], "accept");

    assert!(ingester
        .public_view(&key(REJECT_CONTRACT, "42"), Timestamp::new(0), None)
        .is_err());
}
