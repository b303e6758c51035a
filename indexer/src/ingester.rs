//! Proposal ingester. Routes chain events into the proposal store.
//!
//! Every payload is parsed in full before its record is touched, so a
//! malformed read never leaves a record half-updated. Updates go through
//! [`ProposalStore::update_proposal`], which serialises writers per record.

use std::collections::HashMap;

use govwatch_governance::{
    PollingType, ProposalCreatedEvent, ProposalInfo, ProposalInfoRead, ProposalKey,
    ProposalRecord, ProposalView, VotePowerRead, VoteTally, VoterPower,
};
use govwatch_store::{ProposalStore, StoreError};
use govwatch_types::{Address, ChainId, Timestamp};
use govwatch_utils::StatsCounter;

use crate::{IndexerConfig, IndexerError};

/// One unit of work for the ingester.
#[derive(Clone, Debug)]
pub enum ChainEvent {
    /// A `ProposalCreated` log, with the timestamp of its vote power block.
    ProposalCreated {
        event: ProposalCreatedEvent,
        vote_power_block_ts: Timestamp,
    },
    /// A periodic `getProposalInfo` read.
    ProposalInfo {
        key: ProposalKey,
        read: ProposalInfoRead,
    },
    /// A periodic `getProposalVP` read.
    VotePower { key: ProposalKey, read: VotePowerRead },
}

/// What happened to a single event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IngestOutcome {
    Created,
    /// The creation event was already ingested; the stored record was kept.
    Duplicate,
    InfoApplied,
    VotePowerApplied,
    /// The payload was malformed or referred to something unknown.
    Skipped,
    /// The store failed; the event may succeed if retried.
    Failed,
}

impl IngestOutcome {
    const ALL: [IngestOutcome; 6] = [
        Self::Created,
        Self::Duplicate,
        Self::InfoApplied,
        Self::VotePowerApplied,
        Self::Skipped,
        Self::Failed,
    ];
}

/// Per-batch tally of outcomes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub created: u64,
    pub duplicates: u64,
    pub info_applied: u64,
    pub vote_power_applied: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl IngestReport {
    fn record(&mut self, outcome: IngestOutcome) {
        let slot = match outcome {
            IngestOutcome::Created => &mut self.created,
            IngestOutcome::Duplicate => &mut self.duplicates,
            IngestOutcome::InfoApplied => &mut self.info_applied,
            IngestOutcome::VotePowerApplied => &mut self.vote_power_applied,
            IngestOutcome::Skipped => &mut self.skipped,
            IngestOutcome::Failed => &mut self.failed,
        };
        *slot += 1;
    }
}

pub struct ProposalIngester<S> {
    store: S,
    chain_id: ChainId,
    refresh_grace_secs: u64,
    polling_types: HashMap<Address, PollingType>,
    stats: StatsCounter<IngestOutcome>,
}

impl<S: ProposalStore> ProposalIngester<S> {
    pub fn new(config: &IndexerConfig, store: S) -> Result<Self, IndexerError> {
        Ok(Self {
            store,
            chain_id: config.chain_id,
            refresh_grace_secs: config.refresh_grace_secs,
            polling_types: config.polling_types()?,
            stats: StatsCounter::new(&IngestOutcome::ALL),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lifetime outcome counters.
    pub fn stats(&self) -> &StatsCounter<IngestOutcome> {
        &self.stats
    }

    /// Build and store a record from a creation event.
    ///
    /// Replaying a creation event is a no-op: the stored record, including
    /// anything later reads filled in, is kept.
    pub fn on_proposal_created(
        &self,
        event: &ProposalCreatedEvent,
        vote_power_block_ts: Timestamp,
    ) -> Result<IngestOutcome, IndexerError> {
        let contract = event.contract()?;
        let polling_type = *self
            .polling_types
            .get(&contract)
            .ok_or(IndexerError::UnknownContract(contract))?;
        let record = ProposalRecord::from_creation_event(
            event,
            polling_type,
            vote_power_block_ts,
            self.chain_id,
        )?;
        let key = *record.key();

        if self.store.insert_proposal(record)? {
            tracing::info!(proposal = %key, polling = %polling_type, "proposal created");
            Ok(IngestOutcome::Created)
        } else {
            tracing::debug!(proposal = %key, "creation event already ingested");
            Ok(IngestOutcome::Duplicate)
        }
    }

    /// Apply a proposal-info read to an existing record.
    pub fn on_proposal_info(
        &self,
        key: &ProposalKey,
        read: &ProposalInfoRead,
    ) -> Result<ProposalRecord, IndexerError> {
        let info = ProposalInfo::try_from(read)?;
        self.update(key, &mut |record: &mut ProposalRecord| {
            record.apply_proposal_info(&info)
        })
    }

    /// Replace an existing record's tally with a vote-power read.
    pub fn on_vote_power(
        &self,
        key: &ProposalKey,
        read: &VotePowerRead,
    ) -> Result<ProposalRecord, IndexerError> {
        let tally = VoteTally::try_from(read)?;
        self.update(key, &mut |record: &mut ProposalRecord| {
            record.apply_vote_power_data(tally.clone())
        })
    }

    fn update(
        &self,
        key: &ProposalKey,
        apply: &mut dyn FnMut(&mut ProposalRecord),
    ) -> Result<ProposalRecord, IndexerError> {
        match self.store.update_proposal(key, apply) {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(missing)) => Err(IndexerError::UnknownProposal(missing)),
            Err(e) => Err(e.into()),
        }
    }

    /// Handle one event, logging and absorbing any failure.
    pub fn process(&self, event: &ChainEvent) -> IngestOutcome {
        let result = match event {
            ChainEvent::ProposalCreated {
                event,
                vote_power_block_ts,
            } => self.on_proposal_created(event, *vote_power_block_ts),
            ChainEvent::ProposalInfo { key, read } => self
                .on_proposal_info(key, read)
                .map(|_| IngestOutcome::InfoApplied),
            ChainEvent::VotePower { key, read } => self
                .on_vote_power(key, read)
                .map(|_| IngestOutcome::VotePowerApplied),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_skippable() => {
                tracing::warn!(event = event.kind(), error = %e, "skipping event");
                IngestOutcome::Skipped
            }
            Err(e) => {
                tracing::error!(event = event.kind(), error = %e, "failed to ingest event");
                IngestOutcome::Failed
            }
        };
        self.stats.increment(outcome);
        outcome
    }

    /// Handle a batch in order. One bad event never stops the rest.
    pub fn process_batch<'a>(
        &self,
        events: impl IntoIterator<Item = &'a ChainEvent>,
    ) -> IngestReport {
        let mut report = IngestReport::default();
        for event in events {
            report.record(self.process(event));
        }
        tracing::debug!(?report, "batch ingested");
        report
    }

    /// Keys of records that still need fresh info and vote power reads.
    ///
    /// See [`ProposalRecord::needs_refresh`]: a record whose stored status
    /// already looks final keeps being read until its windows plus the grace
    /// period have passed.
    pub fn proposals_to_refresh(&self, now: Timestamp) -> Result<Vec<ProposalKey>, IndexerError> {
        let keys: Vec<_> = self
            .store
            .list_proposals(self.chain_id)?
            .into_iter()
            .filter(|record| record.needs_refresh(now, self.refresh_grace_secs))
            .map(|record| *record.key())
            .collect();
        tracing::debug!(%now, count = keys.len(), "proposals due for refresh");
        Ok(keys)
    }

    /// Load a record and project it for clients.
    pub fn public_view(
        &self,
        key: &ProposalKey,
        now: Timestamp,
        voter: Option<VoterPower>,
    ) -> Result<ProposalView, IndexerError> {
        let record = self
            .store
            .get_proposal(key)?
            .ok_or(IndexerError::UnknownProposal(*key))?;
        Ok(record.to_public_view(now, voter)?)
    }
}

impl ChainEvent {
    fn kind(&self) -> &'static str {
        match self {
            Self::ProposalCreated { .. } => "ProposalCreated",
            Self::ProposalInfo { .. } => "getProposalInfo",
            Self::VotePower { .. } => "getProposalVP",
        }
    }
}
