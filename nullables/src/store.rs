//! Nullable store: thread-safe in-memory proposal storage for testing.

use govwatch_governance::{ProposalKey, ProposalRecord};
use govwatch_store::{ProposalStore, StoreError};
use govwatch_types::ChainId;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

/// An in-memory proposal store.
///
/// The map lock is only held to find a record; each record has its own lock,
/// so updates to one proposal serialise without blocking the others, and a
/// reader always clones a record that no writer is half-way through.
pub struct NullProposalStore {
    records: RwLock<BTreeMap<ProposalKey, Arc<Mutex<ProposalRecord>>>>,
}

/// Map a poisoned lock in `operation` to a backend error.
fn poisoned<T>(
    operation: &'static str,
    key: Option<&ProposalKey>,
) -> impl FnOnce(T) -> StoreError {
    let key = key.copied();
    move |_| StoreError::Backend {
        operation,
        key,
        reason: "lock poisoned by a panicking writer".to_string(),
    }
}

impl NullProposalStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn slot(
        &self,
        operation: &'static str,
        key: &ProposalKey,
    ) -> Result<Option<Arc<Mutex<ProposalRecord>>>, StoreError> {
        Ok(self
            .records
            .read()
            .map_err(poisoned(operation, Some(key)))?
            .get(key)
            .cloned())
    }
}

impl Default for NullProposalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalStore for NullProposalStore {
    fn insert_proposal(&self, record: ProposalRecord) -> Result<bool, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(poisoned("insert_proposal", Some(record.key())))?;
        if records.contains_key(record.key()) {
            return Ok(false);
        }
        records.insert(*record.key(), Arc::new(Mutex::new(record)));
        Ok(true)
    }

    fn get_proposal(&self, key: &ProposalKey) -> Result<Option<ProposalRecord>, StoreError> {
        match self.slot("get_proposal", key)? {
            Some(slot) => Ok(Some(
                slot.lock()
                    .map_err(poisoned("get_proposal", Some(key)))?
                    .clone(),
            )),
            None => Ok(None),
        }
    }

    fn update_proposal(
        &self,
        key: &ProposalKey,
        update: &mut dyn FnMut(&mut ProposalRecord),
    ) -> Result<ProposalRecord, StoreError> {
        let slot = self
            .slot("update_proposal", key)?
            .ok_or(StoreError::NotFound(*key))?;
        let mut record = slot.lock().map_err(poisoned("update_proposal", Some(key)))?;
        update(&mut *record);
        Ok(record.clone())
    }

    fn list_proposals(&self, chain_id: ChainId) -> Result<Vec<ProposalRecord>, StoreError> {
        let slots: Vec<_> = self
            .records
            .read()
            .map_err(poisoned("list_proposals", None))?
            .iter()
            .filter(|(key, _)| key.chain_id == chain_id)
            .map(|(key, slot)| (*key, Arc::clone(slot)))
            .collect();
        slots
            .iter()
            .map(|(key, slot)| -> Result<ProposalRecord, StoreError> {
                Ok(slot
                    .lock()
                    .map_err(poisoned("list_proposals", Some(key)))?
                    .clone())
            })
            .collect()
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .records
            .read()
            .map_err(poisoned("proposal_count", None))?
            .len() as u64)
    }
}
