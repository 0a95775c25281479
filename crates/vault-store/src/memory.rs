use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use vault_types::{StateRecord, StateRef};

use crate::error::{StoreError, StoreResult};
use crate::query::{NativeQuery, Projection, QueryRow, ScalarValue};
use crate::traits::VaultStore;

/// In-memory, BTreeMap-based vault store.
///
/// Intended for tests and embedding. Records are held behind an `RwLock`
/// keyed by `StateRef`, which also provides the deterministic tie-break
/// order required by the [`VaultStore`] contract. The write helpers
/// (`record`, `consume`, `set_lock`) model the external write path.
pub struct InMemoryVaultStore {
    states: RwLock<BTreeMap<StateRef, StateRecord>>,
}

impl InMemoryVaultStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            states: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.states.read().expect("store lock poisoned").len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.states.read().expect("store lock poisoned").is_empty()
    }

    /// Remove all records.
    pub fn clear(&self) {
        self.states.write().expect("store lock poisoned").clear();
    }

    /// Fetch one record by reference.
    pub fn get(&self, state_ref: &StateRef) -> Option<StateRecord> {
        self.states
            .read()
            .expect("store lock poisoned")
            .get(state_ref)
            .cloned()
    }

    // ---------------------------------------------------------------
    // Write path (owned by the storage collaborator, modeled here)
    // ---------------------------------------------------------------

    /// Record a new state. Fails if the reference is already present.
    pub fn record(&self, record: StateRecord) -> StoreResult<()> {
        let mut map = self.states.write().expect("store lock poisoned");
        if map.contains_key(&record.state_ref) {
            return Err(StoreError::DuplicateState(record.state_ref));
        }
        map.insert(record.state_ref, record);
        Ok(())
    }

    /// Mark a state consumed at the given instant.
    pub fn consume(&self, state_ref: &StateRef, at: DateTime<Utc>) -> StoreResult<StateRecord> {
        let mut map = self.states.write().expect("store lock poisoned");
        let record = map
            .get_mut(state_ref)
            .ok_or(StoreError::StateNotFound(*state_ref))?;
        record.consume(at);
        Ok(record.clone())
    }

    /// Apply or clear a soft lock on a state.
    pub fn set_lock(
        &self,
        state_ref: &StateRef,
        lock_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut map = self.states.write().expect("store lock poisoned");
        let record = map
            .get_mut(state_ref)
            .ok_or(StoreError::StateNotFound(*state_ref))?;
        record.set_lock(lock_id, at);
        Ok(())
    }
}

impl Default for InMemoryVaultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultStore for InMemoryVaultStore {
    fn distinct_contract_types(&self) -> StoreResult<Vec<String>> {
        let map = self.states.read().expect("store lock poisoned");
        let types: BTreeSet<&str> = map.values().map(|r| r.contract_type.as_str()).collect();
        Ok(types.into_iter().map(String::from).collect())
    }

    fn execute(&self, query: &NativeQuery) -> StoreResult<Vec<QueryRow>> {
        if query.projections.is_empty() {
            return Err(StoreError::InvalidQuery("empty projection list".into()));
        }

        let map = self.states.read().expect("store lock poisoned");
        let mut matched: Vec<&StateRecord> = map
            .values()
            .filter(|r| query.predicate.matches(r))
            .collect();

        // BTreeMap iteration already yields StateRef order, which is the
        // tie-break; a stable sort on the requested columns preserves it.
        if !query.order_by.is_empty() {
            matched.sort_by(|a, b| {
                for entry in &query.order_by {
                    match entry.compare(a, b) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                a.state_ref.cmp(&b.state_ref)
            });
        }

        let total = matched.len() as u64;
        let mut rows = Vec::new();

        // Record rows first, then scalar rows, per the trait contract.
        if query.projects_records() {
            let window = matched
                .iter()
                .skip(query.offset)
                .take(query.limit.unwrap_or(usize::MAX));
            rows.extend(window.map(|r| QueryRow::Record((*r).clone())));
        }
        for projection in &query.projections {
            if *projection == Projection::CountRows {
                rows.push(QueryRow::Scalar(ScalarValue::Count(total)));
            }
        }

        debug!(
            matched = total,
            returned = rows.len(),
            offset = query.offset,
            "native query executed"
        );
        Ok(rows)
    }
}

impl std::fmt::Debug for InMemoryVaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVaultStore")
            .field("state_count", &self.len())
            .finish()
    }
}
