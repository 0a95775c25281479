use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vault_types::StateRecord;

/// One committed vault change: the records it produced and consumed.
///
/// Published by the write-path collaborator after commit; delivered to feed
/// subscribers whose filter its state types intersect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultUpdate {
    pub produced: Vec<StateRecord>,
    pub consumed: Vec<StateRecord>,
}

impl VaultUpdate {
    /// An update producing the given records and consuming nothing.
    pub fn produced(records: Vec<StateRecord>) -> Self {
        Self {
            produced: records,
            consumed: Vec::new(),
        }
    }

    /// Concrete types of the produced records.
    pub fn produced_types(&self) -> BTreeSet<&str> {
        self.produced.iter().map(|r| r.contract_type.as_str()).collect()
    }

    /// Concrete types of the consumed records.
    pub fn consumed_types(&self) -> BTreeSet<&str> {
        self.consumed.iter().map(|r| r.contract_type.as_str()).collect()
    }

    /// Returns `true` if any produced or consumed record has a type in `types`.
    pub fn touches(&self, types: &BTreeSet<String>) -> bool {
        self.produced
            .iter()
            .chain(self.consumed.iter())
            .any(|r| types.contains(&r.contract_type))
    }

    pub fn is_empty(&self) -> bool {
        self.produced.is_empty() && self.consumed.is_empty()
    }
}

/// Filter applied to updates at fan-out time.
///
/// `None` matches every update; `Some(types)` matches updates touching any
/// of the given concrete state types. Queries against a narrow or abstract
/// category must not leak unrelated updates into their feed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateFilter {
    pub state_types: Option<BTreeSet<String>>,
}

impl UpdateFilter {
    /// Match every update.
    pub fn all() -> Self {
        Self { state_types: None }
    }

    /// Match updates touching any of the given types.
    pub fn for_types(types: BTreeSet<String>) -> Self {
        Self {
            state_types: Some(types),
        }
    }

    /// Returns `true` if the given update matches this filter.
    pub fn matches(&self, update: &VaultUpdate) -> bool {
        match &self.state_types {
            None => true,
            Some(types) => update.touches(types),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vault_types::{Notary, SerializedState, StateRef, TxId};

    fn record(contract_type: &str) -> StateRecord {
        StateRecord::new_unconsumed(
            StateRef::new(TxId::from_bytes(contract_type.as_bytes()), 0),
            SerializedState::from_bytes(vec![]),
            contract_type,
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            Notary::new("notary-a", [1u8; 32]),
        )
    }

    fn types(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn touches_considers_both_sides() {
        let update = VaultUpdate {
            produced: vec![record("Cash")],
            consumed: vec![record("Bond")],
        };
        assert!(update.touches(&types(&["Cash"])));
        assert!(update.touches(&types(&["Bond"])));
        assert!(!update.touches(&types(&["Deed"])));
    }

    #[test]
    fn type_sets_deduplicate() {
        let update = VaultUpdate::produced(vec![record("Cash"), record("Cash")]);
        assert_eq!(update.produced_types().len(), 1);
        assert!(update.consumed_types().is_empty());
    }

    #[test]
    fn filter_all_matches_everything() {
        let filter = UpdateFilter::all();
        assert!(filter.matches(&VaultUpdate::produced(vec![record("Anything")])));
        assert!(filter.matches(&VaultUpdate::default()));
    }

    #[test]
    fn typed_filter_blocks_unrelated_updates() {
        let filter = UpdateFilter::for_types(types(&["Cash"]));
        assert!(filter.matches(&VaultUpdate::produced(vec![record("Cash")])));
        assert!(!filter.matches(&VaultUpdate::produced(vec![record("Deed")])));
        // An empty update touches nothing.
        assert!(!filter.matches(&VaultUpdate::default()));
    }
}
