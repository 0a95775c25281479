use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vault_store::ScalarValue;
use vault_types::{StateRecord, StateRef};

/// One page of query results.
///
/// Owned by the caller once returned. `state_types` is the resolved set of
/// concrete types the compiled predicate can match; the feed composer uses
/// it to filter live updates to the same population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Matched records, each paired with its reference, in query order.
    pub states: Vec<(StateRef, StateRecord)>,
    /// Concrete state types the compiled predicate resolved to.
    pub state_types: BTreeSet<String>,
    /// Total matches across all pages; only present under explicit paging.
    pub total_states_available: Option<u64>,
    /// Auxiliary scalar results from non-record projections, in query order.
    pub other_results: Vec<ScalarValue>,
}

impl ResultPage {
    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The references of this page's records, in page order.
    pub fn refs(&self) -> impl Iterator<Item = &StateRef> {
        self.states.iter().map(|(r, _)| r)
    }

    /// The records of this page, in page order.
    pub fn records(&self) -> impl Iterator<Item = &StateRecord> {
        self.states.iter().map(|(_, r)| r)
    }
}
