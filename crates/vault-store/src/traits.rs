use crate::error::StoreResult;
use crate::query::{NativeQuery, QueryRow};

/// The storage collaborator the query layer runs against.
///
/// All implementations must satisfy these invariants:
/// - Persisted records are never mutated by query execution; the write path
///   (recording and consuming states) belongs to the storage owner.
/// - `execute` applies the predicate first, then ordering, then
///   offset/limit, and breaks ordering ties by `StateRef` so that repeated
///   executions over an unchanged store return identical row sequences.
/// - Scalar projections each yield exactly one scalar row, appended after
///   the record-shaped rows; scalar rows are not subject to offset/limit.
/// - All backend failures are propagated, never silently ignored.
pub trait VaultStore: Send + Sync {
    /// The distinct concrete state-type names currently persisted.
    ///
    /// Queried afresh per execution: the set grows as new contract
    /// implementations are recorded.
    fn distinct_contract_types(&self) -> StoreResult<Vec<String>>;

    /// Execute a native query and return its rows.
    fn execute(&self, query: &NativeQuery) -> StoreResult<Vec<QueryRow>>;
}
