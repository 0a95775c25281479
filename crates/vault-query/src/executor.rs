use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use vault_criteria::CompiledQuery;
use vault_store::{QueryRow, ScalarValue, VaultStore};
use vault_types::{PageSpecification, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::error::{QueryError, QueryResult};
use crate::page::ResultPage;

/// The two paging bounds of the executor.
///
/// `default_page_size` is deliberately one knob serving two purposes: the
/// implicit page size when no explicit paging is supplied, and the fail-fast
/// threshold beyond which an unpaged query is rejected.
#[derive(Clone, Copy, Debug)]
pub struct ExecutorConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Runs compiled queries against the storage collaborator.
pub struct QueryExecutor {
    store: Arc<dyn VaultStore>,
    config: ExecutorConfig,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn VaultStore>) -> Self {
        Self::with_config(store, ExecutorConfig::default())
    }

    pub fn with_config(store: Arc<dyn VaultStore>, config: ExecutorConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute a compiled query and assemble the result page.
    pub fn execute(
        &self,
        compiled: &CompiledQuery,
        paging: Option<PageSpecification>,
    ) -> QueryResult<ResultPage> {
        // An explicit page specification is validated up front, even when
        // the query shape ends up ignoring it.
        if let Some(spec) = &paging {
            validate_paging(spec, self.config.max_page_size)?;
        }

        // Aggregate-only queries never paginate: the scalar answers are
        // already totals, so a valid page specification is moot.
        if compiled.is_aggregate_only() {
            let rows = self.store.execute(&compiled.to_native(0, None))?;
            let (states, other_results) = partition(rows);
            debug!(scalars = other_results.len(), "aggregate-only query executed");
            return Ok(assemble(compiled, states, other_results, None));
        }

        match paging {
            Some(spec) => self.execute_paged(compiled, spec),
            None => self.execute_unpaged(compiled),
        }
    }

    fn execute_paged(
        &self,
        compiled: &CompiledQuery,
        spec: PageSpecification,
    ) -> QueryResult<ResultPage> {
        // First round-trip: count-only variant of the identical predicate.
        // Minor skew against the main query under concurrent mutation is
        // accepted; the filter semantics are what must stay consistent.
        let total = self.count(compiled)?;

        // Second round-trip: one sentinel row past the page detects "more
        // rows than fit" without ever reaching the caller.
        let native = compiled.to_native(spec.offset(), Some(spec.page_size + 1));
        let rows = self.store.execute(&native)?;
        let (mut states, other_results) = partition(rows);
        states.truncate(spec.page_size);

        debug!(
            page = spec.page_number,
            size = spec.page_size,
            total,
            returned = states.len(),
            "paged query executed"
        );
        Ok(assemble(compiled, states, other_results, Some(total)))
    }

    fn execute_unpaged(&self, compiled: &CompiledQuery) -> QueryResult<ResultPage> {
        let bound = self.config.default_page_size;
        let rows = self.store.execute(&compiled.to_native(0, Some(bound + 1)))?;
        let (states, other_results) = partition(rows);

        // Default execution never truncates silently: over-threshold means
        // the caller must page explicitly, and gets zero partial results.
        if states.len() > bound {
            return Err(QueryError::TooManyResults { threshold: bound });
        }

        debug!(returned = states.len(), "unpaged query executed");
        Ok(assemble(compiled, states, other_results, None))
    }

    fn count(&self, compiled: &CompiledQuery) -> QueryResult<u64> {
        let native = compiled.to_native(0, None).count_variant();
        let rows = self.store.execute(&native)?;
        rows.into_iter()
            .find_map(|row| match row {
                QueryRow::Scalar(ScalarValue::Count(n)) => Some(n),
                QueryRow::Record(_) => None,
            })
            .ok_or(QueryError::MissingCount)
    }
}

fn validate_paging(spec: &PageSpecification, max_page_size: usize) -> QueryResult<()> {
    if spec.page_number < 1 {
        return Err(QueryError::InvalidPageSpecification {
            page_number: spec.page_number,
            page_size: spec.page_size,
            reason: "page number must be at least 1",
        });
    }
    if spec.page_size < 1 || spec.page_size > max_page_size {
        return Err(QueryError::InvalidPageSpecification {
            page_number: spec.page_number,
            page_size: spec.page_size,
            reason: "page size out of range",
        });
    }
    Ok(())
}

/// Split tagged rows into record and scalar partitions, preserving the
/// original query ordering within each.
fn partition(
    rows: Vec<QueryRow>,
) -> (
    Vec<(vault_types::StateRef, vault_types::StateRecord)>,
    Vec<ScalarValue>,
) {
    let mut states = Vec::new();
    let mut scalars = Vec::new();
    for row in rows {
        match row {
            QueryRow::Record(record) => states.push((record.state_ref, record)),
            QueryRow::Scalar(value) => scalars.push(value),
        }
    }
    (states, scalars)
}

fn assemble(
    compiled: &CompiledQuery,
    states: Vec<(vault_types::StateRef, vault_types::StateRecord)>,
    other_results: Vec<ScalarValue>,
    total_states_available: Option<u64>,
) -> ResultPage {
    let state_types: BTreeSet<String> = compiled.state_types.clone();
    ResultPage {
        states,
        state_types,
        total_states_available,
        other_results,
    }
}
