use std::sync::Arc;

use tracing::{info, warn};

use vault_criteria::{compile, CompiledQuery, Criteria};
use vault_feed::{UpdateFilter, UpdatePublisher, VaultFeed};
use vault_query::{ExecutorConfig, QueryExecutor, QueryResult, ResultPage};
use vault_registry::{resolve, TypeDescriptorSource};
use vault_store::VaultStore;
use vault_types::{PageSpecification, Sort, ROOT_CATEGORY};

/// The vault query/view service.
///
/// Composes the storage collaborator, the type-metadata collaborator, and
/// the shared update publisher. All methods are safe to call from multiple
/// threads; `track_by` serializes its snapshot against the publisher so no
/// update is lost or duplicated at the seam.
pub struct VaultService {
    store: Arc<dyn VaultStore>,
    descriptors: Arc<dyn TypeDescriptorSource>,
    publisher: Arc<UpdatePublisher>,
    executor: QueryExecutor,
}

impl VaultService {
    pub fn new(
        store: Arc<dyn VaultStore>,
        descriptors: Arc<dyn TypeDescriptorSource>,
        publisher: Arc<UpdatePublisher>,
    ) -> Self {
        Self::with_config(store, descriptors, publisher, ExecutorConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn VaultStore>,
        descriptors: Arc<dyn TypeDescriptorSource>,
        publisher: Arc<UpdatePublisher>,
        config: ExecutorConfig,
    ) -> Self {
        let executor = QueryExecutor::with_config(Arc::clone(&store), config);
        Self {
            store,
            descriptors,
            publisher,
            executor,
        }
    }

    /// The shared publisher; the write path commits and publishes through it.
    pub fn publisher(&self) -> &Arc<UpdatePublisher> {
        &self.publisher
    }

    /// Run a one-shot query: resolve, compile, execute.
    pub fn query_by(
        &self,
        category: &str,
        criteria: &Criteria,
        paging: Option<PageSpecification>,
        sort: &Sort,
    ) -> QueryResult<ResultPage> {
        let compiled = self.compile_for(category, criteria, sort)?;
        self.executor.execute(&compiled, paging)
    }

    /// Run a query and attach a live feed of subsequent matching updates.
    ///
    /// The snapshot and the subscription are composed as one critical
    /// section against the shared publisher; the feed is filtered to the
    /// snapshot's resolved state types so a narrow or abstract category
    /// never leaks unrelated updates.
    pub fn track_by(
        &self,
        category: &str,
        criteria: &Criteria,
        paging: Option<PageSpecification>,
        sort: &Sort,
    ) -> QueryResult<VaultFeed> {
        let compiled = self.compile_for(category, criteria, sort)?;

        let filter = if category == ROOT_CATEGORY {
            UpdateFilter::all()
        } else {
            UpdateFilter::for_types(compiled.state_types.clone())
        };

        let (snapshot, updates) = self
            .publisher
            .snapshot_and_subscribe(filter, || self.executor.execute(&compiled, paging))?;

        info!(
            category,
            snapshot_len = snapshot.len(),
            "feed attached"
        );
        Ok(VaultFeed::new(snapshot, updates))
    }

    /// Resolve the live contract-type set and compile the criteria.
    ///
    /// The registry is rebuilt per call: new contract implementations may
    /// have been recorded since the last query. Unloadable types are logged
    /// and excluded; the query proceeds best-effort over the rest.
    fn compile_for(
        &self,
        category: &str,
        criteria: &Criteria,
        sort: &Sort,
    ) -> QueryResult<CompiledQuery> {
        let type_names = self.store.distinct_contract_types()?;
        let resolution = resolve(self.descriptors.as_ref(), &type_names);
        for failure in &resolution.failures {
            warn!(error = %failure, "contract type excluded from resolution");
        }
        Ok(compile(criteria, sort, category, &resolution)?)
    }
}

impl std::fmt::Debug for VaultService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultService")
            .field("config", self.executor.config())
            .finish()
    }
}
