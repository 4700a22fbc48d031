//! Session-scoped field catalog cache.
//!
//! One cache belongs to one editing session and is dropped with it; nothing
//! is shared between sessions.
//!
//! # Design
//!
//! - Keyed by data source id, value is an immutable [`Catalog`] snapshot
//! - Every fetch takes a [`FetchTicket`] carrying a sequence number
//! - Only the latest ticket issued for a key may commit; older completions
//!   are reported as [`FetchOutcome::Stale`] and dropped
//! - A failed fetch commits nothing and hands back an empty catalog

mod hash;
pub use hash::fingerprint;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogProvider, CatalogResult, DataSourceId, Field};
use crate::executor::ExecutorError;

/// Handle for one in-flight catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub data_source_id: DataSourceId,
    pub seq: u64,
}

/// Result of resolving a catalog through the cache.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Served from the cache without a fetch.
    Cached(Arc<Catalog>),
    /// Freshly fetched and committed.
    Fetched(Arc<Catalog>),
    /// The fetch failed; the catalog is empty and was not cached.
    Failed {
        catalog: Arc<Catalog>,
        error: ExecutorError,
    },
    /// A newer fetch for the same key was issued; this result was dropped.
    Stale,
}

impl FetchOutcome {
    /// The catalog to use, unless the result was stale.
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            FetchOutcome::Cached(c) | FetchOutcome::Fetched(c) => Some(c),
            FetchOutcome::Failed { catalog, .. } => Some(catalog),
            FetchOutcome::Stale => None,
        }
    }
}

/// Catalog snapshots keyed by data source id.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: HashMap<DataSourceId, Arc<Catalog>>,
    /// Latest ticket sequence issued per key, present while loading.
    in_flight: HashMap<DataSourceId, u64>,
    next_seq: u64,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, data_source_id: DataSourceId) -> Option<Arc<Catalog>> {
        self.entries.get(&data_source_id).cloned()
    }

    /// Whether a fetch for this key is outstanding.
    pub fn is_loading(&self, data_source_id: DataSourceId) -> bool {
        self.in_flight.contains_key(&data_source_id)
    }

    /// Start a fetch. Supersedes any fetch already in flight for the key.
    pub fn begin_fetch(&mut self, data_source_id: DataSourceId) -> FetchTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        if self.in_flight.insert(data_source_id, seq).is_some() {
            debug!(%data_source_id, seq, "superseding in-flight catalog fetch");
        }
        FetchTicket {
            data_source_id,
            seq,
        }
    }

    /// Commit the result of a fetch if its ticket is still the latest.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: CatalogResult<Vec<Field>>,
    ) -> FetchOutcome {
        let id = ticket.data_source_id;
        if self.in_flight.get(&id) != Some(&ticket.seq) {
            debug!(data_source_id = %id, seq = ticket.seq, "dropping stale catalog response");
            return FetchOutcome::Stale;
        }
        self.in_flight.remove(&id);

        match result {
            Ok(fields) => {
                let catalog = Arc::new(Catalog::new(id, fields));
                debug!(data_source_id = %id, fields = catalog.len(), "catalog cached");
                self.entries.insert(id, catalog.clone());
                FetchOutcome::Fetched(catalog)
            }
            Err(error) => {
                warn!(data_source_id = %id, %error, "catalog fetch failed");
                FetchOutcome::Failed {
                    catalog: Arc::new(Catalog::empty(id)),
                    error,
                }
            }
        }
    }

    /// Resolve a catalog, fetching it when absent or when `force` is set.
    pub async fn load(
        &mut self,
        provider: &dyn CatalogProvider,
        data_source_id: DataSourceId,
        force: bool,
    ) -> FetchOutcome {
        if !force {
            if let Some(catalog) = self.get(data_source_id) {
                return FetchOutcome::Cached(catalog);
            }
        }

        let ticket = self.begin_fetch(data_source_id);
        let result = provider.fields(data_source_id).await;
        self.complete_fetch(ticket, result)
    }
}
