//! CatalogProvider trait definition.

use async_trait::async_trait;

use super::types::{DataSourceId, Field};
use crate::executor::ExecutorError;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, ExecutorError>;

/// Source of field lists for data sources.
///
/// This is a pure fetch boundary; caching lives in
/// [`CatalogCache`](crate::cache::CatalogCache), which the editing session
/// owns.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch every field of a data source.
    async fn fields(&self, data_source_id: DataSourceId) -> CatalogResult<Vec<Field>>;
}
