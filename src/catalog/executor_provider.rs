//! ExecutorCatalogProvider implementation.

use std::sync::Arc;

use async_trait::async_trait;

use super::provider::{CatalogProvider, CatalogResult};
use super::types::{DataSourceId, Field};
use crate::executor::protocol::{methods, FieldsParams, FieldsResponse};
use crate::executor::ExecutorClient;

/// CatalogProvider that asks the report executor for field lists.
///
/// ```ignore
/// let client = ExecutorClient::spawn("./report-executor").await?;
/// let provider = ExecutorCatalogProvider::new(Arc::new(client));
/// let fields = provider.fields(DataSourceId(3)).await?;
/// ```
pub struct ExecutorCatalogProvider {
    client: Arc<ExecutorClient>,
}

impl ExecutorCatalogProvider {
    pub fn new(client: Arc<ExecutorClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogProvider for ExecutorCatalogProvider {
    async fn fields(&self, data_source_id: DataSourceId) -> CatalogResult<Vec<Field>> {
        let response: FieldsResponse = self
            .client
            .request(
                methods::CATALOG_FIELDS,
                FieldsParams {
                    data_source_id: data_source_id.0,
                },
            )
            .await?;

        Ok(response.fields.into_iter().map(Into::into).collect())
    }
}
