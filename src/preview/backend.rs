//! Preview data source abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::executor::protocol::{methods, PreviewRowsParams, PreviewRowsResponse};
use crate::executor::{ExecutorClient, ExecutorResult};
use crate::model::DefinitionId;

/// One outgoing preview request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRequest {
    pub definition_id: DefinitionId,
    pub skip: u64,
    pub limit: u64,
    /// Serialized filter; `None` means the parameter is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

/// A bounded sample of report rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewPage {
    pub items: Vec<serde_json::Value>,
    /// Row count reported by the executor for the whole result.
    pub total: u64,
}

/// Something that can produce preview rows for a definition.
#[async_trait]
pub trait PreviewBackend: Send + Sync {
    async fn preview_rows(&self, request: &PreviewRequest) -> ExecutorResult<PreviewPage>;
}

/// PreviewBackend backed by the report executor's `preview.rows` method.
pub struct ExecutorPreviewBackend {
    client: Arc<ExecutorClient>,
}

impl ExecutorPreviewBackend {
    pub fn new(client: Arc<ExecutorClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PreviewBackend for ExecutorPreviewBackend {
    async fn preview_rows(&self, request: &PreviewRequest) -> ExecutorResult<PreviewPage> {
        let response: PreviewRowsResponse = self
            .client
            .request(
                methods::PREVIEW_ROWS,
                PreviewRowsParams {
                    definition_id: request.definition_id.0,
                    skip: request.skip,
                    limit: request.limit,
                    filters: request.filters.clone(),
                },
            )
            .await?;

        Ok(PreviewPage {
            items: response.items,
            total: response.total,
        })
    }
}
