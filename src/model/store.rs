//! Definition persistence through the report executor.

use std::sync::Arc;

use async_trait::async_trait;

use super::definition::{DefinitionError, DefinitionId, DefinitionRecord, ReportTypeDefinition};
use crate::executor::protocol::{
    methods, DefinitionIdParams, DefinitionResponse, DeleteDefinitionResponse,
    ListDefinitionsParams, ListDefinitionsResponse, SaveDefinitionParams,
};
use crate::executor::{ExecutorClient, ExecutorError, ExecutorResult};
use crate::notice::Notice;

/// CRUD access to stored report definitions.
///
/// The store is last-write-wins; nothing here arbitrates concurrent edits.
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    /// One page of definitions and the total count.
    async fn list(&self, skip: u64, limit: u64) -> ExecutorResult<(Vec<DefinitionRecord>, u64)>;

    async fn get(&self, id: DefinitionId) -> ExecutorResult<DefinitionRecord>;

    async fn create(&self, record: DefinitionRecord) -> ExecutorResult<DefinitionRecord>;

    async fn update(&self, record: DefinitionRecord) -> ExecutorResult<DefinitionRecord>;

    async fn delete(&self, id: DefinitionId) -> ExecutorResult<bool>;

    /// Fetch and decode a definition.
    async fn load(
        &self,
        id: DefinitionId,
    ) -> Result<(ReportTypeDefinition, Vec<Notice>), DefinitionError> {
        let record = self.get(id).await?;
        ReportTypeDefinition::from_record(record)
    }

    /// Create or update depending on whether the definition has an id.
    async fn save(
        &self,
        definition: &ReportTypeDefinition,
    ) -> Result<ReportTypeDefinition, DefinitionError> {
        let record = definition.to_record()?;
        let stored = match record.id {
            Some(_) => self.update(record).await?,
            None => self.create(record).await?,
        };
        let (saved, _) = ReportTypeDefinition::from_record(stored)?;
        Ok(saved)
    }
}

/// DefinitionStore backed by the executor's `definition.*` methods.
pub struct ExecutorDefinitionStore {
    client: Arc<ExecutorClient>,
}

impl ExecutorDefinitionStore {
    pub fn new(client: Arc<ExecutorClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DefinitionStore for ExecutorDefinitionStore {
    async fn list(&self, skip: u64, limit: u64) -> ExecutorResult<(Vec<DefinitionRecord>, u64)> {
        let response: ListDefinitionsResponse = self
            .client
            .request(methods::LIST_DEFINITIONS, ListDefinitionsParams { skip, limit })
            .await?;
        Ok((response.items, response.total))
    }

    async fn get(&self, id: DefinitionId) -> ExecutorResult<DefinitionRecord> {
        let response: DefinitionResponse = self
            .client
            .request(methods::GET_DEFINITION, DefinitionIdParams { id: id.0 })
            .await?;
        Ok(response.definition)
    }

    async fn create(&self, record: DefinitionRecord) -> ExecutorResult<DefinitionRecord> {
        let response: DefinitionResponse = self
            .client
            .request(
                methods::CREATE_DEFINITION,
                SaveDefinitionParams { definition: record },
            )
            .await?;
        Ok(response.definition)
    }

    async fn update(&self, record: DefinitionRecord) -> ExecutorResult<DefinitionRecord> {
        if record.id.is_none() {
            return Err(ExecutorError::InvalidRequest(
                "cannot update a definition without an id".to_string(),
            ));
        }
        let response: DefinitionResponse = self
            .client
            .request(
                methods::UPDATE_DEFINITION,
                SaveDefinitionParams { definition: record },
            )
            .await?;
        Ok(response.definition)
    }

    async fn delete(&self, id: DefinitionId) -> ExecutorResult<bool> {
        let response: DeleteDefinitionResponse = self
            .client
            .request(methods::DELETE_DEFINITION, DefinitionIdParams { id: id.0 })
            .await?;
        Ok(response.deleted)
    }
}
