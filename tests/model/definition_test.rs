//! Integration tests for definition persistence.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use quill::catalog::{DataSourceId, FieldId};
use quill::executor::{ExecutorError, ExecutorResult};
use quill::filter::{ConditionId, FilterCondition, FilterConfig, FilterValue, Operator};
use quill::model::{
    DefinitionError, DefinitionId, DefinitionRecord, DefinitionStore, ReportTypeDefinition,
};
use serde_json::json;

/// In-memory store assigning ids from 1.
#[derive(Default)]
struct MemoryStore {
    records: Mutex<BTreeMap<u64, DefinitionRecord>>,
}

#[async_trait]
impl DefinitionStore for MemoryStore {
    async fn list(&self, skip: u64, limit: u64) -> ExecutorResult<(Vec<DefinitionRecord>, u64)> {
        let records = self.records.lock().unwrap();
        let items = records
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((items, records.len() as u64))
    }

    async fn get(&self, id: DefinitionId) -> ExecutorResult<DefinitionRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&id.0)
            .cloned()
            .ok_or_else(|| ExecutorError::NotFound(format!("definition {}", id)))
    }

    async fn create(&self, mut record: DefinitionRecord) -> ExecutorResult<DefinitionRecord> {
        let mut records = self.records.lock().unwrap();
        let id = records.len() as u64 + 1;
        record.id = Some(DefinitionId(id));
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: DefinitionRecord) -> ExecutorResult<DefinitionRecord> {
        let id = record
            .id
            .ok_or_else(|| ExecutorError::InvalidRequest("missing id".to_string()))?;
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(&id.0) {
            return Err(ExecutorError::NotFound(format!("definition {}", id)));
        }
        records.insert(id.0, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: DefinitionId) -> ExecutorResult<bool> {
        Ok(self.records.lock().unwrap().remove(&id.0).is_some())
    }
}

fn sales_definition() -> ReportTypeDefinition {
    let mut definition = ReportTypeDefinition::new("sales", "Sales");
    definition.category = Some("finance".to_string());
    definition.data_source_id = Some(DataSourceId(3));
    definition.fields = vec![FieldId(3), FieldId(1), FieldId(2)];
    definition.filter_config = FilterConfig::new(
        true,
        vec![FilterCondition::new(ConditionId::from("c1"))
            .with_field("region")
            .with_operator(Operator::In)
            .with_value(FilterValue::multiple(["north", "west"]))],
    );
    definition
}

#[test]
fn test_record_layout() {
    let record = sales_definition().to_record().unwrap();

    assert_eq!(record.fields, "3,1,2");
    assert_eq!(record.data_source_id, Some(DataSourceId(3)));

    let filter_config = &record.default_config["filter_config"];
    assert_eq!(filter_config["enabled"], json!(true));
    assert_eq!(
        filter_config["default_filters"]["logic_operator"],
        json!("AND")
    );
    assert_eq!(
        filter_config["default_filters"]["conditions"][0]["value"],
        json!(["north", "west"])
    );
    assert_eq!(filter_config["user_configurable_filters"], json!([]));
}

#[test]
fn test_record_round_trip() {
    let definition = sales_definition();

    let record = definition.to_record().unwrap();
    let wire = serde_json::to_string(&record).unwrap();
    let decoded: DefinitionRecord = serde_json::from_str(&wire).unwrap();
    let (back, notices) = ReportTypeDefinition::from_record(decoded).unwrap();

    assert!(notices.is_empty());
    assert_eq!(back, definition);
}

#[test]
fn test_missing_filter_config_is_disabled() {
    let record: DefinitionRecord = serde_json::from_value(json!({
        "code": "bare",
        "name": "Bare",
        "fields": ""
    }))
    .unwrap();

    let (definition, _) = ReportTypeDefinition::from_record(record).unwrap();
    assert_eq!(definition.filter_config, FilterConfig::default());
    assert!(definition.fields.is_empty());
}

#[test]
fn test_malformed_filter_config_is_an_error() {
    let record: DefinitionRecord = serde_json::from_value(json!({
        "code": "broken",
        "name": "Broken",
        "default_config": { "filter_config": { "enabled": "yes" } }
    }))
    .unwrap();

    assert!(matches!(
        ReportTypeDefinition::from_record(record),
        Err(DefinitionError::FilterConfig(_))
    ));
}

#[tokio::test]
async fn test_save_creates_then_updates() {
    let store = MemoryStore::default();

    let created = store.save(&sales_definition()).await.unwrap();
    assert_eq!(created.id, Some(DefinitionId(1)));

    let mut edited = created.clone();
    edited.name = "Regional sales".to_string();
    let updated = store.save(&edited).await.unwrap();
    assert_eq!(updated.id, Some(DefinitionId(1)));

    let (loaded, _) = store.load(DefinitionId(1)).await.unwrap();
    assert_eq!(loaded.name, "Regional sales");
    assert_eq!(loaded.filter_config, sales_definition().filter_config);

    let (items, total) = store.list(0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_load_missing_definition() {
    let store = MemoryStore::default();

    let result = store.load(DefinitionId(42)).await;
    assert!(matches!(
        result,
        Err(DefinitionError::Executor(ExecutorError::NotFound(_)))
    ));
    assert!(!store.delete(DefinitionId(42)).await.unwrap());
}
