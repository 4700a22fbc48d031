//! Integration tests for the editing session.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use quill::catalog::{CatalogProvider, CatalogResult, DataSourceId, DataType, Field, FieldId};
use quill::executor::{ExecutorError, ExecutorResult};
use quill::filter::{
    ConditionId, ConditionPatch, FilterCondition, FilterConfig, FilterValue, Operator,
};
use quill::model::{DefinitionId, ReportTypeDefinition};
use quill::notice::{NoticeKind, NoticeLevel};
use quill::preview::{PreviewBackend, PreviewOutcome, PreviewPage, PreviewRequest};
use quill::projection::EditMode;
use quill::session::EditingSession;

/// Serves field lists from memory and counts fetches per data source.
struct FakeCatalog {
    sources: Mutex<HashMap<DataSourceId, Vec<Field>>>,
    fetches: Mutex<Vec<DataSourceId>>,
}

impl FakeCatalog {
    fn new() -> Self {
        let mut sources = HashMap::new();
        sources.insert(
            DataSourceId(1),
            vec![
                Field::new(1, "age", DataType::Integer),
                Field::new(2, "name", DataType::Text),
            ],
        );
        sources.insert(
            DataSourceId(2),
            vec![
                Field::new(2, "name", DataType::Text),
                Field::new(3, "joined", DataType::Date),
            ],
        );
        Self {
            sources: Mutex::new(sources),
            fetches: Mutex::new(Vec::new()),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    /// Make later fetches of `data_source_id` fail.
    fn take_offline(&self, data_source_id: DataSourceId) {
        self.sources.lock().unwrap().remove(&data_source_id);
    }
}

#[async_trait]
impl CatalogProvider for FakeCatalog {
    async fn fields(&self, data_source_id: DataSourceId) -> CatalogResult<Vec<Field>> {
        self.fetches.lock().unwrap().push(data_source_id);
        self.sources
            .lock()
            .unwrap()
            .get(&data_source_id)
            .cloned()
            .ok_or_else(|| ExecutorError::NotFound(format!("data source {}", data_source_id)))
    }
}

struct RecordingPreview {
    requests: Mutex<Vec<PreviewRequest>>,
}

#[async_trait]
impl PreviewBackend for RecordingPreview {
    async fn preview_rows(&self, request: &PreviewRequest) -> ExecutorResult<PreviewPage> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(PreviewPage::default())
    }
}

#[tokio::test]
async fn test_create_flow_builds_definition() {
    let provider = FakeCatalog::new();
    let mut session = EditingSession::create("members", "Members");
    assert_eq!(session.mode(), EditMode::Create);
    assert!(session.data_source_id().is_none());

    let report = session
        .select_data_source(&provider, DataSourceId(1))
        .await
        .unwrap();
    assert!(report.is_empty());

    session.projection_mut().add_field(FieldId(2));
    session.projection_mut().add_field(FieldId(1));
    let id = session.filters_mut().add_condition();
    session.filters_mut().update_condition(
        &id,
        ConditionPatch::new()
            .field("age")
            .operator(Operator::GreaterThan)
            .value(FilterValue::single("18")),
    );
    session.set_filter_enabled(true);

    let definition = session.definition();
    assert_eq!(definition.code, "members");
    assert_eq!(definition.data_source_id, Some(DataSourceId(1)));
    assert_eq!(definition.fields, vec![FieldId(2), FieldId(1)]);
    assert!(definition.filter_config.enabled);
    assert_eq!(definition.filter_config.conditions.len(), 1);
    assert!(session.serialized_filter().is_some());
}

#[tokio::test]
async fn test_create_mode_switch_resets_projection_and_clears_stale_filters() {
    let provider = FakeCatalog::new();
    let mut session = EditingSession::create("members", "Members");
    session.select_data_source(&provider, DataSourceId(1)).await;
    session.projection_mut().add_field(FieldId(1));
    let id = session.filters_mut().add_condition();
    session.filters_mut().update_condition(
        &id,
        ConditionPatch::new()
            .field("age")
            .value(FilterValue::single("40"))
            .description("over forty"),
    );

    let report = session
        .select_data_source(&provider, DataSourceId(2))
        .await
        .unwrap();

    assert!(session.projection().is_empty());
    assert_eq!(report.cleared_conditions.len(), 1);
    let condition = session.filters().condition(&id).unwrap();
    assert!(condition.field_name.is_none());
    assert_eq!(condition.description, "over forty");

    let notices = session.take_notices();
    assert!(notices
        .iter()
        .any(|n| n.kind == NoticeKind::StaleConditionsCleared && n.level == NoticeLevel::Warning));
    assert!(session.notices().is_empty());
}

#[tokio::test]
async fn test_edit_mode_keeps_valid_fields_and_drops_missing() {
    let provider = FakeCatalog::new();
    let mut definition = ReportTypeDefinition::new("members", "Members");
    definition.id = Some(DefinitionId(4));
    definition.data_source_id = Some(DataSourceId(2));
    definition.fields = vec![FieldId(3), FieldId(1), FieldId(2)];

    let mut session = EditingSession::edit(definition);
    let report = session
        .select_data_source(&provider, DataSourceId(2))
        .await
        .unwrap();

    assert_eq!(session.projection().field_ids(), &[FieldId(3), FieldId(2)]);
    assert_eq!(report.dropped_fields, vec![FieldId(1)]);
    assert!(session
        .notices()
        .iter()
        .any(|n| n.kind == NoticeKind::StaleFieldsDropped));
}

#[tokio::test]
async fn test_catalog_is_cached_until_refreshed() {
    let provider = FakeCatalog::new();
    let mut session = EditingSession::create("members", "Members");

    session.select_data_source(&provider, DataSourceId(1)).await;
    session.select_data_source(&provider, DataSourceId(2)).await;
    session.select_data_source(&provider, DataSourceId(1)).await;
    assert_eq!(provider.fetch_count(), 2);

    session.refresh_catalog(&provider).await;
    assert_eq!(provider.fetch_count(), 3);
    assert!(!session.is_catalog_loading());
}

#[tokio::test]
async fn test_catalog_failure_drops_references_of_unloaded_source() {
    let provider = FakeCatalog::new();
    let mut definition = ReportTypeDefinition::new("members", "Members");
    definition.fields = vec![FieldId(1)];
    let mut session = EditingSession::edit(definition);

    let report = session
        .select_data_source(&provider, DataSourceId(99))
        .await
        .unwrap();

    assert_eq!(report.dropped_fields, vec![FieldId(1)]);
    assert_eq!(session.data_source_id(), Some(DataSourceId(99)));
    assert!(session.catalog().is_empty());
    assert!(session.projection().is_empty());
    assert!(!session.projection_mut().add_field(FieldId(1)));

    let notices = session.notices();
    assert_eq!(notices[0].kind, NoticeKind::CatalogFetchFailed);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices
        .iter()
        .any(|n| n.kind == NoticeKind::StaleFieldsDropped));
}

#[tokio::test]
async fn test_failed_switch_leaves_no_reference_to_previous_source() {
    let provider = FakeCatalog::new();
    let mut definition = ReportTypeDefinition::new("members", "Members");
    definition.id = Some(DefinitionId(4));
    let mut session = EditingSession::edit(definition);
    session.select_data_source(&provider, DataSourceId(1)).await;

    session.projection_mut().add_field(FieldId(1));
    let id = session.filters_mut().add_condition();
    session.filters_mut().update_condition(
        &id,
        ConditionPatch::new().field("age").value(FilterValue::single("4")),
    );
    let condition = session.filters().condition(&id).unwrap();
    assert_eq!(condition.field_name.as_deref(), Some("age"));

    let report = session
        .select_data_source(&provider, DataSourceId(99))
        .await
        .unwrap();
    assert_eq!(report.cleared_conditions, vec![id.clone()]);

    let definition = session.definition();
    assert_eq!(definition.data_source_id, Some(DataSourceId(99)));
    assert!(definition.fields.is_empty());
    assert!(session.catalog().is_empty());
    let condition = &definition.filter_config.conditions[0];
    assert_eq!(condition.id, id);
    assert!(condition.field_name.is_none());
    assert!(condition.operator.is_none());
}

#[tokio::test]
async fn test_failed_refresh_keeps_installed_catalog() {
    let provider = FakeCatalog::new();
    let mut session = EditingSession::create("members", "Members");
    session.select_data_source(&provider, DataSourceId(1)).await;
    session.projection_mut().add_field(FieldId(2));
    let id = session.filters_mut().add_condition();
    session
        .filters_mut()
        .update_condition(&id, ConditionPatch::new().field("age"));

    provider.take_offline(DataSourceId(1));
    let report = session.refresh_catalog(&provider).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(provider.fetch_count(), 2);
    assert_eq!(session.data_source_id(), Some(DataSourceId(1)));
    assert_eq!(session.catalog().len(), 2);
    assert_eq!(session.projection().field_ids(), &[FieldId(2)]);
    let condition = session.filters().condition(&id).unwrap();
    assert_eq!(condition.field_name.as_deref(), Some("age"));

    let notices = session.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::CatalogFetchFailed);
}

#[tokio::test]
async fn test_preview_requires_saved_definition() {
    let backend = RecordingPreview {
        requests: Mutex::new(Vec::new()),
    };
    let mut session = EditingSession::create("members", "Members");

    assert!(session.request_preview(&backend, false).await.is_none());

    session.mark_saved(DefinitionId(7));
    assert_eq!(session.mode(), EditMode::Edit);

    let outcome = session.request_preview(&backend, true).await;
    assert_eq!(outcome, Some(PreviewOutcome::Committed));

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].definition_id, DefinitionId(7));
    // Filter is disabled by default, so nothing is sent.
    assert!(requests[0].filters.is_none());
}

#[tokio::test]
async fn test_preview_after_reload_sends_only_reconciled_conditions() {
    let provider = FakeCatalog::new();
    let backend = RecordingPreview {
        requests: Mutex::new(Vec::new()),
    };
    let mut definition = ReportTypeDefinition::new("members", "Members");
    definition.id = Some(DefinitionId(5));
    definition.data_source_id = Some(DataSourceId(2));
    definition.filter_config = FilterConfig::new(
        true,
        vec![
            FilterCondition::new(ConditionId::from("c1"))
                .with_field("age")
                .with_value(FilterValue::single("30")),
            FilterCondition::new(ConditionId::from("c2"))
                .with_field("name")
                .with_value(FilterValue::single("Ann")),
        ],
    );

    let mut session = EditingSession::edit(definition);
    session.select_data_source(&provider, DataSourceId(2)).await;
    let outcome = session.request_preview(&backend, true).await;
    assert_eq!(outcome, Some(PreviewOutcome::Committed));

    let requests = backend.requests.lock().unwrap();
    let filters = requests[0].filters.as_deref().unwrap();
    assert!(filters.contains("\"name\""));
    assert!(!filters.contains("\"age\""));
}
