//! Editing session for one report definition.
//!
//! Ties the pieces together in the order a user drives them:
//!
//! ```text
//! select data source ─► catalog fetch ─► on_data_source_changed
//!                                             │
//!                          ┌──────────────────┴──────────────────┐
//!                          ▼                                     ▼
//!                  FieldProjection                     FilterConditionBuilder
//!                          └──────────── reconcile ──────────────┘
//!                                             │
//!                        serialize ◄──── user edits ────► preview
//! ```
//!
//! All mutation is synchronous; the only suspend points are the catalog and
//! preview fetches. Everything the session owns is dropped with it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CatalogCache, FetchOutcome};
use crate::catalog::{Catalog, CatalogProvider, DataSourceId};
use crate::filter::{FilterConditionBuilder, FilterConfig, SerializedFilter};
use crate::invalidation::{self, InvalidationReport};
use crate::model::{DefinitionId, ReportTypeDefinition};
use crate::notice::{Notice, NoticeKind};
use crate::preview::{PreviewBackend, PreviewOutcome, PreviewSession, DEFAULT_PREVIEW_LIMIT};
use crate::projection::{EditMode, FieldProjection};

pub struct EditingSession {
    mode: EditMode,
    /// Descriptive metadata; projection and filters live in their managers.
    definition: ReportTypeDefinition,
    catalogs: CatalogCache,
    projection: FieldProjection,
    filters: FilterConditionBuilder,
    filter_enabled: bool,
    preview: Option<PreviewSession>,
    preview_limit: u64,
    notices: Vec<Notice>,
}

impl EditingSession {
    /// Session for a definition that does not exist yet.
    pub fn create(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::build(EditMode::Create, ReportTypeDefinition::new(code, name))
    }

    /// Session for an existing definition.
    ///
    /// Its projection and conditions are kept until a catalog is installed,
    /// at which point stale references are reconciled away.
    pub fn edit(definition: ReportTypeDefinition) -> Self {
        Self::build(EditMode::Edit, definition)
    }

    fn build(mode: EditMode, mut definition: ReportTypeDefinition) -> Self {
        let catalog = Arc::new(Catalog::unbound());
        let fields = std::mem::take(&mut definition.fields);
        let config = std::mem::take(&mut definition.filter_config);

        let preview = definition.id.map(PreviewSession::new);
        Self {
            mode,
            catalogs: CatalogCache::new(),
            projection: FieldProjection::with_fields(catalog.clone(), fields),
            filters: FilterConditionBuilder::with_conditions(catalog, config.conditions),
            filter_enabled: config.enabled,
            preview,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            definition,
            notices: Vec::new(),
        }
    }

    /// Use a different preview sample size.
    pub fn with_preview_limit(mut self, limit: u64) -> Self {
        self.preview_limit = limit;
        self.preview = self
            .definition
            .id
            .map(|id| PreviewSession::with_limit(id, limit));
        self
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn data_source_id(&self) -> Option<DataSourceId> {
        self.definition.data_source_id
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.projection.catalog()
    }

    pub fn is_catalog_loading(&self) -> bool {
        self.data_source_id()
            .is_some_and(|id| self.catalogs.is_loading(id))
    }

    /// Fetch the catalog of `data_source_id` and reconcile against it.
    ///
    /// Returns `None` if a newer fetch for the same source superseded this
    /// one. A failed fetch records a warning; unless it failed for the
    /// source already installed, the empty catalog is installed and every
    /// reference is reconciled against it.
    pub async fn select_data_source(
        &mut self,
        provider: &dyn CatalogProvider,
        data_source_id: DataSourceId,
    ) -> Option<InvalidationReport> {
        let outcome = self.catalogs.load(provider, data_source_id, false).await;
        self.apply_fetch(outcome)
    }

    /// Refetch the current data source's catalog and reconcile again.
    pub async fn refresh_catalog(
        &mut self,
        provider: &dyn CatalogProvider,
    ) -> Option<InvalidationReport> {
        let data_source_id = self.data_source_id()?;
        let outcome = self.catalogs.load(provider, data_source_id, true).await;
        self.apply_fetch(outcome)
    }

    fn apply_fetch(&mut self, outcome: FetchOutcome) -> Option<InvalidationReport> {
        match outcome {
            FetchOutcome::Stale => None,
            FetchOutcome::Cached(catalog) | FetchOutcome::Fetched(catalog) => {
                Some(self.on_data_source_changed(catalog))
            }
            FetchOutcome::Failed { catalog, error } => {
                self.notices.push(Notice::warning(
                    NoticeKind::CatalogFetchFailed,
                    format!("Could not load fields: {}", error),
                ));
                // A failed refresh keeps the installed snapshot; every other
                // failure switches to the empty catalog and reconciles.
                if catalog.data_source_id() == self.catalog().data_source_id() {
                    return Some(InvalidationReport::default());
                }
                Some(self.on_data_source_changed(catalog))
            }
        }
    }

    fn install(&mut self, catalog: Arc<Catalog>) {
        self.definition.data_source_id = catalog.data_source_id();
        self.projection.set_data_source(catalog.clone(), self.mode);
        self.filters.set_catalog(catalog);
    }

    /// Install a catalog snapshot and reconcile projection and filters.
    ///
    /// Call exactly once per data-source change or catalog refresh.
    pub fn on_data_source_changed(&mut self, catalog: Arc<Catalog>) -> InvalidationReport {
        self.install(catalog.clone());

        let report = invalidation::reconcile(&catalog, &mut self.projection, &mut self.filters);
        info!(
            data_source_id = ?catalog.data_source_id(),
            fields = catalog.len(),
            corrections = !report.is_empty(),
            "data source changed"
        );
        self.notices.extend(report.notices());
        report
    }

    pub fn projection(&self) -> &FieldProjection {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut FieldProjection {
        &mut self.projection
    }

    pub fn filters(&self) -> &FilterConditionBuilder {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterConditionBuilder {
        &mut self.filters
    }

    pub fn filter_enabled(&self) -> bool {
        self.filter_enabled
    }

    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.filter_enabled = enabled;
    }

    /// Current filter configuration, as it would be persisted.
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::new(self.filter_enabled, self.filters.conditions().to_vec())
    }

    /// Transport form of the current filter, if one should be sent.
    pub fn serialized_filter(&self) -> Option<SerializedFilter> {
        self.filter_config().serialized()
    }

    /// The whole definition, ready for the definition store.
    pub fn definition(&self) -> ReportTypeDefinition {
        ReportTypeDefinition {
            fields: self.projection.field_ids().to_vec(),
            filter_config: self.filter_config(),
            ..self.definition.clone()
        }
    }

    /// Adopt the id assigned by the store after the first save.
    pub fn mark_saved(&mut self, id: DefinitionId) {
        self.definition.id = Some(id);
        self.mode = EditMode::Edit;
        if self.preview.as_ref().map(|p| p.definition_id()) != Some(id) {
            self.preview = Some(PreviewSession::with_limit(id, self.preview_limit));
        }
    }

    pub fn preview(&self) -> Option<&PreviewSession> {
        self.preview.as_ref()
    }

    /// Request a preview of the saved definition.
    ///
    /// Returns `None` when the definition has never been saved.
    pub async fn request_preview(
        &mut self,
        backend: &dyn PreviewBackend,
        apply_filters: bool,
    ) -> Option<PreviewOutcome> {
        let config = self.filter_config();
        let Some(preview) = self.preview.as_mut() else {
            warn!("preview requested for an unsaved definition");
            return None;
        };
        let outcome = preview.request(backend, apply_filters, &config).await;
        if let PreviewOutcome::Failed(notice) = &outcome {
            self.notices.push(notice.clone());
        }
        Some(outcome)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand the accumulated notices to the caller and forget them.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
