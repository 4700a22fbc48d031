//! Preview of a report's output, raw or with the default filter applied.
//!
//! Each request takes a [`PreviewTicket`] with a sequence number. Only the
//! latest ticket may commit state, so a slow response that resolves after a
//! newer one is dropped instead of overwriting it.
//!
//! ```text
//!            begin(raw)             complete(ok)
//!   idle ───────────────► loading ──────────────► raw
//!     │                     ▲  │
//!     │ begin(filtered)     │  │ complete(ok)
//!     └─────────────────────┘  └────────────► filtered
//! ```

mod backend;

pub use backend::{ExecutorPreviewBackend, PreviewBackend, PreviewPage, PreviewRequest};

use tracing::{debug, warn};

use crate::cache::fingerprint;
use crate::executor::ExecutorResult;
use crate::filter::FilterConfig;
use crate::model::DefinitionId;
use crate::notice::{Notice, NoticeKind};

/// Default number of rows in a preview sample.
pub const DEFAULT_PREVIEW_LIMIT: u64 = 20;

/// Ephemeral state of the last committed preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewState {
    pub items: Vec<serde_json::Value>,
    pub total: u64,
    /// Which mode was last requested successfully.
    pub filters_applied: bool,
    pub loading: bool,
    /// Fingerprint of the `filters` parameter the committed rows were
    /// fetched with; `None` when no parameter was sent.
    pub filter_fingerprint: Option<String>,
}

/// Handle for one in-flight preview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTicket {
    pub seq: u64,
    pub apply_filters: bool,
    pub request: PreviewRequest,
}

/// What happened to a completed request.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Committed,
    Failed(Notice),
    /// A newer request was issued; this response was discarded.
    Stale,
}

/// Preview state machine for one report definition.
#[derive(Debug)]
pub struct PreviewSession {
    definition_id: DefinitionId,
    limit: u64,
    state: PreviewState,
    latest_seq: u64,
    /// Whether `state` holds rows from a successful request.
    committed: bool,
}

impl PreviewSession {
    pub fn new(definition_id: DefinitionId) -> Self {
        Self::with_limit(definition_id, DEFAULT_PREVIEW_LIMIT)
    }

    pub fn with_limit(definition_id: DefinitionId, limit: u64) -> Self {
        Self {
            definition_id,
            limit,
            state: PreviewState::default(),
            latest_seq: 0,
            committed: false,
        }
    }

    pub fn definition_id(&self) -> DefinitionId {
        self.definition_id
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Start a request, superseding any request still in flight.
    ///
    /// The filter is sent only when `apply_filters` is set and the config is
    /// enabled with at least one condition; otherwise the parameter is
    /// omitted entirely.
    pub fn begin(&mut self, apply_filters: bool, config: &FilterConfig) -> PreviewTicket {
        self.latest_seq += 1;
        self.state.loading = true;

        let filters = if apply_filters && config.is_active() {
            config.to_param()
        } else {
            None
        };

        debug!(
            definition_id = %self.definition_id,
            seq = self.latest_seq,
            apply_filters,
            with_filters = filters.is_some(),
            "preview requested"
        );

        PreviewTicket {
            seq: self.latest_seq,
            apply_filters,
            request: PreviewRequest {
                definition_id: self.definition_id,
                skip: 0,
                limit: self.limit,
                filters,
            },
        }
    }

    /// Commit a response if it belongs to the latest request.
    pub fn complete(
        &mut self,
        ticket: PreviewTicket,
        result: ExecutorResult<PreviewPage>,
    ) -> PreviewOutcome {
        if ticket.seq != self.latest_seq {
            debug!(seq = ticket.seq, latest = self.latest_seq, "dropping stale preview response");
            return PreviewOutcome::Stale;
        }

        match result {
            Ok(page) => {
                self.state = PreviewState {
                    items: page.items,
                    total: page.total,
                    filters_applied: ticket.apply_filters,
                    loading: false,
                    filter_fingerprint: ticket.request.filters.as_deref().map(fingerprint),
                };
                self.committed = true;
                PreviewOutcome::Committed
            }
            Err(error) => {
                warn!(definition_id = %self.definition_id, %error, "preview failed");
                self.state = PreviewState::default();
                self.committed = false;
                PreviewOutcome::Failed(Notice::error(
                    NoticeKind::PreviewFailed,
                    format!("Preview failed: {}", error),
                ))
            }
        }
    }

    /// Issue a request and commit its response.
    pub async fn request(
        &mut self,
        backend: &dyn PreviewBackend,
        apply_filters: bool,
        config: &FilterConfig,
    ) -> PreviewOutcome {
        let ticket = self.begin(apply_filters, config);
        let result = backend.preview_rows(&ticket.request).await;
        self.complete(ticket, result)
    }

    /// Whether the committed rows were fetched with exactly the filter that
    /// `config` would send now.
    pub fn is_current_for(&self, apply_filters: bool, config: &FilterConfig) -> bool {
        if !self.committed || self.state.loading || self.state.filters_applied != apply_filters {
            return false;
        }
        let expected = if apply_filters && config.is_active() {
            config.to_param().as_deref().map(fingerprint)
        } else {
            None
        };
        expected == self.state.filter_fingerprint
    }
}
