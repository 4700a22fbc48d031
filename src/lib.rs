//! # Quill
//!
//! Field projection and filter configuration for report type definitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Report executor process                 │
//! │        (catalog.fields, preview.rows, definition.*)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │ NDJSON
//!                          ▼ [executor]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Catalog snapshot (per data source)            │
//! │                 [catalog] + [cache]                      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [session]
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │     [projection]         │   │  [filter] conditions     │
//! │  ordered output fields   │   │  + operator classifier   │
//! └──────────────────────────┘   └──────────────────────────┘
//!              └──── [invalidation] on catalog change ────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │   Serialized filter ─► [preview]   Definition ─► [model] │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod executor;
pub mod filter;
pub mod invalidation;
pub mod logging;
pub mod model;
pub mod notice;
pub mod preview;
pub mod projection;
pub mod session;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogProvider, DataSourceId, DataType, Field, FieldId};
    pub use crate::filter::{
        operators_for, ConditionId, ConditionPatch, FilterCondition, FilterConditionBuilder,
        FilterConfig, FilterValue, Operator, ValueShape,
    };
    pub use crate::invalidation::{reconcile, InvalidationReport};
    pub use crate::model::{DefinitionId, DefinitionStore, ReportTypeDefinition};
    pub use crate::notice::{Notice, NoticeKind, NoticeLevel};
    pub use crate::preview::{PreviewBackend, PreviewOutcome, PreviewSession};
    pub use crate::projection::{EditMode, FieldProjection};
    pub use crate::session::EditingSession;
}
