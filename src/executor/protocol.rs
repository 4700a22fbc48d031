//! Protocol types for executor communication.
//!
//! Every request is one NDJSON line carrying a [`RequestEnvelope`]; the
//! executor answers with one [`ResponseEnvelope`] per request, correlated by
//! `id`. Responses may arrive in any order.

use serde::{Deserialize, Serialize};

use crate::model::DefinitionRecord;

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the executor.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (e.g., "catalog.fields").
    pub method: String,
    /// Method-specific parameters.
    pub params: serde_json::Value,
}

/// Response envelope received from the executor.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// Parameters for `catalog.fields`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldsParams {
    pub data_source_id: u64,
}

/// One field as reported by the executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub localized_name: Option<String>,
    /// Raw type name (e.g., "varchar", "integer", "date").
    pub data_type: String,
    #[serde(default = "default_true")]
    pub is_filterable: bool,
    #[serde(default = "default_true")]
    pub is_sortable: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

fn default_true() -> bool {
    true
}

/// Response for `catalog.fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldsResponse {
    pub fields: Vec<FieldRecord>,
}

// ============================================================================
// Preview
// ============================================================================

/// Parameters for `preview.rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRowsParams {
    pub definition_id: u64,
    pub skip: u64,
    pub limit: u64,
    /// Serialized filter expression; omitted entirely when no filter applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

/// Response for `preview.rows`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRowsResponse {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub total: u64,
}

// ============================================================================
// Definitions
// ============================================================================

/// Parameters for `definition.list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListDefinitionsParams {
    pub skip: u64,
    pub limit: u64,
}

/// Response for `definition.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListDefinitionsResponse {
    #[serde(default)]
    pub items: Vec<DefinitionRecord>,
    #[serde(default)]
    pub total: u64,
}

/// Parameters for `definition.get` and `definition.delete`.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionIdParams {
    pub id: u64,
}

/// Parameters for `definition.create` and `definition.update`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveDefinitionParams {
    pub definition: DefinitionRecord,
}

/// Response for `definition.get`, `definition.create` and `definition.update`.
#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionResponse {
    pub definition: DefinitionRecord,
}

/// Response for `definition.delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteDefinitionResponse {
    #[serde(default)]
    pub deleted: bool,
}

// ============================================================================
// Method Constants
// ============================================================================

/// Method names for executor requests.
pub mod methods {
    pub const CATALOG_FIELDS: &str = "catalog.fields";
    pub const PREVIEW_ROWS: &str = "preview.rows";
    pub const LIST_DEFINITIONS: &str = "definition.list";
    pub const GET_DEFINITION: &str = "definition.get";
    pub const CREATE_DEFINITION: &str = "definition.create";
    pub const UPDATE_DEFINITION: &str = "definition.update";
    pub const DELETE_DEFINITION: &str = "definition.delete";
}
