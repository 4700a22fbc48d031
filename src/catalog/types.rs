//! Field catalog types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::executor::protocol::FieldRecord;

/// Identifier of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourceId(pub u64);

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a field, stable within one data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared data type of a field.
///
/// The executor reports raw type names; common SQL spellings are folded into
/// the six known categories and anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    Text,
    Integer,
    Decimal,
    Date,
    Timestamp,
    Boolean,
    Other(String),
}

impl DataType {
    /// Parse a raw type name. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "varchar" | "char" | "nvarchar" | "nchar" => DataType::Text,
            "integer" | "int" | "bigint" | "smallint" | "tinyint" => DataType::Integer,
            "decimal" | "numeric" | "float" | "double" | "real" | "money" => DataType::Decimal,
            "date" => DataType::Date,
            "timestamp" | "datetime" | "datetime2" | "timestamptz" => DataType::Timestamp,
            "boolean" | "bool" | "bit" => DataType::Boolean,
            _ => DataType::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DataType::Text => "text",
            DataType::Integer => "integer",
            DataType::Decimal => "decimal",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::Boolean => "boolean",
            DataType::Other(raw) => raw,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Decimal)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Timestamp)
    }
}

impl From<String> for DataType {
    fn from(raw: String) -> Self {
        DataType::parse(&raw)
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.as_str().to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    /// Source column identifier.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    pub data_type: DataType,
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

impl Field {
    /// Create a filterable, sortable, visible field.
    pub fn new(id: u64, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: FieldId(id),
            name: name.into(),
            alias: None,
            localized_name: None,
            data_type,
            is_filterable: true,
            is_sortable: true,
            is_visible: true,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_localized_name(mut self, name: impl Into<String>) -> Self {
        self.localized_name = Some(name.into());
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.is_filterable = filterable;
        self
    }

    /// Human label: alias, then localized name, then the column name.
    pub fn display_name(&self) -> &str {
        self.alias
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.localized_name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(&self.name)
    }
}

impl From<FieldRecord> for Field {
    fn from(record: FieldRecord) -> Self {
        Self {
            id: FieldId(record.id),
            name: record.name,
            alias: record.alias,
            localized_name: record.localized_name,
            data_type: DataType::parse(&record.data_type),
            is_filterable: record.is_filterable,
            is_sortable: record.is_sortable,
            is_visible: record.is_visible,
        }
    }
}

/// Immutable snapshot of a data source's fields.
///
/// Superseded wholesale whenever the data source changes or is refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// `None` until a data source has been selected.
    data_source_id: Option<DataSourceId>,
    fields: Vec<Field>,
    by_id: HashMap<FieldId, usize>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build a snapshot. On duplicate ids or names the first field wins.
    pub fn new(data_source_id: DataSourceId, fields: Vec<Field>) -> Self {
        let mut by_id = HashMap::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            by_id.entry(field.id).or_insert(idx);
            by_name.entry(field.name.clone()).or_insert(idx);
        }
        Self {
            data_source_id: Some(data_source_id),
            fields,
            by_id,
            by_name,
        }
    }

    pub fn empty(data_source_id: DataSourceId) -> Self {
        Self::new(data_source_id, Vec::new())
    }

    /// The empty catalog of a definition with no data source yet.
    pub fn unbound() -> Self {
        Self {
            data_source_id: None,
            fields: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn data_source_id(&self) -> Option<DataSourceId> {
        self.data_source_id
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.by_id.get(&id).map(|&idx| &self.fields[idx])
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Fields that may be referenced by a filter condition.
    pub fn filterable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_filterable)
    }

    /// Look up a field by name, only if it is filterable.
    pub fn filterable_field(&self, name: &str) -> Option<&Field> {
        self.field_by_name(name).filter(|f| f.is_filterable)
    }
}
