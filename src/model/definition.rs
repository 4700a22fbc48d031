// src/model/definition.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::catalog::{DataSourceId, FieldId};
use crate::executor::ExecutorError;
use crate::filter::FilterConfig;
use crate::notice::{Notice, NoticeKind};
use crate::projection::{join_field_ids, split_field_ids};

/// Key of the filter configuration inside `default_config`.
pub const FILTER_CONFIG_KEY: &str = "filter_config";

/// Identifier of a stored report definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(pub u64);

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("default_config must be a JSON object")]
    ConfigNotObject,

    #[error("invalid filter configuration: {0}")]
    FilterConfig(#[source] serde_json::Error),

    #[error("failed to encode definition: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// A definition as stored by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DefinitionId>,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub data_source_id: Option<DataSourceId>,
    /// Projection as comma-separated field ids.
    #[serde(default)]
    pub fields: String,
    /// Opaque configuration blob; the filter lives under `filter_config`.
    #[serde(default)]
    pub default_config: Value,
}

/// A report type: data source, output columns and default filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportTypeDefinition {
    pub id: Option<DefinitionId>,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub data_source_id: Option<DataSourceId>,
    pub fields: Vec<FieldId>,
    pub filter_config: FilterConfig,
    /// Keys of `default_config` other than `filter_config`, kept verbatim.
    pub extra_config: Map<String, Value>,
}

impl ReportTypeDefinition {
    /// A fresh definition with no data source.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Encode for the executor's definition endpoint.
    pub fn to_record(&self) -> Result<DefinitionRecord, DefinitionError> {
        let mut config = self.extra_config.clone();
        let filter_config =
            serde_json::to_value(&self.filter_config).map_err(DefinitionError::Encode)?;
        config.insert(FILTER_CONFIG_KEY.to_string(), filter_config);

        Ok(DefinitionRecord {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            data_source_id: self.data_source_id,
            fields: join_field_ids(&self.fields),
            default_config: Value::Object(config),
        })
    }

    /// Decode a stored definition.
    ///
    /// Unreadable field ids are skipped and reported as notices; a missing
    /// `filter_config` yields a disabled, empty filter.
    pub fn from_record(record: DefinitionRecord) -> Result<(Self, Vec<Notice>), DefinitionError> {
        let mut notices = Vec::new();

        let mut extra_config = match record.default_config {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => return Err(DefinitionError::ConfigNotObject),
        };

        let filter_config = match extra_config.remove(FILTER_CONFIG_KEY) {
            None | Some(Value::Null) => FilterConfig::default(),
            Some(value) => {
                serde_json::from_value(value).map_err(DefinitionError::FilterConfig)?
            }
        };

        let (fields, rejected) = split_field_ids(&record.fields);
        if !rejected.is_empty() {
            warn!(code = %record.code, ?rejected, "skipping unreadable field ids");
            notices.push(Notice::warning(
                NoticeKind::DefinitionRepaired,
                format!("{} unreadable field ids were skipped", rejected.len()),
            ));
        }

        let definition = Self {
            id: record.id,
            code: record.code,
            name: record.name,
            category: record.category,
            data_source_id: record.data_source_id,
            fields,
            filter_config,
            extra_config,
        };
        Ok((definition, notices))
    }
}
