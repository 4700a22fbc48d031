//! Filter configuration of a report definition and its persisted layout.
//!
//! Persisted under `default_config.filter_config`:
//!
//! ```json
//! {
//!   "enabled": true,
//!   "default_filters": { "logic_operator": "AND", "conditions": [ ... ] },
//!   "user_configurable_filters": []
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::condition::FilterCondition;
use super::serialize::{self, LogicOperator, SerializedFilter};

/// Default filter of one report definition.
///
/// When `enabled` is false the conditions are kept but neither enforced nor
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FilterConfigBlob", into = "FilterConfigBlob")]
pub struct FilterConfig {
    pub enabled: bool,
    pub conditions: Vec<FilterCondition>,
}

impl FilterConfig {
    pub fn new(enabled: bool, conditions: Vec<FilterCondition>) -> Self {
        Self {
            enabled,
            conditions,
        }
    }

    /// Enabled and holding at least one condition.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.conditions.is_empty()
    }

    /// Transport form of the filter, or `None` if nothing should be sent.
    pub fn serialized(&self) -> Option<SerializedFilter> {
        if !self.is_active() {
            return None;
        }
        serialize::serialize(&self.conditions)
    }

    /// The `filters` query parameter value, or `None` if it must be omitted.
    pub fn to_param(&self) -> Option<String> {
        self.serialized().map(|filter| filter.to_param())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DefaultFilters {
    #[serde(default)]
    logic_operator: LogicOperator,
    #[serde(default)]
    conditions: Vec<FilterCondition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FilterConfigBlob {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    default_filters: DefaultFilters,
    /// Reserved; always written empty and ignored on read.
    #[serde(default)]
    user_configurable_filters: Vec<serde_json::Value>,
}

impl From<FilterConfigBlob> for FilterConfig {
    fn from(blob: FilterConfigBlob) -> Self {
        Self {
            enabled: blob.enabled,
            conditions: blob.default_filters.conditions,
        }
    }
}

impl From<FilterConfig> for FilterConfigBlob {
    fn from(config: FilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            default_filters: DefaultFilters {
                logic_operator: LogicOperator::And,
                conditions: config.conditions,
            },
            user_configurable_filters: Vec::new(),
        }
    }
}
