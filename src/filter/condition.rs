//! Filter conditions and their persisted form.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operator::Operator;
use super::value::{FilterValue, ValueType};

/// Client-generated, opaque condition identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(pub String);

impl ConditionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConditionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One comparison clause of a report's default filter.
///
/// `operator` is unset only while `field_name` is unset, and `value` is
/// always shaped for `operator` (see [`FilterValue::coerce`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConditionRecord", into = "ConditionRecord")]
pub struct FilterCondition {
    pub id: ConditionId,
    pub field_name: Option<String>,
    /// Label of the referenced field, mirrored from the catalog.
    pub display_name: Option<String>,
    pub operator: Option<Operator>,
    pub value: FilterValue,
    pub value_type: ValueType,
    pub is_required: bool,
    pub is_visible: bool,
    pub description: String,
}

impl FilterCondition {
    /// A blank condition: no field, `equals`, empty value.
    pub fn new(id: ConditionId) -> Self {
        let operator = Operator::Equals;
        Self {
            id,
            field_name: None,
            display_name: None,
            operator: Some(operator),
            value: FilterValue::empty_for(operator.value_shape()),
            value_type: ValueType::Static,
            is_required: false,
            is_visible: true,
            description: String::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    /// Set the operator and reshape the value to fit it.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.set_operator(operator);
        self
    }

    /// Set the value, reshaped to the current operator.
    pub fn with_value(mut self, value: FilterValue) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn set_operator(&mut self, operator: Operator) {
        self.operator = Some(operator);
        let value = std::mem::take(&mut self.value);
        self.value = value.coerce(operator.value_shape());
    }

    pub fn set_value(&mut self, value: FilterValue) {
        self.value = match self.operator {
            Some(op) => value.coerce(op.value_shape()),
            None => FilterValue::None,
        };
    }

    /// Drop the field reference together with operator and value.
    ///
    /// Description and flags are kept so the user's work on the slot survives.
    pub fn clear_field(&mut self) {
        self.field_name = None;
        self.display_name = None;
        self.operator = None;
        self.value = FilterValue::None;
    }

    pub fn has_field(&self) -> bool {
        self.field_name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// Partial update for a condition; `None` members are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionPatch {
    /// `Some(None)` clears the field reference.
    pub field_name: Option<Option<String>>,
    pub operator: Option<Operator>,
    pub value: Option<FilterValue>,
    pub value_type: Option<ValueType>,
    pub is_required: Option<bool>,
    pub is_visible: Option<bool>,
    pub description: Option<String>,
}

impl ConditionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(Some(name.into()));
        self
    }

    pub fn clear_field(mut self) -> Self {
        self.field_name = Some(None);
        self
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn value(mut self, value: FilterValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.is_required = Some(required);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.is_visible = Some(visible);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Persisted shape of a condition inside `default_filters.conditions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConditionRecord {
    id: ConditionId,
    #[serde(default)]
    field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(default)]
    operator: Option<Operator>,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    value_type: ValueType,
    #[serde(default)]
    is_required: bool,
    #[serde(default = "default_visible")]
    is_visible: bool,
    #[serde(default)]
    description: String,
}

fn default_visible() -> bool {
    true
}

impl From<ConditionRecord> for FilterCondition {
    fn from(record: ConditionRecord) -> Self {
        let field_name = record.field_name.filter(|name| !name.is_empty());
        let operator = record.operator;
        let value = match operator {
            Some(op) => FilterValue::from_json(&record.value, op.value_shape()),
            None => FilterValue::None,
        };
        Self {
            id: record.id,
            field_name,
            display_name: record.display_name,
            operator,
            value,
            value_type: record.value_type,
            is_required: record.is_required,
            is_visible: record.is_visible,
            description: record.description,
        }
    }
}

impl From<FilterCondition> for ConditionRecord {
    fn from(condition: FilterCondition) -> Self {
        Self {
            value: condition.value.to_json(),
            id: condition.id,
            field_name: condition.field_name,
            display_name: condition.display_name,
            operator: condition.operator,
            value_type: condition.value_type,
            is_required: condition.is_required,
            is_visible: condition.is_visible,
            description: condition.description,
        }
    }
}
