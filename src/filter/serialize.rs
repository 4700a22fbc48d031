//! Transport form of the filter sent to the executor.
//!
//! Output is deterministic: the same condition list always produces the same
//! bytes, which lets the preview layer compare filter states by fingerprint.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::condition::FilterCondition;
use super::operator::{Operator, ValueShape};
use super::value::ValueType;

/// Name of the query parameter carrying the serialized filter.
pub const FILTERS_PARAM: &str = "filters";

/// How conditions are combined. Only flat conjunction exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicOperator {
    #[default]
    #[serde(rename = "AND")]
    And,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedCondition {
    pub field_name: String,
    pub operator: Operator,
    pub value: Value,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedFilter {
    pub logic_operator: LogicOperator,
    pub conditions: Vec<SerializedCondition>,
}

impl SerializedFilter {
    /// The string sent as the `filters` query parameter.
    pub fn to_param(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SerializedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Whether a condition is complete enough to be sent.
///
/// Needs a field and an operator; operators that take a value also need a
/// present value (see [`FilterValue::is_present`](super::FilterValue::is_present)).
pub fn is_serializable(condition: &FilterCondition) -> bool {
    let Some(op) = condition.operator else {
        return false;
    };
    if !condition.has_field() {
        return false;
    }
    op.value_shape() == ValueShape::None || condition.value.is_present()
}

/// Serialize the complete conditions, in order.
///
/// Returns `None` when nothing survives, in which case the caller must omit
/// the filter parameter rather than send an empty filter.
pub fn serialize(conditions: &[FilterCondition]) -> Option<SerializedFilter> {
    let conditions: Vec<SerializedCondition> = conditions
        .iter()
        .filter(|c| is_serializable(c))
        .filter_map(|c| {
            let operator = c.operator?;
            let value = if operator.value_shape() == ValueShape::None {
                Value::Null
            } else {
                c.value.to_wire_json()
            };
            Some(SerializedCondition {
                field_name: c.field_name.clone()?,
                operator,
                value,
                value_type: c.value_type,
            })
        })
        .collect();

    if conditions.is_empty() {
        None
    } else {
        Some(SerializedFilter {
            logic_operator: LogicOperator::And,
            conditions,
        })
    }
}

/// Serialize straight to the query parameter string.
pub fn serialize_param(conditions: &[FilterCondition]) -> Option<String> {
    serialize(conditions).map(|filter| filter.to_param())
}
