//! Filter condition values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operator::ValueShape;

/// A condition's value, tagged by the shape its operator expects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
    /// Lower and upper bound; either may be empty while being edited.
    Range(String, String),
}

/// Which end of a range to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

/// Where a condition's value comes from. Only literal values exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Static,
}

impl FilterValue {
    pub fn single(value: impl Into<String>) -> Self {
        FilterValue::Single(value.into())
    }

    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::Multiple(values.into_iter().map(Into::into).collect())
    }

    pub fn range(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        FilterValue::Range(lower.into(), upper.into())
    }

    /// The blank value an editor of this shape starts with.
    pub fn empty_for(shape: ValueShape) -> Self {
        match shape {
            ValueShape::None => FilterValue::None,
            ValueShape::Single => FilterValue::Single(String::new()),
            ValueShape::Multiple => FilterValue::Multiple(Vec::new()),
            ValueShape::Range => FilterValue::Range(String::new(), String::new()),
        }
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            FilterValue::None => ValueShape::None,
            FilterValue::Single(_) => ValueShape::Single,
            FilterValue::Multiple(_) => ValueShape::Multiple,
            FilterValue::Range(_, _) => ValueShape::Range,
        }
    }

    /// Convert to another shape, keeping whatever input the target can hold.
    pub fn coerce(self, shape: ValueShape) -> Self {
        if self.shape() == shape {
            return self;
        }
        match (self, shape) {
            (_, ValueShape::None) => FilterValue::None,
            (FilterValue::None, shape) => FilterValue::empty_for(shape),

            (FilterValue::Single(s), ValueShape::Multiple) => {
                FilterValue::Multiple(if s.is_empty() { Vec::new() } else { vec![s] })
            }
            (FilterValue::Single(s), ValueShape::Range) => FilterValue::Range(s, String::new()),

            (FilterValue::Multiple(values), ValueShape::Single) => {
                FilterValue::Single(values.into_iter().next().unwrap_or_default())
            }
            (FilterValue::Multiple(values), ValueShape::Range) => {
                let mut it = values.into_iter();
                FilterValue::Range(it.next().unwrap_or_default(), it.next().unwrap_or_default())
            }

            (FilterValue::Range(lower, _), ValueShape::Single) => FilterValue::Single(lower),
            (FilterValue::Range(lower, upper), ValueShape::Multiple) => FilterValue::Multiple(
                [lower, upper].into_iter().filter(|s| !s.is_empty()).collect(),
            ),

            (value, _) => value,
        }
    }

    /// Whether the value is filled in enough to be sent to the executor.
    ///
    /// Blank strings count as absent; a range needs both bounds; a list
    /// needs at least one non-blank entry.
    pub fn is_present(&self) -> bool {
        match self {
            FilterValue::None => false,
            FilterValue::Single(s) => !is_blank(s),
            FilterValue::Multiple(values) => values.iter().any(|s| !is_blank(s)),
            FilterValue::Range(lower, upper) => !is_blank(lower) && !is_blank(upper),
        }
    }

    /// Exact JSON form used in persisted definitions.
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::None => Value::Null,
            FilterValue::Single(s) => Value::String(s.clone()),
            FilterValue::Multiple(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
            FilterValue::Range(lower, upper) => Value::Array(vec![
                Value::String(lower.clone()),
                Value::String(upper.clone()),
            ]),
        }
    }

    /// JSON form sent to the executor: blank list entries are dropped.
    pub fn to_wire_json(&self) -> Value {
        match self {
            FilterValue::Multiple(values) => Value::Array(
                values
                    .iter()
                    .filter(|s| !is_blank(s))
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
            other => other.to_json(),
        }
    }

    /// Read a persisted JSON value into the given shape.
    ///
    /// Numbers and booleans are kept as their textual form; nested
    /// structures are not scalars and are discarded.
    pub fn from_json(value: &Value, shape: ValueShape) -> Self {
        let raw = match value {
            Value::Null => FilterValue::None,
            Value::Array(items) => {
                FilterValue::Multiple(items.iter().filter_map(scalar_to_string).collect())
            }
            scalar => match scalar_to_string(scalar) {
                Some(s) => FilterValue::Single(s),
                None => FilterValue::None,
            },
        };
        match (raw, shape) {
            // A persisted two-element array is a range, not a list
            (FilterValue::Multiple(values), ValueShape::Range) => {
                let mut it = values.into_iter();
                FilterValue::Range(it.next().unwrap_or_default(), it.next().unwrap_or_default())
            }
            (raw, shape) => raw.coerce(shape),
        }
    }

    /// Append an entry to a list value.
    pub fn push_entry(&mut self, entry: impl Into<String>) -> bool {
        match self {
            FilterValue::Multiple(values) => {
                values.push(entry.into());
                true
            }
            _ => false,
        }
    }

    /// Remove an entry from a list value by position.
    pub fn remove_entry(&mut self, index: usize) -> bool {
        match self {
            FilterValue::Multiple(values) if index < values.len() => {
                values.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Set one bound of a range value.
    pub fn set_bound(&mut self, bound: Bound, value: impl Into<String>) -> bool {
        match (self, bound) {
            (FilterValue::Range(lower, _), Bound::Lower) => {
                *lower = value.into();
                true
            }
            (FilterValue::Range(_, upper), Bound::Upper) => {
                *upper = value.into();
                true
            }
            _ => false,
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
