//! Comparison operator taxonomy and per-type classification.
//!
//! [`operators_for`] is total: every data type, including unrecognized ones,
//! maps to a non-empty ordered list. The first entry is the type's default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::DataType;

/// Shape of the value an operator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueShape {
    /// No value; the input is disabled.
    None,
    /// One scalar.
    Single,
    /// Open-ended list of scalars.
    Multiple,
    /// Lower and upper bound.
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    Between,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsNull,
    IsNotNull,
    DateEquals,
    DateBefore,
    DateAfter,
    DateRange,
}

use Operator::*;

const TEXT_OPERATORS: &[Operator] = &[
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    Between,
    IsNull,
    IsNotNull,
];

const NUMERIC_OPERATORS: &[Operator] = &[
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    Between,
    IsNull,
    IsNotNull,
];

const TEMPORAL_OPERATORS: &[Operator] = &[
    Equals,
    NotEquals,
    DateEquals,
    DateBefore,
    DateAfter,
    DateRange,
    IsNull,
    IsNotNull,
];

impl Operator {
    /// Every operator, in canonical order.
    pub const ALL: [Operator; 19] = [
        Equals,
        NotEquals,
        GreaterThan,
        GreaterThanOrEqual,
        LessThan,
        LessThanOrEqual,
        In,
        NotIn,
        Between,
        Contains,
        NotContains,
        StartsWith,
        EndsWith,
        IsNull,
        IsNotNull,
        DateEquals,
        DateBefore,
        DateAfter,
        DateRange,
    ];

    pub fn value_shape(self) -> ValueShape {
        match self {
            IsNull | IsNotNull => ValueShape::None,
            In | NotIn => ValueShape::Multiple,
            Between | DateRange => ValueShape::Range,
            _ => ValueShape::Single,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Equals => "Equals",
            NotEquals => "Not equals",
            GreaterThan => "Greater than",
            GreaterThanOrEqual => "Greater than or equal",
            LessThan => "Less than",
            LessThanOrEqual => "Less than or equal",
            In => "In list",
            NotIn => "Not in list",
            Between => "Between",
            Contains => "Contains",
            NotContains => "Does not contain",
            StartsWith => "Starts with",
            EndsWith => "Ends with",
            IsNull => "Is empty",
            IsNotNull => "Is not empty",
            DateEquals => "On date",
            DateBefore => "Before",
            DateAfter => "After",
            DateRange => "Date range",
        }
    }

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Equals => "equals",
            NotEquals => "not_equals",
            GreaterThan => "greater_than",
            GreaterThanOrEqual => "greater_than_or_equal",
            LessThan => "less_than",
            LessThanOrEqual => "less_than_or_equal",
            In => "in",
            NotIn => "not_in",
            Between => "between",
            Contains => "contains",
            NotContains => "not_contains",
            StartsWith => "starts_with",
            EndsWith => "ends_with",
            IsNull => "is_null",
            IsNotNull => "is_not_null",
            DateEquals => "date_equals",
            DateBefore => "date_before",
            DateAfter => "date_after",
            DateRange => "date_range",
        }
    }

    pub fn spec(self) -> OperatorSpec {
        OperatorSpec {
            operator: self,
            label: self.label(),
            value_shape: self.value_shape(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operator: {}", s))
    }
}

/// An operator as offered to the user for one field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSpec {
    pub operator: Operator,
    pub label: &'static str,
    pub value_shape: ValueShape,
}

/// Legal operators for a data type, default first.
pub fn operator_set(data_type: &DataType) -> &'static [Operator] {
    if data_type.is_temporal() {
        TEMPORAL_OPERATORS
    } else if data_type.is_numeric() {
        NUMERIC_OPERATORS
    } else {
        TEXT_OPERATORS
    }
}

/// Legal operators for a data type with their labels and value shapes.
pub fn operators_for(data_type: &DataType) -> Vec<OperatorSpec> {
    operator_set(data_type).iter().map(|op| op.spec()).collect()
}

pub fn is_legal(data_type: &DataType, operator: Operator) -> bool {
    operator_set(data_type).contains(&operator)
}

/// The operator a condition falls back to when its field changes type.
pub fn default_operator(data_type: &DataType) -> Operator {
    operator_set(data_type)[0]
}
