//! Filter condition model.
//!
//! A report's default filter is a flat, AND-combined list of
//! [`FilterCondition`]s. This module holds the operator taxonomy, the value
//! union, the editable builder, and the two external forms: the persisted
//! [`FilterConfig`] blob and the [`SerializedFilter`] sent to the executor.
//!
//! ```text
//! FilterConditionBuilder ──(conditions)──► FilterConfig ──► default_config.filter_config
//!          │                                    │
//!          │ operators_for(data type)           └──► serialize() ──► "filters" param
//!          ▼
//!     operator taxonomy
//! ```

mod builder;
mod condition;
mod config;
pub mod operator;
mod serialize;
mod value;

pub use builder::FilterConditionBuilder;
pub use condition::{ConditionId, ConditionPatch, FilterCondition};
pub use config::FilterConfig;
pub use operator::{operators_for, Operator, OperatorSpec, ValueShape};
pub use serialize::{
    is_serializable, serialize, serialize_param, LogicOperator, SerializedCondition,
    SerializedFilter, FILTERS_PARAM,
};
pub use value::{Bound, FilterValue, ValueType};
