//! Ordered, editable list of filter conditions.

use std::sync::Arc;

use tracing::debug;

use super::condition::{ConditionId, ConditionPatch, FilterCondition};
use super::operator::{self, OperatorSpec};
use super::value::{Bound, FilterValue};
use crate::catalog::{Catalog, DataType, Field};

/// Owns the filter conditions of one report definition.
///
/// Field references are checked against the installed catalog snapshot:
/// only filterable fields may be chosen, and an operator must be legal for
/// the chosen field's type. A rejected update changes nothing.
#[derive(Debug, Clone)]
pub struct FilterConditionBuilder {
    catalog: Arc<Catalog>,
    conditions: Vec<FilterCondition>,
}

impl FilterConditionBuilder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_conditions(catalog, Vec::new())
    }

    /// Start from previously persisted conditions.
    ///
    /// The conditions are taken as-is; run the invalidation pass to reconcile
    /// them with the catalog.
    pub fn with_conditions(catalog: Arc<Catalog>, conditions: Vec<FilterCondition>) -> Self {
        Self {
            catalog,
            conditions,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Install a new catalog snapshot. Existing conditions are not touched.
    pub fn set_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = catalog;
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn condition(&self, id: &ConditionId) -> Option<&FilterCondition> {
        self.conditions.iter().find(|c| &c.id == id)
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut [FilterCondition] {
        &mut self.conditions
    }

    /// Fields that may be referenced by a condition.
    pub fn filterable_fields(&self) -> Vec<&Field> {
        self.catalog.filterable_fields().collect()
    }

    /// Append a blank condition and return its id.
    pub fn add_condition(&mut self) -> ConditionId {
        let id = ConditionId::generate();
        self.conditions.push(FilterCondition::new(id.clone()));
        id
    }

    /// Remove a condition. Other conditions are unaffected.
    pub fn remove_condition(&mut self, id: &ConditionId) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|c| &c.id != id);
        self.conditions.len() != before
    }

    /// Merge a patch into the condition with the given id.
    ///
    /// Changing the field re-derives the display name mirror and resets the
    /// operator to the new type's default when the old one is illegal for
    /// it. Returns `false` and leaves the condition untouched when the id is
    /// unknown, the field is not filterable, or the requested operator is
    /// illegal for the resulting field.
    pub fn update_condition(&mut self, id: &ConditionId, patch: ConditionPatch) -> bool {
        let Some(index) = self.conditions.iter().position(|c| &c.id == id) else {
            return false;
        };

        let mut updated = self.conditions[index].clone();

        if let Some(field_name) = patch.field_name {
            match field_name.filter(|name| !name.is_empty()) {
                Some(name) => {
                    let Some(field) = self.catalog.filterable_field(&name) else {
                        debug!(condition = %id, field = %name, "rejecting non-filterable field");
                        return false;
                    };
                    updated.display_name = Some(field.display_name().to_string());
                    updated.field_name = Some(name);

                    let legal = updated
                        .operator
                        .is_some_and(|op| operator::is_legal(&field.data_type, op));
                    if !legal {
                        let fallback = operator::default_operator(&field.data_type);
                        updated.operator = Some(fallback);
                        updated.value = FilterValue::empty_for(fallback.value_shape());
                    }
                }
                None => updated.clear_field(),
            }
        }

        if let Some(op) = patch.operator {
            if let Some(data_type) = self.field_type(&updated) {
                if !operator::is_legal(data_type, op) {
                    debug!(condition = %id, operator = %op, "rejecting illegal operator");
                    return false;
                }
            }
            updated.set_operator(op);
        }

        if let Some(value) = patch.value {
            updated.set_value(value);
        }
        if let Some(value_type) = patch.value_type {
            updated.value_type = value_type;
        }
        if let Some(required) = patch.is_required {
            updated.is_required = required;
        }
        if let Some(visible) = patch.is_visible {
            updated.is_visible = visible;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }

        self.conditions[index] = updated;
        true
    }

    /// Operators offered for a condition; text operators when no field is set.
    pub fn operators_for_condition(&self, id: &ConditionId) -> Vec<OperatorSpec> {
        let data_type = self
            .condition(id)
            .and_then(|c| self.field_type(c))
            .cloned()
            .unwrap_or(DataType::Text);
        operator::operators_for(&data_type)
    }

    /// Append an entry to a list-valued condition.
    pub fn push_value_entry(&mut self, id: &ConditionId, entry: impl Into<String>) -> bool {
        self.value_mut(id)
            .is_some_and(|value| value.push_entry(entry))
    }

    /// Remove one entry of a list-valued condition.
    pub fn remove_value_entry(&mut self, id: &ConditionId, index: usize) -> bool {
        self.value_mut(id)
            .is_some_and(|value| value.remove_entry(index))
    }

    /// Set the lower or upper bound of a range-valued condition.
    pub fn set_range_bound(
        &mut self,
        id: &ConditionId,
        bound: Bound,
        value: impl Into<String>,
    ) -> bool {
        self.value_mut(id)
            .is_some_and(|v| v.set_bound(bound, value))
    }

    fn value_mut(&mut self, id: &ConditionId) -> Option<&mut FilterValue> {
        self.conditions
            .iter_mut()
            .find(|c| &c.id == id)
            .map(|c| &mut c.value)
    }

    fn field_type(&self, condition: &FilterCondition) -> Option<&DataType> {
        condition
            .field_name
            .as_deref()
            .and_then(|name| self.catalog.field_by_name(name))
            .map(|field| &field.data_type)
    }
}
