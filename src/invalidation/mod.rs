//! Reconciliation of projection and filter conditions with a new catalog.
//!
//! Runs once per data-source change or catalog refresh:
//!
//! 1. Conditions naming a field that is missing or not filterable lose
//!    their field, operator and value; description and flags stay.
//! 2. Surviving conditions get their display name re-mirrored, and an
//!    operator that became illegal for the field's type is reset to the
//!    type's default.
//! 3. Projection entries whose id is missing are dropped outright.
//!
//! The pass is idempotent: a second run against the same catalog changes
//! nothing and reports nothing.

use tracing::{debug, warn};

use crate::catalog::{Catalog, FieldId};
use crate::filter::operator;
use crate::filter::{ConditionId, FilterConditionBuilder, FilterValue};
use crate::notice::{Notice, NoticeKind};
use crate::projection::FieldProjection;

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Conditions whose field reference was cleared.
    pub cleared_conditions: Vec<ConditionId>,
    /// Conditions whose operator was reset to the field type's default.
    pub reset_operators: Vec<ConditionId>,
    /// Projection entries that were removed.
    pub dropped_fields: Vec<FieldId>,
}

impl InvalidationReport {
    /// True when no corrections were reported. Display labels may still
    /// have been refreshed.
    pub fn is_empty(&self) -> bool {
        self.cleared_conditions.is_empty()
            && self.reset_operators.is_empty()
            && self.dropped_fields.is_empty()
    }

    /// Notices describing the corrections, for display to the user.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if !self.cleared_conditions.is_empty() {
            notices.push(Notice::warning(
                NoticeKind::StaleConditionsCleared,
                format!(
                    "{} filter conditions had invalid fields cleared",
                    self.cleared_conditions.len()
                ),
            ));
        }
        if !self.reset_operators.is_empty() {
            notices.push(Notice::warning(
                NoticeKind::OperatorsReset,
                format!(
                    "{} filter conditions had their operator reset",
                    self.reset_operators.len()
                ),
            ));
        }
        if !self.dropped_fields.is_empty() {
            notices.push(Notice::info(
                NoticeKind::StaleFieldsDropped,
                format!(
                    "{} selected fields are no longer available and were removed",
                    self.dropped_fields.len()
                ),
            ));
        }
        notices
    }
}

/// Reconcile both collections against `catalog`.
pub fn reconcile(
    catalog: &Catalog,
    projection: &mut FieldProjection,
    filters: &mut FilterConditionBuilder,
) -> InvalidationReport {
    let mut report = InvalidationReport::default();

    for condition in filters.conditions_mut() {
        let Some(name) = condition.field_name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };

        let Some(field) = catalog.filterable_field(name) else {
            debug!(condition = %condition.id, field = %name, "clearing stale field reference");
            report.cleared_conditions.push(condition.id.clone());
            condition.clear_field();
            continue;
        };

        let label = field.display_name();
        if condition.display_name.as_deref() != Some(label) {
            condition.display_name = Some(label.to_string());
        }

        let legal = condition
            .operator
            .is_some_and(|op| operator::is_legal(&field.data_type, op));
        if !legal {
            let fallback = operator::default_operator(&field.data_type);
            condition.operator = Some(fallback);
            condition.value = FilterValue::empty_for(fallback.value_shape());
            report.reset_operators.push(condition.id.clone());
        }
    }

    report.dropped_fields = projection.retain(|id| catalog.contains(id));

    if !report.is_empty() {
        warn!(
            data_source_id = ?catalog.data_source_id(),
            cleared = report.cleared_conditions.len(),
            reset = report.reset_operators.len(),
            dropped = report.dropped_fields.len(),
            "reconciled report definition with catalog"
        );
    }

    report
}
