//! Integration tests for the filter condition builder.

use std::sync::Arc;

use quill::catalog::{Catalog, DataSourceId, DataType, Field};
use quill::filter::{
    Bound, ConditionId, ConditionPatch, FilterConditionBuilder, FilterValue, Operator, ValueShape,
};

fn orders_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(
        DataSourceId(1),
        vec![
            Field::new(1, "customer", DataType::Text).with_alias("Customer"),
            Field::new(2, "amount", DataType::Decimal),
            Field::new(3, "ordered_at", DataType::Date).with_localized_name("Order date"),
            Field::new(4, "internal_note", DataType::Text).filterable(false),
        ],
    ))
}

#[test]
fn test_add_condition_is_blank() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();

    let condition = builder.condition(&id).unwrap();
    assert!(condition.field_name.is_none());
    assert_eq!(condition.operator, Some(Operator::Equals));
    assert_eq!(condition.value, FilterValue::single(""));
    assert!(condition.is_visible);
}

#[test]
fn test_generated_ids_are_unique() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let a = builder.add_condition();
    let b = builder.add_condition();
    assert_ne!(a, b);
    assert_eq!(builder.conditions().len(), 2);
}

#[test]
fn test_select_field_mirrors_display_name() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();

    assert!(builder.update_condition(&id, ConditionPatch::new().field("ordered_at")));

    let condition = builder.condition(&id).unwrap();
    assert_eq!(condition.field_name.as_deref(), Some("ordered_at"));
    assert_eq!(condition.display_name.as_deref(), Some("Order date"));
}

#[test]
fn test_non_filterable_field_is_rejected() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    let before = builder.condition(&id).cloned();

    assert!(!builder.update_condition(&id, ConditionPatch::new().field("internal_note")));
    assert!(!builder.update_condition(&id, ConditionPatch::new().field("no_such_field")));
    assert_eq!(builder.condition(&id).cloned(), before);
}

#[test]
fn test_filterable_fields_excludes_hidden() {
    let builder = FilterConditionBuilder::new(orders_catalog());
    let names: Vec<&str> = builder
        .filterable_fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["customer", "amount", "ordered_at"]);
}

#[test]
fn test_illegal_operator_rejects_whole_patch() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(&id, ConditionPatch::new().field("amount"));
    let before = builder.condition(&id).cloned();

    let accepted = builder.update_condition(
        &id,
        ConditionPatch::new()
            .operator(Operator::Contains)
            .description("should not stick"),
    );

    assert!(!accepted);
    assert_eq!(builder.condition(&id).cloned(), before);
}

#[test]
fn test_switching_field_resets_illegal_operator() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(
        &id,
        ConditionPatch::new()
            .field("customer")
            .operator(Operator::StartsWith)
            .value(FilterValue::single("Acme")),
    );

    builder.update_condition(&id, ConditionPatch::new().field("amount"));

    let condition = builder.condition(&id).unwrap();
    assert_eq!(condition.operator, Some(Operator::Equals));
    assert_eq!(condition.value, FilterValue::single(""));
}

#[test]
fn test_switching_field_keeps_legal_operator_and_value() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(
        &id,
        ConditionPatch::new()
            .field("customer")
            .operator(Operator::NotEquals)
            .value(FilterValue::single("Acme")),
    );

    builder.update_condition(&id, ConditionPatch::new().field("amount"));

    let condition = builder.condition(&id).unwrap();
    assert_eq!(condition.operator, Some(Operator::NotEquals));
    assert_eq!(condition.value, FilterValue::single("Acme"));
}

#[test]
fn test_operator_change_reshapes_value() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(
        &id,
        ConditionPatch::new()
            .field("amount")
            .value(FilterValue::single("10")),
    );

    builder.update_condition(&id, ConditionPatch::new().operator(Operator::Between));
    assert_eq!(
        builder.condition(&id).unwrap().value,
        FilterValue::range("10", "")
    );

    builder.update_condition(&id, ConditionPatch::new().operator(Operator::IsNull));
    assert_eq!(builder.condition(&id).unwrap().value, FilterValue::None);
}

#[test]
fn test_clear_field_keeps_flags() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(
        &id,
        ConditionPatch::new()
            .field("customer")
            .required(true)
            .description("who placed it"),
    );

    assert!(builder.update_condition(&id, ConditionPatch::new().clear_field()));

    let condition = builder.condition(&id).unwrap();
    assert!(condition.field_name.is_none());
    assert!(condition.display_name.is_none());
    assert!(condition.operator.is_none());
    assert!(condition.is_required);
    assert_eq!(condition.description, "who placed it");
}

#[test]
fn test_reselecting_field_after_clear_assigns_default_operator() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(&id, ConditionPatch::new().field("customer"));
    builder.update_condition(&id, ConditionPatch::new().clear_field());

    builder.update_condition(&id, ConditionPatch::new().field("ordered_at"));

    let condition = builder.condition(&id).unwrap();
    assert_eq!(condition.operator, Some(Operator::Equals));
    assert_eq!(
        condition.operator.map(|op| op.value_shape()),
        Some(ValueShape::Single)
    );
}

#[test]
fn test_unknown_condition_is_a_no_op() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    builder.add_condition();
    let missing = ConditionId::from("missing");

    assert!(!builder.update_condition(&missing, ConditionPatch::new().required(true)));
    assert!(!builder.remove_condition(&missing));
    assert_eq!(builder.conditions().len(), 1);
}

#[test]
fn test_remove_leaves_others_untouched() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let first = builder.add_condition();
    let second = builder.add_condition();
    builder.update_condition(&second, ConditionPatch::new().field("amount"));
    let kept = builder.condition(&second).cloned();

    assert!(builder.remove_condition(&first));
    assert_eq!(builder.conditions().len(), 1);
    assert_eq!(builder.conditions().first().cloned(), kept);
}

#[test]
fn test_list_value_entries() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(
        &id,
        ConditionPatch::new().field("customer").operator(Operator::In),
    );

    assert!(builder.push_value_entry(&id, "Acme"));
    assert!(builder.push_value_entry(&id, "Globex"));
    assert!(builder.push_value_entry(&id, "Initech"));
    assert!(builder.remove_value_entry(&id, 1));
    assert!(!builder.remove_value_entry(&id, 5));

    assert_eq!(
        builder.condition(&id).unwrap().value,
        FilterValue::multiple(["Acme", "Initech"])
    );
}

#[test]
fn test_range_bounds() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(
        &id,
        ConditionPatch::new()
            .field("ordered_at")
            .operator(Operator::DateRange),
    );

    assert!(builder.set_range_bound(&id, Bound::Lower, "2024-01-01"));
    assert!(builder.set_range_bound(&id, Bound::Upper, "2024-12-31"));

    assert_eq!(
        builder.condition(&id).unwrap().value,
        FilterValue::range("2024-01-01", "2024-12-31")
    );
}

#[test]
fn test_range_bound_on_single_value_is_rejected() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();
    builder.update_condition(&id, ConditionPatch::new().field("amount"));

    assert!(!builder.set_range_bound(&id, Bound::Lower, "5"));
    assert!(!builder.push_value_entry(&id, "5"));
}

#[test]
fn test_operators_for_condition_follow_field_type() {
    let mut builder = FilterConditionBuilder::new(orders_catalog());
    let id = builder.add_condition();

    let unset = builder.operators_for_condition(&id);
    assert!(unset.iter().any(|s| s.operator == Operator::Contains));

    builder.update_condition(&id, ConditionPatch::new().field("ordered_at"));
    let dated = builder.operators_for_condition(&id);
    assert!(dated.iter().any(|s| s.operator == Operator::DateRange));
    assert!(!dated.iter().any(|s| s.operator == Operator::Contains));
}
