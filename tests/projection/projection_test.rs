//! Integration tests for the field projection manager.

use std::sync::Arc;

use quill::catalog::{Catalog, DataSourceId, DataType, Field, FieldId};
use quill::projection::{split_field_ids, EditMode, FieldProjection};

fn catalog(source: u64, ids: &[u64]) -> Arc<Catalog> {
    let fields = ids
        .iter()
        .map(|&id| Field::new(id, format!("field_{}", id), DataType::Text))
        .collect();
    Arc::new(Catalog::new(DataSourceId(source), fields))
}

fn ids(raw: &[u64]) -> Vec<FieldId> {
    raw.iter().copied().map(FieldId).collect()
}

#[test]
fn test_reorder_moves_first_to_last() {
    let mut projection = FieldProjection::with_fields(catalog(1, &[1, 2, 3]), ids(&[3, 1, 2]));

    assert!(projection.reorder(0, 2));
    assert_eq!(projection.field_ids(), ids(&[1, 2, 3]).as_slice());
}

#[test]
fn test_reorder_backwards() {
    let mut projection = FieldProjection::with_fields(catalog(1, &[1, 2, 3]), ids(&[1, 2, 3]));

    assert!(projection.reorder(2, 0));
    assert_eq!(projection.field_ids(), ids(&[3, 1, 2]).as_slice());
}

#[test]
fn test_reorder_out_of_bounds_is_a_no_op() {
    let mut projection = FieldProjection::with_fields(catalog(1, &[1, 2]), ids(&[1, 2]));

    assert!(!projection.reorder(0, 2));
    assert!(!projection.reorder(5, 0));
    assert_eq!(projection.field_ids(), ids(&[1, 2]).as_slice());
}

#[test]
fn test_add_ignores_duplicates_and_unknown_ids() {
    let mut projection = FieldProjection::new(catalog(1, &[1, 2]));

    assert!(projection.add_field(FieldId(2)));
    assert!(projection.add_field(FieldId(1)));
    assert!(!projection.add_field(FieldId(2)));
    assert!(!projection.add_field(FieldId(99)));

    assert_eq!(projection.field_ids(), ids(&[2, 1]).as_slice());
}

#[test]
fn test_remove_keeps_relative_order() {
    let mut projection =
        FieldProjection::with_fields(catalog(1, &[1, 2, 3, 4]), ids(&[4, 3, 2, 1]));

    assert!(projection.remove_field(FieldId(3)));
    assert!(!projection.remove_field(FieldId(3)));
    assert_eq!(projection.field_ids(), ids(&[4, 2, 1]).as_slice());
}

#[test]
fn test_create_mode_resets_on_new_source() {
    let mut projection = FieldProjection::with_fields(catalog(1, &[1, 2]), ids(&[1, 2]));

    projection.set_data_source(catalog(1, &[1, 2, 3]), EditMode::Create);
    assert_eq!(projection.len(), 2);

    projection.set_data_source(catalog(2, &[1, 2]), EditMode::Create);
    assert!(projection.is_empty());
}

#[test]
fn test_edit_mode_keeps_entries_on_new_source() {
    let mut projection = FieldProjection::with_fields(catalog(1, &[1, 2]), ids(&[1, 2]));

    projection.set_data_source(catalog(2, &[2, 5]), EditMode::Edit);

    assert_eq!(projection.field_ids(), ids(&[1, 2]).as_slice());
    assert_eq!(projection.catalog().data_source_id(), Some(DataSourceId(2)));
}

#[test]
fn test_delimited_form() {
    let projection = FieldProjection::with_fields(catalog(1, &[1, 2, 3]), ids(&[3, 1, 2]));
    assert_eq!(projection.to_delimited(), "3,1,2");

    let (parsed, rejected) = split_field_ids(" 3, 1,,x2 ,2 ");
    assert_eq!(parsed, ids(&[3, 1, 2]));
    assert_eq!(rejected, vec!["x2"]);
}
