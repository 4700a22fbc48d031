//! Integration tests for the operator classifier.

use quill::catalog::DataType;
use quill::filter::{operators_for, Operator, ValueShape};

fn operator_names(data_type: &DataType) -> Vec<&'static str> {
    operators_for(data_type)
        .iter()
        .map(|spec| spec.operator.as_str())
        .collect()
}

#[test]
fn test_date_field_offers_temporal_operators() {
    let specs = operators_for(&DataType::Date);
    let operators: Vec<Operator> = specs.iter().map(|s| s.operator).collect();

    assert!(operators.contains(&Operator::DateRange));
    assert!(operators.contains(&Operator::DateBefore));
    assert!(!operators.contains(&Operator::Contains));
    assert!(!operators.contains(&Operator::StartsWith));

    let range = specs
        .iter()
        .find(|s| s.operator == Operator::DateRange)
        .unwrap();
    assert_eq!(range.value_shape, ValueShape::Range);
}

#[test]
fn test_timestamp_matches_date() {
    assert_eq!(
        operator_names(&DataType::Timestamp),
        operator_names(&DataType::Date)
    );
}

#[test]
fn test_every_type_defaults_to_equals() {
    for data_type in [
        DataType::Text,
        DataType::Integer,
        DataType::Decimal,
        DataType::Date,
        DataType::Timestamp,
        DataType::Boolean,
        DataType::Other("geography".to_string()),
    ] {
        let specs = operators_for(&data_type);
        assert!(!specs.is_empty(), "{:?} has no operators", data_type);
        assert_eq!(specs[0].operator, Operator::Equals, "{:?}", data_type);
    }
}

#[test]
fn test_unknown_type_is_classified_as_text() {
    let unknown = DataType::parse("hierarchyid");
    assert_eq!(unknown, DataType::Other("hierarchyid".to_string()));
    assert_eq!(operator_names(&unknown), operator_names(&DataType::Text));
}

#[test]
fn test_numeric_has_no_string_matching() {
    let names = operator_names(&DataType::Integer);
    assert!(names.contains(&"between"));
    assert!(names.contains(&"in"));
    assert!(!names.contains(&"contains"));
    assert!(!names.contains(&"ends_with"));
    assert_eq!(names, operator_names(&DataType::Decimal));
}

#[test]
fn test_value_shapes() {
    assert_eq!(Operator::IsNull.value_shape(), ValueShape::None);
    assert_eq!(Operator::IsNotNull.value_shape(), ValueShape::None);
    assert_eq!(Operator::In.value_shape(), ValueShape::Multiple);
    assert_eq!(Operator::NotIn.value_shape(), ValueShape::Multiple);
    assert_eq!(Operator::Between.value_shape(), ValueShape::Range);
    assert_eq!(Operator::DateRange.value_shape(), ValueShape::Range);
    assert_eq!(Operator::Contains.value_shape(), ValueShape::Single);
}

#[test]
fn test_operator_names_round_trip_through_from_str() {
    for op in Operator::ALL {
        let parsed: Operator = op.as_str().parse().unwrap();
        assert_eq!(parsed, op);
    }
    assert!("like".parse::<Operator>().is_err());
}

#[test]
fn test_sql_type_aliases() {
    assert_eq!(DataType::parse("VARCHAR"), DataType::Text);
    assert_eq!(DataType::parse("bigint"), DataType::Integer);
    assert_eq!(DataType::parse("numeric"), DataType::Decimal);
    assert_eq!(DataType::parse("datetime"), DataType::Timestamp);
    assert_eq!(DataType::parse("bool"), DataType::Boolean);
}
