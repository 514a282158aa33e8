use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use healframe_core::{validate, FrameError, Schema, Table, ValidationOutcome};

fn schema_from_json(json: &str) -> Schema {
    serde_json::from_str(json).unwrap()
}

fn orders() -> Table {
    Table::try_from_columns(vec![
        (
            "order_id",
            Arc::new(StringArray::from(vec!["A-001", "A-002", "b-3", "A-004"])) as ArrayRef,
        ),
        (
            "status",
            Arc::new(StringArray::from(vec![
                Some("paid"),
                Some("refunded"),
                Some("paid"),
                None,
            ])) as ArrayRef,
        ),
        (
            "quantity",
            Arc::new(StringArray::from(vec!["2", "1", "3", "two"])) as ArrayRef,
        ),
        (
            "discount",
            Arc::new(Float64Array::from(vec![Some(0.1), Some(0.0), Some(1.5), None])) as ArrayRef,
        ),
    ])
    .unwrap()
}

#[test]
fn test_declarative_schema_validates_every_check() {
    let schema = schema_from_json(
        r#"{"columns":[
            {"name":"order_id","dtype":"string",
             "checks":[{"kind":"str-matches","pattern":"^A-[0-9]{3}$"}]},
            {"name":"status","dtype":"string","nullable":true,
             "checks":[{"kind":"member-of","values":["paid","pending"]}]},
            {"name":"quantity","dtype":"integer","coerce":true,
             "checks":[{"kind":"greater-than","value":0}]},
            {"name":"discount","dtype":"float","nullable":true,
             "checks":[{"kind":"in-range","min":0,"max":1}]}
        ]}"#,
    );

    let validated = validate(&orders(), &schema).unwrap();
    let found: Vec<(usize, &str, &str)> = validated
        .outcome
        .violations()
        .iter()
        .map(|v| (v.row, v.column.as_str(), v.rule.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (1, "status", "member-of"),
            (2, "order_id", "str-matches"),
            (2, "discount", "in-range"),
            (3, "quantity", "type"),
        ]
    );
    assert_eq!(validated.table.num_rows(), 1);
    assert_eq!(
        validated.table.display_value("order_id", 0).as_deref(),
        Some("A-001")
    );
}

#[test]
fn test_optional_column_absent_is_skipped() {
    let table = Table::try_from_columns(vec![(
        "id",
        Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
    )])
    .unwrap();
    let schema = schema_from_json(
        r#"{"columns":[
            {"name":"id","dtype":"integer"},
            {"name":"note","dtype":"string","required":false}
        ]}"#,
    );

    let validated = validate(&table, &schema).unwrap();
    assert_eq!(validated.outcome, ValidationOutcome::AllValid);
}

#[test]
fn test_invalid_schema_is_reported_before_rows() {
    let schema = schema_from_json(
        r#"{"columns":[
            {"name":"quantity","dtype":"integer","coerce":true,
             "checks":[{"kind":"str-length","max":2}]}
        ]}"#,
    );
    assert!(matches!(
        validate(&orders(), &schema),
        Err(FrameError::InvalidSchema(_))
    ));
}

#[test]
fn test_schema_is_not_mutated_and_reusable() {
    let schema = schema_from_json(
        r#"{"columns":[{"name":"discount","dtype":"float","nullable":true,
             "checks":[{"kind":"less-or-equal","value":1}]}]}"#,
    );
    let before = schema.clone();

    let first = validate(&orders(), &schema).unwrap();
    let second = validate(&orders(), &schema).unwrap();
    assert_eq!(schema, before);
    assert_eq!(first.outcome, second.outcome);
}
