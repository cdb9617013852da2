use super::*;

fn stop_schema() -> TableSchema {
    TableSchema::new("stops")
        .field("stop_id", ValueType::Text)
        .field("stop_name", ValueType::Text)
        .field("stop_lat", ValueType::Float)
        .field("stop_lon", ValueType::Float)
        .field("location_type", ValueType::Byte)
        .field("stop_timezone", ValueType::Timezone)
}

#[test]
fn test_register_reserves_one_column_per_field() {
    let (store, assignments) = register(&stop_schema(), 16).unwrap();

    assert_eq!(assignments.table(), "stops");
    assert_eq!(assignments.field_count(), 6);
    assert_eq!(store.column_count(ValueType::Text), 2);
    assert_eq!(store.column_count(ValueType::Float), 2);
    assert_eq!(store.column_count(ValueType::Byte), 1);
    assert_eq!(store.column_count(ValueType::Timezone), 1);
    assert_eq!(store.column_count(ValueType::Int), 0);
}

#[test]
fn test_register_rejects_duplicate_field() {
    let schema = TableSchema::new("stops")
        .field("stop_id", ValueType::Text)
        .field("stop_id", ValueType::Text);

    let result = register(&schema, 16);
    assert!(matches!(result, Err(HeadwayError::Schema(_))));
}

#[test]
fn test_column_resolution() {
    let (_, assignments) = register(&stop_schema(), 16).unwrap();

    let id_col = assignments.column::<String>("stop_id");
    let name_col = assignments.column::<String>("stop_name");
    assert!(!id_col.is_unassigned());
    assert!(!name_col.is_unassigned());
    assert_ne!(id_col, name_col);

    assert_eq!(assignments.value_type("stop_lat"), Some(ValueType::Float));
    assert_eq!(assignments.value_type("platform_code"), None);
}

#[test]
fn test_unknown_field_resolves_unassigned() {
    let (store, assignments) = register(&stop_schema(), 16).unwrap();

    let col = assignments.column::<String>("platform_code");
    assert!(col.is_unassigned());
    assert!(!store.has(col, 0));
}

#[test]
#[should_panic(expected = "declared as")]
fn test_type_mismatch_panics() {
    let (_, assignments) = register(&stop_schema(), 16).unwrap();
    // stop_lat is declared Float; resolving it as a string column is a
    // logic bug in the caller
    let _ = assignments.column::<String>("stop_lat");
}

#[test]
fn test_registered_columns_are_writable() {
    let (mut store, assignments) = register(&stop_schema(), 4).unwrap();

    let lat_col = assignments.column::<f64>("stop_lat");
    let type_col = assignments.column::<i8>("location_type");
    store.set(lat_col, 0, 50.8467);
    store.set(type_col, 0, 1);

    assert_eq!(store.get(lat_col, 0), Some(&50.8467));
    assert_eq!(store.get(type_col, 0), Some(&1));
}
