use super::*;
use crate::store::column::ColumnId;

struct Agency {
    store: Arc<ColumnStore>,
    assignments: Arc<ColumnAssignments>,
    row: usize,
    name: ColumnId<String>,
    timezone: ColumnId<value::Timezone>,
    fare_url: ColumnId<String>,
}

impl Entity for Agency {
    fn from_row(store: Arc<ColumnStore>, assignments: Arc<ColumnAssignments>, row: usize) -> Self {
        Self {
            name: assignments.column("agency_name"),
            timezone: assignments.column("agency_timezone"),
            fare_url: assignments.column("agency_fare_url"),
            store,
            assignments,
            row,
        }
    }

    fn store(&self) -> &Arc<ColumnStore> {
        &self.store
    }

    fn assignments(&self) -> &Arc<ColumnAssignments> {
        &self.assignments
    }

    fn row_index(&self) -> usize {
        self.row
    }
}

impl Agency {
    fn name(&self) -> &str {
        self.store
            .get(self.name, self.row)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn has_fare_url(&self) -> bool {
        self.store.has(self.fare_url, self.row)
    }

    fn timezone(&self) -> Option<&value::Timezone> {
        self.store.get(self.timezone, self.row)
    }
}

fn agency_schema() -> TableSchema {
    TableSchema::new("agency")
        .field("agency_name", ValueType::Text)
        .field("agency_timezone", ValueType::Timezone)
        .field("agency_fare_url", ValueType::Text)
}

#[test]
fn test_builder_issues_increasing_row_indices() {
    let mut builder = TableBuilder::new(&agency_schema(), 8).unwrap();

    for expected in 0..5 {
        let mut row = builder.row();
        assert_eq!(row.row_index(), expected);
        row.set("agency_name", format!("Agency {}", expected));
        assert_eq!(row.finish(), expected);
    }

    assert_eq!(builder.rows_written(), 5);
}

#[test]
fn test_abandoned_row_is_not_issued() {
    let mut builder = TableBuilder::new(&agency_schema(), 8).unwrap();

    {
        let mut row = builder.row();
        row.set("agency_name", "dropped".to_string());
        // No finish: the writer is abandoned
    }

    let mut row = builder.row();
    assert_eq!(row.row_index(), 0);
    row.set("agency_name", "kept".to_string());
    row.finish();

    let table = builder.finish();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.entity::<Agency>(0).unwrap().name(), "kept");
}

#[test]
fn test_set_on_undeclared_field_is_noop() {
    let mut builder = TableBuilder::new(&agency_schema(), 8).unwrap();

    let mut row = builder.row();
    row.set("agency_name", "Metro".to_string())
        .set("agency_phone", "555-0100".to_string());
    row.finish();

    let table = builder.finish();
    let agency = table.entity::<Agency>(0).unwrap();
    assert_eq!(agency.name(), "Metro");
    assert!(agency
        .assignments()
        .column::<String>("agency_phone")
        .is_unassigned());
}

#[test]
fn test_finish_trims_and_freezes() {
    let mut builder = TableBuilder::new(&agency_schema(), 1024).unwrap();

    let mut row = builder.row();
    row.set("agency_name", "Metro".to_string())
        .set("agency_timezone", "Europe/Brussels".parse::<value::Timezone>().unwrap());
    row.finish();

    let mut row = builder.row();
    row.set("agency_name", "Regional".to_string());
    row.finish();

    let table = builder.finish();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.name(), "agency");

    let first = table.entity::<Agency>(0).unwrap();
    assert_eq!(first.name(), "Metro");
    assert_eq!(first.timezone().unwrap().as_str(), "Europe/Brussels");
    assert!(!first.has_fare_url());

    let second = table.entity::<Agency>(1).unwrap();
    assert_eq!(second.name(), "Regional");
    assert!(second.timezone().is_none());

    assert!(table.entity::<Agency>(2).is_none());
}

#[test]
fn test_all_rows_adapter_spans_table() {
    let mut builder = TableBuilder::new(&agency_schema(), 4).unwrap();
    for i in 0..3 {
        let mut row = builder.row();
        row.set("agency_name", format!("Agency {}", i));
        row.finish();
    }
    let table = builder.finish();

    let all: DenseEntityList<Agency> = table.entities();
    assert_eq!(all.len(), table.row_count());
    let names: Vec<String> = all.iter().map(|a| a.name().to_string()).collect();
    assert_eq!(names, vec!["Agency 0", "Agency 1", "Agency 2"]);
}

#[test]
fn test_empty_table() {
    let builder = TableBuilder::new(&agency_schema(), 16).unwrap();
    let table = builder.finish();

    assert_eq!(table.row_count(), 0);
    assert!(table.entity::<Agency>(0).is_none());
    let all: DenseEntityList<Agency> = table.entities();
    assert!(all.is_empty());
}
