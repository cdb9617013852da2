// Copyright 2025 Headway Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Concurrent read phase: after trim, one table is scanned by many threads
//! at once. Nothing is synchronized; the frozen store is shared read-only.

use headway::store::{
    ColumnAssignments, ColumnId, ColumnStore, Entity, Table, TableBuilder, TableSchema, ValueType,
};
use rayon::prelude::*;
use std::sync::Arc;

struct Shape {
    store: Arc<ColumnStore>,
    assignments: Arc<ColumnAssignments>,
    row: usize,
    lat: ColumnId<f64>,
    lon: ColumnId<f64>,
    sequence: ColumnId<i32>,
}

impl Entity for Shape {
    fn from_row(store: Arc<ColumnStore>, assignments: Arc<ColumnAssignments>, row: usize) -> Self {
        Self {
            lat: assignments.column("shape_pt_lat"),
            lon: assignments.column("shape_pt_lon"),
            sequence: assignments.column("shape_pt_sequence"),
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

impl Shape {
    fn lat(&self) -> f64 {
        *self.store.get_or(self.lat, self.row, &0.0)
    }

    fn lon(&self) -> f64 {
        *self.store.get_or(self.lon, self.row, &0.0)
    }

    fn sequence(&self) -> i32 {
        *self.store.get_or(self.sequence, self.row, &-1)
    }
}

fn build_shapes(rows: usize) -> Table {
    let schema = TableSchema::new("shapes")
        .field("shape_pt_lat", ValueType::Float)
        .field("shape_pt_lon", ValueType::Float)
        .field("shape_pt_sequence", ValueType::Int);

    let mut builder = TableBuilder::new(&schema, rows).unwrap();
    for i in 0..rows {
        let mut row = builder.row();
        row.set("shape_pt_lat", 50.0 + i as f64 * 1e-4)
            .set("shape_pt_lon", 4.0 + i as f64 * 1e-4)
            .set("shape_pt_sequence", i as i32);
        row.finish();
    }
    builder.finish()
}

#[test]
fn test_parallel_scan_sees_consistent_rows() {
    let table = build_shapes(50_000);

    let checked: usize = (0..table.row_count())
        .into_par_iter()
        .map(|row| {
            let shape: Shape = table.entity(row).unwrap();
            assert_eq!(shape.sequence(), row as i32);
            assert!(shape.lat() >= 50.0);
            assert!(shape.lon() >= 4.0);
            1
        })
        .sum();

    assert_eq!(checked, 50_000);
}

#[test]
fn test_many_validators_share_one_table() {
    let table = build_shapes(10_000);

    // Several independent "validators" scanning the same frozen table
    let results: Vec<usize> = (0..8)
        .into_par_iter()
        .map(|_| {
            (0..table.row_count())
                .filter(|&row| {
                    let shape: Shape = table.entity(row).unwrap();
                    shape.sequence() >= 0
                })
                .count()
        })
        .collect();

    assert!(results.into_iter().all(|count| count == 10_000));
}
