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

//! Columnar entity storage
//!
//! Build phase: register a table schema, write rows through a
//! [`TableBuilder`], finish to trim and freeze. Read phase: any number of
//! threads resolve [`Entity`] facades through the frozen [`Table`] and its
//! collection adapters. The store itself is never synchronized; the
//! single-writer build / shared read-only split is enforced by ownership
//! (the builder owns the store mutably, `finish` moves it into an `Arc`).

pub mod collections;
pub mod column;
pub mod entity;
pub mod schema;
pub mod value;

pub use collections::{DenseEntityList, EntityMap, SparseEntityList};
pub use column::{ColumnId, ColumnStore, ColumnValue, ValueType};
pub use entity::Entity;
pub use schema::{ColumnAssignments, FieldSpec, TableSchema};

use crate::error::Result;
use std::sync::Arc;
use tracing::debug;

/// Single-writer build handle for one table.
///
/// Issues row indices as a strictly increasing counter, so the finished
/// table is dense with no index gaps; that density is what lets the
/// all-rows adapter store nothing.
pub struct TableBuilder {
    store: ColumnStore,
    assignments: Arc<ColumnAssignments>,
    next_row: usize,
}

impl TableBuilder {
    /// Registers `schema` into a fresh store with columns pre-sized to
    /// `row_estimate`.
    pub fn new(schema: &TableSchema, row_estimate: usize) -> Result<Self> {
        let (store, assignments) = schema::register(schema, row_estimate)?;
        Ok(Self {
            store,
            assignments,
            next_row: 0,
        })
    }

    pub fn assignments(&self) -> &Arc<ColumnAssignments> {
        &self.assignments
    }

    pub fn rows_written(&self) -> usize {
        self.next_row
    }

    /// Starts the next row. Fields left unset simply stay absent.
    pub fn row(&mut self) -> RowWriter<'_> {
        RowWriter { builder: self }
    }

    /// Trims every column to the final row count and freezes the store for
    /// shared read-only access.
    pub fn finish(mut self) -> Table {
        let row_count = self.next_row;
        self.store.trim_to_size(row_count);
        debug!(
            "Finished table '{}': {} rows, {} fields, trimmed",
            self.assignments.table(),
            row_count,
            self.assignments.field_count()
        );
        Table {
            store: Arc::new(self.store),
            assignments: self.assignments,
            row_count,
        }
    }
}

/// Writer for one row at the builder's current row index.
///
/// Dropping a writer without [`finish`](RowWriter::finish) abandons the
/// row: the index is not advanced and the next writer targets the same row.
pub struct RowWriter<'a> {
    builder: &'a mut TableBuilder,
}

impl RowWriter<'_> {
    /// Row index this writer targets.
    pub fn row_index(&self) -> usize {
        self.builder.next_row
    }

    /// Sets a field of the current row. Setting a field the schema does not
    /// assign is a no-op, matching the unassigned-column read semantics.
    ///
    /// # Panics
    ///
    /// If `field` is declared with a different value type than `T`.
    pub fn set<T: ColumnValue>(&mut self, field: &str, value: T) -> &mut Self {
        let column = self.builder.assignments.column::<T>(field);
        let row = self.builder.next_row;
        self.builder.store.set(column, row, value);
        self
    }

    /// Completes the row, advances the builder to the next row index, and
    /// returns the index the row landed on.
    pub fn finish(self) -> usize {
        let row = self.builder.next_row;
        self.builder.next_row += 1;
        row
    }
}

/// A finished, trimmed, read-only table: the shared store, its assignments,
/// and the final row count. Cheap to clone and safe to read from any number
/// of threads.
#[derive(Clone)]
pub struct Table {
    store: Arc<ColumnStore>,
    assignments: Arc<ColumnAssignments>,
    row_count: usize,
}

impl Table {
    pub fn name(&self) -> &str {
        self.assignments.table()
    }

    pub fn store(&self) -> &Arc<ColumnStore> {
        &self.store
    }

    pub fn assignments(&self) -> &Arc<ColumnAssignments> {
        &self.assignments
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Facade for one row, or `None` past the end.
    pub fn entity<E: Entity>(&self, row: usize) -> Option<E> {
        (row < self.row_count).then(|| {
            E::from_row(Arc::clone(&self.store), Arc::clone(&self.assignments), row)
        })
    }

    /// The dense all-rows adapter every table gets.
    pub fn entities<E: Entity>(&self) -> DenseEntityList<E> {
        DenseEntityList::spanning(
            Arc::clone(&self.store),
            Arc::clone(&self.assignments),
            self.row_count,
        )
    }

    /// An empty sparse subset adapter bound to this table.
    pub fn subset<E: Entity>(&self) -> SparseEntityList<E> {
        SparseEntityList::new(Arc::clone(&self.store), Arc::clone(&self.assignments))
    }

    /// An empty keyed adapter bound to this table, for tables with an
    /// indexable key.
    pub fn keyed<K: Eq + std::hash::Hash, E: Entity>(&self) -> EntityMap<K, E> {
        EntityMap::new(Arc::clone(&self.store), Arc::clone(&self.assignments))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
