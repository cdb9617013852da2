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

//! Table schema registration
//!
//! Registering a schema reserves one typed column per declared field in a
//! fresh [`ColumnStore`] and records the field-to-column mapping in an
//! immutable [`ColumnAssignments`]. The assignments instance doubles as an
//! ownership token: entities and collections are only compatible when they
//! share both the same store and the same assignments.

use crate::error::{HeadwayError, Result};
use crate::store::column::{ColumnId, ColumnStore, ColumnValue, ValueType};
use crate::store::value::{Color, CurrencyCode, Locale, TimeOfDay, Timezone};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One declared field of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub value_type: ValueType,
}

/// Declared fields of one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            value_type,
        });
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Assignment {
    value_type: ValueType,
    index: i32,
}

/// Immutable mapping from a table's field names to column indices inside
/// one [`ColumnStore`]. Created once at registration and compared by `Arc`
/// identity everywhere else.
#[derive(Debug)]
pub struct ColumnAssignments {
    table: String,
    fields: HashMap<String, Assignment>,
}

impl ColumnAssignments {
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Resolves a field to its typed column id. Unknown fields resolve to
    /// the unassigned sentinel and read as absent.
    ///
    /// # Panics
    ///
    /// If the field is declared with a different value type. Assignments
    /// are produced mechanically from the schema, so a mismatch is a logic
    /// bug in the caller, not a data condition.
    pub fn column<T: ColumnValue>(&self, field: &str) -> ColumnId<T> {
        match self.fields.get(field) {
            None => ColumnId::UNASSIGNED,
            Some(assignment) => {
                assert!(
                    assignment.value_type == T::VALUE_TYPE,
                    "field '{}' of table '{}' is declared as {:?}, not {:?}",
                    field,
                    self.table,
                    assignment.value_type,
                    T::VALUE_TYPE,
                );
                ColumnId::new(assignment.index as usize)
            }
        }
    }

    /// Declared value type of a field, if the schema has it.
    pub fn value_type(&self, field: &str) -> Option<ValueType> {
        self.fields.get(field).map(|a| a.value_type)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Reserves columns for every field of `schema` in a fresh store sized to
/// `row_estimate`, yielding the store and its assignments.
pub fn register(
    schema: &TableSchema,
    row_estimate: usize,
) -> Result<(ColumnStore, Arc<ColumnAssignments>)> {
    let mut store = ColumnStore::new();
    let mut fields = HashMap::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let index = reserve_for_type(&mut store, field.value_type, row_estimate);
        let previous = fields.insert(
            field.name.clone(),
            Assignment {
                value_type: field.value_type,
                index,
            },
        );
        if previous.is_some() {
            return Err(HeadwayError::Schema(format!(
                "Duplicate field '{}' in table '{}'",
                field.name, schema.name
            )));
        }
    }

    debug!(
        "Registered table '{}' with {} columns (row estimate {})",
        schema.name,
        schema.fields.len(),
        row_estimate
    );

    let assignments = Arc::new(ColumnAssignments {
        table: schema.name.clone(),
        fields,
    });
    Ok((store, assignments))
}

fn reserve_for_type(store: &mut ColumnStore, value_type: ValueType, capacity: usize) -> i32 {
    match value_type {
        ValueType::Byte => store.reserve_column::<i8>(capacity).index(),
        ValueType::Short => store.reserve_column::<i16>(capacity).index(),
        ValueType::Int => store.reserve_column::<i32>(capacity).index(),
        ValueType::Float => store.reserve_column::<f64>(capacity).index(),
        ValueType::Text => store.reserve_column::<String>(capacity).index(),
        ValueType::Decimal => store.reserve_column::<Decimal>(capacity).index(),
        ValueType::Currency => store.reserve_column::<CurrencyCode>(capacity).index(),
        ValueType::Color => store.reserve_column::<Color>(capacity).index(),
        ValueType::Date => store.reserve_column::<NaiveDate>(capacity).index(),
        ValueType::Time => store.reserve_column::<TimeOfDay>(capacity).index(),
        ValueType::Locale => store.reserve_column::<Locale>(capacity).index(),
        ValueType::Timezone => store.reserve_column::<Timezone>(capacity).index(),
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;
