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

//! Entity facades
//!
//! An entity is a read view over one row: a pair of shared handles (store,
//! assignments) plus a row index. Facades are built fresh on every access
//! and never own field data; accessors delegate to the store at call time,
//! so nothing is materialized until a field is actually read.

use crate::store::column::ColumnStore;
use crate::store::schema::ColumnAssignments;
use std::sync::Arc;

/// A row facade over a [`ColumnStore`].
///
/// Implementors hold the two handles and the row index, resolve their
/// [`ColumnId`](crate::store::ColumnId)s from the assignments in
/// `from_row`, and expose named accessors that call `has`/`get` on the
/// store. Construction is O(fields) index lookups and two refcount bumps;
/// no field value is copied out.
pub trait Entity: Sized {
    fn from_row(
        store: Arc<ColumnStore>,
        assignments: Arc<ColumnAssignments>,
        row: usize,
    ) -> Self;

    fn store(&self) -> &Arc<ColumnStore>;
    fn assignments(&self) -> &Arc<ColumnAssignments>;

    /// Dense 0-based position in the table's store. Distinct from any
    /// 1-based line number in the original source file.
    fn row_index(&self) -> usize;
}

/// Whether an entity was built from exactly this store and assignments
/// pair. Both must match by identity; equal contents from a different load
/// session do not count.
pub(crate) fn same_owner<E: Entity>(
    entity: &E,
    store: &Arc<ColumnStore>,
    assignments: &Arc<ColumnAssignments>,
) -> bool {
    Arc::ptr_eq(entity.store(), store) && Arc::ptr_eq(entity.assignments(), assignments)
}
