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

//! Index-based entity collections
//!
//! Three container-like adapters over one store. They hold only the
//! indexing structure needed to answer "which row" (nothing, a row-index
//! array, or a key-to-row map) and resolve entities through
//! [`Entity::from_row`] on demand, so a collection of a million entities
//! costs a million integers at most.
//!
//! Every mutating operation first checks that the inserted entity shares
//! the adapter's store and assignments by identity; mixing rows from
//! different tables or load sessions is a caller bug and panics.

use crate::store::column::ColumnStore;
use crate::store::entity::{same_owner, Entity};
use crate::store::schema::ColumnAssignments;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

/// Initial row-index capacity of a [`SparseEntityList`].
const SPARSE_INITIAL_CAPACITY: usize = 10;

fn assert_owner<E: Entity>(
    entity: &E,
    store: &Arc<ColumnStore>,
    assignments: &Arc<ColumnAssignments>,
) {
    assert!(
        same_owner(entity, store, assignments),
        "entity for row {} belongs to a different store or table ('{}' expected)",
        entity.row_index(),
        assignments.table(),
    );
}

/// Ordered list of every row of a table, in row-index order.
///
/// Stores no indices at all: because rows are appended in exactly the order
/// the builder issued them, position `i` *is* row `i`, and `get` resolves
/// straight through the entity constructor.
pub struct DenseEntityList<E: Entity> {
    store: Arc<ColumnStore>,
    assignments: Arc<ColumnAssignments>,
    len: usize,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> DenseEntityList<E> {
    pub fn new(store: Arc<ColumnStore>, assignments: Arc<ColumnAssignments>) -> Self {
        Self {
            store,
            assignments,
            len: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn spanning(
        store: Arc<ColumnStore>,
        assignments: Arc<ColumnAssignments>,
        len: usize,
    ) -> Self {
        Self {
            store,
            assignments,
            len,
            _marker: PhantomData,
        }
    }

    /// Appends the next row.
    ///
    /// # Panics
    ///
    /// If the entity's row index is not exactly the current length, or the
    /// entity belongs to a different store/assignments pair. Skipping a row
    /// would silently break the position-equals-row guarantee, so it is
    /// rejected rather than corrected.
    pub fn push(&mut self, entity: E) {
        assert_owner(&entity, &self.store, &self.assignments);
        assert!(
            entity.row_index() == self.len,
            "dense list for table '{}' has {} rows; cannot append row {}",
            self.assignments.table(),
            self.len,
            entity.row_index(),
        );
        self.len += 1;
    }

    pub fn get(&self, index: usize) -> Option<E> {
        (index < self.len)
            .then(|| E::from_row(Arc::clone(&self.store), Arc::clone(&self.assignments), index))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        (0..self.len)
            .map(|row| E::from_row(Arc::clone(&self.store), Arc::clone(&self.assignments), row))
    }
}

/// Ordered subset of a table's rows, in arbitrary order.
///
/// Backs positions with an explicit growable row-index array; positional
/// order is append order, independent of row-index order.
pub struct SparseEntityList<E: Entity> {
    store: Arc<ColumnStore>,
    assignments: Arc<ColumnAssignments>,
    rows: Vec<usize>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> SparseEntityList<E> {
    pub fn new(store: Arc<ColumnStore>, assignments: Arc<ColumnAssignments>) -> Self {
        Self {
            store,
            assignments,
            rows: Vec::with_capacity(SPARSE_INITIAL_CAPACITY),
            _marker: PhantomData,
        }
    }

    pub fn push(&mut self, entity: E) {
        assert_owner(&entity, &self.store, &self.assignments);
        self.rows.push(entity.row_index());
    }

    /// Replaces the entity at `position` and returns the one previously
    /// there, so callers building an index incrementally can inspect what
    /// they displaced.
    ///
    /// # Panics
    ///
    /// If `position` is out of bounds or the entity fails the ownership
    /// check.
    pub fn set(&mut self, position: usize, entity: E) -> E {
        assert_owner(&entity, &self.store, &self.assignments);
        let previous = self.rows[position];
        self.rows[position] = entity.row_index();
        self.resolve(previous)
    }

    pub fn get(&self, position: usize) -> Option<E> {
        self.rows.get(position).map(|&row| self.resolve(row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        self.rows.iter().map(|&row| self.resolve(row))
    }

    fn resolve(&self, row: usize) -> E {
        E::from_row(Arc::clone(&self.store), Arc::clone(&self.assignments), row)
    }
}

/// Key-to-entity view over a table, backed by a key-to-row map.
///
/// Append-only: rows are never deleted from a store, so there is no
/// `remove` or `clear` here. The batch-load-then-validate lifecycle never
/// needs them, and unmapping a key would not reclaim any row storage.
pub struct EntityMap<K, E: Entity> {
    store: Arc<ColumnStore>,
    assignments: Arc<ColumnAssignments>,
    rows: HashMap<K, usize>,
    _marker: PhantomData<fn() -> E>,
}

impl<K: Eq + Hash, E: Entity> EntityMap<K, E> {
    pub fn new(store: Arc<ColumnStore>, assignments: Arc<ColumnAssignments>) -> Self {
        Self {
            store,
            assignments,
            rows: HashMap::new(),
            _marker: PhantomData,
        }
    }

    /// Maps `key` to the entity's row, returning the entity previously
    /// mapped to that key, if any.
    ///
    /// # Panics
    ///
    /// If the entity fails the ownership check.
    pub fn put(&mut self, key: K, entity: E) -> Option<E> {
        assert_owner(&entity, &self.store, &self.assignments);
        self.rows
            .insert(key, entity.row_index())
            .map(|row| self.resolve(row))
    }

    pub fn get(&self, key: &K) -> Option<E> {
        self.rows.get(key).map(|&row| self.resolve(row))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, E)> + '_ {
        self.rows.iter().map(|(key, &row)| (key, self.resolve(row)))
    }

    fn resolve(&self, row: usize) -> E {
        E::from_row(Arc::clone(&self.store), Arc::clone(&self.assignments), row)
    }
}

#[cfg(test)]
#[path = "collections_test.rs"]
mod collections_test;
