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

//! Typed column arrays with presence tracking
//!
//! One growable array per declared field, grouped by value type. Primitive
//! columns carry a presence bitmap because their element types have no
//! natural "absent" sentinel; reference columns use `None` slots instead.

use crate::store::value::{Color, CurrencyCode, Locale, TimeOfDay, Timezone};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Tag for the closed set of value types a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// 8-bit signed integer (small enum-like fields)
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit floating point number
    Float,
    /// UTF-8 string
    Text,
    /// Arbitrary-precision decimal
    Decimal,
    /// ISO 4217 currency code
    Currency,
    /// 24-bit RGB color
    Color,
    /// Calendar date
    Date,
    /// Time of day on a service day
    Time,
    /// BCP-47 language tag
    Locale,
    /// IANA timezone identifier
    Timezone,
}

/// Index of a column within its value type's sequence in one [`ColumnStore`].
///
/// Scoped to (store instance, value type); the `-1` sentinel marks a field
/// the schema declares but this table never populates, and always reads as
/// absent.
pub struct ColumnId<T> {
    index: i32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ColumnId<T> {
    pub const UNASSIGNED: Self = Self {
        index: -1,
        _marker: PhantomData,
    };

    pub(crate) fn new(index: usize) -> Self {
        Self {
            index: index as i32,
            _marker: PhantomData,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.index < 0
    }

    pub(crate) fn index(&self) -> i32 {
        self.index
    }

    fn slot(&self) -> Option<usize> {
        if self.index < 0 {
            None
        } else {
            Some(self.index as usize)
        }
    }
}

impl<T> Clone for ColumnId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ColumnId<T> {}

impl<T> PartialEq for ColumnId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for ColumnId<T> {}

impl<T> fmt::Debug for ColumnId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColumnId").field(&self.index).finish()
    }
}

/// Doubling growth policy: double from the current length until the needed
/// index fits. Amortized O(1) appends with wasted space bounded by 2x.
fn grown_len(current: usize, needed: usize) -> usize {
    let mut len = current.max(1);
    while len <= needed {
        len *= 2;
    }
    len
}

/// Presence bitmaps for all primitive columns of a store.
///
/// Slots are assigned from a single namespace shared by every primitive
/// value type, so two columns of different types can never collide on a
/// bitmap even though their column indices are assigned per type.
#[derive(Debug, Default)]
struct PresenceSet {
    bits: Vec<Vec<u8>>,
}

impl PresenceSet {
    fn reserve_slot(&mut self, capacity: usize) -> usize {
        let slot = self.bits.len();
        self.bits.push(vec![0u8; capacity.div_ceil(8)]);
        slot
    }

    fn mark(&mut self, slot: usize, row: usize) {
        let bytes = &mut self.bits[slot];
        let byte_idx = row >> 3;
        if byte_idx >= bytes.len() {
            let new_len = grown_len(bytes.len(), byte_idx);
            bytes.resize(new_len, 0);
        }
        bytes[byte_idx] |= 1 << (row & 7);
    }

    fn is_set(&self, slot: usize, row: usize) -> bool {
        let bytes = &self.bits[slot];
        let byte_idx = row >> 3;
        byte_idx < bytes.len() && (bytes[byte_idx] & (1 << (row & 7))) != 0
    }

    fn trim(&mut self, row_count: usize) {
        for bytes in &mut self.bits {
            bytes.resize(row_count.div_ceil(8), 0);
            bytes.shrink_to_fit();
        }
    }
}

/// Column of an unboxed value type; absence is tracked in the shared
/// presence set under `presence_slot`.
#[derive(Debug)]
struct PrimitiveColumn<T> {
    values: Vec<T>,
    presence_slot: usize,
}

impl<T: Copy + Default> PrimitiveColumn<T> {
    fn with_capacity(capacity: usize, presence_slot: usize) -> Self {
        Self {
            values: vec![T::default(); capacity],
            presence_slot,
        }
    }

    fn has(&self, presence: &PresenceSet, row: usize) -> bool {
        presence.is_set(self.presence_slot, row)
    }

    fn get<'a>(&'a self, presence: &PresenceSet, row: usize) -> Option<&'a T> {
        if row < self.values.len() && presence.is_set(self.presence_slot, row) {
            Some(&self.values[row])
        } else {
            None
        }
    }

    fn set(&mut self, presence: &mut PresenceSet, row: usize, value: T) {
        if row >= self.values.len() {
            let new_len = grown_len(self.values.len(), row);
            self.values.resize(new_len, T::default());
        }
        self.values[row] = value;
        presence.mark(self.presence_slot, row);
    }

    fn trim(&mut self, row_count: usize) {
        self.values.resize(row_count, T::default());
        self.values.shrink_to_fit();
    }
}

/// Column of a reference-like value type; a `None` slot means absent, so no
/// presence bitmap is needed.
#[derive(Debug)]
struct RefColumn<T> {
    values: Vec<Option<T>>,
}

impl<T: Clone> RefColumn<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            values: vec![None; capacity],
        }
    }

    fn has(&self, row: usize) -> bool {
        self.values.get(row).is_some_and(Option::is_some)
    }

    fn get(&self, row: usize) -> Option<&T> {
        self.values.get(row).and_then(Option::as_ref)
    }

    fn set(&mut self, row: usize, value: T) {
        if row >= self.values.len() {
            let new_len = grown_len(self.values.len(), row);
            self.values.resize(new_len, None);
        }
        self.values[row] = Some(value);
    }

    fn trim(&mut self, row_count: usize) {
        self.values.resize(row_count, None);
        self.values.shrink_to_fit();
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A value type that can live in a [`ColumnStore`] column.
///
/// Implemented for the closed set of supported types; the methods are
/// dispatch plumbing for the store's generic accessors and not meant to be
/// called directly.
pub trait ColumnValue: sealed::Sealed + Clone + 'static {
    const VALUE_TYPE: ValueType;

    #[doc(hidden)]
    fn reserve(store: &mut ColumnStore, capacity: usize) -> ColumnId<Self>;
    #[doc(hidden)]
    fn has(store: &ColumnStore, column: ColumnId<Self>, row: usize) -> bool;
    #[doc(hidden)]
    fn get(store: &ColumnStore, column: ColumnId<Self>, row: usize) -> Option<&Self>;
    #[doc(hidden)]
    fn set(store: &mut ColumnStore, column: ColumnId<Self>, row: usize, value: Self);
}

/// Columnar storage for one table: a fixed set of typed columns plus
/// presence bitmaps for the primitive ones.
///
/// Columns grow independently, so a sparsely populated optional column stays
/// short no matter how many rows other columns hold; any read past a
/// column's current length is absent, not an error. After the build phase
/// the store is trimmed once and treated as immutable.
#[derive(Debug, Default)]
pub struct ColumnStore {
    byte_columns: Vec<PrimitiveColumn<i8>>,
    short_columns: Vec<PrimitiveColumn<i16>>,
    int_columns: Vec<PrimitiveColumn<i32>>,
    float_columns: Vec<PrimitiveColumn<f64>>,
    text_columns: Vec<RefColumn<String>>,
    decimal_columns: Vec<RefColumn<Decimal>>,
    currency_columns: Vec<RefColumn<CurrencyCode>>,
    color_columns: Vec<RefColumn<Color>>,
    date_columns: Vec<RefColumn<NaiveDate>>,
    time_columns: Vec<RefColumn<TimeOfDay>>,
    locale_columns: Vec<RefColumn<Locale>>,
    timezone_columns: Vec<RefColumn<Timezone>>,
    presence: PresenceSet,
}

impl ColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new column of type `T`, backed by an array pre-sized to
    /// `initial_capacity`. Called once per declared field during schema
    /// setup.
    pub fn reserve_column<T: ColumnValue>(&mut self, initial_capacity: usize) -> ColumnId<T> {
        T::reserve(self, initial_capacity)
    }

    /// Whether a value was ever set at (column, row). Unassigned columns and
    /// out-of-range rows are absent, never errors.
    pub fn has<T: ColumnValue>(&self, column: ColumnId<T>, row: usize) -> bool {
        T::has(self, column, row)
    }

    /// The value at (column, row), or `None` if absent.
    pub fn get<T: ColumnValue>(&self, column: ColumnId<T>, row: usize) -> Option<&T> {
        T::get(self, column, row)
    }

    /// The value at (column, row), or `default` if absent.
    pub fn get_or<'a, T: ColumnValue>(
        &'a self,
        column: ColumnId<T>,
        row: usize,
        default: &'a T,
    ) -> &'a T {
        self.get(column, row).unwrap_or(default)
    }

    /// Writes a value at `row`, growing the column's backing array (and
    /// presence bitmap, for primitive types) as needed. Writes to an
    /// unassigned column are dropped.
    pub fn set<T: ColumnValue>(&mut self, column: ColumnId<T>, row: usize, value: T) {
        T::set(self, column, row, value)
    }

    /// Shrinks every backing array to exactly `row_count` elements,
    /// eliminating growth slack. Called once after the last row is written;
    /// the store is logically immutable afterwards.
    pub fn trim_to_size(&mut self, row_count: usize) {
        for column in &mut self.byte_columns {
            column.trim(row_count);
        }
        for column in &mut self.short_columns {
            column.trim(row_count);
        }
        for column in &mut self.int_columns {
            column.trim(row_count);
        }
        for column in &mut self.float_columns {
            column.trim(row_count);
        }
        for column in &mut self.text_columns {
            column.trim(row_count);
        }
        for column in &mut self.decimal_columns {
            column.trim(row_count);
        }
        for column in &mut self.currency_columns {
            column.trim(row_count);
        }
        for column in &mut self.color_columns {
            column.trim(row_count);
        }
        for column in &mut self.date_columns {
            column.trim(row_count);
        }
        for column in &mut self.time_columns {
            column.trim(row_count);
        }
        for column in &mut self.locale_columns {
            column.trim(row_count);
        }
        for column in &mut self.timezone_columns {
            column.trim(row_count);
        }
        self.presence.trim(row_count);
    }

    /// Number of columns reserved for one value type.
    pub fn column_count(&self, value_type: ValueType) -> usize {
        match value_type {
            ValueType::Byte => self.byte_columns.len(),
            ValueType::Short => self.short_columns.len(),
            ValueType::Int => self.int_columns.len(),
            ValueType::Float => self.float_columns.len(),
            ValueType::Text => self.text_columns.len(),
            ValueType::Decimal => self.decimal_columns.len(),
            ValueType::Currency => self.currency_columns.len(),
            ValueType::Color => self.color_columns.len(),
            ValueType::Date => self.date_columns.len(),
            ValueType::Time => self.time_columns.len(),
            ValueType::Locale => self.locale_columns.len(),
            ValueType::Timezone => self.timezone_columns.len(),
        }
    }
}

// Passing a column index at or beyond its type's sequence length can only
// come from mis-generated assignments; the direct indexing below panics on
// it as a contract violation.
macro_rules! primitive_column_value {
    ($type:ty, $field:ident, $tag:expr) => {
        impl sealed::Sealed for $type {}

        impl ColumnValue for $type {
            const VALUE_TYPE: ValueType = $tag;

            fn reserve(store: &mut ColumnStore, capacity: usize) -> ColumnId<Self> {
                let slot = store.presence.reserve_slot(capacity);
                let id = ColumnId::new(store.$field.len());
                store.$field.push(PrimitiveColumn::with_capacity(capacity, slot));
                id
            }

            fn has(store: &ColumnStore, column: ColumnId<Self>, row: usize) -> bool {
                match column.slot() {
                    Some(index) => store.$field[index].has(&store.presence, row),
                    None => false,
                }
            }

            fn get(store: &ColumnStore, column: ColumnId<Self>, row: usize) -> Option<&Self> {
                match column.slot() {
                    Some(index) => store.$field[index].get(&store.presence, row),
                    None => None,
                }
            }

            fn set(store: &mut ColumnStore, column: ColumnId<Self>, row: usize, value: Self) {
                if let Some(index) = column.slot() {
                    let (columns, presence) = (&mut store.$field, &mut store.presence);
                    columns[index].set(presence, row, value);
                }
            }
        }
    };
}

macro_rules! ref_column_value {
    ($type:ty, $field:ident, $tag:expr) => {
        impl sealed::Sealed for $type {}

        impl ColumnValue for $type {
            const VALUE_TYPE: ValueType = $tag;

            fn reserve(store: &mut ColumnStore, capacity: usize) -> ColumnId<Self> {
                let id = ColumnId::new(store.$field.len());
                store.$field.push(RefColumn::with_capacity(capacity));
                id
            }

            fn has(store: &ColumnStore, column: ColumnId<Self>, row: usize) -> bool {
                match column.slot() {
                    Some(index) => store.$field[index].has(row),
                    None => false,
                }
            }

            fn get(store: &ColumnStore, column: ColumnId<Self>, row: usize) -> Option<&Self> {
                match column.slot() {
                    Some(index) => store.$field[index].get(row),
                    None => None,
                }
            }

            fn set(store: &mut ColumnStore, column: ColumnId<Self>, row: usize, value: Self) {
                if let Some(index) = column.slot() {
                    store.$field[index].set(row, value);
                }
            }
        }
    };
}

primitive_column_value!(i8, byte_columns, ValueType::Byte);
primitive_column_value!(i16, short_columns, ValueType::Short);
primitive_column_value!(i32, int_columns, ValueType::Int);
primitive_column_value!(f64, float_columns, ValueType::Float);

ref_column_value!(String, text_columns, ValueType::Text);
ref_column_value!(Decimal, decimal_columns, ValueType::Decimal);
ref_column_value!(CurrencyCode, currency_columns, ValueType::Currency);
ref_column_value!(Color, color_columns, ValueType::Color);
ref_column_value!(NaiveDate, date_columns, ValueType::Date);
ref_column_value!(TimeOfDay, time_columns, ValueType::Time);
ref_column_value!(Locale, locale_columns, ValueType::Locale);
ref_column_value!(Timezone, timezone_columns, ValueType::Timezone);

#[cfg(test)]
#[path = "column_test.rs"]
mod column_test;
