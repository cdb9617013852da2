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

//! Headway - Columnar entity storage for transit feed validation
//!
//! Stores parsed feed tables as per-field typed columns instead of per-row
//! objects, so large feeds with sparsely populated optional columns stay
//! memory-cheap. Rows are read back through lightweight entity facades that
//! resolve fields on demand from the shared column store.

pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::{HeadwayError, Result};
pub use store::{ColumnStore, Table, TableBuilder};
