//! Fluent builders for [`Population`] and [`ZoneTable`].
//!
//! # Usage
//!
//! ```rust
//! use lc_data::PopulationBuilder;
//!
//! let persons = PopulationBuilder::new()
//!     .person(1, /*home zone=*/ 10)
//!     .person(2, 11)
//!     .column("is_worker", vec![1.0, 0.0])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(persons.count(), 2);
//! assert_eq!(persons.eligible_rows("is_worker").unwrap(), vec![0]);
//! ```

use lc_core::{PersonId, ZoneId};

use crate::{DataResult, Population, ZoneTable};

/// Fluent builder for [`Population`].
///
/// Column lengths are only checked by [`build`](Self::build), so persons and
/// columns may be added in any order.
#[derive(Default)]
pub struct PopulationBuilder {
    ids:     Vec<PersonId>,
    homes:   Vec<ZoneId>,
    columns: Vec<(String, Vec<f64>)>,
}

impl PopulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person(mut self, id: u32, home_zone: u32) -> Self {
        self.ids.push(PersonId(id));
        self.homes.push(ZoneId(home_zone));
        self
    }

    pub fn column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    pub fn build(self) -> DataResult<Population> {
        let mut population = Population::new(self.ids, self.homes)?;
        for (name, values) in self.columns {
            population.insert_column(name, values)?;
        }
        Ok(population)
    }
}

/// Fluent builder for [`ZoneTable`].
#[derive(Default)]
pub struct ZoneTableBuilder {
    ids:     Vec<ZoneId>,
    columns: Vec<(String, Vec<f64>)>,
}

impl ZoneTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zones(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.ids.extend(ids.into_iter().map(ZoneId));
        self
    }

    pub fn column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    pub fn build(self) -> DataResult<ZoneTable> {
        let mut table = ZoneTable::new(self.ids)?;
        for (name, values) in self.columns {
            table.insert_column(name, values)?;
        }
        Ok(table)
    }
}
