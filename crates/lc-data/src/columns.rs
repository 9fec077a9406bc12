//! Named numeric columns sharing one row count.

use std::collections::BTreeMap;

use crate::{DataError, DataResult};

/// Structure-of-arrays covariate storage: `name → Vec<f64>`, every column
/// exactly `len` long.
///
/// Booleans and categorical codes are stored as numbers too; utility specs
/// and chooser filters only ever read them numerically.
#[derive(Clone, Debug, Default)]
pub struct Columns {
    len: usize,
    map: BTreeMap<String, Vec<f64>>,
}

impl Columns {
    pub fn new(len: usize) -> Self {
        Self { len, map: BTreeMap::new() }
    }

    /// Row count shared by every column.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add or replace a column.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> DataResult<()> {
        let name = name.into();
        if values.len() != self.len {
            return Err(DataError::LengthMismatch {
                expected: self.len,
                got:      values.len(),
                what:     format!("column {name:?}"),
            });
        }
        self.map.insert(name, values);
        Ok(())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.map.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Column names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }
}
