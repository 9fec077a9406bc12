//! Zone (land-use) table — the alternative universe of every location model.

use rustc_hash::FxHashMap;

use lc_core::ZoneId;

use crate::{Columns, DataError, DataResult};

/// One row per zone, in input order.  A zone's *index* is its row.
#[derive(Clone, Debug)]
pub struct ZoneTable {
    ids:     Vec<ZoneId>,
    columns: Columns,
    index:   FxHashMap<ZoneId, usize>,
}

impl ZoneTable {
    pub fn new(ids: Vec<ZoneId>) -> DataResult<Self> {
        let mut index = FxHashMap::default();
        for (row, &id) in ids.iter().enumerate() {
            if index.insert(id, row).is_some() {
                return Err(DataError::DuplicateId { what: "zone", id: id.0 });
            }
        }
        Ok(Self { columns: Columns::new(ids.len()), ids, index })
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn ids(&self) -> &[ZoneId] {
        &self.ids
    }

    #[inline]
    pub fn zone(&self, index: usize) -> ZoneId {
        self.ids[index]
    }

    #[inline]
    pub fn index_of(&self, zone: ZoneId) -> Option<usize> {
        self.index.get(&zone).copied()
    }

    #[inline]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name)
    }

    pub fn require_column(&self, name: &str) -> DataResult<&[f64]> {
        self.column(name).ok_or_else(|| DataError::MissingColumn {
            table:  "land_use",
            column: name.to_owned(),
        })
    }

    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> DataResult<()> {
        self.columns.insert(name, values)
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }
}
