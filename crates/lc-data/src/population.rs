//! The person population: Structure-of-Arrays chooser storage.
//!
//! Every `Vec` has exactly `count()` elements; a person's *row* (not its
//! `PersonId`) is the index into all of them.  `PersonId` → row goes through
//! an `FxHashMap` built once at construction.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use lc_core::{PersonId, ZoneId};

use crate::{Columns, DataError, DataResult};

/// Person table with covariates and written-back destination columns.
#[derive(Clone, Debug)]
pub struct Population {
    ids:          Vec<PersonId>,
    home_zone:    Vec<ZoneId>,
    columns:      Columns,
    /// Location-model outputs, one `Vec<ZoneId>` per destination column.
    destinations: BTreeMap<String, Vec<ZoneId>>,
    index:        FxHashMap<PersonId, usize>,
}

impl Population {
    /// Create a population with no covariate columns yet.
    ///
    /// Fails on duplicate person ids or mismatched lengths.
    pub fn new(ids: Vec<PersonId>, home_zone: Vec<ZoneId>) -> DataResult<Self> {
        if home_zone.len() != ids.len() {
            return Err(DataError::LengthMismatch {
                expected: ids.len(),
                got:      home_zone.len(),
                what:     "home_zone".into(),
            });
        }

        let mut index = FxHashMap::default();
        index.reserve(ids.len());
        for (row, &id) in ids.iter().enumerate() {
            if index.insert(id, row).is_some() {
                return Err(DataError::DuplicateId { what: "person", id: id.0 });
            }
        }

        Ok(Self {
            columns: Columns::new(ids.len()),
            ids,
            home_zone,
            destinations: BTreeMap::new(),
            index,
        })
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
    pub fn ids(&self) -> &[PersonId] {
        &self.ids
    }

    #[inline]
    pub fn person(&self, row: usize) -> PersonId {
        self.ids[row]
    }

    #[inline]
    pub fn home_zone(&self, row: usize) -> ZoneId {
        self.home_zone[row]
    }

    #[inline]
    pub fn row_of(&self, person: PersonId) -> Option<usize> {
        self.index.get(&person).copied()
    }

    // ── Covariates ────────────────────────────────────────────────────────

    #[inline]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name)
    }

    /// Like [`column`](Self::column) but a missing column is an error.
    pub fn require_column(&self, name: &str) -> DataResult<&[f64]> {
        self.column(name).ok_or_else(|| DataError::MissingColumn {
            table:  "persons",
            column: name.to_owned(),
        })
    }

    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> DataResult<()> {
        self.columns.insert(name, values)
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Rows whose `filter_column` is non-zero, in row order.
    pub fn eligible_rows(&self, filter_column: &str) -> DataResult<Vec<usize>> {
        let flags = self.require_column(filter_column)?;
        Ok(flags
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f != 0.0)
            .map(|(row, _)| row)
            .collect())
    }

    // ── Destination columns ───────────────────────────────────────────────

    /// Write a destination column: every listed person gets its zone, every
    /// other person gets [`ZoneId::NONE`].
    ///
    /// Returns the number of persons assigned a real destination.
    pub fn set_destinations<I>(&mut self, column: &str, choices: I) -> DataResult<usize>
    where
        I: IntoIterator<Item = (PersonId, ZoneId)>,
    {
        let mut values = vec![ZoneId::NONE; self.count()];
        let mut assigned = 0;
        for (person, zone) in choices {
            let row = self.row_of(person).ok_or(DataError::UnknownPerson(person))?;
            values[row] = zone;
            assigned += 1;
        }
        self.destinations.insert(column.to_owned(), values);
        Ok(assigned)
    }

    pub fn destinations(&self, column: &str) -> Option<&[ZoneId]> {
        self.destinations.get(column).map(Vec::as_slice)
    }

    /// Destination columns in sorted name order.
    pub fn destination_columns(&self) -> impl Iterator<Item = (&str, &[ZoneId])> + '_ {
        self.destinations.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
