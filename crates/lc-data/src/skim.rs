//! Zone-to-zone travel-cost lookup ("skims").

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use lc_core::ZoneId;

use crate::{DataError, DataResult};

/// Read-only access to named origin × destination matrices.
///
/// Implementations must be `Send + Sync`: segments may be simulated in
/// parallel against one shared lookup.
pub trait SkimLookup: Send + Sync {
    /// Value of skim `key` from `origin` to `destination`, or `None` if the
    /// key or either zone is unknown.
    fn lookup(&self, key: &str, origin: ZoneId, destination: ZoneId) -> Option<f64>;

    /// `true` if a matrix named `key` exists.
    fn contains(&self, key: &str) -> bool;
}

/// Dense in-memory skims: one `f32` matrix of `n × n` per key.
#[derive(Clone, Debug, Default)]
pub struct SkimDict {
    index:    FxHashMap<ZoneId, usize>,
    n:        usize,
    matrices: BTreeMap<String, Vec<f32>>,
}

impl SkimDict {
    /// Create an empty dictionary over `zones` (matrix row/column order).
    pub fn new(zones: &[ZoneId]) -> Self {
        let index = zones.iter().enumerate().map(|(i, &z)| (z, i)).collect();
        Self { index, n: zones.len(), matrices: BTreeMap::new() }
    }

    /// Number of zones per matrix side.
    #[inline]
    pub fn zone_count(&self) -> usize {
        self.n
    }

    /// Add a row-major `n × n` matrix.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<f32>) -> DataResult<()> {
        let key = key.into();
        if values.len() != self.n * self.n {
            return Err(DataError::LengthMismatch {
                expected: self.n * self.n,
                got:      values.len(),
                what:     format!("skim {key:?}"),
            });
        }
        self.matrices.insert(key, values);
        Ok(())
    }

    /// Build a matrix from a function of zone *indices*.
    pub fn insert_with<F>(&mut self, key: impl Into<String>, f: F)
    where
        F: Fn(usize, usize) -> f32,
    {
        let n = self.n;
        let values = (0..n * n).map(|i| f(i / n, i % n)).collect();
        self.matrices.insert(key.into(), values);
    }

    /// Overwrite one cell, creating a zero-filled matrix for a new key.
    pub fn set(&mut self, key: &str, origin: ZoneId, destination: ZoneId, value: f32) -> DataResult<()> {
        let o = *self.index.get(&origin).ok_or(DataError::UnknownZone(origin))?;
        let d = *self.index.get(&destination).ok_or(DataError::UnknownZone(destination))?;
        let n = self.n;
        let matrix = self
            .matrices
            .entry(key.to_owned())
            .or_insert_with(|| vec![0.0; n * n]);
        matrix[o * n + d] = value;
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.matrices.keys().map(String::as_str)
    }
}

impl SkimLookup for SkimDict {
    fn lookup(&self, key: &str, origin: ZoneId, destination: ZoneId) -> Option<f64> {
        let matrix = self.matrices.get(key)?;
        let o = *self.index.get(&origin)?;
        let d = *self.index.get(&destination)?;
        Some(matrix[o * self.n + d] as f64)
    }

    fn contains(&self, key: &str) -> bool {
        self.matrices.contains_key(key)
    }
}
