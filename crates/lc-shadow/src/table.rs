//! Dense zone × segment tables.

use lc_core::{SegmentId, ZoneId};

/// One `f64` per (zone, segment), stored segment-major so a segment's column
/// is a contiguous slice indexed by land-use row.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneSegmentTable {
    zones:    Vec<ZoneId>,
    segments: Vec<String>,
    columns:  Vec<Vec<f64>>,
}

impl ZoneSegmentTable {
    /// A table over `zones` × `segments` with every cell set to `fill`.
    pub fn filled(zones: &[ZoneId], segments: &[String], fill: f64) -> Self {
        Self {
            zones:    zones.to_vec(),
            segments: segments.to_vec(),
            columns:  vec![vec![fill; zones.len()]; segments.len()],
        }
    }

    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    /// Segment names in `SegmentId` order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of cells.
    #[inline]
    pub fn cells(&self) -> usize {
        self.zones.len() * self.segments.len()
    }

    #[inline]
    pub fn get(&self, zone: usize, segment: SegmentId) -> f64 {
        self.columns[segment.index()][zone]
    }

    #[inline]
    pub fn set(&mut self, zone: usize, segment: SegmentId, value: f64) {
        self.columns[segment.index()][zone] = value;
    }

    /// All zones' values for one segment.
    pub fn column(&self, segment: SegmentId) -> &[f64] {
        &self.columns[segment.index()]
    }

    pub fn column_mut(&mut self, segment: SegmentId) -> &mut [f64] {
        &mut self.columns[segment.index()]
    }

    /// Sum over zones for one segment.
    pub fn total(&self, segment: SegmentId) -> f64 {
        self.column(segment).iter().sum()
    }

    pub fn fill(&mut self, value: f64) {
        for column in &mut self.columns {
            column.fill(value);
        }
    }

    /// `(zone, segment name, value)` for every cell, zone-major.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, &str, f64)> + '_ {
        self.zones.iter().enumerate().flat_map(move |(z, &zone)| {
            self.segments
                .iter()
                .zip(&self.columns)
                .map(move |(name, column)| (zone, name.as_str(), column[z]))
        })
    }
}
