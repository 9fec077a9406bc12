//! Chooser segments in deterministic (sorted-name) order.

use std::collections::{BTreeMap, BTreeSet};

use crate::{LcError, LcResult, SegmentId};

/// One chooser segment, e.g. `work_high`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Position in [`Segments`]; also indexes per-segment tables.
    pub id:   SegmentId,
    /// Segment label used as the spec coefficient column.
    pub name: String,
    /// Value of the chooser segment column that selects this segment.
    pub code: i64,
}

/// The segments of one location model, sorted by name.
///
/// Iteration order is the processing order of the RUN phase, so random-draw
/// consumption and choice concatenation are reproducible run to run.
#[derive(Clone, Debug, Default)]
pub struct Segments {
    list: Vec<Segment>,
}

impl Segments {
    /// Build from a `name → segment-column code` map.
    ///
    /// Fails if two names share a code (a chooser would belong to both) or
    /// if there are more segments than `SegmentId` can address.
    pub fn from_codes(codes: &BTreeMap<String, i64>) -> LcResult<Self> {
        let mut seen = BTreeSet::new();
        let mut list = Vec::with_capacity(codes.len());

        for (i, (name, &code)) in codes.iter().enumerate() {
            if !seen.insert(code) {
                return Err(LcError::Config(format!(
                    "segment {name:?} reuses segment code {code}"
                )));
            }
            let id = u16::try_from(i)
                .ok()
                .filter(|&i| i != u16::MAX)
                .map(SegmentId)
                .ok_or_else(|| LcError::Config(format!("too many segments ({})", codes.len())))?;
            list.push(Segment { id, name: name.clone(), code });
        }

        Ok(Self { list })
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Segments in processing order.
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.list.iter()
    }

    #[inline]
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.list.get(id.index())
    }

    /// The segment selected by a segment-column value, if any.
    pub fn by_code(&self, code: i64) -> Option<&Segment> {
        self.list.iter().find(|s| s.code == code)
    }

    /// Segment names in processing order.
    pub fn names(&self) -> Vec<String> {
        self.list.iter().map(|s| s.name.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
