//! Destination sampling: a small, weighted sample of zones per chooser.

use std::collections::BTreeMap;
use std::ops::Range;

use lc_core::{PersonId, RandomStreams, StreamKey, ZoneId};
use lc_utility::{EvalContext, InteractionRows, SegmentSpec, UtilityEvaluator, draw, probabilities};

use crate::{ChoiceError, ChoiceResult, uniform_chunks};

// ── Sample table ──────────────────────────────────────────────────────────────

/// One sampled (chooser, zone) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRow {
    pub person:      PersonId,
    /// Population row of the chooser.
    pub chooser_row: usize,
    pub zone:        ZoneId,
    /// Land-use row of the zone.
    pub zone_index:  usize,
    /// Uniform draw that first landed on this zone (`0` under full enumeration).
    pub rand:        f64,
    /// Number of draws collapsed into this row.
    pub pick_count:  u32,
    /// Sampling probability of the zone for this chooser.
    pub prob:        f64,
    /// Mode-choice logsum, set by the augmenter.
    pub logsum:      Option<f64>,
}

/// Sample rows grouped by chooser, in chooser order, zones ascending within
/// each group.
#[derive(Clone, Debug, Default)]
pub struct LocationSample {
    rows: Vec<SampleRow>,
}

impl LocationSample {
    pub fn from_rows(rows: Vec<SampleRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [SampleRow] {
        &mut self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row range of each chooser's group, keyed by population row.
    pub fn groups(&self) -> BTreeMap<usize, Range<usize>> {
        let mut groups = BTreeMap::new();
        let mut start = 0;
        for i in 1..=self.rows.len() {
            if i == self.rows.len() || self.rows[i].chooser_row != self.rows[start].chooser_row {
                groups.insert(self.rows[start].chooser_row, start..i);
                start = i;
            }
        }
        groups
    }

    /// Total pick count of `person`'s rows.
    #[cfg(test)]
    pub(crate) fn picks_for(&self, person: PersonId) -> u32 {
        self.rows.iter().filter(|r| r.person == person).map(|r| r.pick_count).sum()
    }
}

// ── Sampler ───────────────────────────────────────────────────────────────────

/// Draws up to `sample_size` zones per chooser, weighted by MNL probability.
///
/// Draws are with replacement; repeats collapse into one row whose
/// `pick_count` records the multiplicity.  Only zones with a positive size
/// term are candidates.  `sample_size == 0` skips sampling and returns every
/// candidate zone with positive probability once.
pub struct DestinationSampler<'a> {
    evaluator:   &'a dyn UtilityEvaluator,
    spec:        &'a SegmentSpec,
    sample_size: usize,
    chunk_size:  usize,
    streams:     RandomStreams,
    label:       &'a str,
}

impl<'a> DestinationSampler<'a> {
    pub fn new(
        evaluator:   &'a dyn UtilityEvaluator,
        spec:        &'a SegmentSpec,
        sample_size: usize,
        streams:     RandomStreams,
        label:       &'a str,
    ) -> Self {
        Self { evaluator, spec, sample_size, chunk_size: 0, streams, label }
    }

    /// Bound interaction rows per evaluation batch; `0` is unbounded.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sample zones for `choosers` (population rows) given the current
    /// adjusted size term per land-use row.
    pub fn sample(
        &self,
        choosers: &[usize],
        sizes:    &[f64],
        ctx:      EvalContext<'_>,
    ) -> ChoiceResult<LocationSample> {
        if choosers.is_empty() {
            return Err(ChoiceError::EmptyInput { stage: self.label.to_owned() });
        }
        let ctx = ctx.with_size_terms(sizes);

        let feasible: Vec<usize> = (0..sizes.len()).filter(|&z| sizes[z] > 0.0).collect();
        let k = self.sample_size.min(feasible.len());
        if feasible.is_empty() {
            log::warn!("{}: no zone has a positive size term", self.label);
        }

        let stream = StreamKey::from_label(self.label);
        let mut rows = Vec::with_capacity(choosers.len() * k.max(1));
        let chunks = uniform_chunks(choosers.len(), feasible.len(), self.chunk_size);
        let n_chunks = chunks.len();

        for (c, range) in chunks.into_iter().enumerate() {
            let batch = &choosers[range];
            let chooser_col: Vec<usize> =
                batch.iter().flat_map(|&p| std::iter::repeat_n(p, feasible.len())).collect();
            let zone_col: Vec<usize> =
                batch.iter().flat_map(|_| feasible.iter().copied()).collect();
            let interaction = InteractionRows::new(&chooser_col, &zone_col)
                .map_err(|e| ChoiceError::spec(self.label, e))?;

            let utilities = self
                .evaluator
                .evaluate(self.spec, &interaction, &ctx)
                .map_err(|e| ChoiceError::spec(self.label, e))?;

            for (i, &chooser_row) in batch.iter().enumerate() {
                let slice = &utilities[i * feasible.len()..(i + 1) * feasible.len()];
                let person = ctx.population.person(chooser_row);
                let Some(probs) = probabilities(slice) else {
                    log::debug!("{}: {person} has no available zone", self.label);
                    continue;
                };
                let row = |j: usize, rand: f64, pick_count: u32| SampleRow {
                    person,
                    chooser_row,
                    zone: ctx.land_use.zone(feasible[j]),
                    zone_index: feasible[j],
                    rand,
                    pick_count,
                    prob: probs[j],
                    logsum: None,
                };

                if self.sample_size == 0 {
                    for j in (0..probs.len()).filter(|&j| probs[j] > 0.0) {
                        rows.push(row(j, 0.0, 1));
                    }
                    continue;
                }

                // feasible position -> (pick count, first draw)
                let mut picks: BTreeMap<usize, (u32, f64)> = BTreeMap::new();
                let mut rng = self.streams.chooser(person, stream);
                for _ in 0..k {
                    let u = rng.uniform();
                    if let Some(j) = draw(&probs, u) {
                        picks.entry(j).or_insert((0, u)).0 += 1;
                    }
                }
                for (j, (count, u)) in picks {
                    rows.push(row(j, u, count));
                }
            }

            log::debug!("{}: chunk {}/{} sampled {} choosers", self.label, c + 1, n_chunks, batch.len());
        }

        Ok(LocationSample::from_rows(rows))
    }
}
