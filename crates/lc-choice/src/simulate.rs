//! The final destination draw over each chooser's own sample.

use lc_core::{PersonId, RandomStreams, SegmentId, StreamKey, ZoneId};
use lc_utility::{EvalContext, InteractionRows, RowValues, SegmentSpec, UtilityEvaluator, draw, probabilities};

use crate::{ChoiceError, ChoiceResult, LocationSample, chunk_ranges};

/// One realized destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChoiceRecord {
    pub person:  PersonId,
    pub zone:    ZoneId,
    pub segment: SegmentId,
}

/// Picks one zone per chooser by MNL over that chooser's sample rows.
pub struct DestinationSimulator<'a> {
    evaluator:  &'a dyn UtilityEvaluator,
    spec:       &'a SegmentSpec,
    chunk_size: usize,
    streams:    RandomStreams,
    label:      &'a str,
}

impl<'a> DestinationSimulator<'a> {
    pub fn new(
        evaluator: &'a dyn UtilityEvaluator,
        spec:      &'a SegmentSpec,
        streams:   RandomStreams,
        label:     &'a str,
    ) -> Self {
        Self { evaluator, spec, chunk_size: 0, streams, label }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// One [`ChoiceRecord`] per chooser, in `choosers` order.
    ///
    /// Fails with `NoAlternatives` if a chooser has no sample rows or none of
    /// its rows has a finite utility.
    pub fn simulate(
        &self,
        choosers: &[usize],
        sample:   &LocationSample,
        sizes:    &[f64],
        segment:  SegmentId,
        ctx:      EvalContext<'_>,
    ) -> ChoiceResult<Vec<ChoiceRecord>> {
        if choosers.is_empty() {
            return Err(ChoiceError::EmptyInput { stage: self.label.to_owned() });
        }
        let ctx = ctx.with_size_terms(sizes);
        let no_alternatives = |row: usize| ChoiceError::NoAlternatives {
            person: ctx.population.person(row),
            label:  self.label.to_owned(),
        };

        let groups = sample.groups();
        let mut spans = Vec::with_capacity(choosers.len());
        for &c in choosers {
            spans.push(groups.get(&c).cloned().ok_or_else(|| no_alternatives(c))?);
        }

        let stream = StreamKey::from_label(self.label);
        let rows = sample.rows();
        let mut choices = Vec::with_capacity(choosers.len());

        for range in chunk_ranges(spans.iter().map(|s| s.len()), self.chunk_size) {
            let batch = &spans[range.clone()];
            let batch_rows = batch.iter().flat_map(|s| rows[s.clone()].iter());

            let mut chooser_col = Vec::new();
            let mut zone_col = Vec::new();
            let mut picks = Vec::new();
            let mut probs = Vec::new();
            let mut logsums = Vec::new();
            let mut all_logsums = true;
            for r in batch_rows {
                chooser_col.push(r.chooser_row);
                zone_col.push(r.zone_index);
                picks.push(r.pick_count);
                probs.push(r.prob);
                match r.logsum {
                    Some(v) => logsums.push(v),
                    None => all_logsums = false,
                }
            }

            let row_values = RowValues {
                logsum:     all_logsums.then_some(logsums.as_slice()),
                pick_count: Some(picks.as_slice()),
                prob:       Some(probs.as_slice()),
            };
            let interaction = InteractionRows::new(&chooser_col, &zone_col)
                .map_err(|e| ChoiceError::spec(self.label, e))?;
            let utilities = self
                .evaluator
                .evaluate(self.spec, &interaction, &ctx.with_row_values(row_values))
                .map_err(|e| ChoiceError::spec(self.label, e))?;

            let mut offset = 0;
            for (span, &chooser_row) in batch.iter().zip(&choosers[range]) {
                let n = span.len();
                let person = ctx.population.person(chooser_row);
                let p = probabilities(&utilities[offset..offset + n])
                    .ok_or_else(|| no_alternatives(chooser_row))?;
                let u = self.streams.chooser(person, stream).uniform();
                let pick = draw(&p, u).ok_or_else(|| no_alternatives(chooser_row))?;

                choices.push(ChoiceRecord { person, zone: rows[span.start + pick].zone, segment });
                offset += n;
            }
        }

        log::debug!("{}: {} choices", self.label, choices.len());
        Ok(choices)
    }
}
