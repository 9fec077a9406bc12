//! Attaching mode-choice logsums to sample rows.

use lc_utility::{EvalContext, InteractionRows, LogsumModel, UtilityEvaluator};

use crate::{ChoiceError, ChoiceResult, LocationSample, chunk_ranges};

/// Computes one logsum per sample row for a tour purpose.
///
/// Rows are processed in batches of at most `chunk_size` and written back by
/// position, so duplicate choosers and row order are kept as sampled.
pub struct LogsumAugmenter<'a> {
    model:      &'a LogsumModel,
    evaluator:  &'a dyn UtilityEvaluator,
    purpose:    &'a str,
    chunk_size: usize,
    label:      &'a str,
}

impl<'a> LogsumAugmenter<'a> {
    pub fn new(
        model:     &'a LogsumModel,
        evaluator: &'a dyn UtilityEvaluator,
        purpose:   &'a str,
        label:     &'a str,
    ) -> Self {
        Self { model, evaluator, purpose, chunk_size: 0, label }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn augment(&self, sample: &mut LocationSample, ctx: EvalContext<'_>) -> ChoiceResult<()> {
        if sample.is_empty() {
            return Err(ChoiceError::EmptyInput { stage: self.label.to_owned() });
        }

        for range in chunk_ranges(std::iter::repeat_n(1, sample.len()), self.chunk_size) {
            let rows = &mut sample.rows_mut()[range];
            let choosers: Vec<usize> = rows.iter().map(|r| r.chooser_row).collect();
            let zones: Vec<usize> = rows.iter().map(|r| r.zone_index).collect();
            let interaction = InteractionRows::new(&choosers, &zones)
                .map_err(|e| ChoiceError::spec(self.label, e))?;

            let logsums = self
                .model
                .logsums(self.evaluator, self.purpose, &interaction, &ctx)
                .map_err(|e| ChoiceError::spec(self.label, e))?;

            for (row, logsum) in rows.iter_mut().zip(logsums) {
                row.logsum = Some(logsum);
            }
        }

        log::debug!("{}: {} logsums for purpose {:?}", self.label, sample.len(), self.purpose);
        Ok(())
    }
}
