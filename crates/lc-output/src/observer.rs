//! `TraceObserver<W>`: bridges `IterationObserver` to an `OutputWriter`.

use lc_choice::ChoiceRecord;
use lc_shadow::{FitReport, ShadowPriceCalculator};
use lc_sim::{ConvergenceStatus, IterationObserver};

use crate::row::{ChoiceRow, FitRow, ZoneSegmentRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`IterationObserver`] that dumps every traced iteration (choices and
/// the zone × segment shadow-price state) plus every fit report to any
/// [`OutputWriter`] backend.
///
/// Observer methods return nothing, so write errors are stored; check them
/// with [`take_error`][Self::take_error] once the pipeline returns.  One
/// observer may serve several steps: call [`finish`][Self::finish] after the
/// last one.
pub struct TraceObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the first stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer, surfacing any error stored earlier first.
    pub fn finish(&mut self) -> OutputResult<()> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.finish()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::warn!("trace output failed: {e}");
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> IterationObserver for TraceObserver<W> {
    fn on_iteration_end(
        &mut self,
        model:     &str,
        iteration: u32,
        choices:   &[ChoiceRecord],
        shadow:    &ShadowPriceCalculator,
    ) {
        let rows: Vec<ChoiceRow> = choices.iter().map(|c| ChoiceRow::new(iteration, c)).collect();
        if !rows.is_empty() {
            let result = self.writer.write_choices(model, &rows);
            self.store_err(result);
        }

        let cells = ZoneSegmentRow::from_calculator(iteration, shadow);
        let result = self.writer.write_zone_segments(model, &cells);
        self.store_err(result);
    }

    fn on_fit(&mut self, model: &str, report: &FitReport) {
        let result = self.writer.write_fit(model, &FitRow::from(report));
        self.store_err(result);
    }

    fn on_run_end(&mut self, model: &str, status: &ConvergenceStatus) {
        log::debug!("{model}: trace complete ({status:?})");
    }
}
