//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ChoiceRow, FitRow, OutputResult, ZoneSegmentRow};

/// Trait implemented by the CSV, SQLite and Parquet writers.
///
/// Every row method takes the model name (`school_location`, …) so one writer
/// can hold the traces of several steps.
pub trait OutputWriter {
    fn write_choices(&mut self, model: &str, rows: &[ChoiceRow]) -> OutputResult<()>;

    fn write_zone_segments(&mut self, model: &str, rows: &[ZoneSegmentRow]) -> OutputResult<()>;

    fn write_fit(&mut self, model: &str, row: &FitRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
