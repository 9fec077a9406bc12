//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `location_choices.csv`
//! - `zone_segments.csv`
//! - `fit_reports.csv`
//!
//! [`write_table_csv`] exports a single published zone × segment table.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use lc_shadow::ZoneSegmentTable;

use crate::writer::OutputWriter;
use crate::{ChoiceRow, FitRow, OutputResult, ZoneSegmentRow};

pub const CHOICE_HEADER: [&str; 5] = ["model", "iteration", "person_id", "zone_id", "segment_id"];

pub const ZONE_SEGMENT_HEADER: [&str; 7] = [
    "model", "iteration", "zone_id", "segment_id", "desired_size", "modeled_size", "shadow_price",
];

pub const FIT_HEADER: [&str; 8] = [
    "model", "iteration", "cells", "checked", "failures", "allowed", "max_relative_deviation", "converged",
];

/// Writes location-choice traces to three CSV files.
pub struct CsvWriter {
    choices:  Writer<File>,
    cells:    Writer<File>,
    fits:     Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the three files in `dir` and write their header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut choices = Writer::from_path(dir.join("location_choices.csv"))?;
        choices.write_record(CHOICE_HEADER)?;

        let mut cells = Writer::from_path(dir.join("zone_segments.csv"))?;
        cells.write_record(ZONE_SEGMENT_HEADER)?;

        let mut fits = Writer::from_path(dir.join("fit_reports.csv"))?;
        fits.write_record(FIT_HEADER)?;

        Ok(Self { choices, cells, fits, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_choices(&mut self, model: &str, rows: &[ChoiceRow]) -> OutputResult<()> {
        for row in rows {
            self.choices.write_record(&[
                model.to_owned(),
                row.iteration.to_string(),
                row.person_id.to_string(),
                row.zone_id.to_string(),
                row.segment_id.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_zone_segments(&mut self, model: &str, rows: &[ZoneSegmentRow]) -> OutputResult<()> {
        for row in rows {
            self.cells.write_record(&[
                model.to_owned(),
                row.iteration.to_string(),
                row.zone_id.to_string(),
                row.segment_id.to_string(),
                row.desired_size.to_string(),
                row.modeled_size.to_string(),
                row.shadow_price.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_fit(&mut self, model: &str, row: &FitRow) -> OutputResult<()> {
        self.fits.write_record(&[
            model.to_owned(),
            row.iteration.to_string(),
            row.cells.to_string(),
            row.checked.to_string(),
            row.failures.to_string(),
            row.allowed.to_string(),
            row.max_relative_deviation.to_string(),
            (row.converged as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.choices.flush()?;
        self.cells.flush()?;
        self.fits.flush()?;
        Ok(())
    }
}

/// Write `table` as `zone_id,<segment>,<segment>,…`, one row per zone.
pub fn write_table_csv(path: &Path, table: &ZoneSegmentTable) -> OutputResult<()> {
    let mut writer = Writer::from_path(path)?;

    let mut header = vec!["zone_id".to_owned()];
    header.extend(table.segments().iter().cloned());
    writer.write_record(&header)?;

    let segments = table.segments().len();
    for (z, zone) in table.zones().iter().enumerate() {
        let mut record = Vec::with_capacity(segments + 1);
        record.push(zone.0.to_string());
        for s in 0..segments {
            record.push(table.get(z, lc_core::SegmentId(s as u16)).to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
