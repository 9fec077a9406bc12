//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `location_choices.parquet`
//! - `zone_segments.parquet`
//! - `fit_reports.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    BooleanBuilder, Float64Builder, Int64Builder, StringBuilder, UInt16Builder, UInt32Builder,
    UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{ChoiceRow, FitRow, OutputResult, ZoneSegmentRow};

fn choice_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("model",      DataType::Utf8,   false),
        Field::new("iteration",  DataType::UInt32, false),
        Field::new("person_id",  DataType::UInt32, false),
        Field::new("zone_id",    DataType::Int64,  false),
        Field::new("segment_id", DataType::UInt16, false),
    ]))
}

fn zone_segment_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("model",        DataType::Utf8,    false),
        Field::new("iteration",    DataType::UInt32,  false),
        Field::new("zone_id",      DataType::UInt32,  false),
        Field::new("segment_id",   DataType::UInt16,  false),
        Field::new("desired_size", DataType::Float64, false),
        Field::new("modeled_size", DataType::Float64, false),
        Field::new("shadow_price", DataType::Float64, false),
    ]))
}

fn fit_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("model",                  DataType::Utf8,    false),
        Field::new("iteration",              DataType::UInt32,  false),
        Field::new("cells",                  DataType::UInt64,  false),
        Field::new("checked",                DataType::UInt64,  false),
        Field::new("failures",               DataType::UInt64,  false),
        Field::new("allowed",                DataType::Float64, false),
        Field::new("max_relative_deviation", DataType::Float64, false),
        Field::new("converged",              DataType::Boolean, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// Writes location-choice traces to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet footers.
pub struct ParquetWriter {
    choices:       Option<ArrowWriter<File>>,
    cells:         Option<ArrowWriter<File>>,
    fits:          Option<ArrowWriter<File>>,
    choice_schema: Arc<Schema>,
    cell_schema:   Arc<Schema>,
    fit_schema:    Arc<Schema>,
}

impl ParquetWriter {
    /// Create the three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let choice_schema = choice_schema();
        let cell_schema = zone_segment_schema();
        let fit_schema = fit_schema();

        Ok(Self {
            choices: Some(open(dir, "location_choices.parquet", &choice_schema)?),
            cells:   Some(open(dir, "zone_segments.parquet", &cell_schema)?),
            fits:    Some(open(dir, "fit_reports.parquet", &fit_schema)?),
            choice_schema,
            cell_schema,
            fit_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_choices(&mut self, model: &str, rows: &[ChoiceRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.choices.as_mut() else {
            return Ok(());
        };

        let mut models     = StringBuilder::new();
        let mut iterations = UInt32Builder::new();
        let mut persons    = UInt32Builder::new();
        let mut zones      = Int64Builder::new();
        let mut segments   = UInt16Builder::new();

        for row in rows {
            models.append_value(model);
            iterations.append_value(row.iteration);
            persons.append_value(row.person_id);
            zones.append_value(row.zone_id);
            segments.append_value(row.segment_id);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.choice_schema),
            vec![
                Arc::new(models.finish()),
                Arc::new(iterations.finish()),
                Arc::new(persons.finish()),
                Arc::new(zones.finish()),
                Arc::new(segments.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_zone_segments(&mut self, model: &str, rows: &[ZoneSegmentRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.cells.as_mut() else {
            return Ok(());
        };

        let mut models     = StringBuilder::new();
        let mut iterations = UInt32Builder::new();
        let mut zones      = UInt32Builder::new();
        let mut segments   = UInt16Builder::new();
        let mut desired    = Float64Builder::new();
        let mut modeled    = Float64Builder::new();
        let mut prices     = Float64Builder::new();

        for row in rows {
            models.append_value(model);
            iterations.append_value(row.iteration);
            zones.append_value(row.zone_id);
            segments.append_value(row.segment_id);
            desired.append_value(row.desired_size);
            modeled.append_value(row.modeled_size);
            prices.append_value(row.shadow_price);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.cell_schema),
            vec![
                Arc::new(models.finish()),
                Arc::new(iterations.finish()),
                Arc::new(zones.finish()),
                Arc::new(segments.finish()),
                Arc::new(desired.finish()),
                Arc::new(modeled.finish()),
                Arc::new(prices.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_fit(&mut self, model: &str, row: &FitRow) -> OutputResult<()> {
        let Some(writer) = self.fits.as_mut() else {
            return Ok(());
        };

        let mut models     = StringBuilder::new();
        let mut iterations = UInt32Builder::new();
        let mut cells      = UInt64Builder::new();
        let mut checked    = UInt64Builder::new();
        let mut failures   = UInt64Builder::new();
        let mut allowed    = Float64Builder::new();
        let mut deviation  = Float64Builder::new();
        let mut converged  = BooleanBuilder::new();

        models.append_value(model);
        iterations.append_value(row.iteration);
        cells.append_value(row.cells);
        checked.append_value(row.checked);
        failures.append_value(row.failures);
        allowed.append_value(row.allowed);
        deviation.append_value(row.max_relative_deviation);
        converged.append_value(row.converged);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.fit_schema),
            vec![
                Arc::new(models.finish()),
                Arc::new(iterations.finish()),
                Arc::new(cells.finish()),
                Arc::new(checked.finish()),
                Arc::new(failures.finish()),
                Arc::new(allowed.finish()),
                Arc::new(deviation.finish()),
                Arc::new(converged.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        for writer in [self.choices.take(), self.cells.take(), self.fits.take()].into_iter().flatten() {
            writer.close()?;
        }
        Ok(())
    }
}
