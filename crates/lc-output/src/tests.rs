//! Integration tests for lc-output.

#[cfg(test)]
mod fixtures {
    use std::collections::BTreeMap;

    use lc_choice::ChoiceRecord;
    use lc_core::{PersonId, SegmentId, Segments, ShadowPriceSettings, ZoneId};
    use lc_shadow::ShadowPriceCalculator;
    use tempfile::TempDir;

    use crate::{ChoiceRow, FitRow, ZoneSegmentRow};

    pub fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    pub fn choice_row(person_id: u32, zone_id: i64) -> ChoiceRow {
        ChoiceRow { iteration: 1, person_id, zone_id, segment_id: 0 }
    }

    pub fn cell_row(zone_id: u32) -> ZoneSegmentRow {
        ZoneSegmentRow {
            iteration:    2,
            zone_id,
            segment_id:   1,
            desired_size: 12.5,
            modeled_size: 10.0,
            shadow_price: 1.25,
        }
    }

    pub fn fit_row(converged: bool) -> FitRow {
        FitRow {
            iteration:              3,
            cells:                  8,
            checked:                6,
            failures:               1,
            allowed:                0.8,
            max_relative_deviation: 0.4,
            converged,
        }
    }

    /// Two zones, one segment, desired `[3, 1]`; three choose zone 1, one zone 2.
    pub fn calculator() -> ShadowPriceCalculator {
        let codes = BTreeMap::from([("work".to_string(), 1)]);
        let segments = Segments::from_codes(&codes).unwrap();
        let mut shadow = ShadowPriceCalculator::new(
            ShadowPriceSettings::default(),
            &[ZoneId(1), ZoneId(2)],
            &segments,
            vec![vec![3.0, 1.0]],
            &[4],
        )
        .unwrap();
        shadow
            .set_choices(choices().iter().map(|c| (c.zone, c.segment)))
            .unwrap();
        shadow
    }

    pub fn choices() -> Vec<ChoiceRecord> {
        [(1, 1), (2, 1), (3, 1), (4, 2)]
            .into_iter()
            .map(|(p, z)| ChoiceRecord { person: PersonId(p), zone: ZoneId(z), segment: SegmentId(0) })
            .collect()
    }

    pub fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }
}

#[cfg(test)]
mod row_tests {
    use lc_choice::ChoiceRecord;
    use lc_core::{PersonId, SegmentId, ZoneId};

    use super::fixtures::calculator;
    use crate::{ChoiceRow, ZoneSegmentRow};

    #[test]
    fn no_destination_exported_as_minus_one() {
        let record = ChoiceRecord { person: PersonId(9), zone: ZoneId::NONE, segment: SegmentId(2) };
        let row = ChoiceRow::new(4, &record);
        assert_eq!(row, ChoiceRow { iteration: 4, person_id: 9, zone_id: -1, segment_id: 2 });
    }

    #[test]
    fn zone_segment_rows_cover_every_cell() {
        let rows = ZoneSegmentRow::from_calculator(1, &calculator());
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].zone_id, rows[0].desired_size, rows[0].modeled_size), (1, 3.0, 3.0));
        assert_eq!((rows[1].zone_id, rows[1].desired_size, rows[1].modeled_size), (2, 1.0, 1.0));
        assert!(rows.iter().all(|r| r.shadow_price == 1.0));
    }
}

#[cfg(test)]
mod csv_tests {
    use super::fixtures::{cell_row, choice_row, fit_row, read_csv, tmp};
    use crate::csv::{CHOICE_HEADER, CsvWriter, FIT_HEADER, ZONE_SEGMENT_HEADER};
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("location_choices.csv").exists());
        assert!(dir.path().join("zone_segments.csv").exists());
        assert!(dir.path().join("fit_reports.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read_csv(&dir.path().join("location_choices.csv"));
        assert_eq!(headers, CHOICE_HEADER);
        assert!(rows.is_empty());
        assert_eq!(read_csv(&dir.path().join("zone_segments.csv")).0, ZONE_SEGMENT_HEADER);
        assert_eq!(read_csv(&dir.path().join("fit_reports.csv")).0, FIT_HEADER);
    }

    #[test]
    fn csv_choices_written_with_model() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_choices("school_location", &[choice_row(1, 4), choice_row(2, -1)]).unwrap();
        w.finish().unwrap();

        let (_, rows) = read_csv(&dir.path().join("location_choices.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "school_location");
        assert_eq!(&rows[0][3], "4");
        assert_eq!(&rows[1][3], "-1");
    }

    #[test]
    fn csv_zone_segments_and_fit() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_zone_segments("workplace_location", &[cell_row(5), cell_row(6)]).unwrap();
        w.write_fit("workplace_location", &fit_row(true)).unwrap();
        w.finish().unwrap();

        let (_, cells) = read_csv(&dir.path().join("zone_segments.csv"));
        assert_eq!(cells.len(), 2);
        assert_eq!(&cells[1][2], "6");
        assert_eq!(&cells[1][6], "1.25");

        let (_, fits) = read_csv(&dir.path().join("fit_reports.csv"));
        assert_eq!(fits.len(), 1);
        assert_eq!(&fits[0][4], "1");
        assert_eq!(&fits[0][7], "1");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod export_tests {
    use lc_core::{PersonId, ZoneId};
    use lc_data::PopulationBuilder;

    use super::fixtures::{calculator, read_csv, tmp};
    use crate::{write_population_csv, write_table_csv};

    #[test]
    fn population_export_uses_minus_one() {
        let mut population = PopulationBuilder::new()
            .person(10, 1)
            .person(11, 2)
            .column("age", vec![30.0, 8.0])
            .build()
            .unwrap();
        population
            .set_destinations("school_zone", [(PersonId(11), ZoneId(3))])
            .unwrap();

        let dir = tmp();
        let path = dir.path().join("persons.csv");
        write_population_csv(&path, &population).unwrap();

        let (headers, rows) = read_csv(&path);
        assert_eq!(headers, ["person_id", "home_zone", "age", "school_zone"]);
        assert_eq!(&rows[0][3], "-1");
        assert_eq!(&rows[1][3], "3");
        assert_eq!(&rows[1][2], "8");
    }

    #[test]
    fn table_export_one_row_per_zone() {
        let shadow = calculator();
        let dir = tmp();
        let path = dir.path().join("modeled.csv");
        write_table_csv(&path, shadow.modeled()).unwrap();

        let (headers, rows) = read_csv(&path);
        assert_eq!(headers, ["zone_id", "work"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "3");
        assert_eq!(&rows[1][1], "1");
    }
}

#[cfg(test)]
mod observer_tests {
    use lc_shadow::FitReport;
    use lc_sim::IterationObserver;

    use super::fixtures::{calculator, choices};
    use crate::{ChoiceRow, FitRow, OutputError, OutputResult, OutputWriter, TraceObserver, ZoneSegmentRow};

    #[derive(Default)]
    struct MemoryWriter {
        choices:  Vec<(String, ChoiceRow)>,
        cells:    Vec<ZoneSegmentRow>,
        fits:     Vec<FitRow>,
        finished: usize,
        fail:     bool,
    }

    impl OutputWriter for MemoryWriter {
        fn write_choices(&mut self, model: &str, rows: &[ChoiceRow]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.choices.extend(rows.iter().map(|r| (model.to_owned(), *r)));
            Ok(())
        }

        fn write_zone_segments(&mut self, _model: &str, rows: &[ZoneSegmentRow]) -> OutputResult<()> {
            self.cells.extend_from_slice(rows);
            Ok(())
        }

        fn write_fit(&mut self, _model: &str, row: &FitRow) -> OutputResult<()> {
            self.fits.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn report() -> FitReport {
        FitReport {
            iteration:              1,
            cells:                  2,
            checked:                0,
            failures:               0,
            allowed:                0.2,
            max_relative_deviation: 0.0,
            converged:              true,
        }
    }

    #[test]
    fn iteration_dump_written() {
        let mut obs = TraceObserver::new(MemoryWriter::default());
        obs.on_iteration_end("workplace_location", 1, &choices(), &calculator());
        obs.on_fit("workplace_location", &report());
        obs.finish().unwrap();

        let writer = obs.into_writer();
        assert_eq!(writer.choices.len(), 4);
        assert!(writer.choices.iter().all(|(m, r)| m == "workplace_location" && r.iteration == 1));
        assert_eq!(writer.cells.len(), 2);
        assert_eq!(writer.fits.len(), 1);
        assert!(writer.fits[0].converged);
        assert_eq!(writer.finished, 1);
    }

    #[test]
    fn empty_trace_still_writes_cells() {
        let mut obs = TraceObserver::new(MemoryWriter::default());
        obs.on_iteration_end("school_location", 2, &[], &calculator());
        let writer = obs.into_writer();
        assert!(writer.choices.is_empty());
        assert_eq!(writer.cells.len(), 2);
    }

    #[test]
    fn write_error_stored_and_surfaced() {
        let writer = MemoryWriter { fail: true, ..MemoryWriter::default() };
        let mut obs = TraceObserver::new(writer);
        obs.on_iteration_end("school_location", 1, &choices(), &calculator());
        assert!(matches!(obs.finish(), Err(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn csv_backend_end_to_end() {
        let dir = super::fixtures::tmp();
        let writer = crate::CsvWriter::new(dir.path()).unwrap();
        let mut obs = TraceObserver::new(writer);
        obs.on_iteration_end("workplace_location", 1, &choices(), &calculator());
        obs.finish().unwrap();

        let (_, rows) = super::fixtures::read_csv(&dir.path().join("location_choices.csv"));
        assert_eq!(rows.len(), 4);
        let (_, cells) = super::fixtures::read_csv(&dir.path().join("zone_segments.csv"));
        assert_eq!(cells.len(), 2);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::fixtures::{cell_row, choice_row, fit_row, tmp};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_choice_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_choices("school_location", &[choice_row(1, 3), choice_row(2, -1), choice_row(3, 3)])
            .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM location_choices WHERE zone_id = 3", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
        let none: i64 = conn
            .query_row("SELECT zone_id FROM location_choices WHERE person_id = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(none, -1);
    }

    #[test]
    fn sqlite_zone_segments() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_zone_segments("workplace_location", &[cell_row(4)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (zone, price): (i64, f64) = conn
            .query_row("SELECT zone_id, shadow_price FROM zone_segments", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(zone, 4);
        assert_eq!(price, 1.25);
    }

    #[test]
    fn sqlite_infinite_deviation_stored_as_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let mut row = fit_row(false);
        row.max_relative_deviation = f64::INFINITY;
        w.write_fit("workplace_location", &row).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let deviation: Option<f64> = conn
            .query_row("SELECT max_relative_deviation FROM fit_reports WHERE iteration = 3", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(deviation, None);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::fixtures::{choice_row, fit_row, tmp};
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("location_choices.parquet").exists());
        assert!(dir.path().join("zone_segments.parquet").exists());
        assert!(dir.path().join("fit_reports.parquet").exists());
    }

    #[test]
    fn parquet_choices_read_back() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_choices("school_location", &[choice_row(1, 2), choice_row(2, -1)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("location_choices.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let total_rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, ["model", "iteration", "person_id", "zone_id", "segment_id"]);
        assert_eq!(*schema.field_with_name("zone_id").unwrap().data_type(), DataType::Int64);
    }

    #[test]
    fn parquet_fit_converged_is_boolean() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_fit("workplace_location", &fit_row(true)).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("fit_reports.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let field = builder.schema().field_with_name("converged").unwrap().clone();
        assert_eq!(*field.data_type(), DataType::Boolean);
    }
}
