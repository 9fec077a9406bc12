//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `location_choices`, `zone_segments` and `fit_reports`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{ChoiceRow, FitRow, OutputResult, ZoneSegmentRow};

/// Writes location-choice traces to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS location_choices (
                 model      TEXT    NOT NULL,
                 iteration  INTEGER NOT NULL,
                 person_id  INTEGER NOT NULL,
                 zone_id    INTEGER NOT NULL,
                 segment_id INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS zone_segments (
                 model        TEXT    NOT NULL,
                 iteration    INTEGER NOT NULL,
                 zone_id      INTEGER NOT NULL,
                 segment_id   INTEGER NOT NULL,
                 desired_size REAL    NOT NULL,
                 modeled_size REAL    NOT NULL,
                 shadow_price REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS fit_reports (
                 model                  TEXT    NOT NULL,
                 iteration              INTEGER NOT NULL,
                 cells                  INTEGER NOT NULL,
                 checked                INTEGER NOT NULL,
                 failures               INTEGER NOT NULL,
                 allowed                REAL    NOT NULL,
                 max_relative_deviation REAL,
                 converged              INTEGER NOT NULL,
                 PRIMARY KEY (model, iteration)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_choices(&mut self, model: &str, rows: &[ChoiceRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO location_choices \
                 (model, iteration, person_id, zone_id, segment_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    model,
                    row.iteration,
                    row.person_id,
                    row.zone_id,
                    row.segment_id,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_zone_segments(&mut self, model: &str, rows: &[ZoneSegmentRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO zone_segments \
                 (model, iteration, zone_id, segment_id, desired_size, modeled_size, shadow_price) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    model,
                    row.iteration,
                    row.zone_id,
                    row.segment_id,
                    row.desired_size,
                    row.modeled_size,
                    row.shadow_price,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_fit(&mut self, model: &str, row: &FitRow) -> OutputResult<()> {
        // SQLite has no infinity literal; a zero-modeled failure is stored as NULL.
        let deviation = row.max_relative_deviation.is_finite().then_some(row.max_relative_deviation);
        self.conn.execute(
            "INSERT INTO fit_reports \
             (model, iteration, cells, checked, failures, allowed, max_relative_deviation, converged) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                model,
                row.iteration,
                row.cells as i64,
                row.checked as i64,
                row.failures as i64,
                row.allowed,
                deviation,
                row.converged as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
