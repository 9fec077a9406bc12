//! `lc-output` — trace and table writers for the rust_lc framework.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                                  |
//! |-----------|-------------|----------------------------------------------------------------|
//! | *(none)*  | CSV         | `location_choices.csv`, `zone_segments.csv`, `fit_reports.csv` |
//! | `sqlite`  | SQLite      | `output.db`                                                    |
//! | `parquet` | Parquet     | `location_choices.parquet`, `zone_segments.parquet`, `fit_reports.parquet` |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`TraceObserver`], which implements `lc_sim::IterationObserver`.  The
//! final population and published tables are exported as CSV with
//! [`write_population_csv`] and [`write_table_csv`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use lc_output::{CsvWriter, TraceObserver};
//!
//! let mut obs = TraceObserver::new(CsvWriter::new(Path::new("./output"))?);
//! pipeline.run(&mut ctx, &mut obs)?;
//! obs.finish()?;
//! write_population_csv(Path::new("./output/persons.csv"), &ctx.population)?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod population;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::{CsvWriter, write_table_csv};
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use population::write_population_csv;
pub use row::{ChoiceRow, FitRow, ZoneSegmentRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
