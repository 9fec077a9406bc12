//! CSV loaders for persons, land use, size terms and skims.
//!
//! # Formats
//!
//! **Persons** — `person_id`, `home_zone`, then any number of numeric
//! covariate columns:
//!
//! ```csv
//! person_id,home_zone,is_worker,income_segment,income
//! 1,3,1,2,54000
//! 2,3,0,0,0
//! ```
//!
//! **Land use** — `zone_id`, then numeric columns.
//!
//! **Size terms** — `model_selector`, `segment`, then one coefficient column
//! per land-use column (see [`crate::size_terms`]).
//!
//! **Skims** — one row per OD pair: `origin`, `destination`, then one column
//! per skim key.  Pairs absent from the file stay `0`.
//!
//! Empty cells in numeric columns load as `0`.

use std::io::Read;
use std::path::Path;

use lc_core::{PersonId, ZoneId};

use crate::{DataError, DataResult, Population, SizeTermRow, SizeTermSpec, SkimDict, ZoneTable};

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_population_csv(path: &Path) -> DataResult<Population> {
    load_population_reader(std::fs::File::open(path)?)
}

/// Like [`load_population_csv`] but accepts any `Read` source.
pub fn load_population_reader<R: Read>(reader: R) -> DataResult<Population> {
    let table = read_numeric_table(reader, &["person_id", "home_zone"])?;

    let ids = table.keys[0].iter().map(|&v| PersonId(v)).collect();
    let homes = table.keys[1].iter().map(|&v| ZoneId(v)).collect();
    let mut population = Population::new(ids, homes)?;
    for (name, values) in table.columns {
        population.insert_column(name, values)?;
    }
    log::debug!("loaded {} persons", population.count());
    Ok(population)
}

pub fn load_land_use_csv(path: &Path) -> DataResult<ZoneTable> {
    load_land_use_reader(std::fs::File::open(path)?)
}

pub fn load_land_use_reader<R: Read>(reader: R) -> DataResult<ZoneTable> {
    let table = read_numeric_table(reader, &["zone_id"])?;

    let ids = table.keys[0].iter().map(|&v| ZoneId(v)).collect();
    let mut zones = ZoneTable::new(ids)?;
    for (name, values) in table.columns {
        zones.insert_column(name, values)?;
    }
    log::debug!("loaded {} zones", zones.count());
    Ok(zones)
}

pub fn load_size_terms_csv(path: &Path) -> DataResult<SizeTermSpec> {
    load_size_terms_reader(std::fs::File::open(path)?)
}

pub fn load_size_terms_reader<R: Read>(reader: R) -> DataResult<SizeTermSpec> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    expect_leading(&headers, &["model_selector", "segment"])?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut coefficients = std::collections::BTreeMap::new();
        for (name, cell) in headers.iter().zip(record.iter()).skip(2) {
            let coef = parse_f64(cell, name)?;
            if coef != 0.0 {
                coefficients.insert(name.to_owned(), coef);
            }
        }
        rows.push(SizeTermRow {
            model_selector: record[0].trim().to_owned(),
            segment:        record[1].trim().to_owned(),
            coefficients,
        });
    }
    Ok(SizeTermSpec::new(rows))
}

pub fn load_skims_csv(path: &Path, zones: &[ZoneId]) -> DataResult<SkimDict> {
    load_skims_reader(std::fs::File::open(path)?, zones)
}

/// Load long-format OD skims over the given zone ordering.
pub fn load_skims_reader<R: Read>(reader: R, zones: &[ZoneId]) -> DataResult<SkimDict> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    expect_leading(&headers, &["origin", "destination"])?;

    let mut skims = SkimDict::new(zones);
    for record in csv_reader.records() {
        let record = record?;
        let origin = ZoneId(parse_id(&record[0], "origin")?);
        let destination = ZoneId(parse_id(&record[1], "destination")?);
        for (key, cell) in headers.iter().zip(record.iter()).skip(2) {
            let value = parse_f64(cell, key)? as f32;
            skims.set(key, origin, destination, value)?;
        }
    }
    Ok(skims)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A CSV split into integer key columns and named `f64` columns.
struct NumericTable {
    keys:    Vec<Vec<u32>>,
    columns: Vec<(String, Vec<f64>)>,
}

fn read_numeric_table<R: Read>(reader: R, key_columns: &[&str]) -> DataResult<NumericTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    expect_leading(&headers, key_columns)?;

    let k = key_columns.len();
    let mut keys: Vec<Vec<u32>> = vec![Vec::new(); k];
    let mut columns: Vec<(String, Vec<f64>)> = headers
        .iter()
        .skip(k)
        .map(|h| (h.trim().to_owned(), Vec::new()))
        .collect();

    for record in csv_reader.records() {
        let record = record?;
        for (i, name) in key_columns.iter().enumerate() {
            keys[i].push(parse_id(&record[i], name)?);
        }
        for ((name, values), cell) in columns.iter_mut().zip(record.iter().skip(k)) {
            values.push(parse_f64(cell, name)?);
        }
    }

    Ok(NumericTable { keys, columns })
}

fn expect_leading(headers: &csv::StringRecord, expected: &[&str]) -> DataResult<()> {
    for (i, name) in expected.iter().enumerate() {
        match headers.get(i).map(str::trim) {
            Some(h) if h == *name => {}
            other => {
                return Err(DataError::Parse(format!(
                    "column {i} should be {name:?}, found {other:?}"
                )));
            }
        }
    }
    Ok(())
}

fn parse_id(cell: &str, column: &str) -> DataResult<u32> {
    cell.trim()
        .parse::<u32>()
        .map_err(|_| DataError::Parse(format!("invalid {column} {cell:?}: expected a u32 id")))
}

fn parse_f64(cell: &str, column: &str) -> DataResult<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(0.0);
    }
    match cell {
        "True" | "true" => return Ok(1.0),
        "False" | "false" => return Ok(0.0),
        _ => {}
    }
    cell.parse::<f64>()
        .map_err(|_| DataError::Parse(format!("invalid value {cell:?} in column {column:?}")))
}
