use lc_core::{PersonId, ZoneId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("duplicate {what} id {id}")]
    DuplicateId { what: &'static str, id: u32 },

    #[error("{what} length {got} does not match row count {expected}")]
    LengthMismatch {
        expected: usize,
        got:      usize,
        what:     String,
    },

    #[error("{table} table has no column {column:?}")]
    MissingColumn { table: &'static str, column: String },

    #[error("unknown person {0}")]
    UnknownPerson(PersonId),

    #[error("unknown zone {0}")]
    UnknownZone(ZoneId),

    #[error("no size terms for selector {selector:?} segment {segment:?}")]
    NoSizeTerms { selector: String, segment: String },

    #[error("size term for {segment:?} in {zone} is {value} (must be a non-negative number)")]
    NegativeSize {
        segment: String,
        zone:    ZoneId,
        value:   f64,
    },
}

pub type DataResult<T> = Result<T, DataError>;
