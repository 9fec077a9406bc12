use lc_core::ZoneId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UtilityError {
    #[error("{table} column {column:?} is not available")]
    MissingColumn { table: &'static str, column: String },

    #[error("skim {0:?} is not available")]
    MissingSkim(String),

    #[error("skim {key:?} has no value for {origin} -> {destination}")]
    SkimCell {
        key:         String,
        origin:      ZoneId,
        destination: ZoneId,
    },

    #[error("constant {0:?} is not defined")]
    MissingConstant(String),

    #[error("spec has no coefficient column {0:?}")]
    MissingSegment(String),

    #[error("term needs {0} but the caller did not supply it")]
    MissingRowValue(&'static str),

    #[error("{rows} interaction rows but {values} values")]
    RowMismatch { rows: usize, values: usize },

    #[error("invalid nest structure: {0}")]
    Nest(String),

    #[error("spec parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type UtilityResult<T> = Result<T, UtilityError>;
