//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `LcError` as one variant
//! where they need configuration or parse failures from this crate.

use thiserror::Error;

/// The top-level error type for `lc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum LcError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `lc-*` crates.
pub type LcResult<T> = Result<T, LcError>;
