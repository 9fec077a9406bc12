use lc_core::{SegmentId, ZoneId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShadowPriceError {
    #[error("choice for unknown zone {0}")]
    UnknownZone(ZoneId),

    #[error("choice for unknown segment {0}")]
    UnknownSegment(SegmentId),

    #[error("{what} has {got} entries, expected {expected}")]
    Shape {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },
}

pub type ShadowResult<T> = Result<T, ShadowPriceError>;
