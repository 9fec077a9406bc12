//! `lc-core` — foundational types for the `rust_lc` location choice framework.
//!
//! This crate is a dependency of every other `lc-*` crate.  It has no `lc-*`
//! dependencies and few external ones (`rand`, `rustc-hash`, `serde`,
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `ZoneId`, `SegmentId`                       |
//! | [`rng`]         | `ChooserRng`, `StreamKey`, `RandomStreams`              |
//! | [`segment`]     | `Segment`, `Segments` (sorted processing order)         |
//! | [`settings`]    | `RunConfig`, `LocationSettings`, `ShadowPriceSettings`  |
//! | [`error`]       | `LcError`, `LcResult`                                   |

pub mod error;
pub mod ids;
pub mod rng;
pub mod segment;
pub mod settings;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{LcError, LcResult};
pub use ids::{PersonId, SegmentId, ZoneId};
pub use rng::{ChooserRng, RandomStreams, StreamKey};
pub use segment::{Segment, Segments};
pub use settings::{
    DistanceAnnotation, LocationSettings, RunConfig, ShadowPriceMethod, ShadowPriceSettings,
    TourPurpose,
};
