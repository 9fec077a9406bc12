//! `lc-data` — the tables a location model reads.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`columns`]     | `Columns` — named `f64` SoA columns                        |
//! | [`population`]  | `Population` — persons, covariates, destination columns    |
//! | [`land_use`]    | `ZoneTable` — the zone (alternative) universe              |
//! | [`size_terms`]  | `SizeTermSpec` — per-segment destination size terms        |
//! | [`skim`]        | `SkimLookup` trait, `SkimDict` dense matrices              |
//! | [`builder`]     | `PopulationBuilder`, `ZoneTableBuilder`                    |
//! | [`loader`]      | CSV loaders for all of the above                           |
//! | [`error`]       | `DataError`, `DataResult<T>`                               |

pub mod builder;
pub mod columns;
pub mod error;
pub mod land_use;
pub mod loader;
pub mod population;
pub mod size_terms;
pub mod skim;

#[cfg(test)]
mod tests;

pub use builder::{PopulationBuilder, ZoneTableBuilder};
pub use columns::Columns;
pub use error::{DataError, DataResult};
pub use land_use::ZoneTable;
pub use loader::{
    load_land_use_csv, load_land_use_reader, load_population_csv, load_population_reader,
    load_size_terms_csv, load_size_terms_reader, load_skims_csv, load_skims_reader,
};
pub use population::Population;
pub use size_terms::{SizeTermRow, SizeTermSpec};
pub use skim::{SkimDict, SkimLookup};
