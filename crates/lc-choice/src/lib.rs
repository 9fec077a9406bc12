//! `lc-choice` — the sample → augment → simulate pipeline for one segment.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`chunk`]       | `chunk_ranges` — row-bounded chooser batches             |
//! | [`sample`]      | `DestinationSampler`, `LocationSample`, `SampleRow`      |
//! | [`logsums`]     | `LogsumAugmenter`                                        |
//! | [`simulate`]    | `DestinationSimulator`, `ChoiceRecord`                   |
//! | [`error`]       | `ChoiceError`, `ChoiceResult<T>`                         |
//!
//! # Determinism
//!
//! Each stage draws from a per-chooser stream keyed on the stage's trace
//! label (see `lc_core::rng`).  Chunking only changes how rows are batched
//! for evaluation, never which draws a chooser sees, so results do not
//! depend on `chunk_size`.

pub mod chunk;
pub mod error;
pub mod logsums;
pub mod sample;
pub mod simulate;


pub use chunk::{chunk_ranges, uniform_chunks};
pub use error::{ChoiceError, ChoiceResult};
pub use logsums::LogsumAugmenter;
pub use sample::{DestinationSampler, LocationSample, SampleRow};
pub use simulate::{ChoiceRecord, DestinationSimulator};
