//! `lc-shadow` — shadow pricing: the per zone × segment state the
//! equilibration loop adjusts between iterations.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`table`]       | `ZoneSegmentTable` — dense zone × segment values         |
//! | [`strategy`]    | `BalancingStrategy` trait; `Ctrl`, `Daysim`, `Msa`       |
//! | [`calculator`]  | `ShadowPriceCalculator`, `FitReport`                     |
//! | [`error`]       | `ShadowPriceError`, `ShadowResult<T>`                    |

pub mod calculator;
pub mod error;
pub mod strategy;
pub mod table;


pub use calculator::{FitReport, ShadowPriceCalculator};
pub use error::{ShadowPriceError, ShadowResult};
pub use strategy::{BalancingStrategy, Ctrl, Daysim, Msa, strategy_for};
pub use table::ZoneSegmentTable;
