//! `lc-utility` — utility specifications and the math that turns them into
//! choice probabilities.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`term`]        | `Term` — the closed set of spec expressions                |
//! | [`spec`]        | `UtilitySpec`, per-segment narrowing, CSV loaders          |
//! | [`evaluator`]   | `UtilityEvaluator` trait, `LinearEvaluator`, `EvalContext` |
//! | [`mnl`]         | `probabilities`, `log_sum_exp`, `draw`                     |
//! | [`logsum`]      | `LogsumModel` — flat or nested mode-choice logsums         |
//! | [`error`]       | `UtilityError`, `UtilityResult<T>`                         |
//!
//! # Swapping the evaluator
//!
//! The pipeline only talks to [`UtilityEvaluator`].  Supply another
//! implementation (an expression compiler, a GPU kernel) through the model
//! context; the specs and the sampling/simulation code stay unchanged.

pub mod error;
pub mod evaluator;
pub mod logsum;
pub mod mnl;
pub mod spec;
pub mod term;

#[cfg(test)]
mod tests;

pub use error::{UtilityError, UtilityResult};
pub use evaluator::{EvalContext, InteractionRows, LinearEvaluator, RowValues, UtilityEvaluator};
pub use logsum::{LogsumModel, LogsumSettings, NestChild, NestSpec};
pub use mnl::{draw, log_sum_exp, probabilities};
pub use spec::{
    Coefficient, Constants, ResolvedTerm, SegmentSpec, UtilitySpec, UtilityTerm,
    load_mode_spec_csv, load_mode_spec_reader, load_spec_csv, load_spec_reader,
};
pub use term::Term;
