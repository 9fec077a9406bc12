//! `lc-sim` — orchestration of the school and workplace location models.
//!
//! # Per-step flow
//!
//! ```text
//! run_location_step(ctx, model):
//!   equilibrate:
//!     for i in 1..=max_iterations:
//!       ① ADJUST — (i > 1, shadow pricing on) update balancing factors
//!       ② RUN    — for each segment in sorted order:
//!                    sample → logsums → simulate   (parallel with `parallel`)
//!       ③ CHECK  — (shadow pricing on) fit test → CONVERGED / next / EXHAUSTED
//!   write-back — destination column, NONE for everyone not chosen
//!   publish    — shadow-price / modeled-size tables (locutor only)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the segments of one iteration on Rayon's pool.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lc_sim::{ContextBuilder, LocationStep, NoopObserver, Pipeline, load_location_model};
//!
//! let model = load_location_model(LocationStep::Workplace, "configs/workplace_location.json".as_ref())?;
//! let mut ctx = ContextBuilder::new(persons, land_use, skims)
//!     .config(RunConfig::new(42))
//!     .build()?;
//! let outcomes = Pipeline::new()
//!     .step(LocationStep::Workplace, model)
//!     .run(&mut ctx, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod context;
pub mod equilibrate;
pub mod error;
pub mod loader;
pub mod model;
pub mod observer;
pub mod runner;
pub mod step;


pub use builder::ContextBuilder;
pub use context::ModelContext;
pub use equilibrate::{ConvergenceStatus, LocationChoiceOutcome, equilibrate};
pub use error::{SimError, SimResult};
pub use loader::{load_location_model, load_logsum_model, load_run_config};
pub use model::{LocationModel, SegmentPlan};
pub use observer::{IterationObserver, NoopObserver};
pub use runner::{run_iteration, run_segment};
pub use step::{LocationStep, NO_DISTANCE, Pipeline, run_location_step};
