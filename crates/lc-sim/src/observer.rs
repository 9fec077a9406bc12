//! Iteration observer trait for tracing and progress reporting.

use lc_choice::ChoiceRecord;
use lc_shadow::{FitReport, ShadowPriceCalculator};

use crate::ConvergenceStatus;

/// Callbacks invoked by the equilibration loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The loop only calls an observer from
/// the locutor context, and only calls
/// [`on_iteration_end`](Self::on_iteration_end) when tracing is enabled.
///
/// # Example — fit printer
///
/// ```rust,ignore
/// struct FitPrinter;
///
/// impl IterationObserver for FitPrinter {
///     fn on_fit(&mut self, model: &str, report: &FitReport) {
///         println!("{model} i{}: {} failures", report.iteration, report.failures);
///     }
/// }
/// ```
pub trait IterationObserver {
    /// Called once before iteration 1 with the eligible chooser count.
    fn on_run_start(&mut self, _model: &str, _choosers: usize) {}

    /// Called after each RUN phase with the iteration's choices (restricted
    /// to the configured trace persons, if any) and the shadow-price state
    /// the iteration ran with.
    fn on_iteration_end(
        &mut self,
        _model:     &str,
        _iteration: u32,
        _choices:   &[ChoiceRecord],
        _shadow:    &ShadowPriceCalculator,
    ) {}

    /// Called after each CHECK phase.
    fn on_fit(&mut self, _model: &str, _report: &FitReport) {}

    /// Called once when the loop reaches a terminal state.
    fn on_run_end(&mut self, _model: &str, _status: &ConvergenceStatus) {}
}

/// An [`IterationObserver`] that does nothing.
pub struct NoopObserver;

impl IterationObserver for NoopObserver {}
