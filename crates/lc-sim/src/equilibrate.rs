//! The shadow-price equilibration loop.
//!
//! ```text
//! for i in 1..=max_iterations:          (max_iterations = 1 if disabled)
//!   ADJUST  — i > 1 only: update balancing factors from the previous
//!             iteration's modeled sizes; recompute adjusted sizes.
//!   RUN     — every segment in sorted order: sample → augment → simulate.
//!   CHECK   — shadow pricing only: count modeled sizes and test the fit.
//!             converged → CONVERGED; i == max → EXHAUSTED; else ADJUST.
//! ```

use lc_choice::{ChoiceError, ChoiceRecord};
use lc_core::PersonId;
use lc_shadow::ShadowPriceCalculator;

use crate::{IterationObserver, LocationModel, ModelContext, SimResult, run_iteration};

/// Terminal state of the loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// The fit check passed after `iteration`.
    Converged { iteration: u32 },
    /// `max_iterations` ran without passing the fit check.
    Exhausted,
    /// Shadow pricing is off: one iteration, no check.
    Disabled,
}

/// What one location model run produced.
pub struct LocationChoiceOutcome {
    /// Choices of the final iteration, in segment order.
    pub choices:    Vec<ChoiceRecord>,
    /// Final shadow-price state.
    pub shadow:     ShadowPriceCalculator,
    pub status:     ConvergenceStatus,
    pub iterations: u32,
}

/// Run `model` to a terminal state against `ctx`.
///
/// Nothing in `ctx` is modified; writing choices back is the caller's job
/// (see [`run_location_step`][crate::run_location_step]).  The observer is
/// only notified when `ctx.config.locutor` is set.
pub fn equilibrate<O: IterationObserver>(
    ctx:      &ModelContext,
    model:    &LocationModel,
    observer: &mut O,
) -> SimResult<LocationChoiceOutcome> {
    let name = model.name();
    let settings = &model.settings().shadow_pricing;
    let enabled = settings.use_shadow_pricing;
    let max_iterations = settings.effective_max_iterations();
    let locutor = ctx.config.locutor;

    let plans = model.plans(&ctx.land_use)?;
    let choosers = model.choosers_by_segment(&ctx.population)?;
    let counts: Vec<usize> = choosers.iter().map(Vec::len).collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return Err(ChoiceError::EmptyInput { stage: name.to_owned() }.into());
    }

    let mut shadow = ShadowPriceCalculator::new(
        settings.clone(),
        ctx.land_use.ids(),
        model.segments(),
        plans.iter().map(|p| p.sizes.clone()).collect(),
        &counts,
    )?;

    log::info!(
        "{name}: {total} choosers in {} segments, shadow pricing {} ({}), up to {max_iterations} iterations",
        model.segments().len(),
        if enabled { "on" } else { "off" },
        shadow.strategy_name(),
    );
    if locutor {
        observer.on_run_start(name, total);
    }

    let mut choices = Vec::new();
    let mut status = if enabled { ConvergenceStatus::Exhausted } else { ConvergenceStatus::Disabled };
    let mut iterations = 0;

    for iteration in 1..=max_iterations {
        iterations = iteration;

        // ── ADJUST ─────────────────────────────────────────────────────────
        if enabled && iteration > 1 {
            shadow.update_shadow_prices(iteration);
        }

        // ── RUN ────────────────────────────────────────────────────────────
        choices = run_iteration(ctx, model, &plans, &choosers, &shadow, iteration)?;
        shadow.set_choices(choices.iter().map(|c| (c.zone, c.segment)))?;

        if locutor && ctx.config.trace {
            let traced = traced_choices(&choices, &ctx.config.trace_persons);
            observer.on_iteration_end(name, iteration, &traced, &shadow);
        }

        // ── CHECK ──────────────────────────────────────────────────────────
        if !enabled {
            break;
        }
        let report = shadow.check_fit(iteration);
        log::info!(
            "{name} i{iteration}: {} of {} checked cells outside tolerance (allowed {:.1}), max deviation {:.3}",
            report.failures,
            report.checked,
            report.allowed,
            report.max_relative_deviation,
        );
        if locutor {
            observer.on_fit(name, &report);
        }
        let converged = report.converged;
        shadow.record(report);
        if converged {
            status = ConvergenceStatus::Converged { iteration };
            break;
        }
    }

    match status {
        ConvergenceStatus::Converged { iteration } => log::info!("{name}: converged after {iteration} iterations"),
        ConvergenceStatus::Exhausted => log::warn!("{name}: not converged after {iterations} iterations"),
        ConvergenceStatus::Disabled => log::info!("{name}: single pass, shadow pricing disabled"),
    }
    if locutor {
        observer.on_run_end(name, &status);
    }

    Ok(LocationChoiceOutcome { choices, shadow, status, iterations })
}

fn traced_choices(choices: &[ChoiceRecord], persons: &[PersonId]) -> Vec<ChoiceRecord> {
    if persons.is_empty() {
        return choices.to_vec();
    }
    choices.iter().filter(|c| persons.contains(&c.person)).copied().collect()
}
