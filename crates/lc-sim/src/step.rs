//! The two named location steps and the pipeline that runs them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use lc_core::ZoneId;

use crate::{
    IterationObserver, LocationChoiceOutcome, LocationModel, ModelContext, SimError, SimResult,
    equilibrate,
};

/// Distance written for persons with no destination.
pub const NO_DISTANCE: f64 = -1.0;

/// Zones listed in the destination summary log line.
const SUMMARY_TOP_ZONES: usize = 10;

// ── LocationStep ──────────────────────────────────────────────────────────────

/// Steps run in declaration order: school before workplace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStep {
    School,
    Workplace,
}

impl LocationStep {
    pub const ALL: [LocationStep; 2] = [LocationStep::School, LocationStep::Workplace];

    /// Step name, also the trace label prefix.
    pub fn name(self) -> &'static str {
        match self {
            LocationStep::School => "school_location",
            LocationStep::Workplace => "workplace_location",
        }
    }
}

impl fmt::Display for LocationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Single step ───────────────────────────────────────────────────────────────

/// Run one location model and persist its results into `ctx`.
///
/// 1. [`equilibrate`] to a terminal state.
/// 2. Write each chooser's zone into the destination column; everyone else
///    gets [`ZoneId::NONE`].
/// 3. Optionally add a home → destination distance column.
/// 4. On the locutor, publish the shadow-price and modeled-size tables under
///    their configured names.
pub fn run_location_step<O: IterationObserver>(
    ctx:      &mut ModelContext,
    model:    &LocationModel,
    observer: &mut O,
) -> SimResult<LocationChoiceOutcome> {
    let outcome = equilibrate(ctx, model, observer)?;
    let settings = model.settings();
    let column = &settings.dest_choice_column_name;

    let assigned = ctx
        .population
        .set_destinations(column, outcome.choices.iter().map(|c| (c.person, c.zone)))?;
    log::info!(
        "{}: {assigned} of {} persons assigned a {column}",
        model.name(),
        ctx.population.count()
    );
    log_destination_summary(model.name(), ctx.population.destinations(column).unwrap_or_default());

    if let Some(annotation) = &settings.annotate_distance {
        let distances = destination_distances(ctx, column, &annotation.skim)?;
        ctx.population.insert_column(annotation.column.clone(), distances)?;
    }

    if ctx.config.locutor {
        if let Some(name) = &settings.shadow_price_table {
            ctx.publish(name.clone(), outcome.shadow.prices().clone());
        }
        if let Some(name) = &settings.modeled_size_table {
            ctx.publish(name.clone(), outcome.shadow.modeled().clone());
        }
    }

    Ok(outcome)
}

fn destination_distances(ctx: &ModelContext, column: &str, skim: &str) -> SimResult<Vec<f64>> {
    if !ctx.skims().contains(skim) {
        return Err(SimError::Config(format!("distance annotation skim {skim:?} is not loaded")));
    }
    let destinations = ctx.population.destinations(column).unwrap_or_default();
    let distances = destinations
        .iter()
        .enumerate()
        .map(|(row, &zone)| {
            if zone == ZoneId::NONE {
                return NO_DISTANCE;
            }
            ctx.skims()
                .lookup(skim, ctx.population.home_zone(row), zone)
                .unwrap_or(NO_DISTANCE)
        })
        .collect();
    Ok(distances)
}

/// Log how many persons chose each zone, most popular first.
fn log_destination_summary(name: &str, destinations: &[ZoneId]) {
    let mut counts: HashMap<ZoneId, usize> = HashMap::new();
    for &zone in destinations.iter().filter(|&&z| z != ZoneId::NONE) {
        *counts.entry(zone).or_default() += 1;
    }
    let mut counts: Vec<(ZoneId, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let top: Vec<String> = counts
        .iter()
        .take(SUMMARY_TOP_ZONES)
        .map(|(zone, n)| format!("{}:{n}", zone.0))
        .collect();
    log::info!("{name}: {} destination zones used; top {}", counts.len(), top.join(" "));
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Ordered set of location steps run against one context.
///
/// # Example
///
/// ```rust,ignore
/// let outcomes = Pipeline::new()
///     .step(LocationStep::School, school_model)
///     .step(LocationStep::Workplace, workplace_model)
///     .run(&mut ctx, &mut NoopObserver)?;
/// ```
#[derive(Default)]
pub struct Pipeline {
    models: BTreeMap<LocationStep, LocationModel>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `model` for `step`, replacing any earlier one.
    pub fn step(mut self, step: LocationStep, model: LocationModel) -> Self {
        self.models.insert(step, model);
        self
    }

    pub fn steps(&self) -> impl Iterator<Item = LocationStep> + '_ {
        self.models.keys().copied()
    }

    /// Run every registered step in [`LocationStep`] order.
    pub fn run<O: IterationObserver>(
        &self,
        ctx:      &mut ModelContext,
        observer: &mut O,
    ) -> SimResult<BTreeMap<LocationStep, LocationChoiceOutcome>> {
        let mut outcomes = BTreeMap::new();
        for (&step, model) in &self.models {
            if model.step() != step {
                return Err(SimError::Config(format!(
                    "model for {} registered under {step}",
                    model.step()
                )));
            }
            outcomes.insert(step, run_location_step(ctx, model, observer)?);
        }
        Ok(outcomes)
    }
}
