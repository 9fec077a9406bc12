//! Fluent builder for a [`ModelContext`].

use lc_core::RunConfig;
use lc_data::{Population, SkimLookup, ZoneTable};
use lc_utility::{LinearEvaluator, UtilityEvaluator};

use crate::{ModelContext, SimError, SimResult};

/// Fluent builder for [`ModelContext`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                |
/// |-------------------|------------------------|
/// | `.evaluator(e)`   | `LinearEvaluator`      |
/// | `.config(c)`      | `RunConfig::new(0)`    |
///
/// # Example
///
/// ```rust,ignore
/// let mut ctx = ContextBuilder::new(population, land_use, skims)
///     .config(RunConfig::new(42))
///     .build()?;
/// Pipeline::new().step(LocationStep::Workplace, model).run(&mut ctx, &mut NoopObserver)?;
/// ```
pub struct ContextBuilder {
    population: Population,
    land_use:   ZoneTable,
    skims:      Box<dyn SkimLookup>,
    evaluator:  Option<Box<dyn UtilityEvaluator>>,
    config:     Option<RunConfig>,
}

impl ContextBuilder {
    pub fn new<S>(population: Population, land_use: ZoneTable, skims: S) -> Self
    where
        S: SkimLookup + 'static,
    {
        Self {
            population,
            land_use,
            skims: Box::new(skims),
            evaluator: None,
            config: None,
        }
    }

    /// Replace the default linear evaluator.
    pub fn evaluator<E>(mut self, evaluator: E) -> Self
    where
        E: UtilityEvaluator + 'static,
    {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`] if the zone table is empty, a person's home
    ///   zone is not in it, or the configured thread pool cannot be built.
    pub fn build(self) -> SimResult<ModelContext> {
        if self.land_use.is_empty() {
            return Err(SimError::Config("land use has no zones".into()));
        }
        for row in 0..self.population.count() {
            let home = self.population.home_zone(row);
            if self.land_use.index_of(home).is_none() {
                return Err(SimError::Config(format!(
                    "{} lives in {home}, which is not in the land use table",
                    self.population.person(row)
                )));
            }
        }

        let config = self.config.unwrap_or_else(|| RunConfig::new(0));
        let evaluator: Box<dyn UtilityEvaluator> = match self.evaluator {
            Some(evaluator) => evaluator,
            None => Box::new(LinearEvaluator),
        };
        log::info!(
            "context: {} persons, {} zones, seed {}",
            self.population.count(),
            self.land_use.count(),
            config.seed
        );
        ModelContext::from_parts(self.population, self.land_use, self.skims, evaluator, config)
    }
}
