//! The explicit state every location step runs against.

use std::collections::BTreeMap;

use lc_core::{RandomStreams, RunConfig};
use lc_data::{Population, SkimLookup, ZoneTable};
use lc_shadow::ZoneSegmentTable;
use lc_utility::{EvalContext, UtilityEvaluator};

use crate::SimResult;

/// Population, zones, skims, the utility evaluator and run settings.
///
/// Steps read everything from here and write only two things back: new
/// destination columns on [`population`](Self::population) and published
/// zone × segment tables.  Build one with
/// [`ContextBuilder`][crate::ContextBuilder]; a fresh run needs a fresh
/// context.
pub struct ModelContext {
    pub population: Population,
    pub land_use:   ZoneTable,
    pub config:     RunConfig,
    skims:          Box<dyn SkimLookup>,
    evaluator:      Box<dyn UtilityEvaluator>,
    tables:         BTreeMap<String, ZoneSegmentTable>,
    /// Dedicated pool when `config.num_threads` is set, built once per context.
    #[cfg(feature = "parallel")]
    pool:           Option<rayon::ThreadPool>,
}

impl ModelContext {
    pub(crate) fn from_parts(
        population: Population,
        land_use:   ZoneTable,
        skims:      Box<dyn SkimLookup>,
        evaluator:  Box<dyn UtilityEvaluator>,
        config:     RunConfig,
    ) -> SimResult<Self> {
        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::SimError::Config(format!("thread pool: {e}")))?;
                log::debug!("context: rayon pool with {n} threads");
                Some(pool)
            }
            None => None,
        };
        Ok(Self {
            population,
            land_use,
            config,
            skims,
            evaluator,
            tables: BTreeMap::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    /// Run `op` on the context's thread pool, or on Rayon's global pool when
    /// no thread count was configured.
    #[cfg(feature = "parallel")]
    pub(crate) fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    pub fn skims(&self) -> &dyn SkimLookup {
        self.skims.as_ref()
    }

    pub fn evaluator(&self) -> &dyn UtilityEvaluator {
        self.evaluator.as_ref()
    }

    pub fn streams(&self) -> RandomStreams {
        RandomStreams::new(self.config.seed)
    }

    /// Evaluation inputs over the current population and zones.
    pub fn eval_context(&self) -> EvalContext<'_> {
        EvalContext::new(&self.population, &self.land_use, self.skims.as_ref())
    }

    /// Store `table` under `name`, replacing any earlier table.
    pub fn publish(&mut self, name: impl Into<String>, table: ZoneSegmentTable) {
        let name = name.into();
        log::debug!("publishing table {name:?}");
        self.tables.insert(name, table);
    }

    pub fn table(&self, name: &str) -> Option<&ZoneSegmentTable> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &ZoneSegmentTable)> + '_ {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }
}
