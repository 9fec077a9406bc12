//! Shadow-price state for one location model run.

use lc_core::{SegmentId, Segments, ShadowPriceSettings, ZoneId};

use crate::{BalancingStrategy, ShadowPriceError, ShadowResult, ZoneSegmentTable, strategy_for};

// ── FitReport ─────────────────────────────────────────────────────────────────

/// Outcome of one convergence check.
#[derive(Clone, Debug, PartialEq)]
pub struct FitReport {
    pub iteration:              u32,
    /// Zone × segment cells in the table.
    pub cells:                  usize,
    /// Cells whose desired size is at least `size_threshold`.
    pub checked:                usize,
    /// Checked cells outside `percent_tolerance`.
    pub failures:               usize,
    /// Failures tolerated at convergence.
    pub allowed:                f64,
    /// Largest `|desired − modeled| / modeled` over checked cells.
    pub max_relative_deviation: f64,
    pub converged:              bool,
}

// ── ShadowPriceCalculator ─────────────────────────────────────────────────────

/// Desired, modeled, factor and adjusted tables plus the update rule.
///
/// Created fresh at the start of every run.  The equilibration loop is its
/// only writer: [`set_choices`](Self::set_choices) after each RUN,
/// [`update_shadow_prices`](Self::update_shadow_prices) in ADJUST.
pub struct ShadowPriceCalculator {
    settings: ShadowPriceSettings,
    strategy: Box<dyn BalancingStrategy>,
    index:    rustc_hash::FxHashMap<ZoneId, usize>,
    desired:  ZoneSegmentTable,
    modeled:  ZoneSegmentTable,
    prices:   ZoneSegmentTable,
    adjusted: ZoneSegmentTable,
    history:  Vec<FitReport>,
}

impl ShadowPriceCalculator {
    /// Build the initial state.
    ///
    /// `sizes[s]` is segment `s`'s nominal size term per zone and
    /// `choosers[s]` its eligible chooser count.  With `scale_to_choosers`
    /// each segment's desired sizes are rescaled to total its chooser count.
    pub fn new(
        settings: ShadowPriceSettings,
        zones:    &[ZoneId],
        segments: &Segments,
        sizes:    Vec<Vec<f64>>,
        choosers: &[usize],
    ) -> ShadowResult<Self> {
        check_len("segment sizes", segments.len(), sizes.len())?;
        check_len("segment chooser counts", segments.len(), choosers.len())?;

        let names = segments.names();
        let mut desired = ZoneSegmentTable::filled(zones, &names, 0.0);
        for (segment, column) in segments.iter().zip(sizes) {
            check_len("segment size column", zones.len(), column.len())?;
            let total: f64 = column.iter().sum();
            let scale = if settings.scale_to_choosers && total > 0.0 {
                choosers[segment.id.index()] as f64 / total
            } else {
                1.0
            };
            for (cell, value) in desired.column_mut(segment.id).iter_mut().zip(column) {
                *cell = value * scale;
            }
        }

        let strategy = strategy_for(&settings);
        let prices = ZoneSegmentTable::filled(zones, &names, strategy.initial());
        let mut calculator = Self {
            settings,
            strategy,
            index: zones.iter().enumerate().map(|(i, &z)| (z, i)).collect(),
            modeled: ZoneSegmentTable::filled(zones, &names, 0.0),
            adjusted: desired.clone(),
            desired,
            prices,
            history: Vec::new(),
        };
        calculator.recompute_adjusted();
        Ok(calculator)
    }

    pub fn settings(&self) -> &ShadowPriceSettings {
        &self.settings
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn desired(&self) -> &ZoneSegmentTable {
        &self.desired
    }

    pub fn modeled(&self) -> &ZoneSegmentTable {
        &self.modeled
    }

    /// Current balancing factors.
    pub fn prices(&self) -> &ZoneSegmentTable {
        &self.prices
    }

    pub fn adjusted(&self) -> &ZoneSegmentTable {
        &self.adjusted
    }

    /// Size terms the sampler should use for `segment`.
    pub fn adjusted_sizes(&self, segment: SegmentId) -> &[f64] {
        self.adjusted.column(segment)
    }

    /// Replace modeled sizes with the counts of `choices`.
    pub fn set_choices<I>(&mut self, choices: I) -> ShadowResult<()>
    where
        I: IntoIterator<Item = (ZoneId, SegmentId)>,
    {
        self.modeled.fill(0.0);
        let segments = self.modeled.segments().len();
        for (zone, segment) in choices {
            let z = *self.index.get(&zone).ok_or(ShadowPriceError::UnknownZone(zone))?;
            if segment.index() >= segments {
                return Err(ShadowPriceError::UnknownSegment(segment));
            }
            let count = self.modeled.get(z, segment);
            self.modeled.set(z, segment, count + 1.0);
        }
        Ok(())
    }

    /// Update every factor from the current modeled sizes, then recompute
    /// adjusted sizes.  `iteration` is the iteration about to run.
    pub fn update_shadow_prices(&mut self, iteration: u32) {
        for s in 0..self.prices.segments().len() {
            let segment = SegmentId(s as u16);
            for z in 0..self.prices.zones().len() {
                let factor = self.strategy.update(
                    self.prices.get(z, segment),
                    self.desired.get(z, segment),
                    self.modeled.get(z, segment),
                    iteration,
                );
                self.prices.set(z, segment, factor);
            }
        }
        self.recompute_adjusted();
        log::debug!("{} shadow prices updated for iteration {iteration}", self.strategy.name());
    }

    /// Evaluate the fit criterion on the current desired and modeled sizes.
    ///
    /// Does not mutate anything: checking twice gives the same report.
    pub fn check_fit(&self, iteration: u32) -> FitReport {
        let tolerance = self.settings.percent_tolerance / 100.0;
        let mut checked = 0;
        let mut failures = 0;
        let mut max_relative_deviation: f64 = 0.0;

        for s in 0..self.desired.segments().len() {
            let segment = SegmentId(s as u16);
            let desired = self.desired.column(segment);
            let modeled = self.modeled.column(segment);
            for (&desired, &modeled) in desired.iter().zip(modeled) {
                if desired < self.settings.size_threshold {
                    continue;
                }
                checked += 1;
                let diff = (desired - modeled).abs();
                let relative = if modeled > 0.0 {
                    diff / modeled
                } else if diff > 0.0 {
                    f64::INFINITY
                } else {
                    0.0
                };
                max_relative_deviation = max_relative_deviation.max(relative);
                if relative > tolerance {
                    failures += 1;
                }
            }
        }

        let cells = self.desired.cells();
        let allowed = self.settings.fail_threshold / 100.0 * cells as f64;
        FitReport {
            iteration,
            cells,
            checked,
            failures,
            allowed,
            max_relative_deviation,
            converged: failures as f64 <= allowed,
        }
    }

    /// Keep `report` in the run history.
    pub fn record(&mut self, report: FitReport) {
        self.history.push(report);
    }

    pub fn history(&self) -> &[FitReport] {
        &self.history
    }

    fn recompute_adjusted(&mut self) {
        for s in 0..self.adjusted.segments().len() {
            let segment = SegmentId(s as u16);
            for z in 0..self.adjusted.zones().len() {
                let size = self
                    .strategy
                    .adjusted_size(self.desired.get(z, segment), self.prices.get(z, segment));
                self.adjusted.set(z, segment, size);
            }
        }
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> ShadowResult<()> {
    if expected == got { Ok(()) } else { Err(ShadowPriceError::Shape { what, expected, got }) }
}
