//! The `UtilityEvaluator` seam and its linear-in-parameters implementation.
//!
//! An evaluator scores *interaction rows*: each row pairs one chooser (a row
//! of the [`Population`]) with one candidate zone (a row of the
//! [`ZoneTable`]).  The sampler, the logsum augmenter and the simulator all
//! call the same evaluator, each with different row-level inputs available
//! through [`RowValues`].

use lc_data::{Population, SkimLookup, ZoneTable};

use crate::{SegmentSpec, Term, UtilityError, UtilityResult};

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Interaction rows as parallel index slices.
#[derive(Copy, Clone, Debug)]
pub struct InteractionRows<'a> {
    /// Population row of the chooser, per interaction row.
    pub choosers: &'a [usize],
    /// Land-use row of the alternative, per interaction row.
    pub zones:    &'a [usize],
}

impl<'a> InteractionRows<'a> {
    pub fn new(choosers: &'a [usize], zones: &'a [usize]) -> UtilityResult<Self> {
        if choosers.len() != zones.len() {
            return Err(UtilityError::RowMismatch { rows: choosers.len(), values: zones.len() });
        }
        Ok(Self { choosers, zones })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.choosers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.choosers.is_empty()
    }
}

/// Per-row values produced by earlier pipeline stages.
#[derive(Copy, Clone, Debug, Default)]
pub struct RowValues<'a> {
    /// Mode-choice logsum per interaction row.
    pub logsum:     Option<&'a [f64]>,
    /// Times the zone was drawn for the chooser.
    pub pick_count: Option<&'a [u32]>,
    /// Sampling probability of the zone for the chooser.
    pub prob:       Option<&'a [f64]>,
}

/// Everything a term may read.
#[derive(Copy, Clone)]
pub struct EvalContext<'a> {
    pub population: &'a Population,
    pub land_use:   &'a ZoneTable,
    pub skims:      &'a dyn SkimLookup,
    /// Size term per land-use row, already shadow-price adjusted.
    pub size_terms: Option<&'a [f64]>,
    pub row_values: RowValues<'a>,
}

impl<'a> EvalContext<'a> {
    pub fn new(population: &'a Population, land_use: &'a ZoneTable, skims: &'a dyn SkimLookup) -> Self {
        Self { population, land_use, skims, size_terms: None, row_values: RowValues::default() }
    }

    pub fn with_size_terms(mut self, size_terms: &'a [f64]) -> Self {
        self.size_terms = Some(size_terms);
        self
    }

    pub fn with_row_values(mut self, row_values: RowValues<'a>) -> Self {
        self.row_values = row_values;
        self
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Scores interaction rows against a segment spec.
///
/// Returns one utility per row, in row order.  Implementations must be
/// `Send + Sync` so that segments can be scored in parallel.
pub trait UtilityEvaluator: Send + Sync {
    fn evaluate(
        &self,
        spec: &SegmentSpec,
        rows: &InteractionRows<'_>,
        ctx:  &EvalContext<'_>,
    ) -> UtilityResult<Vec<f64>>;
}

// ── LinearEvaluator ───────────────────────────────────────────────────────────

/// `V = Σ coefficient × term value`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearEvaluator;

/// A term with its data source looked up once per call.
enum Source<'a> {
    Constant,
    Chooser(&'a [f64]),
    Alternative(&'a [f64]),
    Interaction(&'a [f64], &'a [f64]),
    Skim(&'a str),
    SameZone,
    LnSize(&'a [f64]),
    NoAttraction(&'a [f64]),
    Logsum(&'a [f64]),
    SampleCorrection(&'a [u32], &'a [f64]),
}

impl UtilityEvaluator for LinearEvaluator {
    fn evaluate(
        &self,
        spec: &SegmentSpec,
        rows: &InteractionRows<'_>,
        ctx:  &EvalContext<'_>,
    ) -> UtilityResult<Vec<f64>> {
        let mut utilities = vec![0.0; rows.len()];

        for resolved in &spec.terms {
            let source = resolve(&resolved.term, rows.len(), ctx)?;
            let coef = resolved.coefficient;
            for (i, u) in utilities.iter_mut().enumerate() {
                let chooser = rows.choosers[i];
                let zone = rows.zones[i];
                let value = match &source {
                    Source::Constant => 1.0,
                    Source::Chooser(col) => col[chooser],
                    Source::Alternative(col) => col[zone],
                    Source::Interaction(c, a) => c[chooser] * a[zone],
                    Source::Skim(key) => {
                        let origin = ctx.population.home_zone(chooser);
                        let destination = ctx.land_use.zone(zone);
                        ctx.skims.lookup(key, origin, destination).ok_or_else(|| {
                            UtilityError::SkimCell { key: (*key).to_owned(), origin, destination }
                        })?
                    }
                    Source::SameZone => {
                        let same = ctx.population.home_zone(chooser) == ctx.land_use.zone(zone);
                        if same { 1.0 } else { 0.0 }
                    }
                    Source::LnSize(size) => {
                        if size[zone] > 0.0 { size[zone].ln() } else { 0.0 }
                    }
                    Source::NoAttraction(size) => {
                        if size[zone] > 0.0 { 0.0 } else { 1.0 }
                    }
                    Source::Logsum(values) => values[i],
                    Source::SampleCorrection(picks, probs) => {
                        (picks[i] as f64 / probs[i]).ln()
                    }
                };
                *u += coef * value;
            }
        }

        Ok(utilities)
    }
}

fn resolve<'a>(term: &'a Term, n: usize, ctx: &EvalContext<'a>) -> UtilityResult<Source<'a>> {
    let source = match term {
        Term::Constant => Source::Constant,
        Term::Chooser(name) => Source::Chooser(chooser_column(ctx.population, name)?),
        Term::Alternative(name) => Source::Alternative(zone_column(ctx.land_use, name)?),
        Term::Interaction { chooser, alternative } => Source::Interaction(
            chooser_column(ctx.population, chooser)?,
            zone_column(ctx.land_use, alternative)?,
        ),
        Term::Skim(key) => {
            if !ctx.skims.contains(key) {
                return Err(UtilityError::MissingSkim(key.clone()));
            }
            Source::Skim(key.as_str())
        }
        Term::SameZone => Source::SameZone,
        Term::LnSize => Source::LnSize(size_terms(ctx)?),
        Term::NoAttraction => Source::NoAttraction(size_terms(ctx)?),
        Term::Logsum => {
            let values = ctx.row_values.logsum.ok_or(UtilityError::MissingRowValue("logsums"))?;
            check_len(n, values.len())?;
            Source::Logsum(values)
        }
        Term::SampleCorrection => {
            let picks = ctx
                .row_values
                .pick_count
                .ok_or(UtilityError::MissingRowValue("pick counts"))?;
            let probs = ctx
                .row_values
                .prob
                .ok_or(UtilityError::MissingRowValue("sampling probabilities"))?;
            check_len(n, picks.len())?;
            check_len(n, probs.len())?;
            Source::SampleCorrection(picks, probs)
        }
    };
    Ok(source)
}

fn chooser_column<'a>(population: &'a Population, name: &str) -> UtilityResult<&'a [f64]> {
    population.column(name).ok_or_else(|| UtilityError::MissingColumn {
        table:  "persons",
        column: name.to_owned(),
    })
}

fn zone_column<'a>(land_use: &'a ZoneTable, name: &str) -> UtilityResult<&'a [f64]> {
    land_use.column(name).ok_or_else(|| UtilityError::MissingColumn {
        table:  "land_use",
        column: name.to_owned(),
    })
}

fn size_terms<'a>(ctx: &EvalContext<'a>) -> UtilityResult<&'a [f64]> {
    ctx.size_terms.ok_or(UtilityError::MissingRowValue("size terms"))
}

fn check_len(rows: usize, values: usize) -> UtilityResult<()> {
    if rows == values { Ok(()) } else { Err(UtilityError::RowMismatch { rows, values }) }
}
