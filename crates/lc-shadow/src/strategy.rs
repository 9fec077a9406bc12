//! Balancing-factor update rules.
//!
//! | Strategy | Factor update                                        | Adjusted size        |
//! |----------|------------------------------------------------------|----------------------|
//! | `ctrl`   | `f · (1 + damping · (ratio − 1))`                    | `desired · f`        |
//! | `daysim` | `f + ln(desired / modeled)` outside the dead-band    | `desired · exp(f)`   |
//! | `msa`    | `f + (f · ratio − f) / (iteration − 1)`              | `desired · f`        |
//!
//! `ratio` is `desired / modeled`, capped at `max_ratio`; a zone with nothing
//! modeled gets `max_ratio` when something was desired and `1` otherwise.

use lc_core::{ShadowPriceMethod, ShadowPriceSettings};

/// Floor applied to both sizes before taking the `daysim` log ratio.
const DAYSIM_MIN_SIZE: f64 = 0.01;

pub trait BalancingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Factor before any adjustment.
    fn initial(&self) -> f64;

    /// New factor for one zone × segment cell after an iteration that modeled
    /// `modeled` against a target of `desired`.  `iteration` is the iteration
    /// about to run (always ≥ 2).
    fn update(&self, factor: f64, desired: f64, modeled: f64, iteration: u32) -> f64;

    /// Size term handed to the sampler for this cell.
    fn adjusted_size(&self, desired: f64, factor: f64) -> f64;
}

/// Pick the strategy named in `settings`.
pub fn strategy_for(settings: &ShadowPriceSettings) -> Box<dyn BalancingStrategy> {
    match settings.method {
        ShadowPriceMethod::Ctrl => Box::new(Ctrl {
            damping:   settings.damping_factor,
            max_ratio: settings.max_ratio,
        }),
        ShadowPriceMethod::Daysim => Box::new(Daysim {
            absolute_tolerance: settings.daysim_absolute_tolerance,
            percent_tolerance:  settings.daysim_percent_tolerance,
        }),
        ShadowPriceMethod::Msa => Box::new(Msa { max_ratio: settings.max_ratio }),
    }
}

fn capped_ratio(desired: f64, modeled: f64, max_ratio: f64) -> f64 {
    if modeled > 0.0 {
        (desired / modeled).min(max_ratio)
    } else if desired > 0.0 {
        max_ratio
    } else {
        1.0
    }
}

// ── ctrl ──────────────────────────────────────────────────────────────────────

/// Damped multiplicative ratio on the size term.
#[derive(Copy, Clone, Debug)]
pub struct Ctrl {
    pub damping:   f64,
    pub max_ratio: f64,
}

impl BalancingStrategy for Ctrl {
    fn name(&self) -> &'static str {
        "ctrl"
    }

    fn initial(&self) -> f64 {
        1.0
    }

    fn update(&self, factor: f64, desired: f64, modeled: f64, _iteration: u32) -> f64 {
        let ratio = capped_ratio(desired, modeled, self.max_ratio);
        factor * (1.0 + self.damping * (ratio - 1.0))
    }

    fn adjusted_size(&self, desired: f64, factor: f64) -> f64 {
        desired * factor
    }
}

// ── daysim ────────────────────────────────────────────────────────────────────

/// Additive log-utility shadow price.  Cells within either tolerance keep
/// their price.
#[derive(Copy, Clone, Debug)]
pub struct Daysim {
    pub absolute_tolerance: f64,
    pub percent_tolerance:  f64,
}

impl BalancingStrategy for Daysim {
    fn name(&self) -> &'static str {
        "daysim"
    }

    fn initial(&self) -> f64 {
        0.0
    }

    fn update(&self, price: f64, desired: f64, modeled: f64, _iteration: u32) -> f64 {
        let diff = (desired - modeled).abs();
        let percent = if desired > 0.0 { 100.0 * diff / desired } else { f64::INFINITY };
        if diff <= self.absolute_tolerance || percent <= self.percent_tolerance {
            return price;
        }
        price + (desired.max(DAYSIM_MIN_SIZE) / modeled.max(DAYSIM_MIN_SIZE)).ln()
    }

    fn adjusted_size(&self, desired: f64, price: f64) -> f64 {
        desired * price.exp()
    }
}

// ── msa ───────────────────────────────────────────────────────────────────────

/// Method of successive averages towards the undamped ratio target.
#[derive(Copy, Clone, Debug)]
pub struct Msa {
    pub max_ratio: f64,
}

impl BalancingStrategy for Msa {
    fn name(&self) -> &'static str {
        "msa"
    }

    fn initial(&self) -> f64 {
        1.0
    }

    fn update(&self, factor: f64, desired: f64, modeled: f64, iteration: u32) -> f64 {
        let target = factor * capped_ratio(desired, modeled, self.max_ratio);
        let step = 1.0 / f64::from(iteration.saturating_sub(1).max(1));
        factor + step * (target - factor)
    }

    fn adjusted_size(&self, desired: f64, factor: f64) -> f64 {
        desired * factor
    }
}
