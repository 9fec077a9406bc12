//! Plain data rows written by the output backends.

use lc_choice::ChoiceRecord;
use lc_core::SegmentId;
use lc_shadow::{FitReport, ShadowPriceCalculator};

/// One chooser's destination in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceRow {
    pub iteration:  u32,
    pub person_id:  u32,
    /// Chosen zone, or `-1` when the person has none.
    pub zone_id:    i64,
    pub segment_id: u16,
}

impl ChoiceRow {
    pub fn new(iteration: u32, record: &ChoiceRecord) -> Self {
        Self {
            iteration,
            person_id:  record.person.0,
            zone_id:    record.zone.to_signed(),
            segment_id: record.segment.0,
        }
    }
}

/// Shadow-price state of one zone × segment cell after an iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneSegmentRow {
    pub iteration:    u32,
    pub zone_id:      u32,
    pub segment_id:   u16,
    pub desired_size: f64,
    pub modeled_size: f64,
    pub shadow_price: f64,
}

impl ZoneSegmentRow {
    /// Every cell of `shadow`, segment-major.
    pub fn from_calculator(iteration: u32, shadow: &ShadowPriceCalculator) -> Vec<Self> {
        let desired = shadow.desired();
        let modeled = shadow.modeled();
        let prices = shadow.prices();

        let mut rows = Vec::with_capacity(desired.cells());
        for s in 0..desired.segments().len() {
            let segment = SegmentId(s as u16);
            for (z, zone) in desired.zones().iter().enumerate() {
                rows.push(Self {
                    iteration,
                    zone_id:      zone.0,
                    segment_id:   segment.0,
                    desired_size: desired.get(z, segment),
                    modeled_size: modeled.get(z, segment),
                    shadow_price: prices.get(z, segment),
                });
            }
        }
        rows
    }
}

/// One convergence check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRow {
    pub iteration:              u32,
    pub cells:                  u64,
    pub checked:                u64,
    pub failures:               u64,
    pub allowed:                f64,
    pub max_relative_deviation: f64,
    pub converged:              bool,
}

impl From<&FitReport> for FitRow {
    fn from(report: &FitReport) -> Self {
        Self {
            iteration:              report.iteration,
            cells:                  report.cells as u64,
            checked:                report.checked as u64,
            failures:               report.failures as u64,
            allowed:                report.allowed,
            max_relative_deviation: report.max_relative_deviation,
            converged:              report.converged,
        }
    }
}
