//! A configured location model: settings plus the specs and tables they name.

use lc_core::{LocationSettings, Segment, Segments};
use lc_data::{Population, SizeTermSpec, ZoneTable};
use lc_utility::{LogsumModel, SegmentSpec, UtilitySpec};

use crate::{LocationStep, SimResult};

/// Everything one location step needs besides the [`ModelContext`][crate::ModelContext].
#[derive(Debug)]
pub struct LocationModel {
    step:        LocationStep,
    settings:    LocationSettings,
    segments:    Segments,
    sample_spec: UtilitySpec,
    spec:        UtilitySpec,
    size_terms:  SizeTermSpec,
    logsum:      LogsumModel,
}

/// One segment's resolved inputs for a run.
#[derive(Clone, Debug)]
pub struct SegmentPlan {
    pub segment:     Segment,
    pub sample_spec: SegmentSpec,
    pub spec:        SegmentSpec,
    /// Mode-choice purpose for logsums.
    pub purpose:     String,
    /// Nominal size term per land-use row.
    pub sizes:       Vec<f64>,
}

impl LocationModel {
    /// Validate `settings` and resolve its segments.
    pub fn new(
        step:        LocationStep,
        settings:    LocationSettings,
        sample_spec: UtilitySpec,
        spec:        UtilitySpec,
        size_terms:  SizeTermSpec,
        logsum:      LogsumModel,
    ) -> SimResult<Self> {
        settings.validate()?;
        let segments = Segments::from_codes(&settings.segment_ids)?;
        Ok(Self { step, settings, segments, sample_spec, spec, size_terms, logsum })
    }

    pub fn step(&self) -> LocationStep {
        self.step
    }

    /// Trace label prefix, e.g. `workplace_location`.
    pub fn name(&self) -> &'static str {
        self.step.name()
    }

    pub fn settings(&self) -> &LocationSettings {
        &self.settings
    }

    /// Segments in processing (sorted-name) order.
    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn logsum(&self) -> &LogsumModel {
        &self.logsum
    }

    /// Narrow both specs, resolve the tour purpose and compute nominal size
    /// terms for every segment.
    pub fn plans(&self, land_use: &ZoneTable) -> SimResult<Vec<SegmentPlan>> {
        let constants = &self.settings.constants;
        let mut plans = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let name = segment.name.as_str();
            plans.push(SegmentPlan {
                segment:     segment.clone(),
                sample_spec: self.sample_spec.for_segment(name, constants)?,
                spec:        self.spec.for_segment(name, constants)?,
                purpose:     self.settings.logsum_tour_purpose.for_segment(name)?.to_owned(),
                sizes:       self.size_terms.dest_size_terms(land_use, &self.settings.model_selector, name)?,
            });
        }
        Ok(plans)
    }

    /// Eligible population rows per segment, indexed by `SegmentId`.
    ///
    /// A person is eligible when the filter column is non-zero.  Eligible
    /// persons whose segment code matches no configured segment are dropped
    /// with a warning.
    pub fn choosers_by_segment(&self, population: &Population) -> SimResult<Vec<Vec<usize>>> {
        let eligible = population.eligible_rows(&self.settings.chooser_filter_column_name)?;
        let codes = population.require_column(&self.settings.chooser_segment_column_name)?;

        let mut by_segment = vec![Vec::new(); self.segments.len()];
        let mut unmatched = 0usize;
        for row in eligible {
            let value = codes[row];
            let segment = (value.fract() == 0.0)
                .then(|| self.segments.by_code(value as i64))
                .flatten();
            match segment {
                Some(s) => by_segment[s.id.index()].push(row),
                None => unmatched += 1,
            }
        }
        if unmatched > 0 {
            log::warn!(
                "{}: {unmatched} eligible persons have a {} value with no segment",
                self.name(),
                self.settings.chooser_segment_column_name
            );
        }
        Ok(by_segment)
    }
}
