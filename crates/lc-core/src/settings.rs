//! Run and model settings.
//!
//! Loaded from JSON model files by the application (see `lc-sim`'s loader)
//! and passed to the pipeline.  Every optional field has a `serde` default so
//! small model files only list what differs from the reference model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LcError, LcResult, PersonId};

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Settings shared by every step of one pipeline run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// Master RNG seed.  The same seed always produces identical choices.
    pub seed: u64,

    /// Upper bound on interaction rows (chooser × alternative) held at once.
    /// `0` disables chunking.
    #[serde(default)]
    pub chunk_size: usize,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    #[serde(default)]
    pub num_threads: Option<usize>,

    /// `true` for the single coordinating context that may write traces and
    /// publish shadow-price tables.
    #[serde(default = "default_true")]
    pub locutor: bool,

    /// Write per-iteration trace dumps.
    #[serde(default)]
    pub trace: bool,

    /// Restrict trace dumps to these persons; empty means everyone.
    #[serde(default)]
    pub trace_persons: Vec<PersonId>,
}

impl RunConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            chunk_size:    0,
            num_threads:   None,
            locutor:       true,
            trace:         false,
            trace_persons: Vec::new(),
        }
    }
}

// ── Tour purpose ──────────────────────────────────────────────────────────────

/// Mode-choice purpose used for logsums: one for the whole model, or one per
/// segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TourPurpose {
    Single(String),
    PerSegment(BTreeMap<String, String>),
}

impl TourPurpose {
    /// The purpose for `segment`.
    pub fn for_segment(&self, segment: &str) -> LcResult<&str> {
        match self {
            TourPurpose::Single(p) => Ok(p),
            TourPurpose::PerSegment(map) => map.get(segment).map(String::as_str).ok_or_else(|| {
                LcError::Config(format!("no logsum tour purpose for segment {segment:?}"))
            }),
        }
    }
}

// ── Shadow pricing ────────────────────────────────────────────────────────────

/// Balancing-factor update rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowPriceMethod {
    /// Damped multiplicative ratio `desired / modeled` on the size term.
    #[default]
    Ctrl,
    /// Additive log-utility adjustment with an absolute/relative dead-band.
    Daysim,
    /// Method of successive averages over the ratio target.
    Msa,
}

/// Shadow-pricing controls for one location model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShadowPriceSettings {
    #[serde(default)]
    pub use_shadow_pricing: bool,

    #[serde(default)]
    pub method: ShadowPriceMethod,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Zones whose desired size is below this are ignored by the fit check.
    #[serde(default = "default_size_threshold")]
    pub size_threshold: f64,

    /// Relative deviation (percent) a zone may have and still pass.
    #[serde(default = "default_percent_tolerance")]
    pub percent_tolerance: f64,

    /// Percentage of zone × segment cells allowed to fail at convergence.
    #[serde(default = "default_fail_threshold")]
    pub fail_threshold: f64,

    /// `ctrl` damping in `(0, 1]`.
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,

    /// Cap on `desired / modeled` (used when nothing was modeled in a zone).
    #[serde(default = "default_max_ratio")]
    pub max_ratio: f64,

    /// `daysim`: absolute deviation below which no adjustment is made.
    #[serde(default = "default_daysim_absolute_tolerance")]
    pub daysim_absolute_tolerance: f64,

    /// `daysim`: relative deviation (percent) below which no adjustment is made.
    #[serde(default = "default_daysim_percent_tolerance")]
    pub daysim_percent_tolerance: f64,

    /// Scale each segment's desired size so it totals the segment's choosers.
    #[serde(default = "default_true")]
    pub scale_to_choosers: bool,
}

impl Default for ShadowPriceSettings {
    fn default() -> Self {
        Self {
            use_shadow_pricing:        false,
            method:                    ShadowPriceMethod::default(),
            max_iterations:            default_max_iterations(),
            size_threshold:            default_size_threshold(),
            percent_tolerance:         default_percent_tolerance(),
            fail_threshold:            default_fail_threshold(),
            damping_factor:            default_damping_factor(),
            max_ratio:                 default_max_ratio(),
            daysim_absolute_tolerance: default_daysim_absolute_tolerance(),
            daysim_percent_tolerance:  default_daysim_percent_tolerance(),
            scale_to_choosers:         true,
        }
    }
}

impl ShadowPriceSettings {
    /// Iterations the loop will actually run: 1 when shadow pricing is off.
    #[inline]
    pub fn effective_max_iterations(&self) -> u32 {
        if self.use_shadow_pricing { self.max_iterations.max(1) } else { 1 }
    }

    pub fn validate(&self) -> LcResult<()> {
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(LcError::Config(format!(
                "damping_factor must be in (0, 1], got {}",
                self.damping_factor
            )));
        }
        if self.max_ratio < 1.0 {
            return Err(LcError::Config(format!("max_ratio must be >= 1, got {}", self.max_ratio)));
        }
        if !(0.0..=100.0).contains(&self.fail_threshold) {
            return Err(LcError::Config(format!(
                "fail_threshold is a percentage, got {}",
                self.fail_threshold
            )));
        }
        Ok(())
    }
}

// ── LocationSettings ──────────────────────────────────────────────────────────

/// Optional write-back annotation: distance from home to the chosen zone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistanceAnnotation {
    /// Population column to create.
    pub column: String,
    /// Skim read for `home → destination`.
    pub skim:   String,
}

/// Settings for one location model (school or workplace).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationSettings {
    /// Sample-stage utility spec file (CSV).
    pub sample_spec: String,
    /// Simulate-stage utility spec file (CSV).
    pub spec: String,
    /// Logsum (mode choice) settings file (JSON).
    pub logsum_settings: String,
    /// Size-term coefficient table (CSV).
    pub size_terms: String,

    /// Size-term table selector, e.g. `workplace` or `school`.
    pub model_selector: String,

    /// Alternatives sampled per chooser; `0` means "use every zone".
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Population column receiving the chosen zone.
    pub dest_choice_column_name: String,

    /// Population column whose value selects the segment.
    pub chooser_segment_column_name: String,

    /// Population column flagging eligible choosers (non-zero = eligible).
    pub chooser_filter_column_name: String,

    /// Segment name → segment-column value.
    pub segment_ids: BTreeMap<String, i64>,

    pub logsum_tour_purpose: TourPurpose,

    /// Named constants referenced by spec coefficients.
    #[serde(default)]
    pub constants: BTreeMap<String, f64>,

    /// Publish the final balancing factors under this table name.
    #[serde(default)]
    pub shadow_price_table: Option<String>,

    /// Publish the final modeled sizes under this table name.
    #[serde(default)]
    pub modeled_size_table: Option<String>,

    #[serde(default)]
    pub shadow_pricing: ShadowPriceSettings,

    #[serde(default)]
    pub annotate_distance: Option<DistanceAnnotation>,
}

impl LocationSettings {
    pub fn validate(&self) -> LcResult<()> {
        if self.segment_ids.is_empty() {
            return Err(LcError::Config("segment_ids is empty".into()));
        }
        if let TourPurpose::PerSegment(map) = &self.logsum_tour_purpose {
            for segment in self.segment_ids.keys() {
                if !map.contains_key(segment) {
                    return Err(LcError::Config(format!(
                        "logsum_tour_purpose has no entry for segment {segment:?}"
                    )));
                }
            }
        }
        self.shadow_pricing.validate()
    }
}

// ── serde defaults ────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_sample_size() -> usize {
    30
}

fn default_max_iterations() -> u32 {
    5
}

fn default_size_threshold() -> f64 {
    10.0
}

fn default_percent_tolerance() -> f64 {
    5.0
}

fn default_fail_threshold() -> f64 {
    10.0
}

fn default_damping_factor() -> f64 {
    1.0
}

fn default_max_ratio() -> f64 {
    10.0
}

fn default_daysim_absolute_tolerance() -> f64 {
    50.0
}

fn default_daysim_percent_tolerance() -> f64 {
    10.0
}
