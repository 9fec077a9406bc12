//! Mode-choice logsums: the expected maximum utility over travel modes from
//! a chooser's home to a candidate zone.
//!
//! # Settings file
//!
//! ```json
//! {
//!   "spec": "tour_mode_choice.csv",
//!   "constants": { "coef_ivt": -0.02 },
//!   "nests": {
//!     "name": "root",
//!     "coefficient": 1.0,
//!     "alternatives": [
//!       "DRIVE",
//!       { "name": "NONMOTOR", "coefficient": 0.7, "alternatives": ["WALK", "BIKE"] }
//!     ]
//!   }
//! }
//! ```
//!
//! Without `nests` the modes form a flat MNL and the logsum is
//! `ln Σ exp(V_mode)`.  With nests each nest's value is
//! `θ · ln Σ exp(V_child / θ)`, evaluated bottom-up; the root's value is the
//! logsum.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    Constants, EvalContext, InteractionRows, UtilityError, UtilityEvaluator, UtilityResult,
    UtilitySpec, log_sum_exp,
};

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NestSpec {
    pub name:         String,
    /// Nesting coefficient θ in `(0, 1]`.
    pub coefficient:  f64,
    pub alternatives: Vec<NestChild>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NestChild {
    Mode(String),
    Nest(NestSpec),
}

/// Contents of a location model's `logsum_settings` file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogsumSettings {
    /// Mode utility spec (CSV, `Label,Expression,Mode,<purpose…>`).
    pub spec:      String,
    #[serde(default)]
    pub nests:     Option<NestSpec>,
    #[serde(default)]
    pub constants: Constants,
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// Validated mode-choice structure ready to compute logsums.
#[derive(Clone, Debug)]
pub struct LogsumModel {
    modes:     Vec<(String, UtilitySpec)>,
    nests:     Option<NestSpec>,
    constants: Constants,
}

impl LogsumModel {
    /// Check that every mode named in `nests` has a spec, that every spec'd
    /// mode appears exactly once in the tree, and that every nesting
    /// coefficient lies in `(0, 1]`.
    pub fn new(
        modes:     Vec<(String, UtilitySpec)>,
        nests:     Option<NestSpec>,
        constants: Constants,
    ) -> UtilityResult<Self> {
        if modes.is_empty() {
            return Err(UtilityError::Nest("no modes".into()));
        }
        if let Some(root) = &nests {
            let mut seen = BTreeSet::new();
            validate_nest(root, &modes, &mut seen)?;
            if let Some((missing, _)) = modes.iter().find(|(m, _)| !seen.contains(m.as_str())) {
                return Err(UtilityError::Nest(format!("mode {missing:?} is not in any nest")));
            }
        }
        Ok(Self { modes, nests, constants })
    }

    pub fn modes(&self) -> impl Iterator<Item = &str> + '_ {
        self.modes.iter().map(|(m, _)| m.as_str())
    }

    /// One logsum per interaction row for tour purpose `purpose`.
    pub fn logsums(
        &self,
        evaluator: &dyn UtilityEvaluator,
        purpose:   &str,
        rows:      &InteractionRows<'_>,
        ctx:       &EvalContext<'_>,
    ) -> UtilityResult<Vec<f64>> {
        // mode-major utilities: utilities[m][row]
        let mut utilities = Vec::with_capacity(self.modes.len());
        for (_, spec) in &self.modes {
            let narrowed = spec.for_segment(purpose, &self.constants)?;
            utilities.push(evaluator.evaluate(&narrowed, rows, ctx)?);
        }

        let mut scratch = Vec::with_capacity(self.modes.len());
        let logsums = (0..rows.len())
            .map(|row| match &self.nests {
                None => {
                    scratch.clear();
                    scratch.extend(utilities.iter().map(|u| u[row]));
                    log_sum_exp(&scratch)
                }
                Some(root) => self.nest_value(root, &utilities, row),
            })
            .collect();
        Ok(logsums)
    }

    fn nest_value(&self, nest: &NestSpec, utilities: &[Vec<f64>], row: usize) -> f64 {
        let theta = nest.coefficient;
        let scaled: Vec<f64> = nest
            .alternatives
            .iter()
            .map(|child| {
                let v = match child {
                    NestChild::Mode(name) => self
                        .mode_index(name)
                        .map_or(f64::NEG_INFINITY, |m| utilities[m][row]),
                    NestChild::Nest(inner) => self.nest_value(inner, utilities, row),
                };
                v / theta
            })
            .collect();
        theta * log_sum_exp(&scaled)
    }

    fn mode_index(&self, name: &str) -> Option<usize> {
        self.modes.iter().position(|(m, _)| m == name)
    }
}

fn validate_nest<'a>(
    nest:  &'a NestSpec,
    modes: &[(String, UtilitySpec)],
    seen:  &mut BTreeSet<&'a str>,
) -> UtilityResult<()> {
    if !(nest.coefficient > 0.0 && nest.coefficient <= 1.0) {
        return Err(UtilityError::Nest(format!(
            "nest {:?} coefficient {} is outside (0, 1]",
            nest.name, nest.coefficient
        )));
    }
    if nest.alternatives.is_empty() {
        return Err(UtilityError::Nest(format!("nest {:?} is empty", nest.name)));
    }
    for child in &nest.alternatives {
        match child {
            NestChild::Mode(name) => {
                if !modes.iter().any(|(m, _)| m == name) {
                    return Err(UtilityError::Nest(format!("mode {name:?} has no utility spec")));
                }
                if !seen.insert(name.as_str()) {
                    return Err(UtilityError::Nest(format!("mode {name:?} appears twice")));
                }
            }
            NestChild::Nest(inner) => validate_nest(inner, modes, seen)?,
        }
    }
    Ok(())
}
