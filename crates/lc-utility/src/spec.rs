//! Utility specifications and their per-segment narrowing.
//!
//! # CSV format
//!
//! ```csv
//! Label,Expression,work_low,work_high
//! distance,skim:DIST,-0.25,coef_dist_high
//! size,ln_size,1,1
//! no attractions,no_attraction,-999,-999
//! ```
//!
//! Coefficient cells are either numbers or the name of a model constant.
//! Empty cells are `0`.  Mode-choice specs add a `Mode` column after
//! `Expression` (see [`load_mode_spec_reader`]).

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::{Term, UtilityError, UtilityResult};

/// Named model constants referenced by spec coefficients.
pub type Constants = BTreeMap<String, f64>;

/// A coefficient cell: a literal or the name of a constant.
#[derive(Clone, Debug, PartialEq)]
pub enum Coefficient {
    Value(f64),
    Named(String),
}

impl Coefficient {
    /// Only finite numbers are literals; `nan`, `inf` and the like name
    /// constants.
    fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            return Coefficient::Value(0.0);
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Coefficient::Value(v),
            _ => Coefficient::Named(cell.to_owned()),
        }
    }

    pub fn resolve(&self, constants: &Constants) -> UtilityResult<f64> {
        match self {
            Coefficient::Value(v) => Ok(*v),
            Coefficient::Named(name) => constants
                .get(name)
                .copied()
                .ok_or_else(|| UtilityError::MissingConstant(name.clone())),
        }
    }
}

/// One spec row.
#[derive(Clone, Debug, PartialEq)]
pub struct UtilityTerm {
    pub label:        String,
    pub term:         Term,
    /// Coefficient per segment (or per purpose for mode-choice specs).
    pub coefficients: BTreeMap<String, Coefficient>,
}

/// A full multi-segment spec, as read from file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UtilitySpec {
    terms: Vec<UtilityTerm>,
}

/// A term with its coefficient resolved for one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTerm {
    pub label:       String,
    pub term:        Term,
    pub coefficient: f64,
}

/// A spec narrowed to one coefficient column, zero rows removed.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentSpec {
    pub segment: String,
    pub terms:   Vec<ResolvedTerm>,
}

impl UtilitySpec {
    pub fn new(terms: Vec<UtilityTerm>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[UtilityTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Narrow to `segment`'s coefficient column.
    ///
    /// Named coefficients are resolved against `constants`; rows whose
    /// coefficient is zero are dropped since they add no marginal utility.
    /// Fails if no row carries the column.
    pub fn for_segment(&self, segment: &str, constants: &Constants) -> UtilityResult<SegmentSpec> {
        if !self.terms.is_empty() && !self.terms.iter().any(|t| t.coefficients.contains_key(segment)) {
            return Err(UtilityError::MissingSegment(segment.to_owned()));
        }

        let mut terms = Vec::with_capacity(self.terms.len());
        let mut dropped = 0usize;
        for t in &self.terms {
            let coefficient = match t.coefficients.get(segment) {
                Some(c) => c.resolve(constants)?,
                None => 0.0,
            };
            if coefficient == 0.0 {
                dropped += 1;
                continue;
            }
            terms.push(ResolvedTerm {
                label: t.label.clone(),
                term: t.term.clone(),
                coefficient,
            });
        }

        if dropped > 0 {
            log::debug!("dropping {dropped} all-zero rows from spec for {segment:?}");
        }
        Ok(SegmentSpec { segment: segment.to_owned(), terms })
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

pub fn load_spec_csv(path: &Path) -> UtilityResult<UtilitySpec> {
    load_spec_reader(std::fs::File::open(path)?)
}

/// Load a `Label,Expression,<segment…>` spec.
pub fn load_spec_reader<R: Read>(reader: R) -> UtilityResult<UtilitySpec> {
    let rows = read_spec_rows(reader, &["Label", "Expression"])?;
    Ok(UtilitySpec::new(rows.into_iter().map(|(term, _)| term).collect()))
}

/// Per-mode utility specs read from one `Label,Expression,Mode,<purpose…>`
/// file, in order of first appearance of each mode.
pub fn load_mode_spec_reader<R: Read>(reader: R) -> UtilityResult<Vec<(String, UtilitySpec)>> {
    let rows = read_spec_rows(reader, &["Label", "Expression", "Mode"])?;

    let mut modes: Vec<(String, Vec<UtilityTerm>)> = Vec::new();
    for (term, extra) in rows {
        let mode = extra.into_iter().next().unwrap_or_default();
        match modes.iter_mut().find(|(m, _)| *m == mode) {
            Some((_, terms)) => terms.push(term),
            None => modes.push((mode, vec![term])),
        }
    }
    Ok(modes.into_iter().map(|(m, t)| (m, UtilitySpec::new(t))).collect())
}

pub fn load_mode_spec_csv(path: &Path) -> UtilityResult<Vec<(String, UtilitySpec)>> {
    load_mode_spec_reader(std::fs::File::open(path)?)
}

/// Parse rows; returns each term plus the values of leading columns beyond
/// `Label` and `Expression`.
fn read_spec_rows<R: Read>(
    reader:  R,
    leading: &[&str],
) -> UtilityResult<Vec<(UtilityTerm, Vec<String>)>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    for (i, name) in leading.iter().enumerate() {
        if headers.get(i).map(str::trim) != Some(*name) {
            return Err(UtilityError::Parse(format!("spec column {i} should be {name:?}")));
        }
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let label = record[0].trim().to_owned();
        let term: Term = record[1].parse().map_err(|e| match e {
            UtilityError::Parse(msg) => UtilityError::Parse(format!("row {label:?}: {msg}")),
            other => other,
        })?;
        let extra = (2..leading.len()).map(|i| record[i].trim().to_owned()).collect();
        let coefficients = headers
            .iter()
            .zip(record.iter())
            .skip(leading.len())
            .map(|(segment, cell)| (segment.trim().to_owned(), Coefficient::parse(cell)))
            .collect();
        rows.push((UtilityTerm { label, term, coefficients }, extra));
    }
    Ok(rows)
}
