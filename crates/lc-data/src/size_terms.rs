//! Destination size terms.
//!
//! A size-term table holds, per `(model_selector, segment)`, one coefficient
//! per land-use column:
//!
//! ```csv
//! model_selector,segment,TOTEMP,RETEMP,ENROLL_K12
//! workplace,work_low,0.8,0.2,0
//! workplace,work_high,1.0,0,0
//! school,k12,0,0,1
//! ```
//!
//! A zone's size for a segment is `Σ coefficient × column`.

use std::collections::BTreeMap;

use crate::{DataError, DataResult, ZoneTable};

/// One row of the size-term table.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeTermRow {
    pub model_selector: String,
    pub segment:        String,
    /// Land-use column → coefficient.  Zero coefficients are kept out.
    pub coefficients:   BTreeMap<String, f64>,
}

#[derive(Clone, Debug, Default)]
pub struct SizeTermSpec {
    rows: Vec<SizeTermRow>,
}

impl SizeTermSpec {
    pub fn new(rows: Vec<SizeTermRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SizeTermRow] {
        &self.rows
    }

    /// Coefficients for one segment of one model.
    pub fn coefficients(&self, selector: &str, segment: &str) -> DataResult<&BTreeMap<String, f64>> {
        self.rows
            .iter()
            .find(|r| r.model_selector == selector && r.segment == segment)
            .map(|r| &r.coefficients)
            .ok_or_else(|| DataError::NoSizeTerms {
                selector: selector.to_owned(),
                segment:  segment.to_owned(),
            })
    }

    /// Size term per zone (indexed like `land_use`) for one segment.
    ///
    /// Rejects negative or non-finite results.
    pub fn dest_size_terms(
        &self,
        land_use: &ZoneTable,
        selector: &str,
        segment:  &str,
    ) -> DataResult<Vec<f64>> {
        let mut sizes = vec![0.0; land_use.count()];
        for (column, &coef) in self.coefficients(selector, segment)? {
            if coef == 0.0 {
                continue;
            }
            let values = land_use.require_column(column)?;
            for (size, &v) in sizes.iter_mut().zip(values) {
                *size += coef * v;
            }
        }

        for (i, &value) in sizes.iter().enumerate() {
            if value < 0.0 || !value.is_finite() {
                return Err(DataError::NegativeSize {
                    segment: segment.to_owned(),
                    zone:    land_use.zone(i),
                    value,
                });
            }
        }
        Ok(sizes)
    }
}
