//! Multinomial logit arithmetic.

/// `ln Σ exp(u)`, shifted by the maximum for stability.
///
/// Returns `-inf` for an empty slice or when every utility is `-inf`.
pub fn log_sum_exp(utilities: &[f64]) -> f64 {
    let max = utilities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = utilities.iter().map(|&u| (u - max).exp()).sum();
    max + sum.ln()
}

/// Logit probabilities `exp(u_i) / Σ exp(u_j)`.
///
/// Returns `None` when no alternative is available (empty input, or every
/// utility is `-inf`), or when a utility is `NaN`.
pub fn probabilities(utilities: &[f64]) -> Option<Vec<f64>> {
    if utilities.iter().any(|u| u.is_nan()) {
        return None;
    }
    let max = utilities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY || max == f64::INFINITY {
        return None;
    }
    let exp: Vec<f64> = utilities.iter().map(|&u| (u - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    Some(exp.into_iter().map(|e| e / sum).collect())
}

/// Index selected by the uniform draw `u ∈ [0, 1)` against the cumulative
/// distribution of `probs`.
///
/// Rounding can leave the cumulative total a hair under `u`; the last
/// alternative with positive probability is returned in that case.
/// `None` only if no alternative has positive probability.
pub fn draw(probs: &[f64], u: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, &p) in probs.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = Some(i);
        if u < cumulative {
            return Some(i);
        }
    }
    last_positive
}
