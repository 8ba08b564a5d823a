//! Division with the zero-on-undefined policy
//!
//! Every ratio in the derivation goes through these helpers. A ratio whose
//! denominator is zero describes a quantity that is itself zero (no imports,
//! no output), so 0.0 is the correct value rather than NaN or infinity.

use ndarray::{Array1, Array2};

/// `numerator / denominator`, or 0.0 when the result is not finite
#[inline]
#[must_use]
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// `1 / x`, or 0.0 when `x` is zero
#[inline]
#[must_use]
pub fn reciprocal(x: f64) -> f64 {
    safe_divide(1.0, x)
}

/// Divide each column `j` of `values` by `divisors[j]`
#[must_use]
pub fn divide_columns(values: &Array2<f64>, divisors: &Array1<f64>) -> Array2<f64> {
    let mut out = values.clone();
    for mut row in out.rows_mut() {
        for (cell, &d) in row.iter_mut().zip(divisors.iter()) {
            *cell = safe_divide(*cell, d);
        }
    }
    out
}

/// Multiply each column `j` of `values` by `factors[j]`
#[must_use]
pub fn multiply_columns(values: &Array2<f64>, factors: &Array1<f64>) -> Array2<f64> {
    let mut out = values.clone();
    for mut row in out.rows_mut() {
        row *= factors;
    }
    out
}
