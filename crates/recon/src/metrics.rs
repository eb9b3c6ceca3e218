//! Derived-metric primitives and the tolerance comparison.
//!
//! Everything here is total: division by zero yields [`Metric::Undefined`]
//! and comparisons against non-numeric values are simply unequal.

use crate::model::{normalize_name, Metric, Status, Value};

/// Absolute tolerance applied to every numeric comparison.
pub const DEFAULT_TOLERANCE: f64 = 0.6;

/// `100 * numerator / denominator`.
pub fn percentage(numerator: f64, denominator: f64) -> Metric {
    if denominator == 0.0 {
        return Metric::Undefined;
    }
    Metric::from(100.0 * numerator / denominator)
}

/// `numerator / denominator`.
pub fn ratio(numerator: f64, denominator: f64) -> Metric {
    if denominator == 0.0 {
        return Metric::Undefined;
    }
    Metric::from(numerator / denominator)
}

/// Round to `decimals` places, ties to even (the rounding applied by the
/// tabular tooling that produced the answer key).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// True iff both sides coerce to finite numbers within `tolerance` of each other.
pub fn approximately_equal(expected: &Value, actual: &Value, tolerance: f64) -> bool {
    match (expected.as_f64(), actual.as_f64()) {
        (Some(e), Some(a)) => (e - a).abs() <= tolerance,
        _ => false,
    }
}

/// `actual - expected` when both sides are numeric.
pub fn delta(expected: &Value, actual: &Value) -> Option<f64> {
    Some(actual.as_f64()? - expected.as_f64()?)
}

/// Verdict policy for one report line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparator {
    pub tolerance: f64,
    /// Compare text values as entity names instead of failing numeric coercion.
    pub match_names: bool,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            match_names: false,
        }
    }
}

impl Comparator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance, ..Self::default() }
    }

    pub fn verdict(&self, expected: &Value, actual: &Value) -> Status {
        if self.match_names {
            if let (Some(e), Some(a)) = (expected.as_text(), actual.as_text()) {
                if e.trim().parse::<f64>().is_err() && a.trim().parse::<f64>().is_err() {
                    return status(normalize_name(e) == normalize_name(a));
                }
            }
        }
        status(approximately_equal(expected, actual, self.tolerance))
    }
}

fn status(pass: bool) -> Status {
    if pass {
        Status::Pass
    } else {
        Status::Fail
    }
}
