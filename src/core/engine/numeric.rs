//! Tolerant numeric coercion and divide-by-zero-safe percentages.
//!
//! Derived metrics funnel through these helpers so that a zero or absent
//! denominator resolves to a default value instead of surfacing an error.

/// Parse a textual value into a float, tolerating absence and garbage.
///
/// Returns the parsed number, or `0.0` when the input is absent, empty, or
/// not parseable. Never fails. Only for metrics where "unknown" and zero
/// are interchangeable: an unreadable temperature must surface as an
/// error, not as 0 °C.
pub(crate) fn coerce_f64(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(0.0)
}

/// `(numerator / denominator) * 100`, or `0` when the denominator is zero,
/// absent, or not finite.
pub fn safe_percent(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    safe_percent_or(numerator, denominator, 0.0)
}

/// Like [`safe_percent`] with a caller-chosen default.
///
/// Absent operands are treated as `0` before the zero check, so an absent
/// denominator and a present zero denominator behave identically.
pub fn safe_percent_or(numerator: Option<f64>, denominator: Option<f64>, default: f64) -> f64 {
    let n = numerator.unwrap_or(0.0);
    let d = denominator.unwrap_or(0.0);
    if d == 0.0 || !d.is_finite() || !n.is_finite() {
        return default;
    }
    (n / d) * 100.0
}

/// Round to one decimal place. Applied to temperature values at the point
/// of extraction from each backend.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
