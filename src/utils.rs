use chrono::{DateTime, Utc};

/// Returns the first value that is present, non-zero and not NaN, or zero.
///
/// Mirrors how loosely-typed statement fields are read: an absent field and a
/// zero field are indistinguishable to the metrics engine.
pub fn coalesce(values: &[Option<f64>]) -> f64 {
    values
        .iter()
        .flatten()
        .copied()
        .find(|v| *v != 0.0 && !v.is_nan())
        .unwrap_or(0.0)
}

/// Rounds half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Fixed-point formatting with half-away-from-zero ties.
pub fn to_fixed(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, round_to(value, digits))
}

/// `part / whole * 100`, or zero when `whole` is not positive.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}

/// Formats a value that is already on the percent scale, e.g. `22.5%`.
pub fn format_percent(percent: f64) -> String {
    format!("{}%", to_fixed(percent, 1))
}

/// Formats a plain ratio with two decimals, e.g. `3.00`.
pub fn format_multiple(ratio: f64) -> String {
    to_fixed(ratio, 2)
}

/// Formats a currency amount in millions, e.g. `$1.50M`.
pub fn format_millions(amount: f64) -> String {
    format!("${}M", to_fixed(amount / 1_000_000.0, 2))
}

/// Formats a currency amount in thousands, e.g. `$40K`.
pub fn format_thousands(amount: f64) -> String {
    format!("${}K", to_fixed(amount / 1_000.0, 0))
}

/// Builds an identifier such as `doc-1700000000000` from a timestamp.
pub fn timestamped_id(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, at.timestamp_millis())
}
