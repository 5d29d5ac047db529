//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// `part / total` as a percentage in `0.0..=100.0`; zero when `total` is zero.
#[must_use]
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (usize_to_f64(part.min(total)) / usize_to_f64(total)) * 100.0
}

/// Milliseconds as fractional seconds for display.
#[must_use]
pub fn ms_to_secs(ms: u64) -> f64 {
    cast::<u64, f64>(ms).unwrap_or(0.0) / 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_empty_and_overflowing_parts() {
        assert!((percent(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((percent(1, 4) - 25.0).abs() < f64::EPSILON);
        assert!((percent(9, 4) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn seconds_from_millis() {
        assert!((ms_to_secs(1_500) - 1.5).abs() < f64::EPSILON);
    }
}
