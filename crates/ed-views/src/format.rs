//! Number formatting for display

/// Text shown in place of a missing value.
pub const MISSING: &str = "missing";

/// Format `value` with a fixed number of decimals, or [`MISSING`].
pub fn format_value(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", decimals, value)
    } else {
        MISSING.to_string()
    }
}

/// Round to the nearest integer.
pub fn format_rounded(value: f64) -> String {
    if value.is_finite() {
        format!("{}", value.round() as i64)
    } else {
        MISSING.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values() {
        assert_eq!(format_value(f64::NAN, 2), MISSING);
        assert_eq!(format_rounded(f64::INFINITY), MISSING);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(format_value(1.23456, 2), "1.23");
        assert_eq!(format_rounded(2500.5), "2501");
        assert_eq!(format_rounded(-0.4), "0");
    }
}
