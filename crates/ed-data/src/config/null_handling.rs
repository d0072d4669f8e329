//! Missing-value handling for numeric fields

use serde::{Deserialize, Serialize};

/// Tokens that mark a numeric cell as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    /// Patterns to treat as missing
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                String::new(),
                "-".to_string(),
                "N/A".to_string(),
                "null".to_string(),
                "None".to_string(),
            ],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as missing
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace { value.trim() } else { value };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Parse a numeric cell. Missing or malformed values become `NaN`.
    ///
    /// Thousands separators are accepted.
    pub fn parse_f64(&self, value: &str) -> f64 {
        if self.is_null(value) {
            return f64::NAN;
        }
        let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
        cleaned.parse::<f64>().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  n/a "));
        assert!(config.is_null("NULL"));
        assert!(!config.is_null("0"));
    }

    #[test]
    fn test_case_sensitive() {
        let config = NullConfig {
            case_sensitive: true,
            ..NullConfig::default()
        };
        assert!(config.is_null("N/A"));
        assert!(!config.is_null("n/a"));
    }

    #[test]
    fn test_parse_f64() {
        let config = NullConfig::default();
        assert_eq!(config.parse_f64("12.5"), 12.5);
        assert_eq!(config.parse_f64(" 1,234.5 "), 1234.5);
        assert!(config.parse_f64("N/A").is_nan());
        assert!(config.parse_f64("twelve").is_nan());
    }

    #[test]
    fn test_configured_pattern() {
        let mut config = NullConfig::default();
        config.patterns.push("#VALUE!".to_string());
        assert!(config.is_null("#value!"));
        assert!(config.parse_f64("#value!").is_nan());
    }
}
