//! Engine settings

use serde::{Deserialize, Serialize};

/// Tunables for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Rows indexed between cooperative yields while building search indices
    pub index_chunk_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            index_chunk_size: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: EngineSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());

        let settings: EngineSettings = serde_json::from_str(r#"{"index_chunk_size": 10}"#).unwrap();
        assert_eq!(settings.index_chunk_size, 10);
    }
}
