//! Application configuration file

use std::path::Path;

use anyhow::Context;
use ed_core::EngineSettings;
use ed_data::DatasetConfig;
use ed_views::ViewSettings;
use serde::{Deserialize, Serialize};

/// Everything the binary can be configured with. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub engine: EngineSettings,
    pub views: ViewSettings,
}

impl AppConfig {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_optional() {
        let config = AppConfig::from_json(r#"{ "views": { "ranking_year": 2019 } }"#).unwrap();
        assert_eq!(config.views.ranking_year, 2019);
        assert_eq!(config.views.grid_page_size, ViewSettings::default().grid_page_size);
        assert_eq!(config.engine, EngineSettings::default());
        assert_eq!(config.dataset, DatasetConfig::default());
    }

    #[test]
    fn test_nested_dataset_settings() {
        let config = AppConfig::from_json(
            r#"{
                "dataset": { "path": "energy.csv", "nulls": { "patterns": ["", "n.a."] } },
                "engine": { "index_chunk_size": 64 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.dataset.file_name(), "energy.csv");
        assert!(config.dataset.nulls.is_null("N.A."));
        assert_eq!(config.engine.index_chunk_size, 64);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(AppConfig::from_json("{ nope").is_err());
    }
}
