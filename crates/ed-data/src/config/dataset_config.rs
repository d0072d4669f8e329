//! Dataset configuration: where the file is and how its columns are named

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::null_handling::NullConfig;
use crate::DataError;

/// Header names for each field the loader reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub year: String,
    pub board: String,
    pub school: String,
    pub address: String,
    pub city: String,
    pub floor_area: String,
    pub energy_intensity: String,
    pub heating_degree_days: String,
    pub ghg_kg: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            year: "Year".to_string(),
            board: "Organization".to_string(),
            school: "Operation".to_string(),
            address: "Address".to_string(),
            city: "City".to_string(),
            floor_area: "Total Floor Area".to_string(),
            energy_intensity: "Energy Intensity (ekWh/sqft)".to_string(),
            heating_degree_days: "HDD".to_string(),
            ghg_kg: "GHG Emissions KG".to_string(),
        }
    }
}

/// Keep only rows whose `column` equals `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    pub column: String,
    pub value: String,
}

/// Configuration for loading one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the CSV file
    pub path: PathBuf,

    pub columns: ColumnMap,

    /// Restricts the dataset to school boards
    pub row_filter: Option<RowFilter>,

    /// Missing-value handling for numeric columns
    pub nulls: NullConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            columns: ColumnMap::default(),
            row_filter: Some(RowFilter {
                column: "Sector".to_string(),
                value: "School Board".to_string(),
            }),
            nulls: NullConfig::default(),
        }
    }
}

impl DatasetConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| DataError::Config(e.to_string()))
    }

    /// Get the file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}
