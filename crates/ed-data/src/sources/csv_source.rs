use std::fs::File;
use std::io::{BufReader, Read};

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use ed_core::{RawRecord, RowSource};
use tracing::{info, warn};

use crate::config::{DatasetConfig, NullConfig};
use crate::DataError;

/// CSV data source producing one raw record per school row
pub struct CsvSource {
    config: DatasetConfig,
    name: String,
}

/// Column positions resolved from the header row
struct HeaderIndex {
    year: usize,
    board: usize,
    school: usize,
    address: usize,
    city: usize,
    floor_area: usize,
    energy_intensity: usize,
    heating_degree_days: usize,
    ghg_kg: usize,
    filter: Option<(usize, String)>,
}

impl HeaderIndex {
    fn resolve(headers: &StringRecord, config: &DatasetConfig) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        let columns = &config.columns;
        let filter = match &config.row_filter {
            Some(filter) => Some((find(&filter.column)?, filter.value.clone())),
            None => None,
        };

        Ok(Self {
            year: find(&columns.year)?,
            board: find(&columns.board)?,
            school: find(&columns.school)?,
            address: find(&columns.address)?,
            city: find(&columns.city)?,
            floor_area: find(&columns.floor_area)?,
            energy_intensity: find(&columns.energy_intensity)?,
            heating_degree_days: find(&columns.heating_degree_days)?,
            ghg_kg: find(&columns.ghg_kg)?,
            filter,
        })
    }

    fn accepts(&self, record: &StringRecord) -> bool {
        match &self.filter {
            Some((idx, value)) => cell(record, *idx) == value,
            None => true,
        }
    }
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Parse a year cell, tolerating spreadsheet-style "2020.0".
fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    value.parse::<i32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|year| year.is_finite() && year.fract() == 0.0)
            .map(|year| year as i32)
    })
}

impl CsvSource {
    /// Create a new CSV source from a dataset configuration
    pub fn new(config: DatasetConfig) -> Self {
        let name = config.file_name();
        Self { config, name }
    }

    /// Read every accepted row from `reader`.
    ///
    /// Malformed numeric cells become `NaN`. Rows without a usable year,
    /// board or school name are skipped with a warning.
    pub fn read_records<R: Read>(reader: R, config: &DatasetConfig) -> Result<Vec<RawRecord>, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let index = HeaderIndex::resolve(&headers, config)?;
        let nulls: &NullConfig = &config.nulls;

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (line, result) in csv_reader.records().enumerate() {
            let record = result?;
            if !index.accepts(&record) {
                continue;
            }

            let Some(year) = parse_year(cell(&record, index.year)) else {
                warn!(line = line + 2, value = cell(&record, index.year), "Skipping row with invalid year");
                skipped += 1;
                continue;
            };
            let board = cell(&record, index.board);
            let school = cell(&record, index.school);
            if board.is_empty() || school.is_empty() {
                warn!(line = line + 2, "Skipping row without board or school name");
                skipped += 1;
                continue;
            }

            records.push(RawRecord {
                year,
                board: board.to_string(),
                school: school.to_string(),
                address: cell(&record, index.address).to_string(),
                city: cell(&record, index.city).to_string(),
                floor_area: nulls.parse_f64(cell(&record, index.floor_area)),
                energy_intensity: nulls.parse_f64(cell(&record, index.energy_intensity)),
                heating_degree_days: nulls.parse_f64(cell(&record, index.heating_degree_days)),
                ghg_kg: nulls.parse_f64(cell(&record, index.ghg_kg)),
            });
        }

        info!(records = records.len(), skipped, "Parsed CSV rows");
        Ok(records)
    }

    /// Read the configured file on the blocking pool
    pub async fn load_records(&self) -> Result<Vec<RawRecord>, DataError> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || {
            let file = File::open(&config.path)?;
            Self::read_records(BufReader::new(file), &config)
        })
        .await?
    }
}

#[async_trait]
impl RowSource for CsvSource {
    async fn load(&self) -> anyhow::Result<Vec<RawRecord>> {
        Ok(self.load_records().await?)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
