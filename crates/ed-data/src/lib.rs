//! Dataset loading for the energy dashboard
//!
//! Turns a tabular energy report into the raw records the core engine
//! aggregates.

pub mod config;
pub mod sources;

use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use config::{ColumnMap, DatasetConfig, NullConfig, RowFilter};
pub use sources::CsvSource;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
