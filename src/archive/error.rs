use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive file '{0}' cannot be opened")]
    NotFound(PathBuf, #[source] std::io::Error),

    #[error("Archive file '{0}' is neither .parquet nor .csv")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read CSV archive '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet archive '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Column '{column}' of type {dtype} cannot be used as record time")]
    UnsupportedTimeColumn { column: String, dtype: String },

    #[error("Row {row} has no usable time")]
    InvalidTime { row: usize },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
