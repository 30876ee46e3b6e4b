use crate::archive::error::ArchiveError;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tokio::{fs, task};

/// Opens a station archive exported as parquet or CSV (with a header row).
#[derive(Debug, Clone)]
pub struct ArchiveLoader {
    path: PathBuf,
}

impl ArchiveLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the archive as a `LazyFrame`. Parquet files are scanned lazily; CSV
    /// files are parsed up front on a blocking task.
    pub async fn load(&self) -> Result<LazyFrame, ArchiveError> {
        fs::metadata(&self.path)
            .await
            .map_err(|e| ArchiveError::NotFound(self.path.clone(), e))?;

        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("parquet") => {
                info!("Scanning parquet archive {:?}", self.path);
                LazyFrame::scan_parquet(&self.path, Default::default())
                    .map_err(|e| ArchiveError::ParquetScan(self.path.clone(), e))
            }
            Some("csv") => {
                info!("Reading CSV archive {:?}", self.path);
                let path = self.path.clone();
                let df = task::spawn_blocking(move || {
                    CsvReadOptions::default()
                        .with_has_header(true)
                        .try_into_reader_with_file_path(Some(path.clone()))
                        .and_then(|reader| reader.finish())
                        .map_err(|e| ArchiveError::CsvRead(path, e))
                })
                .await??;
                info!("Read {} archive rows from {:?}", df.height(), self.path);
                Ok(df.lazy())
            }
            _ => Err(ArchiveError::UnsupportedFormat(self.path.clone())),
        }
    }
}
