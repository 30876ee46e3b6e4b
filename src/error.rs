use crate::align::error::AlignError;
use crate::archive::error::ArchiveError;
use crate::chart::error::ChartError;
use crate::config::ConfigError;
use crate::fetch::error::FetchError;
use crate::table::error::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WsViewError {
    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No archive path configured")]
    NoArchivePath,

    #[error("Archive aggregation by {0} is not supported")]
    UnsupportedAggregate(crate::types::period::BucketPeriod),
}
