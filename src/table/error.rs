use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("Record {position} has a time that cannot be read as a calendar instant")]
    InvalidTime { position: usize },

    #[error("Table has no columns")]
    NoColumns,
}
