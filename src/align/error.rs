use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignError {
    #[error("Cannot align an empty record sequence")]
    EmptyInput,

    #[error("Unsupported bucket period '{0}'")]
    UnsupportedPeriod(String),

    #[error("Invalid index range: {0}")]
    InvalidIndexRange(String),

    #[error("Field '{0}' is not present on any record")]
    UnknownField(String),

    #[error("Window bound '{0}' cannot be placed on this axis")]
    InvalidWindow(String),

    #[error("Record {position} has a time that cannot be placed on this axis")]
    InvalidTime { position: usize },

    #[error("Record {position} is earlier than the record before it; input must be sorted by time")]
    Unsorted { position: usize },

    #[error("Record {position} falls in bucket {label}, which an earlier record already filled")]
    DuplicateBucket { position: usize, label: String },

    #[error("Record {position} has index {index}, outside of {first}..={last}")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        first: u32,
        last: u32,
    },
}
