use crate::align::error::AlignError;
use crate::types::calendar::days_in_month;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A fixed, dense range of integer slots used instead of calendar instants.
///
/// Index charts lay data on a known cardinality (the days of one month, the months
/// of one year) rather than deriving bounds from the records themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IndexRange {
    /// `0..=23`.
    HoursOfDay,
    /// `1..=days_in_month(year, month)`.
    DaysOfMonth { year: i32, month: u32 },
    /// Zero-based months, `0..=11`.
    MonthsOfYear,
    /// `first..first + count`.
    Span { first: u32, count: u32 },
}

impl IndexRange {
    pub fn first(&self) -> u32 {
        match self {
            IndexRange::HoursOfDay | IndexRange::MonthsOfYear => 0,
            IndexRange::DaysOfMonth { .. } => 1,
            IndexRange::Span { first, .. } => *first,
        }
    }

    /// Number of slots in the range.
    pub fn len(&self) -> Result<u32, AlignError> {
        match self {
            IndexRange::HoursOfDay => Ok(24),
            IndexRange::MonthsOfYear => Ok(12),
            IndexRange::DaysOfMonth { year, month } => days_in_month(*year, *month)
                .ok_or_else(|| AlignError::InvalidIndexRange(format!("{year:04}-{month:02}"))),
            IndexRange::Span { first, count } => {
                if *count == 0 || first.checked_add(*count).is_none() {
                    Err(AlignError::InvalidIndexRange(format!(
                        "span of {count} from {first}"
                    )))
                } else {
                    Ok(*count)
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        !matches!(self.len(), Ok(n) if n > 0)
    }

    /// Last slot, inclusive.
    pub fn last(&self) -> Result<u32, AlignError> {
        Ok(self.first() + self.len()? - 1)
    }

    /// Slot of a calendar instant, or `None` if the range has no calendar meaning.
    /// Days of a month only accept instants inside that month.
    pub fn index_of(&self, instant: NaiveDateTime) -> Option<u32> {
        match self {
            IndexRange::HoursOfDay => Some(instant.hour()),
            IndexRange::DaysOfMonth { year, month } => {
                ((instant.year(), instant.month()) == (*year, *month)).then_some(instant.day())
            }
            IndexRange::MonthsOfYear => Some(instant.month0()),
            IndexRange::Span { .. } => None,
        }
    }
}
