//! Defines [`BucketPeriod`], the step used to lay consecutive buckets on a calendar axis.

use crate::align::error::AlignError;
use crate::types::calendar::midnight;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a calendar axis.
///
/// Every period knows how to truncate an instant down to the start of its bucket
/// and how to advance a bucket start by exactly one step. [`BucketPeriod::Raw`]
/// is the odd one out: each observation is its own bucket and there is no step,
/// so no gaps are ever generated for it.
///
/// Parses from (and displays as) `"none"`, `"hour"`, `"day"`, `"month"` and `"year"`.
/// Anything else is rejected with [`AlignError::UnsupportedPeriod`].
///
/// # Examples
///
/// ```
/// use wsview::BucketPeriod;
/// use chrono::NaiveDate;
///
/// let t = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap().and_hms_opt(15, 42, 9).unwrap();
/// let start = BucketPeriod::Month.truncate(t);
/// assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap());
/// assert_eq!("day".parse::<BucketPeriod>().unwrap(), BucketPeriod::Day);
/// assert!("week".parse::<BucketPeriod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BucketPeriod {
    /// Raw observations, one bucket per distinct record time.
    #[default]
    Raw,
    Hour,
    Day,
    Month,
    Year,
}

impl BucketPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketPeriod::Raw => "none",
            BucketPeriod::Hour => "hour",
            BucketPeriod::Day => "day",
            BucketPeriod::Month => "month",
            BucketPeriod::Year => "year",
        }
    }

    /// Truncates `instant` to the start of the bucket containing it.
    pub fn truncate(&self, instant: NaiveDateTime) -> NaiveDateTime {
        match self {
            BucketPeriod::Raw => instant,
            BucketPeriod::Hour => instant
                .date()
                .and_hms_opt(instant.hour(), 0, 0)
                .unwrap_or(instant),
            BucketPeriod::Day => midnight(instant.date()),
            BucketPeriod::Month => NaiveDate::from_ymd_opt(instant.year(), instant.month(), 1)
                .map(midnight)
                .unwrap_or(instant),
            BucketPeriod::Year => NaiveDate::from_ymd_opt(instant.year(), 1, 1)
                .map(midnight)
                .unwrap_or(instant),
        }
    }

    /// Moves a bucket start one period forward.
    ///
    /// Returns `None` for [`BucketPeriod::Raw`] (there is no step) and on calendar overflow.
    pub fn advance(&self, bucket_start: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            BucketPeriod::Raw => None,
            BucketPeriod::Hour => bucket_start.checked_add_signed(Duration::hours(1)),
            BucketPeriod::Day => bucket_start.checked_add_signed(Duration::days(1)),
            BucketPeriod::Month => bucket_start.checked_add_months(Months::new(1)),
            BucketPeriod::Year => bucket_start.checked_add_months(Months::new(12)),
        }
    }

    /// Whether the period fills gaps between observations.
    pub fn is_stepped(&self) -> bool {
        !matches!(self, BucketPeriod::Raw)
    }
}

impl FromStr for BucketPeriod {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "raw" => Ok(BucketPeriod::Raw),
            "hour" => Ok(BucketPeriod::Hour),
            "day" => Ok(BucketPeriod::Day),
            "month" => Ok(BucketPeriod::Month),
            "year" => Ok(BucketPeriod::Year),
            _ => Err(AlignError::UnsupportedPeriod(s.to_string())),
        }
    }
}

impl TryFrom<String> for BucketPeriod {
    type Error = AlignError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BucketPeriod> for String {
    fn from(value: BucketPeriod) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BucketPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_truncate_per_period() {
        let t = at(2023, 7, 14, 13, 37);
        assert_eq!(BucketPeriod::Raw.truncate(t), t);
        assert_eq!(BucketPeriod::Hour.truncate(t), at(2023, 7, 14, 13, 0));
        assert_eq!(BucketPeriod::Day.truncate(t), at(2023, 7, 14, 0, 0));
        assert_eq!(BucketPeriod::Month.truncate(t), at(2023, 7, 1, 0, 0));
        assert_eq!(BucketPeriod::Year.truncate(t), at(2023, 1, 1, 0, 0));
    }

    #[test]
    fn test_advance_crosses_calendar_boundaries() {
        assert_eq!(
            BucketPeriod::Hour.advance(at(2023, 12, 31, 23, 0)),
            Some(at(2024, 1, 1, 0, 0))
        );
        assert_eq!(
            BucketPeriod::Day.advance(at(2024, 2, 28, 0, 0)),
            Some(at(2024, 2, 29, 0, 0))
        );
        assert_eq!(
            BucketPeriod::Month.advance(at(2023, 12, 1, 0, 0)),
            Some(at(2024, 1, 1, 0, 0))
        );
        assert_eq!(
            BucketPeriod::Year.advance(at(2023, 1, 1, 0, 0)),
            Some(at(2024, 1, 1, 0, 0))
        );
        assert_eq!(BucketPeriod::Raw.advance(at(2023, 1, 1, 0, 0)), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("month".parse::<BucketPeriod>().unwrap(), BucketPeriod::Month);
        assert_eq!("Hour".parse::<BucketPeriod>().unwrap(), BucketPeriod::Hour);
        assert_eq!("none".parse::<BucketPeriod>().unwrap(), BucketPeriod::Raw);
        assert_eq!(BucketPeriod::Year.to_string(), "year");

        match "fortnight".parse::<BucketPeriod>() {
            Err(AlignError::UnsupportedPeriod(p)) => assert_eq!(p, "fortnight"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_serde_rejects_unknown_period() {
        let ok: BucketPeriod = serde_json::from_str("\"day\"").unwrap();
        assert_eq!(ok, BucketPeriod::Day);
        assert!(serde_json::from_str::<BucketPeriod>("\"week\"").is_err());
        assert_eq!(serde_json::to_string(&BucketPeriod::Month).unwrap(), "\"month\"");
    }
}
