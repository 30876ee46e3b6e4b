//! Flat, timestamped weather records as they arrive from a station archive or the HTTP boundary.

use crate::types::calendar::midnight;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The `time` attribute of a record.
///
/// A bare number is epoch seconds on a calendar axis and a slot number on an index
/// axis; the axis decides. Strings are parsed into wall-clock instants when the record
/// is deserialized, so malformed dates fail early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTime", into = "RawTime")]
pub enum RecordTime {
    Number(i64),
    Instant(NaiveDateTime),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTime {
    Number(i64),
    Text(String),
}

impl TryFrom<RawTime> for RecordTime {
    type Error = String;

    fn try_from(value: RawTime) -> Result<Self, Self::Error> {
        match value {
            RawTime::Number(n) => Ok(RecordTime::Number(n)),
            RawTime::Text(s) => parse_instant(&s)
                .map(RecordTime::Instant)
                .ok_or_else(|| format!("unrecognised time '{s}'")),
        }
    }
}

impl From<RecordTime> for RawTime {
    fn from(value: RecordTime) -> Self {
        match value {
            RecordTime::Number(n) => RawTime::Number(n),
            RecordTime::Instant(dt) => RawTime::Text(dt.format(INSTANT_FORMAT).to_string()),
        }
    }
}

/// Parses the textual time shapes produced by station archives and aggregate queries.
pub(crate) fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    // Full timestamp with offset, kept as the wall clock of that offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, INSTANT_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(midnight(date));
    }
    // Month aggregates ("2024-03") and year aggregates ("2024")
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(midnight(date));
    }
    if s.len() == 4 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01-01"), "%Y-%m-%d") {
            return Some(midnight(date));
        }
    }
    None
}

impl RecordTime {
    /// Resolves the time to a wall-clock instant, reading numbers as epoch seconds
    /// in the given offset.
    pub fn to_instant(&self, offset: FixedOffset) -> Option<NaiveDateTime> {
        match self {
            RecordTime::Number(secs) => {
                DateTime::from_timestamp(*secs, 0).map(|dt| dt.with_timezone(&offset).naive_local())
            }
            RecordTime::Instant(dt) => Some(*dt),
        }
    }
}

impl From<NaiveDateTime> for RecordTime {
    fn from(value: NaiveDateTime) -> Self {
        RecordTime::Instant(value)
    }
}

impl From<NaiveDate> for RecordTime {
    fn from(value: NaiveDate) -> Self {
        RecordTime::Instant(midnight(value))
    }
}

impl From<i64> for RecordTime {
    fn from(value: i64) -> Self {
        RecordTime::Number(value)
    }
}

impl From<u32> for RecordTime {
    fn from(value: u32) -> Self {
        RecordTime::Number(value as i64)
    }
}

impl fmt::Display for RecordTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTime::Number(n) => write!(f, "{n}"),
            RecordTime::Instant(dt) => write!(f, "{}", dt.format(INSTANT_FORMAT)),
        }
    }
}

/// One observation or aggregate row: a time plus any number of numeric fields.
///
/// A field that is absent and a field that is `null` mean the same thing: no value.
///
/// # Examples
///
/// ```
/// use wsview::Record;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let record = Record::new(day).with("rain", 2.4).with_missing("temp");
/// assert_eq!(record.get("rain"), Some(2.4));
/// assert_eq!(record.get("temp"), None);
/// assert!(record.has_field("temp"));
/// assert!(!record.has_field("wind_speed"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub time: RecordTime,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Option<f64>>,
}

impl Record {
    pub fn new(time: impl Into<RecordTime>) -> Self {
        Self {
            time: time.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: &str, value: f64) -> Self {
        self.fields.insert(field.to_string(), Some(value));
        self
    }

    pub fn with_missing(mut self, field: &str) -> Self {
        self.fields.insert(field.to_string(), None);
        self
    }

    pub fn with_value(mut self, field: &str, value: Option<f64>) -> Self {
        self.fields.insert(field.to_string(), value);
        self
    }

    /// Value of `field`; `None` when absent or null.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied().flatten()
    }

    /// Whether the record carries the attribute at all, even as null.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn set(&mut self, field: &str, value: Option<f64>) {
        self.fields.insert(field.to_string(), value);
    }
}
