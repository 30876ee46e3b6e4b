use crate::types::period::BucketPeriod;
use crate::types::record::{Record, RecordTime};
use serde::{Deserialize, Serialize};

/// The envelope a station viewer endpoint answers with.
///
/// `from` and `to` describe the requested window (`from < time <= to`, `to` being
/// exclusive for bucketing purposes) and widen the label axis beyond the records
/// when present. `unit` is the bucket period of the rows; a missing or `null`
/// unit means raw observations.
///
/// # Examples
///
/// ```
/// use wsview::{BucketPeriod, Dataset};
///
/// let json = r#"{
///     "from": "2024-03-01", "to": "2024-04-01", "unit": "day",
///     "data": [{"time": "2024-03-02", "rain_fall": 1.2}]
/// }"#;
/// let dataset = Dataset::from_json_str(json).unwrap();
/// assert_eq!(dataset.period(), BucketPeriod::Day);
/// assert_eq!(dataset.data.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub from: Option<RecordTime>,
    #[serde(default)]
    pub to: Option<RecordTime>,
    #[serde(default)]
    pub unit: Option<BucketPeriod>,
    #[serde(default)]
    pub data: Vec<Record>,
}

impl Dataset {
    pub fn new(unit: BucketPeriod, data: Vec<Record>) -> Self {
        Self {
            from: None,
            to: None,
            unit: Some(unit),
            data,
        }
    }

    pub fn with_window(mut self, from: impl Into<RecordTime>, to: impl Into<RecordTime>) -> Self {
        self.from = Some(from.into());
        self.to = Some(to.into());
        self
    }

    pub fn period(&self) -> BucketPeriod {
        self.unit.unwrap_or_default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
