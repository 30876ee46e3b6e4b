//! The time-bucket aligner: lays a sparse, sorted record sequence onto a dense axis.
//!
//! The walk keeps a cursor on the first bucket of the axis. For every record, buckets
//! the cursor passes before reaching the record's bucket are emitted with a null
//! value; the record's own bucket is emitted with its value. After the last record,
//! the cursor keeps going until the end of the axis.

use crate::align::axis::{Axis, BucketScale, CalendarScale, IndexScale};
use crate::align::error::AlignError;
use crate::types::dataset::Dataset;
use crate::types::label::Label;
use crate::types::period::BucketPeriod;
use crate::types::record::{Record, RecordTime};
use bon::bon;
use chrono::{FixedOffset, Offset, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do when two records land in the same bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The later record silently replaces the earlier one's values.
    #[default]
    LastWins,
    /// Fail with [`AlignError::DuplicateBucket`].
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-wins" | "last_wins" | "lastwins" => Ok(DuplicatePolicy::LastWins),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!("unknown duplicate policy '{other}'")),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::LastWins => write!(f, "last-wins"),
            DuplicatePolicy::Reject => write!(f, "reject"),
        }
    }
}

/// A single field aligned onto a dense axis. `values.len() == labels.len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub labels: Vec<Label>,
    pub values: Vec<Option<f64>>,
}

/// Several fields aligned onto one shared axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedFrame {
    pub labels: Vec<Label>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

impl AlignedFrame {
    pub fn column(&self, field: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Splits one field out as an [`AlignedSeries`].
    pub fn series(&self, field: &str) -> Option<AlignedSeries> {
        self.column(field).map(|values| AlignedSeries {
            labels: self.labels.clone(),
            values: values.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Aligns records onto an [`Axis`].
///
/// # Examples
///
/// ```
/// use wsview::{Aligner, Axis, BucketPeriod, Record};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
/// let records = vec![
///     Record::new(day(1)).with("rain", 2.0),
///     Record::new(day(3)).with("rain", 5.0),
/// ];
///
/// let aligner = Aligner::builder().axis(Axis::Calendar(BucketPeriod::Day)).build();
/// let series = aligner.align(&records, "rain").unwrap();
/// assert_eq!(series.labels.len(), 3);
/// assert_eq!(series.values, vec![Some(2.0), None, Some(5.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct Aligner {
    axis: Axis,
    duplicates: DuplicatePolicy,
    offset: FixedOffset,
    from: Option<RecordTime>,
    to: Option<RecordTime>,
}

#[bon]
impl Aligner {
    /// Creates an aligner.
    ///
    /// * `axis` - Calendar period or index range to align onto.
    /// * `duplicates` - Duplicate-bucket policy, last-wins by default.
    /// * `offset` - Offset used to read epoch-second times as wall clock, UTC by default.
    /// * `from`, `to` - Optional window widening a calendar axis; `to` is exclusive.
    #[builder]
    pub fn new(
        axis: Axis,
        #[builder(default)] duplicates: DuplicatePolicy,
        offset: Option<FixedOffset>,
        from: Option<RecordTime>,
        to: Option<RecordTime>,
    ) -> Self {
        Self {
            axis,
            duplicates,
            offset: offset.unwrap_or_else(|| Utc.fix()),
            from,
            to,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Aligns one field.
    pub fn align(&self, records: &[Record], field: &str) -> Result<AlignedSeries, AlignError> {
        let frame = self.align_fields(records, &[field])?;
        let AlignedFrame { labels, columns } = frame;
        let values = columns
            .into_iter()
            .next()
            .map(|(_, values)| values)
            .unwrap_or_default();
        Ok(AlignedSeries { labels, values })
    }

    /// Aligns several fields on one shared axis.
    pub fn align_fields(
        &self,
        records: &[Record],
        fields: &[&str],
    ) -> Result<AlignedFrame, AlignError> {
        match self.axis {
            Axis::Calendar(period) => {
                let scale =
                    CalendarScale::new(period, self.offset, self.from.as_ref(), self.to.as_ref())?;
                walk(&scale, records, fields, self.duplicates)
            }
            Axis::Index(range) => {
                let scale = IndexScale::new(range)?;
                walk(&scale, records, fields, self.duplicates)
            }
        }
    }
}

/// Per-view settings shared by every aligner a view creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignOptions {
    pub offset: FixedOffset,
    pub duplicates: DuplicatePolicy,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl Aligner {
    /// An aligner for a fetched dataset: the dataset's own period unless `axis`
    /// overrides it, widened by the dataset window.
    pub fn for_dataset(dataset: &Dataset, axis: Option<Axis>, options: &AlignOptions) -> Self {
        Aligner::builder()
            .axis(axis.unwrap_or(Axis::Calendar(dataset.period())))
            .duplicates(options.duplicates)
            .offset(options.offset)
            .maybe_from(dataset.from)
            .maybe_to(dataset.to)
            .build()
    }
}

/// Aligns `field` of `records` on a calendar axis with default options
/// (UTC, last-wins, bounds taken from the first and last record).
pub fn align(
    records: &[Record],
    field: &str,
    period: BucketPeriod,
) -> Result<AlignedSeries, AlignError> {
    Aligner::builder()
        .axis(Axis::Calendar(period))
        .build()
        .align(records, field)
}

fn walk<S: BucketScale>(
    scale: &S,
    records: &[Record],
    fields: &[&str],
    duplicates: DuplicatePolicy,
) -> Result<AlignedFrame, AlignError> {
    if records.is_empty() {
        return Err(AlignError::EmptyInput);
    }
    if let Some(missing) = fields
        .iter()
        .find(|field| !records.iter().any(|r| r.has_field(field)))
    {
        return Err(AlignError::UnknownField(missing.to_string()));
    }

    let keys = records
        .iter()
        .enumerate()
        .map(|(position, record)| scale.key_of(position, &record.time))
        .collect::<Result<Vec<_>, _>>()?;
    let (Some(&first), Some(&last)) = (keys.first(), keys.last()) else {
        return Err(AlignError::EmptyInput);
    };
    let (start, end) = scale.bounds(first, last)?;

    let mut labels: Vec<S::Key> = Vec::with_capacity(records.len());
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(records.len()); fields.len()];
    let mut cursor = Some(start);
    let mut previous: Option<S::Key> = None;
    let mut gaps = 0usize;

    for (position, (record, &key)) in records.iter().zip(&keys).enumerate() {
        match previous {
            Some(prev) if key < prev => return Err(AlignError::Unsorted { position }),
            Some(prev) if key == prev => {
                let label = scale.label(key).to_string();
                if duplicates == DuplicatePolicy::Reject {
                    return Err(AlignError::DuplicateBucket { position, label });
                }
                warn!(
                    "Record {} lands in bucket {} already filled, keeping the later record",
                    position, label
                );
                for (column, field) in columns.iter_mut().zip(fields) {
                    if let Some(slot) = column.last_mut() {
                        *slot = record.get(field);
                    }
                }
                continue;
            }
            _ => {}
        }

        while let Some(at) = cursor {
            if at >= key {
                break;
            }
            labels.push(at);
            columns.iter_mut().for_each(|column| column.push(None));
            gaps += 1;
            cursor = scale.step(at);
        }

        labels.push(key);
        for (column, field) in columns.iter_mut().zip(fields) {
            column.push(record.get(field));
        }
        cursor = scale.step(key);
        previous = Some(key);
    }

    while let Some(at) = cursor {
        if at > end {
            break;
        }
        labels.push(at);
        columns.iter_mut().for_each(|column| column.push(None));
        gaps += 1;
        cursor = scale.step(at);
    }

    debug!(
        "Aligned {} records onto {} buckets ({} gaps)",
        records.len(),
        labels.len(),
        gaps
    );

    Ok(AlignedFrame {
        labels: labels.into_iter().map(|key| scale.label(key)).collect(),
        columns: fields
            .iter()
            .map(|field| field.to_string())
            .zip(columns)
            .collect(),
    })
}
