//! Bucket scales: how a record time maps to a bucket key, how keys step, and where an axis starts and ends.

use crate::align::error::AlignError;
use crate::types::index_range::IndexRange;
use crate::types::label::Label;
use crate::types::period::BucketPeriod;
use crate::types::record::RecordTime;
use chrono::{Duration, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The axis records are aligned onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Calendar instants stepped by a [`BucketPeriod`]; bounds come from the records.
    Calendar(BucketPeriod),
    /// Integer slots over a fixed [`IndexRange`]; bounds come from the range.
    Index(IndexRange),
}

impl Default for Axis {
    fn default() -> Self {
        Axis::Calendar(BucketPeriod::Raw)
    }
}

impl From<BucketPeriod> for Axis {
    fn from(value: BucketPeriod) -> Self {
        Axis::Calendar(value)
    }
}

impl From<IndexRange> for Axis {
    fn from(value: IndexRange) -> Self {
        Axis::Index(value)
    }
}

pub(crate) trait BucketScale {
    type Key: Copy + Ord + Debug;

    fn key_of(&self, position: usize, time: &RecordTime) -> Result<Self::Key, AlignError>;

    /// The next bucket, or `None` when the scale does not step.
    fn step(&self, key: Self::Key) -> Option<Self::Key>;

    /// Inclusive first and last bucket, given the buckets of the first and last record.
    fn bounds(&self, first: Self::Key, last: Self::Key)
        -> Result<(Self::Key, Self::Key), AlignError>;

    fn label(&self, key: Self::Key) -> Label;
}

pub(crate) struct CalendarScale {
    pub period: BucketPeriod,
    pub offset: FixedOffset,
    pub from: Option<NaiveDateTime>,
    /// Exclusive upper window bound.
    pub to: Option<NaiveDateTime>,
}

impl CalendarScale {
    pub fn new(
        period: BucketPeriod,
        offset: FixedOffset,
        from: Option<&RecordTime>,
        to: Option<&RecordTime>,
    ) -> Result<Self, AlignError> {
        let resolve = |bound: Option<&RecordTime>| -> Result<Option<NaiveDateTime>, AlignError> {
            bound
                .map(|t| {
                    t.to_instant(offset)
                        .ok_or_else(|| AlignError::InvalidWindow(t.to_string()))
                })
                .transpose()
        };
        Ok(Self {
            period,
            offset,
            from: resolve(from)?,
            to: resolve(to)?,
        })
    }
}

impl BucketScale for CalendarScale {
    type Key = NaiveDateTime;

    fn key_of(&self, position: usize, time: &RecordTime) -> Result<NaiveDateTime, AlignError> {
        time.to_instant(self.offset)
            .map(|instant| self.period.truncate(instant))
            .ok_or(AlignError::InvalidTime { position })
    }

    fn step(&self, key: NaiveDateTime) -> Option<NaiveDateTime> {
        self.period.advance(key)
    }

    fn bounds(
        &self,
        first: NaiveDateTime,
        last: NaiveDateTime,
    ) -> Result<(NaiveDateTime, NaiveDateTime), AlignError> {
        if !self.period.is_stepped() {
            return Ok((first, last));
        }
        let start = match self.from {
            Some(from) => first.min(self.period.truncate(from)),
            None => first,
        };
        let end = match self.to.and_then(|to| to.checked_sub_signed(Duration::seconds(1))) {
            Some(before_to) => last.max(self.period.truncate(before_to)),
            None => last,
        };
        Ok((start, end))
    }

    fn label(&self, key: NaiveDateTime) -> Label {
        Label::Instant(key)
    }
}

pub(crate) struct IndexScale {
    pub range: IndexRange,
    first: u32,
    last: u32,
}

impl IndexScale {
    pub fn new(range: IndexRange) -> Result<Self, AlignError> {
        Ok(Self {
            range,
            first: range.first(),
            last: range.last()?,
        })
    }
}

impl BucketScale for IndexScale {
    type Key = u32;

    fn key_of(&self, position: usize, time: &RecordTime) -> Result<u32, AlignError> {
        let index = match time {
            RecordTime::Number(n) => u32::try_from(*n).ok(),
            RecordTime::Instant(instant) => self.range.index_of(*instant),
        }
        .ok_or(AlignError::InvalidTime { position })?;

        if index < self.first || index > self.last {
            return Err(AlignError::IndexOutOfRange {
                position,
                index,
                first: self.first,
                last: self.last,
            });
        }
        Ok(index)
    }

    fn step(&self, key: u32) -> Option<u32> {
        key.checked_add(1)
    }

    fn bounds(&self, _first: u32, _last: u32) -> Result<(u32, u32), AlignError> {
        Ok((self.first, self.last))
    }

    fn label(&self, key: u32) -> Label {
        Label::Index(key)
    }
}
