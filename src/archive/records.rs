use crate::archive::error::ArchiveError;
use crate::types::dataset::Dataset;
use crate::types::period::BucketPeriod;
use crate::types::record::{parse_instant, Record, RecordTime};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use polars::prelude::*;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ArchiveError> {
    df.column(name)
        .map_err(|e| ArchiveError::ColumnNotFound(name.to_string(), e))
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn record_times(column: &Column) -> Result<Vec<RecordTime>, ArchiveError> {
    let instant = |row: usize, value: Option<NaiveDateTime>| {
        value
            .map(RecordTime::Instant)
            .ok_or(ArchiveError::InvalidTime { row })
    };

    match column.dtype() {
        DataType::Int64 | DataType::Int32 | DataType::UInt32 | DataType::UInt64 => {
            let secs = column.cast(&DataType::Int64)?;
            secs.i64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| v.map(RecordTime::Number).ok_or(ArchiveError::InvalidTime { row }))
                .collect()
        }
        DataType::Date => {
            let days = column.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    let date = v.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_CE_DAYS));
                    instant(row, date.and_then(|d| d.and_hms_opt(0, 0, 0)))
                })
                .collect()
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let ticks = column.cast(&DataType::Int64)?;
            ticks
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| {
                    let dt = v.and_then(|t| match unit {
                        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(t),
                        TimeUnit::Microseconds => DateTime::from_timestamp_micros(t),
                        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(t)),
                    });
                    instant(row, dt.map(|dt| dt.naive_utc()))
                })
                .collect()
        }
        DataType::String => column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| instant(row, v.and_then(parse_instant)))
            .collect(),
        other => Err(ArchiveError::UnsupportedTimeColumn {
            column: column.name().to_string(),
            dtype: other.to_string(),
        }),
    }
}

/// Converts a collected frame into records.
///
/// `time_column` may hold epoch seconds (integers), dates, datetimes or date strings.
/// Every other numeric column becomes a record field; non-numeric columns are skipped.
pub fn records_from_frame(df: &DataFrame, time_column: &str) -> Result<Vec<Record>, ArchiveError> {
    let times = record_times(get_column(df, time_column)?)?;

    let mut fields: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == time_column {
            continue;
        }
        if !is_numeric(column.dtype()) {
            debug!("Skipping column '{}' of type {}", name, column.dtype());
            continue;
        }
        let values = column.cast(&DataType::Float64)?;
        fields.push((name.to_string(), values.f64()?.into_iter().collect()));
    }

    Ok(times
        .into_iter()
        .enumerate()
        .map(|(row, time)| {
            let mut record = Record::new(time);
            for (name, values) in &fields {
                record.set(name, values[row]);
            }
            record
        })
        .collect())
}

impl Dataset {
    /// Wraps a collected frame as a dataset of `period` buckets.
    pub fn from_frame(
        df: &DataFrame,
        time_column: &str,
        period: BucketPeriod,
    ) -> Result<Self, ArchiveError> {
        Ok(Dataset::new(period, records_from_frame(df, time_column)?))
    }
}
