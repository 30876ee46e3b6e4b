//! Row-oriented table writer. Unlike charts, tables walk the records as they are:
//! one row per record, no alignment and no gap rows.

use crate::table::error::TableError;
use crate::types::dataset::Dataset;
use crate::types::period::BucketPeriod;
use crate::utils::{capitalize, escape_html};
use chrono::{FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

fn default_precision() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub field: String,
    pub unit: String,
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl TableColumn {
    pub fn new(field: &str, unit: &str) -> Self {
        Self {
            field: field.to_string(),
            unit: unit.to_string(),
            precision: default_precision(),
        }
    }

    /// `"{value} {unit}"` with the column precision, or an empty cell for a missing value.
    pub fn format(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.*} {}", self.precision, v, self.unit),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSpec {
    pub columns: Vec<TableColumn>,
}

/// The two tables of the station viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Raw archive rows: temperature only.
    Archive,
    /// Daily or monthly aggregates: extremes, rain and gusts.
    Aggregate,
}

impl TableKind {
    pub fn spec(&self) -> TableSpec {
        let columns = match self {
            TableKind::Archive => vec![TableColumn::new("temp", "°C")],
            TableKind::Aggregate => vec![
                TableColumn::new("lo_temp", "°C"),
                TableColumn::new("hi_temp", "°C"),
                TableColumn::new("rain_fall", "mm"),
                TableColumn::new("hi_wind_speed", "m/s"),
            ],
        };
        TableSpec { columns }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub heading: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in std::iter::once(&row.heading).chain(&row.cells) {
                // Writing to a String cannot fail
                let _ = write!(html, "<td>{}</td>", escape_html(cell));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

fn heading(period: BucketPeriod, instant: NaiveDateTime) -> String {
    let format = match period {
        BucketPeriod::Day => "%A %-d",
        BucketPeriod::Month => "%B",
        BucketPeriod::Year => "%Y",
        BucketPeriod::Raw | BucketPeriod::Hour => "%Y-%m-%d %H:%M",
    };
    capitalize(&instant.format(format).to_string())
}

/// Renders one row per record of `dataset`.
///
/// `offset` turns epoch-second times into wall clock. An empty dataset renders an
/// empty table.
pub fn render_table(
    dataset: &Dataset,
    spec: &TableSpec,
    offset: FixedOffset,
) -> Result<Table, TableError> {
    if spec.columns.is_empty() {
        return Err(TableError::NoColumns);
    }
    let period = dataset.period();
    let rows = dataset
        .data
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let instant = record
                .time
                .to_instant(offset)
                .ok_or(TableError::InvalidTime { position })?;
            Ok(TableRow {
                heading: heading(period, instant),
                cells: spec
                    .columns
                    .iter()
                    .map(|column| column.format(record.get(&column.field)))
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, TableError>>()?;
    Ok(Table { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::Record;
    use chrono::{NaiveDate, Offset, Utc};

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    #[test]
    fn test_aggregate_table_rows() -> Result<(), TableError> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let dataset = Dataset::new(
            BucketPeriod::Day,
            vec![
                Record::new(day(4))
                    .with("lo_temp", 2.04)
                    .with("hi_temp", 11.96)
                    .with_missing("rain_fall")
                    .with("hi_wind_speed", 7.5),
                // A gap day has no row
                Record::new(day(6)).with("lo_temp", -0.5),
            ],
        );
        let table = render_table(&dataset, &TableKind::Aggregate.spec(), utc())?;

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].heading, "Monday 4");
        assert_eq!(table.rows[0].cells, vec!["2.0 °C", "12.0 °C", "", "7.5 m/s"]);
        assert_eq!(table.rows[1].heading, "Wednesday 6");
        assert_eq!(table.rows[1].cells, vec!["-0.5 °C", "", "", ""]);
        Ok(())
    }

    #[test]
    fn test_month_headings_and_precision() -> Result<(), TableError> {
        let dataset = Dataset::new(
            BucketPeriod::Month,
            vec![Record::new(NaiveDate::from_ymd_opt(2023, 8, 1).unwrap()).with("rain", 61.237)],
        );
        let spec = TableSpec {
            columns: vec![TableColumn {
                field: "rain".to_string(),
                unit: "mm".to_string(),
                precision: 2,
            }],
        };
        let table = render_table(&dataset, &spec, utc())?;
        assert_eq!(table.rows[0].heading, "August");
        assert_eq!(table.rows[0].cells, vec!["61.24 mm"]);
        Ok(())
    }

    #[test]
    fn test_raw_epoch_rows_use_offset() -> Result<(), TableError> {
        // 2024-01-01T23:30:00Z
        let dataset = Dataset {
            data: vec![Record::new(1_704_151_800i64).with("temp", 3.0)],
            ..Default::default()
        };
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        let table = render_table(&dataset, &TableKind::Archive.spec(), plus_one)?;
        assert_eq!(table.rows[0].heading, "2024-01-02 00:30");
        assert_eq!(table.rows[0].cells, vec!["3.0 °C"]);
        Ok(())
    }

    #[test]
    fn test_html_is_escaped() -> Result<(), TableError> {
        let dataset = Dataset::new(
            BucketPeriod::Year,
            vec![Record::new(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()).with("x", 1.0)],
        );
        let spec = TableSpec {
            columns: vec![TableColumn::new("x", "<b>")],
        };
        let html = render_table(&dataset, &spec, utc())?.to_html();
        assert_eq!(html, "<table><tr><td>2022</td><td>1.0 &lt;b&gt;</td></tr></table>");
        Ok(())
    }

    #[test]
    fn test_no_columns_is_an_error() {
        let dataset = Dataset::new(BucketPeriod::Day, vec![]);
        assert_eq!(
            render_table(&dataset, &TableSpec::default(), utc()),
            Err(TableError::NoColumns)
        );
    }

    #[test]
    fn test_empty_dataset_gives_empty_table() -> Result<(), TableError> {
        let dataset = Dataset::new(BucketPeriod::Day, vec![]);
        let table = render_table(&dataset, &TableKind::Aggregate.spec(), utc())?;
        assert!(table.is_empty());
        assert_eq!(table.to_html(), "<table></table>");
        Ok(())
    }
}
