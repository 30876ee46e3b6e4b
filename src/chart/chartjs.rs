//! Chart.js (v2 option schema) adapter: turns a [`ChartSpec`] and a dataset into a
//! ready-to-serialize chart configuration.

use crate::align::aligner::{AlignOptions, Aligner, AlignedFrame};
use crate::align::axis::Axis;
use crate::chart::error::ChartError;
use crate::chart::spec::{AxisPosition, ChartSpec, PointStyle, SeriesKind, SeriesSpec};
use crate::running_total::annotate_running_total;
use crate::types::dataset::Dataset;
use crate::types::label::Label;
use crate::types::period::BucketPeriod;
use log::debug;
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartJsConfig {
    #[serde(rename = "type")]
    pub chart_type: SeriesKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartJsConfig {
    pub fn to_json(&self) -> Result<String, ChartError> {
        serde_json::to_string(self).map_err(ChartError::Serialize)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, ChartError> {
        serde_json::to_value(self).map_err(ChartError::Serialize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<Label>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub label: String,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: String,
    pub background_color: String,
    pub border_color: String,
    pub data: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_gaps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_style: Option<PointStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_hit_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_hover_radius: Option<u32>,
}

impl ChartDataset {
    fn from_series(series: &SeriesSpec, data: Vec<Option<f64>>) -> Self {
        let mut dataset = ChartDataset {
            kind: series.kind,
            label: series.label.clone(),
            y_axis_id: series.axis.clone(),
            background_color: series.color.clone(),
            border_color: series.color.clone(),
            data,
            fill: None,
            span_gaps: None,
            line_tension: None,
            border_width: None,
            point_style: None,
            point_radius: None,
            point_hit_radius: None,
            point_hover_radius: None,
        };
        if series.kind == SeriesKind::Line {
            dataset.fill = Some(false);
            dataset.span_gaps = Some(false);
            dataset.line_tension = Some(0.0);
            dataset.border_width = Some(2);
            dataset.point_style = series.point_style;
            if series.hide_points {
                dataset.point_radius = Some(0);
                dataset.point_hit_radius = Some(4);
                dataset.point_hover_radius = Some(4);
            }
        }
        dataset
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub title: Title,
    pub legend: Legend,
    pub tooltips: Tooltips,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub display: bool,
    pub font_size: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: &'static str,
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltips {
    pub mode: &'static str,
    pub intersect: bool,
    pub position: &'static str,
    pub body_spacing: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    pub x_axes: Vec<XAxis>,
    pub y_axes: Vec<YAxis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxis {
    #[serde(rename = "type")]
    pub scale_type: &'static str,
    pub grid_lines: GridLines,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeOptions>,
    pub scale_label: ScaleLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLines {
    pub offset_grid_lines: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip_format: Option<&'static str>,
    pub display_formats: DisplayFormats,
}

impl TimeOptions {
    /// Time-scale unit, step and tooltip format used for a bucket period.
    pub fn for_period(period: BucketPeriod) -> Self {
        let (unit, step_size, tooltip_format) = match period {
            BucketPeriod::Raw => (None, None, None),
            BucketPeriod::Hour => (Some("hour"), Some(3), Some("D MMMM YYYY HH:mm")),
            BucketPeriod::Day => (Some("day"), Some(2), Some("D MMMM YYYY")),
            BucketPeriod::Month => (Some("month"), Some(1), Some("MMMM YYYY")),
            BucketPeriod::Year => (Some("year"), Some(1), Some("YYYY")),
        };
        Self {
            unit,
            step_size,
            tooltip_format,
            display_formats: DisplayFormats::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFormats {
    pub hour: &'static str,
    pub day: &'static str,
    pub month: &'static str,
}

impl Default for DisplayFormats {
    fn default() -> Self {
        Self {
            hour: "HH:mm",
            day: "D",
            month: "MMM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLabel {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    #[serde(rename = "type")]
    pub scale_type: &'static str,
    pub position: AxisPosition,
    pub id: String,
    pub scale_label: ScaleLabel,
}

fn x_axis(axis: Axis) -> XAxis {
    let (scale_type, time) = match axis {
        Axis::Calendar(period) => ("time", Some(TimeOptions::for_period(period))),
        Axis::Index(_) => ("category", None),
    };
    XAxis {
        scale_type,
        grid_lines: GridLines {
            offset_grid_lines: false,
        },
        time,
        scale_label: ScaleLabel {
            display: true,
            label_string: None,
            font_style: Some("bold"),
        },
    }
}

fn validate(spec: &ChartSpec) -> Result<(), ChartError> {
    if spec.series.is_empty() {
        return Err(ChartError::NoSeries);
    }
    match spec.series.iter().find(|s| spec.axis(&s.axis).is_none()) {
        Some(series) => Err(ChartError::UnknownAxis {
            series: series.label.clone(),
            axis: series.axis.clone(),
        }),
        None => Ok(()),
    }
}

/// Builds the chart configuration for `dataset`.
///
/// When the chart declares a running total it is computed over the dense records
/// first, so the derived field can be aligned like any other. All series share
/// one label axis: `axis` when given, otherwise the dataset's own period.
pub fn build_chart(
    spec: &ChartSpec,
    dataset: &Dataset,
    axis: Option<Axis>,
    options: &AlignOptions,
) -> Result<ChartJsConfig, ChartError> {
    validate(spec)?;

    let records = match &spec.running_total {
        Some(total) => Cow::Owned(annotate_running_total(
            &dataset.data,
            &total.source,
            &total.output,
        )),
        None => Cow::Borrowed(dataset.data.as_slice()),
    };

    let aligner = Aligner::for_dataset(dataset, axis, options);
    let AlignedFrame { labels, columns } = aligner.align_fields(&records, &spec.fields())?;
    debug!(
        "Chart '{}': {} labels, {} series",
        spec.title,
        labels.len(),
        spec.series.len()
    );

    let datasets = spec
        .series
        .iter()
        .map(|series| {
            let data = columns
                .iter()
                .find(|(name, _)| *name == series.field)
                .map(|(_, values)| values.clone())
                .unwrap_or_else(|| vec![None; labels.len()]);
            ChartDataset::from_series(series, data)
        })
        .collect();

    let y_axes = spec
        .axes
        .iter()
        .map(|axis| YAxis {
            scale_type: "linear",
            position: axis.position,
            id: axis.id.clone(),
            scale_label: ScaleLabel {
                display: true,
                label_string: Some(format!("{} ({})", axis.label, axis.unit)),
                font_style: Some("bold"),
            },
        })
        .collect();

    Ok(ChartJsConfig {
        chart_type: SeriesKind::Bar,
        data: ChartData { labels, datasets },
        options: ChartOptions {
            title: Title {
                display: true,
                font_size: 16,
                text: spec.title.clone(),
            },
            legend: Legend {
                position: "bottom",
                reverse: spec.reverse_legend,
            },
            tooltips: Tooltips {
                mode: "index",
                intersect: false,
                position: "nearest",
                body_spacing: 5,
            },
            scales: Scales {
                x_axes: vec![x_axis(aligner.axis())],
                y_axes,
            },
        },
    })
}

/// Tooltip line for one hovered value: `"{label} : {value} {unit}"` with one decimal,
/// or `None` over a gap or an unknown series.
pub fn tooltip_label(spec: &ChartSpec, series_index: usize, value: Option<f64>) -> Option<String> {
    let series = spec.series.get(series_index)?;
    let value = value?;
    let unit = spec.axis(&series.axis).map(|a| a.unit.as_str()).unwrap_or("");
    Some(format!("{} : {:.1} {}", series.label, value, unit))
}
