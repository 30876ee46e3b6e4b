//! Declarative description of a chart: which fields become which series, on which axis.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Bar,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointStyle {
    Circle,
    Rect,
    Triangle,
    Cross,
    Star,
}

/// One plotted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub kind: SeriesKind,
    pub label: String,
    /// Record field the values come from.
    pub field: String,
    /// Id of the [`AxisSpec`] the series is drawn against.
    pub axis: String,
    pub color: String,
    #[serde(default)]
    pub point_style: Option<PointStyle>,
    #[serde(default)]
    pub hide_points: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub id: String,
    pub position: AxisPosition,
    pub label: String,
    pub unit: String,
}

/// A derived cumulative field computed before alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningTotalSpec {
    pub source: String,
    pub output: String,
}

/// Everything needed to turn aligned data into a chart configuration.
///
/// Chart specs are plain data; the built-in ones live in a JSON table (see
/// [`crate::ChartKind`]) and custom ones can be deserialized the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(default)]
    pub reverse_legend: bool,
    pub series: Vec<SeriesSpec>,
    pub axes: Vec<AxisSpec>,
    #[serde(default)]
    pub running_total: Option<RunningTotalSpec>,
}

impl ChartSpec {
    pub fn axis(&self, id: &str) -> Option<&AxisSpec> {
        self.axes.iter().find(|axis| axis.id == id)
    }

    /// Record fields the chart reads, in series order, without duplicates.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::with_capacity(self.series.len());
        for series in &self.series {
            if !fields.contains(&series.field.as_str()) {
                fields.push(series.field.as_str());
            }
        }
        fields
    }
}
