use crate::align::error::AlignError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Align(#[from] AlignError),

    #[error("Series '{series}' refers to axis '{axis}', which the chart does not declare")]
    UnknownAxis { series: String, axis: String },

    #[error("Chart has no series")]
    NoSeries,

    #[error("Built-in chart preset '{0}' is missing")]
    MissingPreset(String),

    #[error("Failed to parse chart presets")]
    PresetParse(#[source] serde_json::Error),

    #[error("Failed to serialize chart configuration")]
    Serialize(#[source] serde_json::Error),
}
