//! The built-in chart table: the station viewer's temperature, wind, pressure and rain charts.

use crate::chart::error::ChartError;
use crate::chart::spec::ChartSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const PRESETS_JSON: &str = include_str!("presets.json");

/// Names of the built-in charts.
///
/// `Archive*` charts are meant for raw archive rows, `Aggr*` charts for daily or
/// monthly aggregates. [`ChartKind::AggrRain`] also declares an annual running
/// total of `rain` into `rain_sum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    ArchiveTemp,
    ArchiveWind,
    AggrWind,
    AggrBarometer,
    AggrTemp,
    AggrTempRain,
    AggrRain,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::ArchiveTemp,
        ChartKind::ArchiveWind,
        ChartKind::AggrWind,
        ChartKind::AggrBarometer,
        ChartKind::AggrTemp,
        ChartKind::AggrTempRain,
        ChartKind::AggrRain,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ChartKind::ArchiveTemp => "archive_temp",
            ChartKind::ArchiveWind => "archive_wind",
            ChartKind::AggrWind => "aggr_wind",
            ChartKind::AggrBarometer => "aggr_barometer",
            ChartKind::AggrTemp => "aggr_temp",
            ChartKind::AggrTempRain => "aggr_temp_rain",
            ChartKind::AggrRain => "aggr_rain",
        }
    }

    /// Loads this chart's spec from the built-in table.
    pub fn spec(&self) -> Result<ChartSpec, ChartError> {
        let mut table = presets()?;
        table
            .remove(self.key())
            .ok_or_else(|| ChartError::MissingPreset(self.key().to_string()))
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The whole built-in table, keyed by chart name.
pub fn presets() -> Result<HashMap<String, ChartSpec>, ChartError> {
    serde_json::from_str(PRESETS_JSON).map_err(ChartError::PresetParse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::spec::SeriesKind;

    #[test]
    fn test_every_kind_has_a_valid_preset() -> Result<(), ChartError> {
        for kind in ChartKind::ALL {
            let spec = kind.spec()?;
            assert!(!spec.series.is_empty(), "{kind} has no series");
            for series in &spec.series {
                assert!(
                    spec.axis(&series.axis).is_some(),
                    "{kind}: series {} uses undeclared axis {}",
                    series.label,
                    series.axis
                );
            }
        }
        assert_eq!(presets()?.len(), ChartKind::ALL.len());
        Ok(())
    }

    #[test]
    fn test_rain_preset_declares_running_total() -> Result<(), ChartError> {
        let spec = ChartKind::AggrRain.spec()?;
        let total = spec.running_total.as_ref().expect("running total");
        assert_eq!(total.source, "rain");
        assert_eq!(total.output, "rain_sum");
        assert!(spec.reverse_legend);
        assert_eq!(spec.fields(), vec!["rain_sum", "rain_24h", "rain"]);
        Ok(())
    }

    #[test]
    fn test_temp_rain_mixes_lines_and_bars() -> Result<(), ChartError> {
        let spec = ChartKind::AggrTempRain.spec()?;
        let kinds: Vec<_> = spec.series.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SeriesKind::Line, SeriesKind::Line, SeriesKind::Bar]);
        assert_eq!(spec.axes.len(), 2);
        Ok(())
    }
}
