use crate::align::axis::Axis;
use crate::archive::error::ArchiveError;
use crate::archive::frame_ext::{ArchiveFrameExt, COL_TIME};
use crate::archive::loader::ArchiveLoader;
use crate::chart::chartjs::{build_chart, ChartJsConfig};
use crate::chart::spec::ChartSpec;
use crate::config::ViewConfig;
use crate::error::WsViewError;
use crate::fetch::fetcher::DatasetFetcher;
use crate::table::writer::{render_table, Table, TableSpec};
use crate::types::dataset::Dataset;
use crate::types::period::BucketPeriod;
use crate::types::record::RecordTime;
use bon::bon;
use log::info;

/// The main entry point: renders charts and tables from datasets, from a station
/// viewer endpoint or straight from an archive file.
///
/// # Examples
///
/// ```
/// use wsview::{BucketPeriod, ChartKind, Dataset, Record, WsView, WsViewError};
/// use chrono::NaiveDate;
///
/// # fn main() -> Result<(), WsViewError> {
/// let view = WsView::default();
/// let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
/// let dataset = Dataset::new(
///     BucketPeriod::Day,
///     vec![
///         Record::new(day(1)).with("lo_temp", 3.0).with("hi_temp", 12.5),
///         Record::new(day(4)).with("lo_temp", 5.5).with("hi_temp", 15.0),
///     ],
/// );
///
/// let spec = ChartKind::AggrTemp.spec()?;
/// let chart = view.chart(&spec).dataset(&dataset).call()?;
/// assert_eq!(chart.data.labels.len(), 4);
/// assert_eq!(chart.data.datasets[0].data[1], None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WsView {
    config: ViewConfig,
    fetcher: DatasetFetcher,
}

#[bon]
impl WsView {
    pub fn new(config: ViewConfig) -> Self {
        let fetcher = DatasetFetcher::new(config.base_url.clone());
        Self { config, fetcher }
    }

    /// Builds a view from `WSVIEW_*` environment variables, see [`ViewConfig::from_env`].
    pub fn from_env() -> Result<Self, WsViewError> {
        Ok(Self::new(ViewConfig::from_env()?))
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Builds a chart configuration for an already available dataset.
    ///
    /// * `.dataset(&Dataset)`: **Required.**
    /// * `.axis(Axis)`: Overrides the dataset period, e.g. with an index range.
    #[builder(start_fn = chart)]
    #[doc(hidden)]
    pub fn build_chart(
        &self,
        #[builder(start_fn)] spec: &ChartSpec,
        dataset: &Dataset,
        axis: Option<Axis>,
    ) -> Result<ChartJsConfig, WsViewError> {
        Ok(build_chart(
            spec,
            dataset,
            axis,
            &self.config.align_options(),
        )?)
    }

    /// Renders one table row per record of `dataset`.
    #[builder(start_fn = table)]
    #[doc(hidden)]
    pub fn build_table(
        &self,
        #[builder(start_fn)] spec: &TableSpec,
        dataset: &Dataset,
    ) -> Result<Table, WsViewError> {
        Ok(render_table(dataset, spec, self.config.utc_offset)?)
    }

    /// Fetches a dataset and builds its chart.
    ///
    /// * `.url(&str)`: **Required.** An absolute URL, or a path resolved against the
    ///   configured base URL.
    /// * `.axis(Axis)`: Overrides the dataset period.
    #[builder(start_fn = fetch_chart)]
    #[doc(hidden)]
    pub async fn build_fetch_chart(
        &self,
        #[builder(start_fn)] spec: &ChartSpec,
        url: &str,
        axis: Option<Axis>,
    ) -> Result<ChartJsConfig, WsViewError> {
        let dataset = if url.contains("://") {
            self.fetcher.fetch(url).await?
        } else {
            self.fetcher.fetch_path(url).await?
        };
        self.chart(spec).dataset(&dataset).maybe_axis(axis).call()
    }

    /// Loads the configured archive file, aggregates it and returns the dataset.
    ///
    /// * `.aggregate(BucketPeriod)`: `none` (raw rows, default), `day` or `month`.
    /// * `.lower(i64)`, `.upper(i64)`: Epoch-second window, `lower < time <= upper`.
    #[builder(start_fn = archive_dataset)]
    #[doc(hidden)]
    pub async fn build_archive_dataset(
        &self,
        aggregate: Option<BucketPeriod>,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Result<Dataset, WsViewError> {
        let path = self
            .config
            .archive_path
            .as_ref()
            .ok_or(WsViewError::NoArchivePath)?;
        let aggregate = aggregate.unwrap_or_default();
        let offset = self.config.utc_offset;

        let mut frame = ArchiveLoader::new(path).load().await?;
        if lower.is_some() || upper.is_some() {
            frame = frame.window(lower.unwrap_or(i64::MIN), upper.unwrap_or(i64::MAX));
        }
        let frame = match aggregate {
            BucketPeriod::Raw => frame.sort([COL_TIME], Default::default()),
            BucketPeriod::Day => frame.daily_aggregate(offset),
            BucketPeriod::Month => frame.monthly_aggregate(offset),
            other => return Err(WsViewError::UnsupportedAggregate(other)),
        };
        let df = frame.collect().map_err(ArchiveError::from)?;
        info!("Archive query ({} buckets) returned {} rows", aggregate, df.height());

        let mut dataset = Dataset::from_frame(&df, COL_TIME, aggregate)?;
        dataset.from = lower.map(RecordTime::Number);
        dataset.to = upper.map(RecordTime::Number);
        Ok(dataset)
    }

    /// Same as [`WsView::archive_dataset`], then builds the chart.
    #[builder(start_fn = archive_chart)]
    #[doc(hidden)]
    pub async fn build_archive_chart(
        &self,
        #[builder(start_fn)] spec: &ChartSpec,
        aggregate: Option<BucketPeriod>,
        lower: Option<i64>,
        upper: Option<i64>,
        axis: Option<Axis>,
    ) -> Result<ChartJsConfig, WsViewError> {
        let dataset = self
            .archive_dataset()
            .maybe_aggregate(aggregate)
            .maybe_lower(lower)
            .maybe_upper(upper)
            .call()
            .await?;
        self.chart(spec).dataset(&dataset).maybe_axis(axis).call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::presets::ChartKind;
    use crate::table::writer::TableKind;
    use crate::types::label::Label;
    use crate::types::record::Record;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::Builder;

    // 2024-01-01T00:00:00Z
    const NEW_YEAR: i64 = 1_704_067_200;
    const HOUR: i64 = 3600;

    fn archive_csv() -> std::io::Result<tempfile::NamedTempFile> {
        let mut file = Builder::new().suffix(".csv").tempfile()?;
        writeln!(file, "time,lo_temp,hi_temp,rain_fall,avg_wind_speed,hi_wind_speed,barometer")?;
        // Two rows on Jan 1st, nothing on the 2nd, one row on the 3rd
        writeln!(file, "{},1.0,3.0,0.5,2.0,4.0,1012.0", NEW_YEAR + HOUR)?;
        writeln!(file, "{},0.0,5.0,1.5,3.0,6.0,1014.0", NEW_YEAR + 12 * HOUR)?;
        writeln!(file, "{},2.0,7.0,0.0,1.0,2.0,1010.0", NEW_YEAR + 50 * HOUR)?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_chart_and_table_share_config() -> Result<(), WsViewError> {
        let view = WsView::new(ViewConfig::default());
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let dataset = Dataset::new(
            BucketPeriod::Day,
            vec![
                Record::new(day(1)).with("lo_temp", 1.0).with("hi_temp", 4.0).with("rain_fall", 0.0),
                Record::new(day(3)).with("lo_temp", 2.0).with("hi_temp", 5.0).with("rain_fall", 1.0),
            ],
        );

        let chart = view
            .chart(&ChartKind::AggrTempRain.spec()?)
            .dataset(&dataset)
            .call()?;
        assert_eq!(chart.data.labels.len(), 3);

        let table = view.table(&TableKind::Aggregate.spec()).dataset(&dataset).call()?;
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_archive_daily_chart() -> Result<(), Box<dyn std::error::Error>> {
        let file = archive_csv()?;
        let view = WsView::new(ViewConfig::builder().archive_path(file.path()).build());

        let chart = view
            .archive_chart(&ChartKind::AggrTemp.spec()?)
            .aggregate(BucketPeriod::Day)
            .lower(NEW_YEAR)
            .upper(NEW_YEAR + 4 * 24 * HOUR)
            .call()
            .await?;

        let day = |d| Label::Instant(NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap());
        // The window widens the axis to the whole requested range
        assert_eq!(chart.data.labels, vec![day(1), day(2), day(3), day(4)]);
        assert_eq!(chart.data.datasets[0].data, vec![Some(0.0), None, Some(2.0), None]);
        assert_eq!(chart.data.datasets[1].data, vec![Some(5.0), None, Some(7.0), None]);
        Ok(())
    }

    #[tokio::test]
    async fn test_archive_requires_path_and_known_aggregate() -> Result<(), Box<dyn std::error::Error>> {
        let view = WsView::default();
        let err = view.archive_dataset().call().await.unwrap_err();
        assert!(matches!(err, WsViewError::NoArchivePath));

        let file = archive_csv()?;
        let view = WsView::new(ViewConfig::builder().archive_path(file.path()).build());
        let err = view
            .archive_dataset()
            .aggregate(BucketPeriod::Hour)
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, WsViewError::UnsupportedAggregate(BucketPeriod::Hour)));

        let raw = view.archive_dataset().call().await?;
        assert_eq!(raw.period(), BucketPeriod::Raw);
        assert_eq!(raw.data.len(), 3);
        assert_eq!(raw.data[0].time, RecordTime::Number(NEW_YEAR + HOUR));
        Ok(())
    }
}
