use chrono::NaiveDate;
use wsview::{
    Axis, BucketPeriod, ChartKind, Dataset, IndexRange, Record, TableKind, ViewConfig, WsView,
    WsViewError,
};

/// Renders every built-in chart for a small synthetic month, then the aggregate
/// table. With `WSVIEW_ARCHIVE` set, the monthly rain chart is also built from
/// that archive file.
#[tokio::main]
async fn main() -> Result<(), WsViewError> {
    env_logger::init();

    let config = ViewConfig::from_env()?;
    let view = WsView::new(config.clone());

    let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
    let records: Vec<Record> = [1, 2, 4, 5, 9, 10, 11, 20, 31]
        .into_iter()
        .map(|d| {
            let d_f = f64::from(d);
            Record::new(day(d))
                .with("lo_temp", 1.5 + d_f * 0.2)
                .with("hi_temp", 9.0 + d_f * 0.3)
                .with("rain_fall", (d % 4) as f64 * 1.2)
                .with("rain", (d % 4) as f64 * 1.2)
                .with("rain_24h", (d % 3) as f64)
                .with("avg_wind_speed", 2.0 + (d % 5) as f64)
                .with("hi_wind_speed", 6.0 + (d % 7) as f64)
                .with("barometer", 1008.0 + (d % 9) as f64)
        })
        .collect();
    let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let dataset = Dataset::new(BucketPeriod::Day, records).with_window(day(1), april);

    for kind in [
        ChartKind::AggrTemp,
        ChartKind::AggrTempRain,
        ChartKind::AggrWind,
        ChartKind::AggrBarometer,
        ChartKind::AggrRain,
    ] {
        let chart = view.chart(&kind.spec()?).dataset(&dataset).call()?;
        println!("{kind}: {}", chart.to_json()?);
    }

    // Same month, laid out as days 1..=31
    let by_day = view
        .chart(&ChartKind::AggrTemp.spec()?)
        .dataset(&dataset)
        .axis(Axis::Index(IndexRange::DaysOfMonth { year: 2024, month: 3 }))
        .call()?;
    println!("aggr_temp by day of month: {} labels", by_day.data.labels.len());

    let table = view.table(&TableKind::Aggregate.spec()).dataset(&dataset).call()?;
    println!("{}", table.to_html());

    if config.archive_path.is_some() {
        let chart = view
            .archive_chart(&ChartKind::AggrRain.spec()?)
            .aggregate(BucketPeriod::Month)
            .call()
            .await?;
        println!("archive aggr_rain: {}", chart.to_json()?);
    }

    Ok(())
}
