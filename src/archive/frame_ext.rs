use chrono::FixedOffset;
use polars::prelude::{col, lit, DataType, Expr, LazyFrame, TimeUnit};

pub const COL_TIME: &str = "time"; // Epoch seconds, end of the archive interval
pub const COL_LO_TEMP: &str = "lo_temp";
pub const COL_HI_TEMP: &str = "hi_temp";
pub const COL_RAIN_FALL: &str = "rain_fall";
pub const COL_AVG_WIND_SPEED: &str = "avg_wind_speed";
pub const COL_HI_WIND_SPEED: &str = "hi_wind_speed";
pub const COL_BAROMETER: &str = "barometer";

// Monthly aggregate outputs
pub const COL_RAIN: &str = "rain";
pub const COL_RAIN_24H: &str = "rain_24h";

const COL_DAY: &str = "day";

/// Local calendar day an archive row belongs to.
///
/// Rows are stamped at the end of their interval, so a row at exactly midnight
/// closes the previous day: one second is taken off before converting.
fn local_day(offset: FixedOffset) -> Expr {
    let shift = i64::from(offset.local_minus_utc()) - 1;
    ((col(COL_TIME) + lit(shift)) * lit(1000i64))
        .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
        .dt()
        .date()
}

pub trait ArchiveFrameExt {
    /// Keeps rows with `lower < time <= upper` (epoch seconds).
    fn window(self, lower: i64, upper: i64) -> LazyFrame;

    /// One row per local day: lowest `lo_temp`, highest `hi_temp`, total
    /// `rain_fall`, mean `avg_wind_speed`, highest `hi_wind_speed` and mean
    /// `barometer`. `time` becomes a date column, sorted ascending.
    fn daily_aggregate(self, offset: FixedOffset) -> LazyFrame;

    /// One row per local month, built from daily extremes: mean daily `lo_temp`
    /// and `hi_temp`, total rain as `rain` and the wettest day as `rain_24h`.
    /// `time` is the first day of the month.
    fn monthly_aggregate(self, offset: FixedOffset) -> LazyFrame;

    /// Adds `output` as the running total of `field` in row order; nulls add nothing.
    fn running_total(self, field: &str, output: &str) -> LazyFrame;
}

impl ArchiveFrameExt for LazyFrame {
    fn window(self, lower: i64, upper: i64) -> LazyFrame {
        self.filter(
            col(COL_TIME)
                .gt(lit(lower))
                .and(col(COL_TIME).lt_eq(lit(upper))),
        )
    }

    fn daily_aggregate(self, offset: FixedOffset) -> LazyFrame {
        self.group_by([local_day(offset).alias(COL_TIME)])
            .agg([
                col(COL_LO_TEMP).min(),
                col(COL_HI_TEMP).max(),
                col(COL_RAIN_FALL).sum(),
                col(COL_AVG_WIND_SPEED).mean(),
                col(COL_HI_WIND_SPEED).max(),
                col(COL_BAROMETER).mean(),
            ])
            .sort([COL_TIME], Default::default())
    }

    fn monthly_aggregate(self, offset: FixedOffset) -> LazyFrame {
        self.group_by([local_day(offset).alias(COL_DAY)])
            .agg([
                col(COL_LO_TEMP).min(),
                col(COL_HI_TEMP).max(),
                col(COL_RAIN_FALL).sum(),
            ])
            .group_by([col(COL_DAY).dt().month_start().alias(COL_TIME)])
            .agg([
                col(COL_LO_TEMP).mean(),
                col(COL_HI_TEMP).mean(),
                col(COL_RAIN_FALL).sum().alias(COL_RAIN),
                col(COL_RAIN_FALL).max().alias(COL_RAIN_24H),
            ])
            .sort([COL_TIME], Default::default())
    }

    fn running_total(self, field: &str, output: &str) -> LazyFrame {
        self.with_column(
            col(field)
                .fill_null(lit(0.0))
                .cum_sum(false)
                .alias(output),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Offset, Utc};
    use polars::prelude::*;

    // 2024-01-01T00:00:00Z
    const NEW_YEAR: i64 = 1_704_067_200;
    const HOUR: i64 = 3600;

    fn archive() -> PolarsResult<DataFrame> {
        df!(
            COL_TIME => &[NEW_YEAR, NEW_YEAR + HOUR, NEW_YEAR + 24 * HOUR, NEW_YEAR + 25 * HOUR, NEW_YEAR + 26 * HOUR],
            COL_LO_TEMP => &[Some(-1.0), Some(2.0), Some(0.5), Some(3.0), None],
            COL_HI_TEMP => &[Some(1.0), Some(4.0), Some(2.5), Some(5.0), Some(6.0)],
            COL_RAIN_FALL => &[Some(0.2), Some(1.0), None, Some(0.4), Some(0.6)],
            COL_AVG_WIND_SPEED => &[1.0, 2.0, 4.0, 3.0, 5.0],
            COL_HI_WIND_SPEED => &[3.0, 6.0, 7.0, 5.0, 9.0],
            COL_BAROMETER => &[1010.0, 1012.0, 1014.0, 1013.0, 1015.0],
        )
    }

    fn dates(df: &DataFrame) -> PolarsResult<Vec<Option<NaiveDate>>> {
        let days = df.column(COL_TIME)?.cast(&DataType::Int32)?;
        Ok(days
            .i32()?
            .into_iter()
            .map(|d| d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + 719_163)))
            .collect())
    }

    fn floats(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        Ok(df.column(name)?.cast(&DataType::Float64)?.f64()?.into_iter().collect())
    }

    #[test]
    fn test_window_is_open_below_closed_above() -> PolarsResult<()> {
        let df = archive()?
            .lazy()
            .window(NEW_YEAR, NEW_YEAR + 24 * HOUR)
            .collect()?;
        let times: Vec<_> = df.column(COL_TIME)?.i64()?.into_iter().collect();
        assert_eq!(times, vec![Some(NEW_YEAR + HOUR), Some(NEW_YEAR + 24 * HOUR)]);
        Ok(())
    }

    #[test]
    fn test_daily_aggregate_midnight_closes_previous_day() -> PolarsResult<()> {
        let df = archive()?.lazy().daily_aggregate(Utc.fix()).collect()?;
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);

        // Midnight rows belong to the day that just ended
        assert_eq!(
            dates(&df)?,
            vec![day(2023, 12, 31), day(2024, 1, 1), day(2024, 1, 2)]
        );
        assert_eq!(floats(&df, COL_LO_TEMP)?, vec![Some(-1.0), Some(0.5), Some(3.0)]);
        assert_eq!(floats(&df, COL_HI_TEMP)?, vec![Some(1.0), Some(4.0), Some(6.0)]);
        assert_eq!(floats(&df, COL_HI_WIND_SPEED)?, vec![Some(3.0), Some(7.0), Some(9.0)]);

        let rain = floats(&df, COL_RAIN_FALL)?;
        assert!((rain[1].unwrap() - 1.0).abs() < 1e-9);
        assert!((rain[2].unwrap() - 1.0).abs() < 1e-9);
        let wind = floats(&df, COL_AVG_WIND_SPEED)?;
        assert!((wind[1].unwrap() - 3.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_daily_aggregate_uses_local_offset() -> PolarsResult<()> {
        // At +02:00 the midnight row is 02:00 local on Jan 1st
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let df = archive()?.lazy().daily_aggregate(plus_two).collect()?;
        let first = dates(&df)?[0];
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(df.height(), 2);
        Ok(())
    }

    #[test]
    fn test_monthly_aggregate_from_daily_extremes() -> PolarsResult<()> {
        let day = |m: u32, d: u32| {
            NaiveDate::from_ymd_opt(2023, m, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc()
                .timestamp()
        };
        let df = df!(
            COL_TIME => &[day(1, 10), day(1, 10), day(1, 11), day(3, 5)],
            COL_LO_TEMP => &[2.0, 0.0, 4.0, 6.0],
            COL_HI_TEMP => &[8.0, 10.0, 6.0, 14.0],
            COL_RAIN_FALL => &[1.0, 2.5, 4.0, 0.0],
        )?;
        let df = df.lazy().monthly_aggregate(Utc.fix()).collect()?;

        assert_eq!(
            dates(&df)?,
            vec![NaiveDate::from_ymd_opt(2023, 1, 1), NaiveDate::from_ymd_opt(2023, 3, 1)]
        );
        // Jan 10: lo 0, hi 10, rain 3.5 / Jan 11: lo 4, hi 6, rain 4
        assert_eq!(floats(&df, COL_LO_TEMP)?, vec![Some(2.0), Some(6.0)]);
        assert_eq!(floats(&df, COL_HI_TEMP)?, vec![Some(8.0), Some(14.0)]);
        assert_eq!(floats(&df, COL_RAIN)?, vec![Some(7.5), Some(0.0)]);
        assert_eq!(floats(&df, COL_RAIN_24H)?, vec![Some(4.0), Some(0.0)]);
        Ok(())
    }

    #[test]
    fn test_running_total_skips_nulls() -> PolarsResult<()> {
        let df = df!(
            COL_TIME => &[1i64, 2, 3, 4],
            COL_RAIN => &[Some(1.0), None, Some(2.5), Some(0.5)],
        )?;
        let df = df.lazy().running_total(COL_RAIN, "rain_sum").collect()?;
        assert_eq!(
            floats(&df, "rain_sum")?,
            vec![Some(1.0), Some(1.0), Some(3.5), Some(4.0)]
        );
        Ok(())
    }
}
