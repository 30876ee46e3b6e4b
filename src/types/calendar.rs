use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    Some(first_day_of_next_month.pred_opt()?.day())
}

pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month_regular_and_leap() {
        assert_eq!(days_in_month(2023, 1), Some(31));
        assert_eq!(days_in_month(2023, 4), Some(30));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2023, 12), Some(31));
    }

    #[test]
    fn test_days_in_month_rejects_invalid_month() {
        assert_eq!(days_in_month(2023, 0), None);
        assert_eq!(days_in_month(2023, 13), None);
    }

    #[test]
    fn test_days_in_month_at_calendar_limits() {
        // The month before the first representable date has no known length
        assert_eq!(days_in_month(NaiveDate::MIN.year() - 1, 12), None);
        assert_eq!(days_in_month(NaiveDate::MIN.year(), 1), Some(31));
        assert_eq!(days_in_month(NaiveDate::MAX.year(), 12), None);
    }
}
