use crate::domain::model::{DateSpan, FixedDates, Period};
use crate::utils::error::{CrawlError, Result};
use chrono::{Datelike, FixedOffset, NaiveDate, Utc};

/// 由「現在」與月份偏移量推算目標年月，跨年自動進位
pub fn resolve_period(now: NaiveDate, month_offset: i64) -> Result<Period> {
    if month_offset < 0 {
        return Err(CrawlError::invalid_argument(
            "month_offset",
            month_offset,
            "月份偏移量必須為非負整數",
        ));
    }

    let out_of_range =
        || CrawlError::invalid_argument("month_offset", month_offset, "目標年份超出可表示範圍");

    let total_month = i64::from(now.month0())
        .checked_add(month_offset)
        .ok_or_else(out_of_range)?;
    let year = i32::try_from(i64::from(now.year()) + total_month / 12).map_err(|_| out_of_range())?;

    Ok(Period {
        year,
        month: (total_month % 12) as u32 + 1,
    })
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        year.checked_add(1)
            .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

fn check_day(field: &str, day: i64, reason: &str) -> Result<u32> {
    u32::try_from(day)
        .ok()
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| CrawlError::invalid_argument(field, day, reason))
}

/// 將 1-31 的日期夾到該月份最後一天
pub fn clamp_day(day: i64, period: Period) -> Result<u32> {
    let day = check_day("day", day, "日期天數必須在 1-31 之間")?;
    Ok(day.min(days_in_month(period.year, period.month)))
}

pub fn date_in(period: Period, day: i64) -> Result<NaiveDate> {
    let day = clamp_day(day, period)?;
    NaiveDate::from_ymd_opt(period.year, period.month, day).ok_or_else(|| {
        CrawlError::invalid_argument("period", period, "目標年月超出可計算的日期範圍")
    })
}

/// 固定月份日期計算
pub fn calculate_fixed_dates(
    now: NaiveDate,
    month_offset: i64,
    dep_day: i64,
    return_day: i64,
) -> Result<FixedDates> {
    let period = resolve_period(now, month_offset)?;
    check_day("dep_day", dep_day, "出發日期天數必須在 1-31 之間")?;
    check_day("return_day", return_day, "回程日期天數必須在 1-31 之間")?;

    Ok(FixedDates {
        departure_date: date_in(period, dep_day)?,
        return_date: date_in(period, return_day)?,
        target_year: period.year,
        target_month: period.month,
    })
}

/// 固定爬取區間在指定月份中的實際日期範圍
pub fn fixed_span(period: Period, dep_day: i64, return_day: i64) -> Result<DateSpan> {
    Ok(DateSpan::new(
        date_in(period, dep_day)?,
        date_in(period, return_day)?,
    ))
}

/// 指定時區（UTC 偏移小時）的今天
pub fn today_in(utc_offset_hours: i32) -> NaiveDate {
    match FixedOffset::east_opt(utc_offset_hours * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => Utc::now().date_naive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_period_same_year() {
        let period = resolve_period(date(2025, 10, 15), 2).unwrap();
        assert_eq!(period, Period { year: 2025, month: 12 });
    }

    #[test]
    fn test_resolve_period_cross_year() {
        let period = resolve_period(date(2025, 10, 15), 3).unwrap();
        assert_eq!(period, Period { year: 2026, month: 1 });

        let period = resolve_period(date(2025, 10, 15), 27).unwrap();
        assert_eq!(period, Period { year: 2028, month: 1 });
    }

    #[test]
    fn test_resolve_period_zero_offset() {
        let period = resolve_period(date(2025, 1, 31), 0).unwrap();
        assert_eq!(period, Period { year: 2025, month: 1 });
    }

    #[test]
    fn test_resolve_period_negative_offset() {
        let err = resolve_period(date(2025, 10, 15), -1).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidArgument { .. }));
    }

    #[test]
    fn test_resolve_period_huge_offset_is_rejected() {
        let err = resolve_period(date(2025, 10, 15), i64::MAX).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidArgument { ref field, .. } if field == "month_offset"));

        let err = resolve_period(date(2025, 10, 15), i64::MAX - 20).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidArgument { .. }));
    }

    #[test]
    fn test_resolve_period_month_range_and_monotonic_year() {
        for start_month in 1..=12 {
            let now = date(2025, start_month, 1);
            let mut last_year = now.year();
            for offset in 0..60 {
                let period = resolve_period(now, offset).unwrap();
                assert!((1..=12).contains(&period.month));
                assert!(period.year >= last_year);
                last_year = period.year;
            }
        }
    }

    #[test]
    fn test_clamp_day() {
        let november = Period { year: 2025, month: 11 };
        assert_eq!(clamp_day(31, november).unwrap(), 30);
        assert_eq!(clamp_day(15, november).unwrap(), 15);

        assert_eq!(clamp_day(31, Period { year: 2025, month: 2 }).unwrap(), 28);
        assert_eq!(clamp_day(31, Period { year: 2024, month: 2 }).unwrap(), 29);
        assert_eq!(clamp_day(31, Period { year: 2100, month: 2 }).unwrap(), 28);
        assert_eq!(clamp_day(31, Period { year: 2000, month: 2 }).unwrap(), 29);
    }

    #[test]
    fn test_clamp_day_out_of_range() {
        let period = Period { year: 2025, month: 1 };
        assert!(clamp_day(0, period).is_err());
        assert!(clamp_day(32, period).is_err());
        assert!(clamp_day(-5, period).is_err());
    }

    #[test]
    fn test_calculate_fixed_dates() {
        let dates = calculate_fixed_dates(date(2025, 10, 15), 2, 5, 10).unwrap();
        assert_eq!(dates.departure_date, date(2025, 12, 5));
        assert_eq!(dates.return_date, date(2025, 12, 10));
        assert_eq!(dates.target_year, 2025);
        assert_eq!(dates.target_month, 12);
    }

    #[test]
    fn test_calculate_fixed_dates_exceeds_month_days() {
        let dates = calculate_fixed_dates(date(2025, 9, 1), 2, 30, 31).unwrap();
        assert_eq!(dates.departure_date, date(2025, 11, 30));
        assert_eq!(dates.return_date, date(2025, 11, 30));
    }

    #[test]
    fn test_calculate_fixed_dates_invalid_days() {
        let err = calculate_fixed_dates(date(2025, 10, 15), 2, 0, 10).unwrap_err();
        assert!(err.to_string().contains("dep_day"));
        let err = calculate_fixed_dates(date(2025, 10, 15), 2, 5, 32).unwrap_err();
        assert!(err.to_string().contains("return_day"));
    }

    #[test]
    fn test_year_beyond_calendar_range_is_reported_as_such() {
        // 年份在 i32 內，但超出日期函式庫可表示的範圍
        let err = calculate_fixed_dates(date(2025, 10, 15), 12 * 300_000, 5, 10).unwrap_err();
        match err {
            CrawlError::InvalidArgument { field, reason, .. } => {
                assert_eq!(field, "period");
                assert!(!reason.contains("1-31"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
