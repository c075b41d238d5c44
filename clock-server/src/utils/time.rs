//! 时间工具函数: 业务时区转换
//!
//! A "day" is always a calendar day in the configured business time zone.
//! Store queries take inclusive `[start, end]` Unix millis bounds.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM 或 HH:MM:SS)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    let time = time.trim();
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 解析月份字符串 (YYYY-MM)，返回该月第一天
pub fn parse_month(month: &str) -> AppResult<NaiveDate> {
    let month = month.trim();
    let well_formed = month.len() == 7
        && month.as_bytes()[4] == b'-'
        && month
            .bytes()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit());
    if !well_formed {
        return Err(AppError::validation(format!(
            "Invalid month format: {} (expected YYYY-MM)",
            month
        )));
    }
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid month: {}", month)))
}

/// 月份键 (YYYY-MM)
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// 本地日期时间 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn local_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期 + 时间 → Unix millis (业务时区)
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    local_to_millis(date.and_time(time), tz)
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_time_to_millis(date, NaiveTime::MIN, tz)
}

/// 当天的闭区间 [00:00:00.000, 23:59:59.999]
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (i64, i64) {
    let next_day = date.succ_opt().unwrap_or(date);
    (day_start_millis(date, tz), day_start_millis(next_day, tz) - 1)
}

/// 整月的闭区间 [首日 00:00, 末日结束]
pub fn month_bounds(first_day: NaiveDate, tz: Tz) -> (i64, i64) {
    let next_month = first_day
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(first_day);
    (
        day_start_millis(first_day, tz),
        day_start_millis(next_month, tz) - 1,
    )
}

/// Unix millis → 业务时区日期
pub fn local_date(millis: i64, tz: Tz) -> NaiveDate {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .unwrap_or_default()
}

/// 当前月份的第一天 (业务时区)
pub fn current_month(tz: Tz) -> NaiveDate {
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    today.with_day(1).unwrap_or(today)
}
