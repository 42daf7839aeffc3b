//! 日期辅助
//!
//! 数据库中的日期是 `YYYY-MM-DD` 或 `YYYY-MM-DD HH:MM:SS` 文本，
//! 视图只比较日期部分。

use chrono::{Datelike, Local, NaiveDate, Weekday};

/// 解析日期文本的前 10 个字符
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let head = value.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub fn parse_opt_day(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(parse_day)
}

/// 本地时区的今天
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// "October 18, 2026"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// 周末不开庭
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
