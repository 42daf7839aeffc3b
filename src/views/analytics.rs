//! 面板统计
//!
//! 所有统计都从缓存数组即时计算，已删除案卷不计入。

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::cases::is_overdue;
use super::dates::parse_opt_day;
use crate::db::{Attendance, CaseFile};

/// 统计窗口上限（天）
pub const MAX_WINDOW_DAYS: u32 = 366;

/// 面板汇总卡片
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// 已归还（处理完毕）的案卷
    pub files_processed: usize,
    /// 未归还的案卷
    pub active_files: usize,
    pub overdue_files: usize,
    /// 今天缺勤的职员人数
    pub absent_staff: usize,
    /// 今天起 N 天内需要出庭的未归还案卷
    pub upcoming_files: usize,
}

/// 每日处理量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

fn live(files: &[CaseFile]) -> impl Iterator<Item = &CaseFile> {
    files.iter().filter(|f| !f.deleted)
}

fn is_returned(file: &CaseFile) -> bool {
    file.date_returned
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty())
}

/// 今天缺勤的职员（同一职员多条记录只计一次）
pub fn absent_staff(attendance: &[Attendance], today: NaiveDate) -> usize {
    attendance
        .iter()
        .filter(|a| a.status == "Absent" && parse_opt_day(Some(&a.date)) == Some(today))
        .map(|a| a.staff_id)
        .collect::<BTreeSet<_>>()
        .len()
}

/// 出庭日期在 [today, today + window_days] 内且未归还
///
/// 窗口截断到 [0, MAX_WINDOW_DAYS]。
pub fn upcoming_files(files: &[CaseFile], today: NaiveDate, window_days: i64) -> Vec<&CaseFile> {
    let window = window_days.clamp(0, i64::from(MAX_WINDOW_DAYS));
    let end = today
        .checked_add_signed(Duration::days(window))
        .unwrap_or(NaiveDate::MAX);
    live(files)
        .filter(|f| !is_returned(f))
        .filter(|f| {
            parse_opt_day(f.required_on.as_deref()).is_some_and(|day| day >= today && day <= end)
        })
        .collect()
}

pub fn summary(
    files: &[CaseFile],
    attendance: &[Attendance],
    today: NaiveDate,
    window_days: i64,
) -> DashboardSummary {
    let files_processed = live(files).filter(|f| is_returned(f)).count();
    let active_files = live(files).filter(|f| !is_returned(f)).count();

    DashboardSummary {
        files_processed,
        active_files,
        overdue_files: live(files).filter(|f| is_overdue(f, today)).count(),
        absent_staff: absent_staff(attendance, today),
        upcoming_files: upcoming_files(files, today, window_days).len(),
    }
}

fn count_by<'a>(files: &'a [CaseFile], key: impl Fn(&'a CaseFile) -> &'a str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for file in live(files) {
        let value = key(file).trim();
        let label = if value.is_empty() { "Unspecified" } else { value };
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

/// 按目的统计
pub fn count_by_purpose(files: &[CaseFile]) -> BTreeMap<String, usize> {
    count_by(files, |f| f.purpose.as_str())
}

/// 按案件类型统计
pub fn count_by_case_type(files: &[CaseFile]) -> BTreeMap<String, usize> {
    count_by(files, |f| f.case_type.as_str())
}

/// 截至 today（含）的最近 `days` 天每日归还数量，按日期升序
///
/// `days` 最多取 MAX_WINDOW_DAYS；早于最小日期的部分不输出。
pub fn daily_processed(files: &[CaseFile], today: NaiveDate, days: u32) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for day in live(files).filter_map(|f| parse_opt_day(f.date_returned.as_deref())) {
        *per_day.entry(day).or_insert(0) += 1;
    }

    (0..i64::from(days.min(MAX_WINDOW_DAYS)))
        .rev()
        .filter_map(|offset| today.checked_sub_signed(Duration::days(offset)))
        .map(|date| DailyCount {
            date,
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
