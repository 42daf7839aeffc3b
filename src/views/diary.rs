//! 出庭日志（Diary）
//!
//! 按日期列出需要出庭的案卷，并生成提醒文本。周末不可选。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cases::files_required_on;
use super::dates::{is_weekend, long_date};
use crate::db::CaseFile;

/// 提醒文本格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFormat {
    /// 即时消息（`*粗体*` / `_斜体_` 标记）
    #[default]
    Chat,
    /// 纯文本邮件正文
    Email,
}

/// 某一天的出庭日志
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiaryDay {
    pub date: NaiveDate,
    pub available: bool,
    pub files: Vec<CaseFile>,
}

/// 某一天需要出庭的案卷
pub fn diary_for(files: &[CaseFile], date: NaiveDate) -> DiaryDay {
    DiaryDay {
        date,
        available: !is_weekend(date),
        files: files_required_on(files, date).into_iter().cloned().collect(),
    }
}

/// 今天需要出庭的案卷（面板"即将出庭"页签）
pub fn todays_files(files: &[CaseFile], today: NaiveDate) -> Vec<&CaseFile> {
    files_required_on(files, today)
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

/// 邮件主题
pub fn reminder_subject(date: NaiveDate) -> String {
    format!("Legal Diary Reminder - {}", long_date(date))
}

/// 提醒文本；没有案卷时返回 None
pub fn reminder_message(
    files: &[CaseFile],
    date: NaiveDate,
    format: ReminderFormat,
) -> Option<String> {
    if files.is_empty() {
        return None;
    }

    let schedule = files
        .iter()
        .enumerate()
        .map(|(i, f)| {
            format!(
                "{}. {} - {} ({})",
                i + 1,
                or_placeholder(&f.case_number, "Untitled"),
                or_placeholder(&f.purpose, "N/A"),
                or_placeholder(&f.case_type, "N/A"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let message = format!(
        "*Legal Diary Reminder*\n\n*Date:* {}\n*Total Cases:* {}\n\n*Schedule:*\n{}\n\n_Records & Tracking System_",
        long_date(date),
        files.len(),
        schedule,
    );

    Some(match format {
        ReminderFormat::Chat => message,
        ReminderFormat::Email => message.replace(['*', '_'], ""),
    })
}
