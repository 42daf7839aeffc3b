//! 出庭日历导出（iCalendar）
//!
//! 每个带出庭日期的案卷生成一个全天 VEVENT。
//! 文本按 RFC 5545 转义，行尾为 CRLF，超过 75 字节的行折叠
//! （续行以一个空格开头，不会在 UTF-8 字符中间断开）。

use chrono::{DateTime, Duration, Utc};

use super::ExportFile;
use crate::db::CaseFile;
use crate::views::dates::parse_opt_day;

const MAX_LINE_OCTETS: usize = 75;

/// 转义 TEXT 值
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// 折叠一个内容行并追加 CRLF
pub fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut used = 0;

    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            // 续行开头的空格占一个字节
            used = 1;
        }
        out.push(c);
        used += width;
    }

    out.push_str("\r\n");
    out
}

fn event_lines(file: &CaseFile, stamp: &str) -> Option<Vec<String>> {
    let day = parse_opt_day(file.required_on.as_deref())?;
    let next = day + Duration::days(1);

    let summary = if file.purpose.trim().is_empty() {
        file.case_number.clone()
    } else {
        format!("{} - {}", file.case_number, file.purpose)
    };

    let mut description = format!("Case type: {}", file.case_type);
    if let Some(notes) = file.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        description.push_str("\nNotes: ");
        description.push_str(notes);
    }

    Some(vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:case-file-{}@court-registry", file.file_id),
        format!("DTSTAMP:{stamp}"),
        format!("DTSTART;VALUE=DATE:{}", day.format("%Y%m%d")),
        format!("DTEND;VALUE=DATE:{}", next.format("%Y%m%d")),
        format!("SUMMARY:{}", escape_text(&summary)),
        format!("DESCRIPTION:{}", escape_text(&description)),
        format!("LOCATION:{}", escape_text(&file.current_location)),
        "END:VEVENT".to_string(),
    ])
}

/// 生成日历文本；没有出庭日期或已删除的案卷被跳过
pub fn calendar(files: &[CaseFile], court_name: &str, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%dT%H%M%SZ").to_string();

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:-//{}//Court Registry//EN", escape_text(court_name)),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{}", escape_text(court_name)),
    ];

    let mut events = 0;
    for file in files.iter().filter(|f| !f.deleted) {
        if let Some(event) = event_lines(file, &stamp) {
            lines.extend(event);
            events += 1;
        }
    }
    lines.push("END:VCALENDAR".to_string());

    tracing::debug!("[Export] 日历包含 {} 个事件", events);
    lines.iter().map(|l| fold_line(l)).collect()
}

/// 日历导出文件
pub fn calendar_file(files: &[CaseFile], court_name: &str, now: DateTime<Utc>) -> ExportFile {
    ExportFile {
        file_name: format!(
            "{}-Required-On.ics",
            court_name.split_whitespace().collect::<Vec<_>>().join("-")
        ),
        bytes: calendar(files, court_name, now).into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 7, 30, 0).unwrap()
    }

    fn file(id: i64, required_on: Option<&str>) -> CaseFile {
        CaseFile {
            file_id: id,
            case_number: format!("E{id}/2026"),
            case_type: "Civil".to_string(),
            purpose: "Hearing".to_string(),
            current_location: "Court 2, Ground Floor".to_string(),
            required_on: required_on.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a,b;c\\d\r\ne"), "a\\,b\\;c\\\\d\\ne");
    }

    #[test]
    fn test_fold_line_limits_octets() {
        let line = format!("DESCRIPTION:{}", "é".repeat(80));
        let folded = fold_line(&line);

        assert!(folded.ends_with("\r\n"));
        for part in folded.trim_end_matches("\r\n").split("\r\n") {
            assert!(part.len() <= MAX_LINE_OCTETS, "{} octets", part.len());
        }
        // 去掉折叠后还原
        assert_eq!(folded.trim_end_matches("\r\n").replace("\r\n ", ""), line);
    }

    #[test]
    fn test_short_line_not_folded() {
        assert_eq!(fold_line("VERSION:2.0"), "VERSION:2.0\r\n");
    }

    #[test]
    fn test_calendar_events() {
        let mut deleted = file(3, Some("2026-10-21"));
        deleted.deleted = true;
        let files = vec![file(1, Some("2026-10-19 09:00:00")), file(2, None), deleted];

        let ics = calendar(&files, "Kilungu Law Courts", now());
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.contains("DTSTART;VALUE=DATE:20261019\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20261020\r\n"));
        assert!(ics.contains("DTSTAMP:20261018T073000Z\r\n"));
        assert!(ics.contains("LOCATION:Court 2\\, Ground Floor\r\n"));
        assert!(ics.contains("UID:case-file-1@court-registry"));
        assert!(!ics.replace("\r\n", "").contains('\n'));
    }
}
