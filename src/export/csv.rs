//! CSV 导出

use chrono::{NaiveDate, NaiveDateTime};
use ::csv::{Terminator, Writer, WriterBuilder};

use super::{ExportError, ExportFile, ExportKind, ExportResult, file_stem};
use crate::db::{CaseFile, Staff, User};
use crate::views::audit::AuditEntry;
use crate::views::dates::{long_date, parse_opt_day};
use crate::views::staff::staff_email;

const CASE_HEADERS: [&str; 10] = [
    "#",
    "Case Number",
    "Case Type",
    "Purpose",
    "Uploaded By",
    "Current Location",
    "Notes",
    "Date Received",
    "Required On",
    "Date Returned",
];

const STAFF_HEADERS: [&str; 6] = ["#", "Name", "Role", "Email", "Status", "Phone"];

const AUDIT_HEADERS: [&str; 4] = ["#", "Message", "Assigned To", "Date"];

const DIARY_HEADERS: [&str; 8] = [
    "Case Number",
    "Case Type",
    "Purpose",
    "Required On",
    "Client",
    "Status",
    "Priority",
    "Notes",
];

fn writer(buffer: Vec<u8>) -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer)
}

fn finish(writer: Writer<Vec<u8>>) -> ExportResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn or_empty(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

/// 案卷表
pub fn cases_csv(files: &[CaseFile], court_name: &str) -> ExportResult<ExportFile> {
    let mut wtr = writer(Vec::new());
    wtr.write_record(CASE_HEADERS)?;

    for (i, f) in files.iter().filter(|f| !f.deleted).enumerate() {
        let index = (i + 1).to_string();
        let uploaded_by = f.uploaded_by.to_string();
        wtr.write_record([
            index.as_str(),
            &f.case_number,
            &f.case_type,
            &f.purpose,
            &uploaded_by,
            &f.current_location,
            or_empty(f.notes.as_deref()),
            or_empty(f.date_recieved.as_deref()),
            or_empty(f.required_on.as_deref()),
            or_empty(f.date_returned.as_deref()),
        ])?;
    }

    Ok(ExportFile {
        file_name: format!("{}.csv", file_stem(court_name, ExportKind::Cases)),
        bytes: finish(wtr)?,
    })
}

/// 职员表（邮箱来自关联用户）
pub fn staff_csv(staff: &[Staff], users: &[User], court_name: &str) -> ExportResult<ExportFile> {
    let mut wtr = writer(Vec::new());
    wtr.write_record(STAFF_HEADERS)?;

    for (i, s) in staff.iter().enumerate() {
        let index = (i + 1).to_string();
        wtr.write_record([
            index.as_str(),
            &s.name,
            &s.role,
            staff_email(s, users).unwrap_or(""),
            &s.status,
            or_empty(s.contact_number.as_deref()),
        ])?;
    }

    Ok(ExportFile {
        file_name: format!("{}.csv", file_stem(court_name, ExportKind::Staff)),
        bytes: finish(wtr)?,
    })
}

/// 审计日志
pub fn audit_csv(entries: &[AuditEntry], court_name: &str) -> ExportResult<ExportFile> {
    let mut wtr = writer(Vec::new());
    wtr.write_record(AUDIT_HEADERS)?;

    for (i, e) in entries.iter().enumerate() {
        let index = (i + 1).to_string();
        wtr.write_record([index.as_str(), &e.message, &e.assigned_to, &e.date_created])?;
    }

    Ok(ExportFile {
        file_name: format!("{}.csv", file_stem(court_name, ExportKind::AuditLogs)),
        bytes: finish(wtr)?,
    })
}

fn short_date(value: Option<&str>) -> String {
    match parse_opt_day(value) {
        Some(day) => day.format("%-m/%-d/%Y").to_string(),
        None => value.unwrap_or("N/A").to_string(),
    }
}

/// 出庭日志导出
///
/// 先写三行带引号的标题（标题、生成时间、总数）和一个空行，再写表头和数据行。
/// 文件名为 `Legal_Diary_<date>_<n>_Cases.csv`。
pub fn diary_csv(
    files: &[CaseFile],
    date: NaiveDate,
    generated_at: NaiveDateTime,
) -> ExportResult<ExportFile> {
    if files.is_empty() {
        return Err(ExportError::Empty(format!("no cases on {date}")));
    }

    let preamble = format!(
        "\"Legal Diary Export - {}\"\n\"Generated on: {} at {}\"\n\"Total Cases: {}\"\n\n",
        long_date(date),
        generated_at.format("%-m/%-d/%Y"),
        generated_at.format("%-I:%M:%S %p"),
        files.len(),
    );

    let mut wtr = writer(preamble.into_bytes());
    wtr.write_record(DIARY_HEADERS)?;

    for (i, f) in files.iter().enumerate() {
        let fallback_number = format!("Case {}", i + 1);
        let case_number = if f.case_number.trim().is_empty() {
            fallback_number.as_str()
        } else {
            f.case_number.as_str()
        };
        let required_on = short_date(f.required_on.as_deref());
        let notes = f.notes.as_deref().unwrap_or("");

        wtr.write_record([
            case_number,
            or_placeholder(&f.case_type, "N/A"),
            or_placeholder(&f.purpose, "N/A"),
            required_on.as_str(),
            "N/A",
            "Pending",
            "Normal",
            or_placeholder(notes, "No notes"),
        ])?;
    }

    Ok(ExportFile {
        file_name: format!(
            "Legal_Diary_{}_{}_Cases.csv",
            date.format("%Y-%m-%d"),
            files.len()
        ),
        bytes: finish(wtr)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(file: &ExportFile) -> String {
        String::from_utf8(file.bytes.clone()).unwrap()
    }

    fn case_file(id: i64, number: &str, notes: Option<&str>) -> CaseFile {
        CaseFile {
            file_id: id,
            case_number: number.to_string(),
            case_type: "Civil".to_string(),
            purpose: "Hearing".to_string(),
            uploaded_by: 3,
            current_location: "Registry".to_string(),
            notes: notes.map(str::to_string),
            required_on: Some("2026-10-19".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_cases_csv_quotes_commas_and_skips_deleted() {
        let mut deleted = case_file(2, "E2/2026", None);
        deleted.deleted = true;
        let files = vec![case_file(1, "E1/2026", Some("Adjourned, see ruling")), deleted];

        let export = cases_csv(&files, "Kilungu Law Courts").unwrap();
        assert_eq!(export.file_name, "Kilungu-Law-Courts-Cases.csv");

        let body = text(&export);
        let lines: Vec<_> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#,Case Number,Case Type"));
        assert!(lines[1].starts_with("1,E1/2026,Civil,Hearing,3,Registry,\"Adjourned, see ruling\""));
    }

    #[test]
    fn test_staff_csv_joins_email() {
        let staff = vec![Staff {
            staff_id: 1,
            user_id: 7,
            name: "Jane Wanjiru".into(),
            role: "Clerk".into(),
            contact_number: Some("0700000000".into()),
            status: "Active".into(),
        }];
        let users = vec![User {
            user_id: 7,
            email: "jane@courts.go.ke".into(),
            ..Default::default()
        }];

        let body = text(&staff_csv(&staff, &users, "Kilungu Law Courts").unwrap());
        assert!(body.contains("1,Jane Wanjiru,Clerk,jane@courts.go.ke,Active,0700000000"));
    }

    #[test]
    fn test_diary_csv_layout() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let generated = date.and_hms_opt(14, 5, 9).unwrap();
        let files = vec![case_file(1, "E1/2026", None), case_file(2, "", Some("Bring exhibits"))];

        let export = diary_csv(&files, date, generated).unwrap();
        assert_eq!(export.file_name, "Legal_Diary_2026-10-19_2_Cases.csv");

        let body = text(&export);
        let lines: Vec<_> = body.lines().collect();
        assert_eq!(lines[0], "\"Legal Diary Export - October 19, 2026\"");
        assert_eq!(lines[1], "\"Generated on: 10/19/2026 at 2:05:09 PM\"");
        assert_eq!(lines[2], "\"Total Cases: 2\"");
        assert_eq!(lines[3], "");
        assert_eq!(
            lines[4],
            "Case Number,Case Type,Purpose,Required On,Client,Status,Priority,Notes"
        );
        assert_eq!(lines[5], "E1/2026,Civil,Hearing,10/19/2026,N/A,Pending,Normal,No notes");
        assert_eq!(lines[6], "Case 2,Civil,Hearing,10/19/2026,N/A,Pending,Normal,Bring exhibits");
    }

    #[test]
    fn test_diary_csv_rejects_empty_day() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let generated = date.and_hms_opt(9, 0, 0).unwrap();
        assert!(matches!(
            diary_csv(&[], date, generated),
            Err(ExportError::Empty(_))
        ));
    }
}
