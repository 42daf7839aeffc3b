//! Excel 导出
//!
//! 每种导出一个工作表，第一列为序号 "#"。表头加粗，
//! 列宽按表头长度 + 5 设置。工作表名为 "{法院名} - {导出类型}"。

use rust_xlsxwriter::{Format, Workbook};

use super::{ExportFile, ExportKind, ExportResult, file_stem};
use crate::db::{CaseFile, Staff, User};
use crate::views::audit::AuditEntry;
use crate::views::staff::staff_email;

/// Excel 工作表名最长 31 个字符
const MAX_SHEET_NAME: usize = 31;

const CASE_HEADINGS: [&str; 8] = [
    "#",
    "Case Number",
    "Purpose",
    "Uploaded By",
    "Current Location",
    "Notes",
    "Date Received",
    "Required On",
];

const STAFF_HEADINGS: [&str; 6] = ["#", "Name", "Role", "Email", "Status", "Phone"];

const AUDIT_HEADINGS: [&str; 4] = ["#", "Message", "Assigned To", "Date"];

/// 工作表名：去掉 Excel 不允许的字符并截断
pub fn sheet_name(court_name: &str, kind: ExportKind) -> String {
    let cleaned: String = format!("{} - {}", court_name.trim(), kind.title())
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME)
        .collect();
    cleaned.trim_matches('\'').trim().to_string()
}

fn headings(kind: ExportKind) -> &'static [&'static str] {
    match kind {
        ExportKind::Cases => &CASE_HEADINGS,
        ExportKind::Staff => &STAFF_HEADINGS,
        ExportKind::AuditLogs => &AUDIT_HEADINGS,
    }
}

/// 按导出类型和行数据生成工作簿（行不含序号，序号自动填充）
fn workbook(kind: ExportKind, rows: &[Vec<String>], court_name: &str) -> ExportResult<Workbook> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(court_name, kind))?;

    for (col, heading) in headings(kind).iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *heading, &bold)?;
        worksheet.set_column_width(col, (heading.chars().count() + 5) as f64)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let excel_row = (i + 1) as u32;
        worksheet.write_number(excel_row, 0, (i + 1) as f64)?;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(excel_row, (col + 1) as u16, value)?;
            }
        }
    }

    Ok(workbook)
}

fn build(kind: ExportKind, rows: &[Vec<String>], court_name: &str) -> ExportResult<ExportFile> {
    let mut workbook = workbook(kind, rows, court_name)?;
    Ok(ExportFile {
        file_name: format!("{}.xlsx", file_stem(court_name, kind)),
        bytes: workbook.save_to_buffer()?,
    })
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// 案卷表
pub fn cases_xlsx(files: &[CaseFile], court_name: &str) -> ExportResult<ExportFile> {
    let rows: Vec<Vec<String>> = files
        .iter()
        .filter(|f| !f.deleted)
        .map(|f| {
            vec![
                f.case_number.clone(),
                f.purpose.clone(),
                f.uploaded_by.to_string(),
                f.current_location.clone(),
                opt(f.notes.as_deref()),
                opt(f.date_recieved.as_deref()),
                opt(f.required_on.as_deref()),
            ]
        })
        .collect();

    tracing::info!("[Export] 案卷 Excel: {} 行", rows.len());
    build(ExportKind::Cases, &rows, court_name)
}

/// 职员表
pub fn staff_xlsx(staff: &[Staff], users: &[User], court_name: &str) -> ExportResult<ExportFile> {
    let rows: Vec<Vec<String>> = staff
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.role.clone(),
                opt(staff_email(s, users)),
                s.status.clone(),
                opt(s.contact_number.as_deref()),
            ]
        })
        .collect();

    tracing::info!("[Export] 职员 Excel: {} 行", rows.len());
    build(ExportKind::Staff, &rows, court_name)
}

/// 审计日志
pub fn audit_xlsx(entries: &[AuditEntry], court_name: &str) -> ExportResult<ExportFile> {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| vec![e.message.clone(), e.assigned_to.clone(), e.date_created.clone()])
        .collect();

    tracing::info!("[Export] 审计日志 Excel: {} 行", rows.len());
    build(ExportKind::AuditLogs, &rows, court_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name() {
        assert_eq!(
            sheet_name("Kilungu Law Courts", ExportKind::Cases),
            "Kilungu Law Courts - Cases"
        );
        assert_eq!(
            sheet_name("Kilungu Law Courts", ExportKind::Staff),
            "Kilungu Law Courts - Staff"
        );
        assert_eq!(sheet_name("A/B Courts", ExportKind::Cases), "A_B Courts - Cases");

        let long = sheet_name(
            "The High Court of Kenya at Machakos Registry",
            ExportKind::AuditLogs,
        );
        assert!(long.chars().count() <= MAX_SHEET_NAME);
    }

    #[test]
    fn test_each_kind_gets_its_own_sheet() {
        let court = "Kilungu Law Courts";
        for (kind, expected) in [
            (ExportKind::Cases, "Kilungu Law Courts - Cases"),
            (ExportKind::Staff, "Kilungu Law Courts - Staff"),
            (ExportKind::AuditLogs, "Kilungu Law Courts - Audit Logs"),
        ] {
            let mut book = workbook(kind, &[], court).unwrap();
            assert_eq!(book.worksheet_from_index(0).unwrap().name(), expected);
        }

        let staff = staff_xlsx(&[], &[], court).unwrap();
        assert_eq!(staff.file_name, "Kilungu-Law-Courts-Staff.xlsx");
        assert!(staff.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_cases_xlsx_is_zip() {
        let files = vec![CaseFile {
            file_id: 1,
            case_number: "E1/2026".into(),
            purpose: "Hearing".into(),
            ..Default::default()
        }];

        let export = cases_xlsx(&files, "Kilungu Law Courts").unwrap();
        assert_eq!(export.file_name, "Kilungu-Law-Courts-Cases.xlsx");
        // xlsx 是 zip 容器
        assert!(export.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_audit_xlsx_file_name() {
        let export = audit_xlsx(&[], "Kilungu Law Courts").unwrap();
        assert_eq!(export.file_name, "Kilungu-Law-Courts-Audit-Logs.xlsx");
    }
}
