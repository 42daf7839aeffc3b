//! 摘要与报表

use rusqlite::{OptionalExtension, Row, params};
use serde_json::Value;

use super::types::{Report, Summary};
use super::{Database, DbResult, ensure_affected, with_db};

fn row_to_summary(row: &Row<'_>) -> rusqlite::Result<Summary> {
    Ok(Summary {
        summary_id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        generated_by: row.get(4)?,
        date_created: row.get(5)?,
    })
}

fn row_to_report(row: &Row<'_>) -> rusqlite::Result<Report> {
    Ok(Report {
        report_id: row.get(0)?,
        report_type: row.get(1)?,
        data_json: row.get(2)?,
        date_created: row.get(3)?,
    })
}

impl Database {
    // ========================================================================
    // 摘要
    // ========================================================================

    pub fn get_all_summaries(&self) -> DbResult<Vec<Summary>> {
        self.query_summaries("1 = 1", params![])
    }

    pub fn get_summaries_by_category(&self, category: &str) -> DbResult<Vec<Summary>> {
        self.query_summaries("category = ?1", params![category])
    }

    fn query_summaries(
        &self,
        condition: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> DbResult<Vec<Summary>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(&format!(
                "SELECT summary_id, title, content, category, generated_by, date_created
                 FROM summaries WHERE {condition} ORDER BY date_created DESC, summary_id DESC"
            ))?;
            let summaries = stmt
                .query_map(args, row_to_summary)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(summaries)
        })
    }

    pub fn create_summary(&self, summary: &Summary) -> DbResult<i64> {
        with_db!(self, db, {
            db.execute(
                "INSERT INTO summaries (title, content, category, generated_by) VALUES (?1, ?2, ?3, ?4)",
                params![
                    summary.title,
                    summary.content,
                    summary.category,
                    summary.generated_by
                ],
            )?;
            Ok(db.last_insert_rowid())
        })
    }

    pub fn delete_summary(&self, summary_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "DELETE FROM summaries WHERE summary_id = ?1",
                params![summary_id],
            )?;
            ensure_affected(affected, "summary", summary_id)
        })
    }

    // ========================================================================
    // 报表
    // ========================================================================

    pub fn get_all_reports(&self) -> DbResult<Vec<Report>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(
                "SELECT report_id, type, data_json, date_created FROM reports
                 ORDER BY date_created DESC, report_id DESC",
            )?;
            let reports = stmt
                .query_map([], row_to_report)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(reports)
        })
    }

    pub fn get_report(&self, report_id: i64) -> DbResult<Option<Report>> {
        with_db!(self, db, {
            let report = db
                .query_row(
                    "SELECT report_id, type, data_json, date_created FROM reports WHERE report_id = ?1",
                    params![report_id],
                    row_to_report,
                )
                .optional()?;
            Ok(report)
        })
    }

    /// 保存报表，数据序列化为 JSON 文本
    pub fn create_report(&self, report_type: &str, data: &Value) -> DbResult<i64> {
        let data_json = serde_json::to_string(data)?;

        with_db!(self, db, {
            db.execute(
                "INSERT INTO reports (type, data_json) VALUES (?1, ?2)",
                params![report_type, data_json],
            )?;
            Ok(db.last_insert_rowid())
        })
    }

    pub fn delete_report(&self, report_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected =
                db.execute("DELETE FROM reports WHERE report_id = ?1", params![report_id])?;
            ensure_affected(affected, "report", report_id)
        })
    }
}
