//! 案卷操作模块
//!
//! 处理案卷（`files` 表）的增删改查。
//!
//! ## 约定
//!
//! - 删除是软删除：`deleted = 1`，可通过 `restore_file` 恢复
//! - `get_all_files` 返回包括已删除在内的全部案卷，由调用方过滤
//! - 按案号 / 上传人 / 用途的查询只返回未删除案卷
//! - 出庭日期（`required_on`）或备注变化时追加一条历史记录

use rusqlite::{OptionalExtension, Row, params};

use super::types::{
    CaseFile, CaseFileUpdate, FileDateField, NewCaseFile, NoteHistory, RequiredOnHistory,
};
use super::{Database, DbError, DbResult, ensure_affected, with_db};

const FILE_COLUMNS: &str = "file_id, case_number, case_type, purpose, uploaded_by, current_location,
     notes, date_recieved, required_on, required_on_signature, date_returned,
     date_returned_signature, deleted";

fn row_to_file(row: &Row<'_>) -> rusqlite::Result<CaseFile> {
    Ok(CaseFile {
        file_id: row.get(0)?,
        case_number: row.get(1)?,
        case_type: row.get(2)?,
        purpose: row.get(3)?,
        uploaded_by: row.get(4)?,
        current_location: row.get(5)?,
        notes: row.get(6)?,
        date_recieved: row.get(7)?,
        required_on: row.get(8)?,
        required_on_signature: row.get(9)?,
        date_returned: row.get(10)?,
        date_returned_signature: row.get(11)?,
        deleted: row.get(12)?,
    })
}

/// 插入出庭日期历史
fn record_required_on(
    db: &rusqlite::Connection,
    file_id: i64,
    required_on: &str,
    note: &str,
) -> rusqlite::Result<usize> {
    db.execute(
        "INSERT INTO history_required_on (file_id, required_on, note) VALUES (?1, ?2, ?3)",
        params![file_id, required_on, note],
    )
}

/// 插入备注历史
fn record_note(
    db: &rusqlite::Connection,
    file_id: i64,
    note: &str,
    created_by: Option<i64>,
) -> rusqlite::Result<usize> {
    db.execute(
        "INSERT INTO history_notes (file_id, note, created_by) VALUES (?1, ?2, ?3)",
        params![file_id, note, created_by],
    )
}

impl Database {
    // ========================================================================
    // 查询
    // ========================================================================

    /// 获取全部案卷（包括已删除）
    pub fn get_all_files(&self) -> DbResult<Vec<CaseFile>> {
        self.query_files("1 = 1", params![])
    }

    /// 按 ID 获取案卷
    pub fn get_file_by_id(&self, file_id: i64) -> DbResult<Option<CaseFile>> {
        with_db!(self, db, {
            let file = db
                .query_row(
                    &format!("SELECT {FILE_COLUMNS} FROM files WHERE file_id = ?1"),
                    params![file_id],
                    row_to_file,
                )
                .optional()?;
            Ok(file)
        })
    }

    /// 按案号精确查找（不含已删除）
    pub fn search_files_by_case_number(&self, case_number: &str) -> DbResult<Vec<CaseFile>> {
        self.query_files("case_number = ?1 AND deleted = 0", params![case_number])
    }

    /// 按上传人查找（不含已删除）
    pub fn filter_files_by_user(&self, user_id: i64) -> DbResult<Vec<CaseFile>> {
        self.query_files("uploaded_by = ?1 AND deleted = 0", params![user_id])
    }

    /// 按用途查找（不含已删除）
    pub fn get_files_by_purpose(&self, purpose: &str) -> DbResult<Vec<CaseFile>> {
        self.query_files("purpose = ?1 AND deleted = 0", params![purpose])
    }

    fn query_files(
        &self,
        condition: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> DbResult<Vec<CaseFile>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(&format!(
                "SELECT {FILE_COLUMNS} FROM files WHERE {condition} ORDER BY file_id ASC"
            ))?;

            let files = stmt
                .query_map(args, row_to_file)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(files)
        })
    }

    // ========================================================================
    // 写入
    // ========================================================================

    /// 新建案卷，返回 file_id
    pub fn add_new_file(&self, file: &NewCaseFile) -> DbResult<i64> {
        if file.case_number.trim().is_empty() {
            return Err(DbError::InvalidInput("case_number must not be empty".into()));
        }

        with_db!(self, db, {
            db.execute(
                "INSERT INTO files (
                    case_number, case_type, purpose, uploaded_by, current_location, notes, required_on
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    file.case_number,
                    file.case_type,
                    file.purpose,
                    file.uploaded_by,
                    file.current_location,
                    file.notes,
                    file.required_on,
                ],
            )?;

            let file_id = db.last_insert_rowid();
            tracing::debug!("[DB] 新建案卷 {} ({})", file_id, file.case_number);
            Ok(file_id)
        })
    }

    /// 编辑案卷，出庭日期或备注变化时写入历史
    pub fn update_file(&self, update: &CaseFileUpdate) -> DbResult<()> {
        with_db!(self, db, {
            let tx = db.unchecked_transaction()?;

            let previous: Option<(Option<String>, Option<String>)> = tx
                .query_row(
                    "SELECT required_on, notes FROM files WHERE file_id = ?1",
                    params![update.file_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let Some((old_required_on, old_notes)) = previous else {
                return Err(DbError::not_found("file", update.file_id));
            };

            tx.execute(
                "UPDATE files
                 SET case_number = ?1,
                     case_type = ?2,
                     purpose = ?3,
                     current_location = ?4,
                     notes = ?5,
                     required_on = ?6
                 WHERE file_id = ?7",
                params![
                    update.case_number,
                    update.case_type,
                    update.purpose,
                    update.current_location,
                    update.notes,
                    update.required_on,
                    update.file_id,
                ],
            )?;

            if let Some(required_on) = &update.required_on
                && old_required_on.as_ref() != Some(required_on)
            {
                let note = update.notes.as_deref().unwrap_or_default();
                record_required_on(&tx, update.file_id, required_on, note)?;
            }

            if let Some(notes) = &update.notes
                && old_notes.as_ref() != Some(notes)
            {
                record_note(&tx, update.file_id, notes, update.updated_by)?;
            }

            tx.commit()?;
            Ok(())
        })
    }

    /// 修改单个日期列（列名白名单）
    pub fn update_file_date(
        &self,
        file_id: i64,
        field: FileDateField,
        new_date: &str,
    ) -> DbResult<()> {
        with_db!(self, db, {
            let tx = db.unchecked_transaction()?;

            let affected = tx.execute(
                &format!("UPDATE files SET {} = ?1 WHERE file_id = ?2", field.column()),
                params![new_date, file_id],
            )?;
            ensure_affected(affected, "file", file_id)?;

            if field == FileDateField::RequiredOn {
                record_required_on(&tx, file_id, new_date, "")?;
            }

            tx.commit()?;
            Ok(())
        })
    }

    /// 修改备注并写入备注历史
    pub fn update_file_notes(
        &self,
        file_id: i64,
        new_notes: &str,
        created_by: Option<i64>,
    ) -> DbResult<()> {
        with_db!(self, db, {
            let tx = db.unchecked_transaction()?;

            let affected = tx.execute(
                "UPDATE files SET notes = ?1 WHERE file_id = ?2",
                params![new_notes, file_id],
            )?;
            ensure_affected(affected, "file", file_id)?;
            record_note(&tx, file_id, new_notes, created_by)?;

            tx.commit()?;
            Ok(())
        })
    }

    /// 标记案卷已归还
    pub fn mark_file_returned(
        &self,
        file_id: i64,
        return_date: &str,
        return_signature: &str,
    ) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE files SET date_returned = ?1, date_returned_signature = ?2 WHERE file_id = ?3",
                params![return_date, return_signature, file_id],
            )?;
            ensure_affected(affected, "file", file_id)
        })
    }

    /// 软删除案卷
    pub fn delete_file(&self, file_id: i64) -> DbResult<()> {
        self.set_file_deleted(file_id, true)
    }

    /// 恢复软删除的案卷
    pub fn restore_file(&self, file_id: i64) -> DbResult<()> {
        self.set_file_deleted(file_id, false)
    }

    fn set_file_deleted(&self, file_id: i64, deleted: bool) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE files SET deleted = ?1 WHERE file_id = ?2",
                params![deleted, file_id],
            )?;
            ensure_affected(affected, "file", file_id)?;

            tracing::debug!("[DB] 案卷 {} deleted={}", file_id, deleted);
            Ok(())
        })
    }

    // ========================================================================
    // 历史记录
    // ========================================================================

    /// 获取出庭日期历史（按日期升序）
    pub fn get_required_on_history(&self, file_id: i64) -> DbResult<Vec<RequiredOnHistory>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(
                "SELECT required_on, note, created_at FROM history_required_on
                 WHERE file_id = ?1 ORDER BY required_on ASC, id ASC",
            )?;

            let rows = stmt
                .query_map(params![file_id], |row| {
                    Ok(RequiredOnHistory {
                        required_on: row.get(0)?,
                        note: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// 获取备注历史（按时间升序）
    pub fn get_notes_history(&self, file_id: i64) -> DbResult<Vec<NoteHistory>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(
                "SELECT note, created_by, created_at FROM history_notes
                 WHERE file_id = ?1 ORDER BY created_at ASC, id ASC",
            )?;

            let rows = stmt
                .query_map(params![file_id], |row| {
                    Ok(NoteHistory {
                        note: row.get(0)?,
                        created_by: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_file(case_number: &str, purpose: &str, uploaded_by: i64) -> NewCaseFile {
        NewCaseFile {
            case_number: case_number.to_string(),
            case_type: "Civil".to_string(),
            purpose: purpose.to_string(),
            uploaded_by,
            current_location: "Registry".to_string(),
            notes: Some("received".to_string()),
            required_on: Some("2026-10-20".to_string()),
        }
    }

    #[test]
    fn test_add_and_get_file() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_new_file(&new_file("CV/12/2026", "Hearing", 1)).unwrap();

        let file = db.get_file_by_id(id).unwrap().unwrap();
        assert_eq!(file.case_number, "CV/12/2026");
        assert_eq!(file.required_on.as_deref(), Some("2026-10-20"));
        assert!(!file.deleted);
        assert!(file.date_recieved.is_some());

        assert!(db.get_file_by_id(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_empty_case_number_rejected() {
        let db = Database::open_in_memory().unwrap();
        let result = db.add_new_file(&new_file("  ", "Hearing", 1));
        assert!(matches!(result, Err(DbError::InvalidInput(_))));
    }

    #[test]
    fn test_soft_delete_and_restore() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_new_file(&new_file("CR/1/2026", "Mention", 1)).unwrap();

        db.delete_file(id).unwrap();
        assert!(db.get_file_by_id(id).unwrap().unwrap().deleted);
        assert_eq!(db.get_all_files().unwrap().len(), 1);
        assert!(db.search_files_by_case_number("CR/1/2026").unwrap().is_empty());

        db.restore_file(id).unwrap();
        assert_eq!(db.search_files_by_case_number("CR/1/2026").unwrap().len(), 1);

        assert!(matches!(
            db.delete_file(999),
            Err(DbError::NotFound { .. })
        ));
    }

    #[test]
    fn test_filters_by_user_and_purpose() {
        let db = Database::open_in_memory().unwrap();
        db.add_new_file(&new_file("A/1", "Hearing", 1)).unwrap();
        db.add_new_file(&new_file("A/2", "Ruling", 2)).unwrap();
        db.add_new_file(&new_file("A/3", "Hearing", 2)).unwrap();

        assert_eq!(db.filter_files_by_user(2).unwrap().len(), 2);
        let hearings = db.get_files_by_purpose("Hearing").unwrap();
        assert_eq!(hearings.len(), 2);
        assert!(hearings.iter().all(|f| f.purpose == "Hearing"));
    }

    #[test]
    fn test_update_file_records_history() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_new_file(&new_file("A/1", "Hearing", 1)).unwrap();

        db.update_file(&CaseFileUpdate {
            file_id: id,
            case_number: "A/1".into(),
            case_type: "Civil".into(),
            purpose: "Hearing".into(),
            current_location: "Court 2".into(),
            notes: Some("adjourned".into()),
            required_on: Some("2026-11-03".into()),
            updated_by: Some(4),
        })
        .unwrap();

        let file = db.get_file_by_id(id).unwrap().unwrap();
        assert_eq!(file.current_location, "Court 2");

        let required = db.get_required_on_history(id).unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].required_on, "2026-11-03");
        assert_eq!(required[0].note, "adjourned");

        let notes = db.get_notes_history(id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].created_by, Some(4));
    }

    #[test]
    fn test_update_missing_file_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let result = db.update_file(&CaseFileUpdate {
            file_id: 42,
            ..Default::default()
        });
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[test]
    fn test_update_file_date_and_return() {
        let db = Database::open_in_memory().unwrap();
        let id = db.add_new_file(&new_file("A/1", "Hearing", 1)).unwrap();

        db.update_file_date(id, FileDateField::RequiredOn, "2026-12-01")
            .unwrap();
        db.mark_file_returned(id, "2026-10-18", "J. Mutua").unwrap();
        db.update_file_notes(id, "returned to registry", None).unwrap();

        let file = db.get_file_by_id(id).unwrap().unwrap();
        assert_eq!(file.required_on.as_deref(), Some("2026-12-01"));
        assert_eq!(file.date_returned.as_deref(), Some("2026-10-18"));
        assert_eq!(file.date_returned_signature.as_deref(), Some("J. Mutua"));
        assert_eq!(file.notes.as_deref(), Some("returned to registry"));
        assert_eq!(db.get_required_on_history(id).unwrap().len(), 1);
        assert_eq!(db.get_notes_history(id).unwrap().len(), 1);
    }
}
