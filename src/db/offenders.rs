//! 当事人操作模块
//!
//! 数据库只保存照片路径；照片文件由 `photos::PhotoStore` 读写，
//! 两者的编排在命令路由器中完成。

use rusqlite::{OptionalExtension, Row, params};

use super::types::{NewOffenderHistory, Offender, OffenderHistory, OffenderHistoryUpdate};
use super::{Database, DbError, DbResult, ensure_affected, with_db};

const OFFENDER_COLUMNS: &str = "offender_id, full_name, national_id, date_of_birth, gender,
     photo_path, notes, date_created, file_id, penalty, penalty_notes";

const HISTORY_COLUMNS: &str =
    "id, offender_id, file_id, case_id, offense_date, penalty, penalty_notes, notes, created_at";

fn row_to_offender(row: &Row<'_>) -> rusqlite::Result<Offender> {
    Ok(Offender {
        offender_id: row.get(0)?,
        full_name: row.get(1)?,
        national_id: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        photo_path: row.get(5)?,
        notes: row.get(6)?,
        date_created: row.get(7)?,
        file_id: row.get(8)?,
        penalty: row.get(9)?,
        penalty_notes: row.get(10)?,
    })
}

fn row_to_history(row: &Row<'_>) -> rusqlite::Result<OffenderHistory> {
    Ok(OffenderHistory {
        id: row.get(0)?,
        offender_id: row.get(1)?,
        file_id: row.get(2)?,
        case_id: row.get(3)?,
        offense_date: row.get(4)?,
        penalty: row.get(5)?,
        penalty_notes: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// 写入当事人记录时使用的字段（照片已落盘，只剩路径）
#[derive(Debug, Clone, Default)]
pub struct OffenderRecord {
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
    pub file_id: Option<i64>,
    pub penalty: Option<String>,
    pub penalty_notes: Option<String>,
}

impl Database {
    // ========================================================================
    // 当事人
    // ========================================================================

    pub fn list_offenders(&self) -> DbResult<Vec<Offender>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(&format!(
                "SELECT {OFFENDER_COLUMNS} FROM offenders ORDER BY offender_id ASC"
            ))?;
            let offenders = stmt
                .query_map([], row_to_offender)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(offenders)
        })
    }

    pub fn get_offender(&self, offender_id: i64) -> DbResult<Option<Offender>> {
        with_db!(self, db, {
            let offender = db
                .query_row(
                    &format!("SELECT {OFFENDER_COLUMNS} FROM offenders WHERE offender_id = ?1"),
                    params![offender_id],
                    row_to_offender,
                )
                .optional()?;
            Ok(offender)
        })
    }

    /// 新建当事人，返回完整记录
    pub fn create_offender(&self, record: &OffenderRecord) -> DbResult<Offender> {
        let full_name = record.full_name.as_deref().unwrap_or_default().trim();
        if full_name.is_empty() {
            return Err(DbError::InvalidInput(
                "full_name must not be empty".into(),
            ));
        }

        let offender_id = with_db!(self, db, {
            db.execute(
                "INSERT INTO offenders (full_name, national_id, date_of_birth, gender, photo_path,
                                        notes, file_id, penalty, penalty_notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    full_name,
                    record.national_id,
                    record.date_of_birth,
                    record.gender,
                    record.photo_path,
                    record.notes,
                    record.file_id,
                    record.penalty,
                    record.penalty_notes,
                ],
            )?;
            db.last_insert_rowid()
        });

        self.get_offender(offender_id)?
            .ok_or_else(|| DbError::not_found("offender", offender_id))
    }

    /// 修改当事人，`None` 字段保持原值，返回修改后的记录
    pub fn update_offender(&self, offender_id: i64, record: &OffenderRecord) -> DbResult<Offender> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE offenders SET
                    full_name = COALESCE(?2, full_name),
                    national_id = COALESCE(?3, national_id),
                    date_of_birth = COALESCE(?4, date_of_birth),
                    gender = COALESCE(?5, gender),
                    notes = COALESCE(?6, notes),
                    photo_path = COALESCE(?7, photo_path),
                    file_id = COALESCE(?8, file_id),
                    penalty = COALESCE(?9, penalty),
                    penalty_notes = COALESCE(?10, penalty_notes)
                 WHERE offender_id = ?1",
                params![
                    offender_id,
                    record.full_name,
                    record.national_id,
                    record.date_of_birth,
                    record.gender,
                    record.notes,
                    record.photo_path,
                    record.file_id,
                    record.penalty,
                    record.penalty_notes,
                ],
            )?;
            ensure_affected(affected, "offender", offender_id)?;
        });

        self.get_offender(offender_id)?
            .ok_or_else(|| DbError::not_found("offender", offender_id))
    }

    /// 删除当事人（犯罪记录级联删除），返回原照片路径
    pub fn delete_offender(&self, offender_id: i64) -> DbResult<Option<String>> {
        with_db!(self, db, {
            let photo_path: Option<Option<String>> = db
                .query_row(
                    "SELECT photo_path FROM offenders WHERE offender_id = ?1",
                    params![offender_id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(photo_path) = photo_path else {
                return Err(DbError::not_found("offender", offender_id));
            };

            db.execute(
                "DELETE FROM offenders WHERE offender_id = ?1",
                params![offender_id],
            )?;
            Ok(photo_path)
        })
    }

    /// 获取照片路径
    pub fn get_offender_photo_path(&self, offender_id: i64) -> DbResult<Option<String>> {
        Ok(self
            .get_offender(offender_id)?
            .ok_or_else(|| DbError::not_found("offender", offender_id))?
            .photo_path)
    }

    // ========================================================================
    // 犯罪记录
    // ========================================================================

    /// 按犯罪日期、创建时间倒序列出
    pub fn list_offender_history(&self, offender_id: i64) -> DbResult<Vec<OffenderHistory>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(&format!(
                "SELECT {HISTORY_COLUMNS} FROM offender_history WHERE offender_id = ?1
                 ORDER BY offense_date DESC, created_at DESC, id DESC"
            ))?;
            let history = stmt
                .query_map(params![offender_id], row_to_history)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(history)
        })
    }

    fn get_offender_history(&self, id: i64) -> DbResult<OffenderHistory> {
        with_db!(self, db, {
            db.query_row(
                &format!("SELECT {HISTORY_COLUMNS} FROM offender_history WHERE id = ?1"),
                params![id],
                row_to_history,
            )
            .optional()?
            .ok_or_else(|| DbError::not_found("offender history", id))
        })
    }

    pub fn add_offender_history(&self, entry: &NewOffenderHistory) -> DbResult<OffenderHistory> {
        let id = with_db!(self, db, {
            db.execute(
                "INSERT INTO offender_history (offender_id, file_id, case_id, offense_date, penalty,
                                               penalty_notes, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.offender_id,
                    entry.file_id,
                    entry.case_id,
                    entry.offense_date,
                    entry.penalty,
                    entry.penalty_notes,
                    entry.notes,
                ],
            )?;
            db.last_insert_rowid()
        });

        self.get_offender_history(id)
    }

    pub fn update_offender_history(
        &self,
        update: &OffenderHistoryUpdate,
    ) -> DbResult<OffenderHistory> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE offender_history SET
                    offender_id = COALESCE(?2, offender_id),
                    file_id = COALESCE(?3, file_id),
                    case_id = COALESCE(?4, case_id),
                    offense_date = COALESCE(?5, offense_date),
                    penalty = COALESCE(?6, penalty),
                    penalty_notes = COALESCE(?7, penalty_notes),
                    notes = COALESCE(?8, notes)
                 WHERE id = ?1",
                params![
                    update.id,
                    update.offender_id,
                    update.file_id,
                    update.case_id,
                    update.offense_date,
                    update.penalty,
                    update.penalty_notes,
                    update.notes,
                ],
            )?;
            ensure_affected(affected, "offender history", update.id)?;
        });

        self.get_offender_history(update.id)
    }

    pub fn delete_offender_history(&self, id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected =
                db.execute("DELETE FROM offender_history WHERE id = ?1", params![id])?;
            ensure_affected(affected, "offender history", id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, national_id: &str) -> OffenderRecord {
        OffenderRecord {
            full_name: Some(name.into()),
            national_id: Some(national_id.into()),
            gender: Some("Male".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_partial_update() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create_offender(&record("John Kioko", "12345678")).unwrap();
        assert!(created.date_created.is_some());

        let updated = db
            .update_offender(
                created.offender_id,
                &OffenderRecord {
                    penalty: Some("Fine".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.full_name, "John Kioko");
        assert_eq!(updated.national_id.as_deref(), Some("12345678"));
        assert_eq!(updated.penalty.as_deref(), Some("Fine"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let db = Database::open_in_memory().unwrap();
        let result = db.create_offender(&record("   ", "1"));
        assert!(matches!(result, Err(DbError::InvalidInput(_))));
    }

    #[test]
    fn test_delete_returns_photo_path_and_cascades() {
        let db = Database::open_in_memory().unwrap();
        let mut rec = record("Mary Ndinda", "998877");
        rec.photo_path = Some("/tmp/photo.jpg".into());
        let offender = db.create_offender(&rec).unwrap();

        db.add_offender_history(&NewOffenderHistory {
            offender_id: offender.offender_id,
            offense_date: Some("2025-01-10".into()),
            penalty: Some("Probation".into()),
            ..Default::default()
        })
        .unwrap();

        let path = db.delete_offender(offender.offender_id).unwrap();
        assert_eq!(path.as_deref(), Some("/tmp/photo.jpg"));
        assert!(db.list_offender_history(offender.offender_id).unwrap().is_empty());
        assert!(matches!(
            db.delete_offender(offender.offender_id),
            Err(DbError::NotFound { .. })
        ));
    }

    #[test]
    fn test_history_order_and_update() {
        let db = Database::open_in_memory().unwrap();
        let offender = db.create_offender(&record("Peter Musyoka", "555")).unwrap();

        let older = db
            .add_offender_history(&NewOffenderHistory {
                offender_id: offender.offender_id,
                offense_date: Some("2024-03-01".into()),
                ..Default::default()
            })
            .unwrap();
        let newer = db
            .add_offender_history(&NewOffenderHistory {
                offender_id: offender.offender_id,
                offense_date: Some("2025-06-15".into()),
                ..Default::default()
            })
            .unwrap();

        let history = db.list_offender_history(offender.offender_id).unwrap();
        assert_eq!(history[0].id, newer.id);
        assert_eq!(history[1].id, older.id);

        let updated = db
            .update_offender_history(&OffenderHistoryUpdate {
                id: older.id,
                notes: Some("Served".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Served"));
        assert_eq!(updated.offense_date.as_deref(), Some("2024-03-01"));

        db.delete_offender_history(older.id).unwrap();
        assert_eq!(db.list_offender_history(offender.offender_id).unwrap().len(), 1);
    }
}
