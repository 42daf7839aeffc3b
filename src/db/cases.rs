//! 案件操作模块

use rusqlite::{OptionalExtension, Row, params};

use super::types::Case;
use super::{Database, DbResult, ensure_affected, with_db};

const CASE_COLUMNS: &str = "case_id, title, status, assigned_staff_id, priority, date_created";

fn row_to_case(row: &Row<'_>) -> rusqlite::Result<Case> {
    Ok(Case {
        case_id: row.get(0)?,
        title: row.get(1)?,
        status: row.get(2)?,
        assigned_staff_id: row.get(3)?,
        priority: row.get(4)?,
        date_created: row.get(5)?,
    })
}

impl Database {
    /// 新建案件（状态 Open，默认优先级 Medium），返回 case_id
    pub fn create_case(
        &self,
        title: &str,
        assigned_staff_id: Option<i64>,
        priority: Option<&str>,
    ) -> DbResult<i64> {
        with_db!(self, db, {
            db.execute(
                "INSERT INTO cases (title, status, assigned_staff_id, priority) VALUES (?1, 'Open', ?2, ?3)",
                params![title, assigned_staff_id, priority.unwrap_or("Medium")],
            )?;
            Ok(db.last_insert_rowid())
        })
    }

    pub fn get_case(&self, case_id: i64) -> DbResult<Option<Case>> {
        with_db!(self, db, {
            let case = db
                .query_row(
                    &format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1"),
                    params![case_id],
                    row_to_case,
                )
                .optional()?;
            Ok(case)
        })
    }

    pub fn get_all_cases(&self) -> DbResult<Vec<Case>> {
        with_db!(self, db, {
            let mut stmt =
                db.prepare(&format!("SELECT {CASE_COLUMNS} FROM cases ORDER BY case_id ASC"))?;
            let cases = stmt
                .query_map([], row_to_case)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(cases)
        })
    }

    pub fn update_case_status(&self, case_id: i64, status: &str) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE cases SET status = ?1 WHERE case_id = ?2",
                params![status, case_id],
            )?;
            ensure_affected(affected, "case", case_id)
        })
    }

    /// 指派负责职员，`None` 表示取消指派
    pub fn assign_staff_to_case(&self, case_id: i64, staff_id: Option<i64>) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE cases SET assigned_staff_id = ?1 WHERE case_id = ?2",
                params![staff_id, case_id],
            )?;
            ensure_affected(affected, "case", case_id)
        })
    }

    pub fn delete_case(&self, case_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute("DELETE FROM cases WHERE case_id = ?1", params![case_id])?;
            ensure_affected(affected, "case", case_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, NewStaff, NewUser};

    #[test]
    fn test_case_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let case_id = db.create_case("Republic v. Mwangi", None, None).unwrap();

        let case = db.get_case(case_id).unwrap().unwrap();
        assert_eq!(case.status, "Open");
        assert_eq!(case.priority, "Medium");
        assert!(case.assigned_staff_id.is_none());

        db.update_case_status(case_id, "In Progress").unwrap();
        assert_eq!(db.get_case(case_id).unwrap().unwrap().status, "In Progress");

        db.delete_case(case_id).unwrap();
        assert!(db.get_all_cases().unwrap().is_empty());
    }

    #[test]
    fn test_assign_staff() {
        let db = Database::open_in_memory().unwrap();
        let user_id = db
            .create_user(&NewUser {
                name: "Njeri".into(),
                role: "Clerk".into(),
                email: "njeri@courts.go.ke".into(),
                password_hash: "hash".into(),
                ..Default::default()
            })
            .unwrap();
        let staff_id = db
            .create_staff(&NewStaff {
                user_id,
                role: "Clerk".into(),
                ..Default::default()
            })
            .unwrap();
        let case_id = db.create_case("Estate of Kariuki", None, Some("High")).unwrap();

        db.assign_staff_to_case(case_id, Some(staff_id)).unwrap();
        assert_eq!(
            db.get_case(case_id).unwrap().unwrap().assigned_staff_id,
            Some(staff_id)
        );

        // 删除职员后案件保留，负责人置空
        db.delete_staff(staff_id).unwrap();
        assert_eq!(db.get_case(case_id).unwrap().unwrap().assigned_staff_id, None);

        assert!(matches!(
            db.assign_staff_to_case(999, None),
            Err(DbError::NotFound { .. })
        ));
    }
}
