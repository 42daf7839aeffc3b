//! 职员操作模块
//!
//! 职员记录依附于用户记录（`staff.user_id`），姓名从 `users` 表关联查询。

use rusqlite::{OptionalExtension, Row, params};

use super::types::{NewStaff, Staff, StaffUpdate};
use super::{Database, DbResult, ensure_affected, with_db};

const STAFF_SELECT: &str = "SELECT s.staff_id, s.user_id, COALESCE(u.name, ''), s.role,
            s.contact_number, s.status
     FROM staff s LEFT JOIN users u ON u.user_id = s.user_id";

fn row_to_staff(row: &Row<'_>) -> rusqlite::Result<Staff> {
    Ok(Staff {
        staff_id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        role: row.get(3)?,
        contact_number: row.get(4)?,
        status: row.get(5)?,
    })
}

impl Database {
    /// 新建职员（默认状态 Active），返回 staff_id
    pub fn create_staff(&self, staff: &NewStaff) -> DbResult<i64> {
        with_db!(self, db, {
            db.execute(
                "INSERT INTO staff (user_id, role, contact_number, status) VALUES (?1, ?2, ?3, ?4)",
                params![
                    staff.user_id,
                    staff.role,
                    staff.contact_number,
                    staff.status.as_deref().unwrap_or("Active"),
                ],
            )?;

            Ok(db.last_insert_rowid())
        })
    }

    pub fn get_staff(&self, staff_id: i64) -> DbResult<Option<Staff>> {
        with_db!(self, db, {
            let staff = db
                .query_row(
                    &format!("{STAFF_SELECT} WHERE s.staff_id = ?1"),
                    params![staff_id],
                    row_to_staff,
                )
                .optional()?;
            Ok(staff)
        })
    }

    pub fn get_all_staff(&self) -> DbResult<Vec<Staff>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(&format!("{STAFF_SELECT} ORDER BY s.staff_id ASC"))?;
            let staff = stmt
                .query_map([], row_to_staff)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(staff)
        })
    }

    /// 编辑职员（角色、电话、状态）
    pub fn update_staff(&self, update: &StaffUpdate) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE staff SET role = ?1, contact_number = ?2, status = ?3 WHERE staff_id = ?4",
                params![
                    update.role,
                    update.contact_number,
                    update.status,
                    update.staff_id
                ],
            )?;
            ensure_affected(affected, "staff", update.staff_id)
        })
    }

    pub fn update_staff_status(&self, staff_id: i64, status: &str) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE staff SET status = ?1 WHERE staff_id = ?2",
                params![status, staff_id],
            )?;
            ensure_affected(affected, "staff", staff_id)
        })
    }

    /// 删除职员（考勤记录级联删除，关联用户保留）
    pub fn delete_staff(&self, staff_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute("DELETE FROM staff WHERE staff_id = ?1", params![staff_id])?;
            ensure_affected(affected, "staff", staff_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, NewUser};

    fn seed_user(db: &Database, name: &str) -> i64 {
        db.create_user(&NewUser {
            name: name.to_string(),
            role: "Clerk".to_string(),
            email: format!("{}@courts.go.ke", name.to_lowercase()),
            password_hash: "hash".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_staff_name_comes_from_user() {
        let db = Database::open_in_memory().unwrap();
        let user_id = seed_user(&db, "Otieno");
        let staff_id = db
            .create_staff(&NewStaff {
                user_id,
                role: "Registry Clerk".into(),
                contact_number: Some("0700111222".into()),
                status: None,
            })
            .unwrap();

        let staff = db.get_staff(staff_id).unwrap().unwrap();
        assert_eq!(staff.name, "Otieno");
        assert_eq!(staff.status, "Active");
        assert_eq!(db.get_all_staff().unwrap().len(), 1);
    }

    #[test]
    fn test_staff_requires_existing_user() {
        let db = Database::open_in_memory().unwrap();
        let result = db.create_staff(&NewStaff {
            user_id: 404,
            role: "Clerk".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }

    #[test]
    fn test_update_and_delete_staff() {
        let db = Database::open_in_memory().unwrap();
        let user_id = seed_user(&db, "Akinyi");
        let staff_id = db
            .create_staff(&NewStaff {
                user_id,
                role: "Clerk".into(),
                ..Default::default()
            })
            .unwrap();

        db.update_staff(&StaffUpdate {
            staff_id,
            role: "Senior Clerk".into(),
            contact_number: None,
            status: "Absent".into(),
        })
        .unwrap();
        let staff = db.get_staff(staff_id).unwrap().unwrap();
        assert_eq!(staff.role, "Senior Clerk");
        assert_eq!(staff.status, "Absent");

        db.update_staff_status(staff_id, "Active").unwrap();
        db.delete_staff(staff_id).unwrap();
        assert!(db.get_staff(staff_id).unwrap().is_none());
        assert!(db.get_user(user_id).unwrap().is_some());
        assert!(matches!(
            db.update_staff_status(staff_id, "Active"),
            Err(DbError::NotFound { .. })
        ));
    }
}
