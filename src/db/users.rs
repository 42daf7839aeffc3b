//! 用户操作模块

use rusqlite::{OptionalExtension, Row, params};

use super::types::{NewUser, User};
use super::{Database, DbResult, ensure_affected, with_db};

const USER_COLUMNS: &str =
    "user_id, name, role, email, phone_number, password_hash, professional_title, status";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
        password_hash: row.get(5)?,
        professional_title: row.get(6)?,
        status: row.get(7)?,
    })
}

impl Database {
    /// 新建用户（状态为 Active），返回 user_id
    pub fn create_user(&self, user: &NewUser) -> DbResult<i64> {
        with_db!(self, db, {
            db.execute(
                "INSERT INTO users (name, role, email, phone_number, password_hash, professional_title, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'Active')",
                params![
                    user.name,
                    user.role,
                    user.email,
                    user.phone_number,
                    user.password_hash,
                    user.professional_title,
                ],
            )?;

            Ok(db.last_insert_rowid())
        })
    }

    pub fn get_user(&self, user_id: i64) -> DbResult<Option<User>> {
        self.query_user("user_id = ?1", params![user_id])
    }

    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.query_user("email = ?1", params![email])
    }

    fn query_user(&self, condition: &str, args: &[&dyn rusqlite::ToSql]) -> DbResult<Option<User>> {
        with_db!(self, db, {
            let user = db
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE {condition}"),
                    args,
                    row_to_user,
                )
                .optional()?;
            Ok(user)
        })
    }

    pub fn get_all_users(&self) -> DbResult<Vec<User>> {
        with_db!(self, db, {
            let mut stmt =
                db.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY user_id ASC"))?;
            let users = stmt
                .query_map([], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        })
    }

    pub fn update_user_status(&self, user_id: i64, status: &str) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE users SET status = ?1 WHERE user_id = ?2",
                params![status, user_id],
            )?;
            ensure_affected(affected, "user", user_id)
        })
    }

    pub fn delete_user(&self, user_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute("DELETE FROM users WHERE user_id = ?1", params![user_id])?;
            ensure_affected(affected, "user", user_id)
        })
    }
}
