//! 考勤操作模块

use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, params};

use super::types::{Attendance, AttendanceUpdate, NewAttendance};
use super::{Database, DbError, DbResult, ensure_affected, with_db};

const ATTENDANCE_COLUMNS: &str =
    "attendance_id, staff_id, date, status, reason, half_day, comments";

fn row_to_attendance(row: &Row<'_>) -> rusqlite::Result<Attendance> {
    Ok(Attendance {
        attendance_id: row.get(0)?,
        staff_id: row.get(1)?,
        date: row.get(2)?,
        status: row.get(3)?,
        reason: row.get(4)?,
        half_day: row.get(5)?,
        comments: row.get(6)?,
    })
}

fn validate_status(status: &str) -> DbResult<()> {
    match status {
        "Present" | "Absent" => Ok(()),
        other => Err(DbError::InvalidInput(format!(
            "Invalid status '{other}'. Must be 'Present' or 'Absent'."
        ))),
    }
}

fn validate_date(date: &str) -> DbResult<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| DbError::InvalidInput(format!("Invalid date '{date}', expected YYYY-MM-DD")))
}

impl Database {
    /// 新增考勤记录，返回 attendance_id
    pub fn add_attendance(&self, record: &NewAttendance) -> DbResult<i64> {
        validate_status(&record.status)?;
        validate_date(&record.date)?;

        with_db!(self, db, {
            db.execute(
                "INSERT INTO attendance (staff_id, date, status, reason, half_day, comments)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.staff_id,
                    record.date,
                    record.status,
                    record.reason,
                    record.half_day,
                    record.comments,
                ],
            )?;

            Ok(db.last_insert_rowid())
        })
    }

    pub fn get_all_attendance(&self) -> DbResult<Vec<Attendance>> {
        self.query_attendance("1 = 1", params![])
    }

    pub fn get_attendance_by_staff(&self, staff_id: i64) -> DbResult<Vec<Attendance>> {
        self.query_attendance("staff_id = ?1", params![staff_id])
    }

    pub fn get_attendance(&self, attendance_id: i64) -> DbResult<Option<Attendance>> {
        with_db!(self, db, {
            let record = db
                .query_row(
                    &format!(
                        "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE attendance_id = ?1"
                    ),
                    params![attendance_id],
                    row_to_attendance,
                )
                .optional()?;
            Ok(record)
        })
    }

    fn query_attendance(
        &self,
        condition: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> DbResult<Vec<Attendance>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(&format!(
                "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE {condition}
                 ORDER BY date ASC, attendance_id ASC"
            ))?;
            let records = stmt
                .query_map(args, row_to_attendance)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
    }

    pub fn update_attendance(&self, update: &AttendanceUpdate) -> DbResult<()> {
        validate_status(&update.status)?;

        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE attendance SET status = ?1, reason = ?2, half_day = ?3, comments = ?4
                 WHERE attendance_id = ?5",
                params![
                    update.status,
                    update.reason,
                    update.half_day,
                    update.comments,
                    update.attendance_id,
                ],
            )?;
            ensure_affected(affected, "attendance", update.attendance_id)
        })
    }

    pub fn delete_attendance(&self, attendance_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "DELETE FROM attendance WHERE attendance_id = ?1",
                params![attendance_id],
            )?;
            ensure_affected(affected, "attendance", attendance_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewStaff, NewUser};

    fn seed_staff(db: &Database) -> i64 {
        let user_id = db
            .create_user(&NewUser {
                name: "Kamau".into(),
                role: "Clerk".into(),
                email: "kamau@courts.go.ke".into(),
                password_hash: "hash".into(),
                ..Default::default()
            })
            .unwrap();
        db.create_staff(&NewStaff {
            user_id,
            role: "Clerk".into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn record(staff_id: i64, date: &str, status: &str) -> NewAttendance {
        NewAttendance {
            staff_id,
            date: date.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_and_query_attendance() {
        let db = Database::open_in_memory().unwrap();
        let staff_id = seed_staff(&db);

        let id = db.add_attendance(&record(staff_id, "2026-10-16", "Present")).unwrap();
        db.add_attendance(&record(staff_id, "2026-10-17", "Absent")).unwrap();

        assert_eq!(db.get_all_attendance().unwrap().len(), 2);
        assert_eq!(db.get_attendance_by_staff(staff_id).unwrap().len(), 2);
        assert_eq!(db.get_attendance(id).unwrap().unwrap().status, "Present");
    }

    #[test]
    fn test_invalid_status_and_date_rejected() {
        let db = Database::open_in_memory().unwrap();
        let staff_id = seed_staff(&db);

        assert!(matches!(
            db.add_attendance(&record(staff_id, "2026-10-16", "Late")),
            Err(DbError::InvalidInput(_))
        ));
        assert!(matches!(
            db.add_attendance(&record(staff_id, "16/10/2026", "Present")),
            Err(DbError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_update_and_cascade_delete() {
        let db = Database::open_in_memory().unwrap();
        let staff_id = seed_staff(&db);
        let id = db.add_attendance(&record(staff_id, "2026-10-16", "Present")).unwrap();

        db.update_attendance(&AttendanceUpdate {
            attendance_id: id,
            status: "Absent".into(),
            reason: Some("Sick leave".into()),
            half_day: true,
            comments: None,
        })
        .unwrap();
        let updated = db.get_attendance(id).unwrap().unwrap();
        assert!(updated.half_day);
        assert_eq!(updated.reason.as_deref(), Some("Sick leave"));

        db.delete_staff(staff_id).unwrap();
        assert!(db.get_all_attendance().unwrap().is_empty());
    }
}
