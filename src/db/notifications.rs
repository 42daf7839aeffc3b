//! 通知操作模块
//!
//! 通知同时充当审计日志：工作流在成功后写入一条通知，
//! 审计视图按用户 / 职员名关联展示。

use rusqlite::{OptionalExtension, Row, params};

use super::types::{NewNotification, Notification};
use super::{Database, DbResult, ensure_affected, with_db};

const NOTIFICATION_COLUMNS: &str =
    "notification_id, user_id, message, type, date_created, read_status";

fn row_to_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        notification_id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        notification_type: row.get(3)?,
        date_created: row.get(4)?,
        read_status: row.get(5)?,
    })
}

impl Database {
    /// 新建通知，返回 notification_id
    pub fn create_notification(&self, notification: &NewNotification) -> DbResult<i64> {
        with_db!(self, db, {
            db.execute(
                "INSERT INTO notifications (message, type, user_id) VALUES (?1, ?2, ?3)",
                params![
                    notification.message,
                    notification.notification_type,
                    notification.user_id
                ],
            )?;
            Ok(db.last_insert_rowid())
        })
    }

    /// 获取全部通知（最新在前）
    pub fn get_all_notifications(&self) -> DbResult<Vec<Notification>> {
        with_db!(self, db, {
            let mut stmt = db.prepare(&format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                 ORDER BY date_created DESC, notification_id DESC"
            ))?;
            let notifications = stmt
                .query_map([], row_to_notification)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(notifications)
        })
    }

    pub fn get_notification(&self, notification_id: i64) -> DbResult<Option<Notification>> {
        with_db!(self, db, {
            let notification = db
                .query_row(
                    &format!(
                        "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE notification_id = ?1"
                    ),
                    params![notification_id],
                    row_to_notification,
                )
                .optional()?;
            Ok(notification)
        })
    }

    /// 标记已读（归档也走这里）
    pub fn mark_notification_as_read(&self, notification_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "UPDATE notifications SET read_status = 1 WHERE notification_id = ?1",
                params![notification_id],
            )?;
            ensure_affected(affected, "notification", notification_id)
        })
    }

    pub fn delete_notification(&self, notification_id: i64) -> DbResult<()> {
        with_db!(self, db, {
            let affected = db.execute(
                "DELETE FROM notifications WHERE notification_id = ?1",
                params![notification_id],
            )?;
            ensure_affected(affected, "notification", notification_id)
        })
    }
}
