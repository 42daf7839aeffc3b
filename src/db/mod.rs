//! 本地数据库模块
//!
//! 使用 rusqlite 实现法院登记处数据的本地存储，命令路由器（`bridge::CommandRouter`）
//! 通过这里的方法响应前端命令。
//!
//! ## 模块结构
//!
//! - `types`: 数据类型定义（CaseFile, Staff, Notification, Offender ...）
//! - `files`: 案卷操作（软删除、归还、日期与备注历史）
//! - `users` / `staff` / `attendance`: 人员与考勤
//! - `cases`: 案件
//! - `notifications`: 通知 / 审计日志
//! - `offenders`: 当事人及犯罪记录
//! - `directory`: 通讯录、公告、主题
//! - `reports`: 摘要与报表
//!
//! ## 数据库路径
//!
//! ```text
//! {数据根目录}/court_registry.db
//! ```
//!
//! 一个 `Database` 持有一个连接，由 `parking_lot::Mutex` 串行化访问。

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

pub mod attendance;
pub mod cases;
pub mod directory;
pub mod error;
pub mod files;
pub mod notifications;
pub mod offenders;
pub mod reports;
pub mod staff;
pub mod types;
pub mod users;

pub use error::{DbError, DbResult};
pub use types::*;

// ============================================================================
// 数据库连接管理
// ============================================================================

/// 本地数据库（线程安全）
pub struct Database {
    conn: Mutex<Connection>,
}

/// 获取数据库连接的辅助宏
macro_rules! with_db {
    ($database:expr, $db:ident, $body:block) => {{
        let guard = $database.conn.lock();
        let $db: &rusqlite::Connection = &guard;
        $body
    }};
}

// 在模块内部重新导出宏
pub(crate) use with_db;

/// 建表语句，按依赖顺序排列
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        "CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone_number TEXT,
            password_hash TEXT NOT NULL,
            professional_title TEXT,
            status TEXT NOT NULL DEFAULT 'Active'
        )",
    ),
    (
        "staff",
        "CREATE TABLE IF NOT EXISTS staff (
            staff_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            role TEXT NOT NULL,
            contact_number TEXT,
            status TEXT NOT NULL DEFAULT 'Active',
            FOREIGN KEY (user_id) REFERENCES users(user_id) ON DELETE CASCADE
        )",
    ),
    (
        "attendance",
        "CREATE TABLE IF NOT EXISTS attendance (
            attendance_id INTEGER PRIMARY KEY AUTOINCREMENT,
            staff_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('Present', 'Absent')),
            reason TEXT,
            half_day INTEGER NOT NULL DEFAULT 0,
            comments TEXT,
            FOREIGN KEY (staff_id) REFERENCES staff(staff_id) ON DELETE CASCADE
        )",
    ),
    (
        "cases",
        "CREATE TABLE IF NOT EXISTS cases (
            case_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Open',
            assigned_staff_id INTEGER,
            priority TEXT NOT NULL DEFAULT 'Medium',
            date_created TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (assigned_staff_id) REFERENCES staff(staff_id) ON DELETE SET NULL
        )",
    ),
    (
        "files",
        "CREATE TABLE IF NOT EXISTS files (
            file_id INTEGER PRIMARY KEY AUTOINCREMENT,
            case_number TEXT NOT NULL,
            case_type TEXT NOT NULL,
            purpose TEXT NOT NULL,
            uploaded_by INTEGER NOT NULL,
            current_location TEXT NOT NULL,
            notes TEXT,
            date_recieved TEXT DEFAULT (date('now')),
            required_on TEXT,
            required_on_signature TEXT,
            date_returned TEXT,
            date_returned_signature TEXT,
            deleted INTEGER NOT NULL DEFAULT 0
        )",
    ),
    (
        "idx_files_case_number",
        "CREATE INDEX IF NOT EXISTS idx_files_case_number ON files(case_number)",
    ),
    (
        "idx_files_uploaded_by",
        "CREATE INDEX IF NOT EXISTS idx_files_uploaded_by ON files(uploaded_by)",
    ),
    (
        "idx_files_purpose",
        "CREATE INDEX IF NOT EXISTS idx_files_purpose ON files(purpose)",
    ),
    (
        "history_required_on",
        "CREATE TABLE IF NOT EXISTS history_required_on (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id INTEGER NOT NULL,
            required_on TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (file_id) REFERENCES files(file_id) ON DELETE CASCADE
        )",
    ),
    (
        "history_notes",
        "CREATE TABLE IF NOT EXISTS history_notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_id INTEGER NOT NULL,
            note TEXT NOT NULL,
            created_by INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (file_id) REFERENCES files(file_id) ON DELETE CASCADE
        )",
    ),
    (
        "notifications",
        "CREATE TABLE IF NOT EXISTS notifications (
            notification_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            message TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT 'Info',
            date_created TEXT NOT NULL DEFAULT (datetime('now')),
            read_status INTEGER NOT NULL DEFAULT 0
        )",
    ),
    (
        "offenders",
        "CREATE TABLE IF NOT EXISTS offenders (
            offender_id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT NOT NULL,
            national_id TEXT,
            date_of_birth TEXT,
            gender TEXT,
            photo_path TEXT,
            notes TEXT,
            date_created TEXT DEFAULT (datetime('now')),
            file_id INTEGER,
            penalty TEXT,
            penalty_notes TEXT,
            FOREIGN KEY (file_id) REFERENCES files(file_id) ON DELETE SET NULL
        )",
    ),
    (
        "offender_history",
        "CREATE TABLE IF NOT EXISTS offender_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            offender_id INTEGER NOT NULL,
            file_id INTEGER,
            case_id INTEGER,
            offense_date TEXT,
            penalty TEXT,
            penalty_notes TEXT,
            notes TEXT,
            created_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (offender_id) REFERENCES offenders(offender_id) ON DELETE CASCADE
        )",
    ),
    (
        "contacts",
        "CREATE TABLE IF NOT EXISTS contacts (
            contact_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            phone_number TEXT
        )",
    ),
    (
        "news",
        "CREATE TABLE IF NOT EXISTS news (
            news_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            date_created TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    ),
    (
        "summaries",
        "CREATE TABLE IF NOT EXISTS summaries (
            summary_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            category TEXT NOT NULL,
            generated_by TEXT NOT NULL,
            date_created TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    ),
    (
        "reports",
        "CREATE TABLE IF NOT EXISTS reports (
            report_id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL,
            data_json TEXT NOT NULL,
            date_created TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    ),
    (
        "themes",
        "CREATE TABLE IF NOT EXISTS themes (
            theme_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            config_json TEXT NOT NULL,
            user_id INTEGER
        )",
    ),
];

impl Database {
    /// 打开（或创建）数据库文件并建表
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();

        // 确保目录存在
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!("[DB] 初始化数据库: {:?}", path);
        Self::init(Connection::open(path)?)
    }

    /// 打开内存数据库（测试、临时会话）
    pub fn open_in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        // 启用外键约束
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        for &(table, sql) in SCHEMA {
            conn.execute(sql, [])
                .map_err(|source| DbError::Schema { table, source })?;
        }

        tracing::info!("[DB] 数据库初始化完成");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ========================================================================
    // 清理操作
    // ========================================================================

    /// 清空所有本地数据
    pub fn clear_all_data(&self) -> DbResult<()> {
        with_db!(self, db, {
            db.execute_batch(
                "DELETE FROM offender_history;
                 DELETE FROM offenders;
                 DELETE FROM history_notes;
                 DELETE FROM history_required_on;
                 DELETE FROM files;
                 DELETE FROM attendance;
                 DELETE FROM cases;
                 DELETE FROM staff;
                 DELETE FROM users;
                 DELETE FROM notifications;
                 DELETE FROM contacts;
                 DELETE FROM news;
                 DELETE FROM summaries;
                 DELETE FROM reports;
                 DELETE FROM themes;",
            )?;

            tracing::info!("[DB] 已清空所有本地数据");
            Ok(())
        })
    }
}

/// 受影响行数为 0 时返回 NotFound
pub(crate) fn ensure_affected(
    affected: usize,
    entity: &'static str,
    id: impl ToString,
) -> DbResult<()> {
    if affected == 0 {
        Err(DbError::not_found(entity, id))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_schema() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = with_db!(db, conn, {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('files', 'staff', 'offenders')",
                [],
                |row| row.get(0),
            )
            .unwrap()
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn test_open_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("registry.db");

        drop(Database::open(&path).unwrap());
        let db = Database::open(&path).unwrap();
        db.clear_all_data().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_ensure_affected() {
        assert!(ensure_affected(1, "file", 1).is_ok());
        assert!(matches!(
            ensure_affected(0, "file", 7),
            Err(DbError::NotFound { entity: "file", .. })
        ));
    }
}
