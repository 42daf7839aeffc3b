//! 审计日志视图
//!
//! 通知即审计记录。按 user_id 在用户表、职员表中依次查找姓名，
//! 都找不到时显示 "Staff"。最新记录在前。

use serde::Serialize;

use super::table::{CellValue, Sortable};
use crate::db::{Notification, Staff, User};

/// 找不到关联人员时的显示名
pub const FALLBACK_ASSIGNEE: &str = "Staff";

/// 审计日志行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub notification_id: i64,
    pub message: String,
    pub assigned_to: String,
    pub notification_type: String,
    pub date_created: String,
    pub read_status: bool,
}

impl Sortable for AuditEntry {
    fn cell(&self, column: &str) -> CellValue {
        match column {
            "notification_id" => CellValue::number(Some(self.notification_id)),
            "message" => CellValue::text(Some(&self.message)),
            "assigned_to" => CellValue::text(Some(&self.assigned_to)),
            "notification_type" => CellValue::text(Some(&self.notification_type)),
            "date_created" => CellValue::text(Some(&self.date_created)),
            _ => CellValue::Missing,
        }
    }
}

fn assignee_name(user_id: Option<i64>, users: &[User], staff: &[Staff]) -> String {
    let Some(user_id) = user_id else {
        return FALLBACK_ASSIGNEE.to_string();
    };

    users
        .iter()
        .find(|u| u.user_id == user_id)
        .map(|u| u.name.as_str())
        .or_else(|| {
            staff
                .iter()
                .find(|s| s.user_id == user_id)
                .map(|s| s.name.as_str())
        })
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(FALLBACK_ASSIGNEE)
        .to_string()
}

/// 生成审计日志（最新在前）
pub fn audit_log(notifications: &[Notification], users: &[User], staff: &[Staff]) -> Vec<AuditEntry> {
    let mut entries: Vec<AuditEntry> = notifications
        .iter()
        .map(|n| AuditEntry {
            notification_id: n.notification_id,
            message: n.message.clone(),
            assigned_to: assignee_name(n.user_id, users, staff),
            notification_type: n.notification_type.clone(),
            date_created: n.date_created.clone(),
            read_status: n.read_status,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.date_created
            .cmp(&a.date_created)
            .then_with(|| b.notification_id.cmp(&a.notification_id))
    });
    entries
}

/// 按消息文本过滤（不区分大小写）
pub fn search_audit_log<'a>(entries: &'a [AuditEntry], text: &str) -> Vec<&'a AuditEntry> {
    let needle = text.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| {
            needle.is_empty()
                || e.message.to_lowercase().contains(&needle)
                || e.assigned_to.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: i64, user_id: Option<i64>, date: &str) -> Notification {
        Notification {
            notification_id: id,
            user_id,
            message: format!("event {id}"),
            notification_type: "Info".into(),
            date_created: date.into(),
            read_status: false,
        }
    }

    #[test]
    fn test_names_resolved_with_fallback() {
        let users = vec![User {
            user_id: 1,
            name: "Registrar Kiptoo".into(),
            ..Default::default()
        }];
        let staff = vec![Staff {
            staff_id: 9,
            user_id: 2,
            name: "Clerk Atieno".into(),
            ..Default::default()
        }];
        let notifications = vec![
            notification(1, Some(1), "2026-10-01 08:00:00"),
            notification(2, Some(2), "2026-10-02 08:00:00"),
            notification(3, Some(42), "2026-10-03 08:00:00"),
            notification(4, None, "2026-10-04 08:00:00"),
        ];

        let log = audit_log(&notifications, &users, &staff);
        let names: Vec<_> = log.iter().map(|e| e.assigned_to.as_str()).collect();
        assert_eq!(names, vec!["Staff", "Staff", "Clerk Atieno", "Registrar Kiptoo"]);
    }

    #[test]
    fn test_newest_first_with_id_tiebreak() {
        let notifications = vec![
            notification(1, None, "2026-10-01 08:00:00"),
            notification(2, None, "2026-10-01 08:00:00"),
            notification(3, None, "2026-09-30 08:00:00"),
        ];
        let ids: Vec<_> = audit_log(&notifications, &[], &[])
            .iter()
            .map(|e| e.notification_id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_search_audit_log() {
        let log = audit_log(&[notification(1, None, "2026-10-01")], &[], &[]);
        assert_eq!(search_audit_log(&log, "EVENT").len(), 1);
        assert!(search_audit_log(&log, "deleted").is_empty());
    }
}
