//! 面板状态
//!
//! `DashboardStore` 持有类型化客户端和各列表的缓存，由桌面壳持有
//! （Tauri state 中用 `Mutex` 包裹）。
//!
//! ## 表单流程
//!
//! 每个流程按顺序调用后端命令：
//! 1. 任一步失败：推送错误提示，终止剩余步骤，返回失败的步骤名
//! 2. 全部成功：推送成功提示，写入审计通知，刷新相关列表
//!
//! 已完成的步骤不会回滚（例如创建用户成功、创建职员失败时用户保留）。
//! 审计通知写入失败和刷新失败只记录日志，不影响流程结果。

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::{Bridge, BridgeError};
use crate::client::{Client, ClientError, ClientResult};
use crate::db::{
    Attendance, CaseFile, CaseFileUpdate, NewCaseFile, NewNotification, NewOffender, NewStaff,
    NewUser, Notification, Offender, Staff, StaffUpdate, User,
};

// ============================================================================
// 提示与错误
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// 界面提示（等价于前端的 toast）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// 流程失败：哪一步、什么错误
#[derive(Error, Debug)]
#[error("{step} failed: {source}")]
pub struct WorkflowError {
    pub step: &'static str,
    #[source]
    pub source: ClientError,
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

/// 新增职员表单
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffForm {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub professional_title: Option<String>,
    pub password_hash: String,
}

// ============================================================================
// 状态
// ============================================================================

pub struct DashboardStore<B> {
    client: Client<B>,
    files: Vec<CaseFile>,
    staff: Vec<Staff>,
    users: Vec<User>,
    notifications: Vec<Notification>,
    offenders: Vec<Offender>,
    attendance: Vec<Attendance>,
    notices: VecDeque<Notice>,
}

impl<B: Bridge> DashboardStore<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            client: Client::new(bridge),
            files: Vec::new(),
            staff: Vec::new(),
            users: Vec::new(),
            notifications: Vec::new(),
            offenders: Vec::new(),
            attendance: Vec::new(),
            notices: VecDeque::new(),
        }
    }

    pub fn client(&self) -> &Client<B> {
        &self.client
    }

    /// 未删除的案卷
    pub fn files(&self) -> &[CaseFile] {
        &self.files
    }

    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn offenders(&self) -> &[Offender] {
        &self.offenders
    }

    pub fn attendance(&self) -> &[Attendance] {
        &self.attendance
    }

    /// 取出所有待显示的提示
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    // ========================================================================
    // 刷新
    // ========================================================================

    pub fn refresh_files(&mut self) -> ClientResult<()> {
        let files = self.client.get_all_files()?;
        self.files = files.into_iter().filter(|f| !f.deleted).collect();
        Ok(())
    }

    pub fn refresh_staff(&mut self) -> ClientResult<()> {
        self.staff = self.client.get_all_staff()?;
        Ok(())
    }

    pub fn refresh_users(&mut self) -> ClientResult<()> {
        self.users = self.client.get_all_users()?;
        Ok(())
    }

    pub fn refresh_notifications(&mut self) -> ClientResult<()> {
        self.notifications = self.client.get_all_notifications()?;
        Ok(())
    }

    pub fn refresh_offenders(&mut self) -> ClientResult<()> {
        self.offenders = self.client.list_offenders()?;
        Ok(())
    }

    pub fn refresh_attendance(&mut self) -> ClientResult<()> {
        self.attendance = self.client.get_all_attendance()?;
        Ok(())
    }

    pub fn refresh_all(&mut self) -> ClientResult<()> {
        self.refresh_files()?;
        self.refresh_staff()?;
        self.refresh_users()?;
        self.refresh_notifications()?;
        self.refresh_offenders()?;
        self.refresh_attendance()?;
        tracing::debug!(
            "[Store] 已刷新: {} 个案卷, {} 名职员, {} 条通知",
            self.files.len(),
            self.staff.len(),
            self.notifications.len()
        );
        Ok(())
    }

    // ========================================================================
    // 流程辅助
    // ========================================================================

    fn push(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// 检查一步的结果，失败时推送错误提示
    fn step<T>(
        &mut self,
        step: &'static str,
        failure: &str,
        result: ClientResult<T>,
    ) -> WorkflowResult<T> {
        result.map_err(|source| {
            tracing::warn!("[Store] {} 失败: {}", step, source);
            self.push(Notice::new(
                NoticeLevel::Error,
                "Error",
                format!("{failure} {source}"),
            ));
            WorkflowError { step, source }
        })
    }

    /// 写入审计通知
    fn audit(&mut self, message: String, notification_type: &str, user_id: Option<i64>) {
        let notification = NewNotification {
            message,
            notification_type: notification_type.to_string(),
            user_id,
        };
        if let Err(e) = self.client.create_notification(&notification) {
            tracing::warn!("[Store] 审计通知写入失败: {}", e);
            self.push(Notice::new(
                NoticeLevel::Warning,
                "Audit Log",
                "The change was saved but could not be recorded in the audit log.",
            ));
        }
        if let Err(e) = self.refresh_notifications() {
            tracing::warn!("[Store] 刷新通知失败: {}", e);
        }
    }

    fn refresh_quietly(&mut self, refresh: fn(&mut Self) -> ClientResult<()>, what: &str) {
        if let Err(e) = refresh(self) {
            tracing::warn!("[Store] 刷新{}失败: {}", what, e);
        }
    }

    fn staff_member(&self, staff_id: i64) -> ClientResult<Option<Staff>> {
        match self.staff.iter().find(|s| s.staff_id == staff_id) {
            Some(found) => Ok(Some(found.clone())),
            None => self.client.get_staff(staff_id),
        }
    }

    // ========================================================================
    // 职员
    // ========================================================================

    /// 创建用户 → 创建职员 → 审计；返回 staff_id
    pub fn add_staff_member(&mut self, form: &StaffForm) -> WorkflowResult<i64> {
        let user = NewUser {
            name: form.name.clone(),
            role: form.role.clone(),
            email: form.email.clone(),
            phone_number: form.phone.clone(),
            password_hash: form.password_hash.clone(),
            professional_title: form.professional_title.clone(),
        };
        let result = self.client.create_user(&user);
        let user_id = self.step("create_user", "Failed to create user.", result)?;

        let staff = NewStaff {
            user_id,
            role: if form.role.trim().is_empty() {
                "Staff".to_string()
            } else {
                form.role.clone()
            },
            contact_number: form.phone.clone(),
            status: Some("Active".to_string()),
        };
        let result = self.client.create_staff(&staff);
        let staff_id = self.step("create_staff", "Failed to add staff member.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "Success",
            "Staff member added successfully!",
        ));
        self.refresh_quietly(Self::refresh_staff, "职员");
        self.refresh_quietly(Self::refresh_users, "用户");
        self.audit(
            format!("New staff member added: {}", form.name),
            "Info",
            Some(user_id),
        );

        tracing::info!("[Store] 新增职员 {} (staff_id={})", form.name, staff_id);
        Ok(staff_id)
    }

    pub fn edit_staff_member(&mut self, update: &StaffUpdate) -> WorkflowResult<()> {
        let result = self.client.update_staff(update);
        self.step("update_staff", "Failed to update staff member.", result)?;

        let name = self
            .staff
            .iter()
            .find(|s| s.staff_id == update.staff_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("#{}", update.staff_id));

        self.push(Notice::new(
            NoticeLevel::Success,
            "Success",
            "Staff member updated successfully!",
        ));
        self.refresh_quietly(Self::refresh_staff, "职员");
        self.audit(
            format!("Staff member {} has been updated to {}.", name, update.status),
            "Info",
            None,
        );
        Ok(())
    }

    /// 删除职员 → 删除其用户 → 审计
    pub fn remove_staff_member(&mut self, staff_id: i64) -> WorkflowResult<()> {
        let result = self.staff_member(staff_id).and_then(|found| {
            found.ok_or_else(|| {
                ClientError::Bridge(BridgeError::NotFound {
                    entity: "staff".to_string(),
                    id: staff_id.to_string(),
                })
            })
        });
        let member = self.step("get_staff", "Failed to find staff member.", result)?;

        let result = self.client.delete_staff(staff_id);
        self.step("delete_staff", "Failed to delete staff member.", result)?;

        let result = self.client.delete_user(member.user_id);
        self.step("delete_user", "Failed to delete the staff member's user account.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "Success",
            "Staff member deleted successfully!",
        ));
        self.refresh_quietly(Self::refresh_staff, "职员");
        self.refresh_quietly(Self::refresh_users, "用户");
        self.audit(
            format!("Staff member deleted: {}", member.name),
            "Info",
            Some(member.user_id),
        );
        Ok(())
    }

    // ========================================================================
    // 案卷
    // ========================================================================

    /// 返回新案卷的 file_id
    pub fn add_case_file(&mut self, file: &NewCaseFile) -> WorkflowResult<i64> {
        let result = self.client.add_new_file(file);
        let file_id = self.step("add_new_file", "Failed to upload file.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "File Uploaded",
            format!("File for case '{}' uploaded successfully.", file.case_number),
        ));
        self.refresh_quietly(Self::refresh_files, "案卷");
        self.audit(
            format!("File '{}' uploaded successfully.", file.case_number),
            "Success",
            Some(file.uploaded_by),
        );
        Ok(file_id)
    }

    pub fn edit_case_file(&mut self, update: &CaseFileUpdate) -> WorkflowResult<()> {
        let result = self.client.update_file(update);
        self.step("update_file", "Failed to update file.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "File Updated",
            format!("File '{}' updated successfully.", update.case_number),
        ));
        self.refresh_quietly(Self::refresh_files, "案卷");
        self.audit(
            format!("File '{}' updated successfully.", update.case_number),
            "Success",
            update.updated_by,
        );
        Ok(())
    }

    /// 软删除
    pub fn delete_case_file(&mut self, file_id: i64) -> WorkflowResult<()> {
        let case_number = self
            .files
            .iter()
            .find(|f| f.file_id == file_id)
            .map(|f| f.case_number.clone())
            .unwrap_or_else(|| format!("#{file_id}"));

        let result = self.client.delete_file(file_id);
        self.step("delete_file", "Failed to delete file.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "File Deleted",
            format!("Case File '{case_number}' deleted successfully."),
        ));
        self.refresh_quietly(Self::refresh_files, "案卷");
        self.audit(
            format!("Case File '{case_number}' deleted successfully."),
            "Success",
            None,
        );
        Ok(())
    }

    pub fn restore_case_file(&mut self, file_id: i64) -> WorkflowResult<()> {
        let result = self.client.restore_file(file_id);
        self.step("restore_file", "Failed to restore file.", result)?;

        // 已删除的案卷不在缓存中，恢复后从刷新结果里取案号
        self.refresh_quietly(Self::refresh_files, "案卷");
        let case_number = self
            .files
            .iter()
            .find(|f| f.file_id == file_id)
            .map(|f| f.case_number.clone())
            .unwrap_or_else(|| format!("#{file_id}"));

        self.push(Notice::new(
            NoticeLevel::Success,
            "File Restored",
            format!("Case File '{case_number}' restored successfully."),
        ));
        self.audit(
            format!("Case File '{case_number}' restored successfully."),
            "Success",
            None,
        );
        Ok(())
    }

    // ========================================================================
    // 通知
    // ========================================================================

    /// 归档 = 标记已读
    pub fn archive_notification(&mut self, notification_id: i64) -> WorkflowResult<()> {
        let result = self.client.mark_notification_as_read(notification_id);
        self.step(
            "mark_notification_as_read",
            "Failed to archive notification.",
            result,
        )?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "Archived",
            "Notification archived.",
        ));
        self.refresh_quietly(Self::refresh_notifications, "通知");
        Ok(())
    }

    pub fn delete_notification(&mut self, notification_id: i64) -> WorkflowResult<()> {
        let result = self.client.delete_notification(notification_id);
        self.step("delete_notification", "Failed to delete notification.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "Deleted",
            "Notification deleted.",
        ));
        self.refresh_quietly(Self::refresh_notifications, "通知");
        Ok(())
    }

    // ========================================================================
    // 当事人
    // ========================================================================

    pub fn add_offender(&mut self, offender: &NewOffender) -> WorkflowResult<Offender> {
        let result = self.client.create_offender(offender);
        let created = self.step("create_offender", "Failed to add offender.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "Offender Added",
            format!("{} has been added to the records.", created.full_name),
        ));
        self.refresh_quietly(Self::refresh_offenders, "当事人");
        self.audit(
            format!("Offender record added: {}", created.full_name),
            "Info",
            None,
        );
        Ok(created)
    }

    pub fn delete_offender(&mut self, offender_id: i64) -> WorkflowResult<()> {
        let name = self
            .offenders
            .iter()
            .find(|o| o.offender_id == offender_id)
            .map(|o| o.full_name.clone())
            .unwrap_or_else(|| format!("#{offender_id}"));

        let result = self.client.delete_offender(offender_id);
        self.step("delete_offender", "Failed to delete offender.", result)?;

        self.push(Notice::new(
            NoticeLevel::Success,
            "Offender Deleted",
            format!("{name} has been removed from the records."),
        ));
        self.refresh_quietly(Self::refresh_offenders, "当事人");
        self.audit(format!("Offender record deleted: {name}"), "Info", None);
        Ok(())
    }
}
