//! 数据库类型定义
//!
//! 定义本地存储与命令桥传输使用的数据结构，包括：
//! - `CaseFile`: 案卷记录（软删除）
//! - `User` / `Staff` / `Attendance`: 人员与考勤
//! - `Case`: 案件
//! - `Notification`: 通知 / 审计日志
//! - `Offender` / `OffenderHistory`: 当事人及其犯罪记录
//! - `Contact` / `NewsItem` / `Summary` / `Report` / `Theme`: 其他登记簿
//!
//! 所有类型都实现了 Serialize/Deserialize，字段名即命令桥上的 JSON 字段名（snake_case）。
//! 以 `New*` / `*Update` 命名的结构体是写命令的参数。

use serde::{Deserialize, Serialize};

// ============================================================================
// 案卷
// ============================================================================

/// 案卷记录
///
/// `date_recieved` 保留了历史拼写，前端和导出都依赖该字段名。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseFile {
    pub file_id: i64,
    pub case_number: String,
    pub case_type: String,
    pub purpose: String,
    pub uploaded_by: i64,
    pub current_location: String,
    pub notes: Option<String>,
    pub date_recieved: Option<String>,
    pub required_on: Option<String>,
    pub required_on_signature: Option<String>,
    pub date_returned: Option<String>,
    pub date_returned_signature: Option<String>,
    pub deleted: bool,
}

/// 新建案卷参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCaseFile {
    pub case_number: String,
    pub case_type: String,
    pub purpose: String,
    pub uploaded_by: i64,
    pub current_location: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub required_on: Option<String>,
}

/// 编辑案卷参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFileUpdate {
    pub file_id: i64,
    pub case_number: String,
    pub case_type: String,
    pub purpose: String,
    pub current_location: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub required_on: Option<String>,
    /// 修改人（写入备注历史）
    #[serde(default)]
    pub updated_by: Option<i64>,
}

/// 案卷可单独修改的日期列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileDateField {
    RequiredOn,
    DateReturned,
    DateRecieved,
}

impl FileDateField {
    pub fn column(self) -> &'static str {
        match self {
            FileDateField::RequiredOn => "required_on",
            FileDateField::DateReturned => "date_returned",
            FileDateField::DateRecieved => "date_recieved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "required_on" => Some(FileDateField::RequiredOn),
            "date_returned" => Some(FileDateField::DateReturned),
            "date_recieved" | "date_received" => Some(FileDateField::DateRecieved),
            _ => None,
        }
    }
}

/// 出庭日期变更历史
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredOnHistory {
    pub required_on: String,
    pub note: String,
    pub created_at: String,
}

/// 案卷备注历史
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteHistory {
    pub note: String,
    pub created_by: Option<i64>,
    pub created_at: String,
}

// ============================================================================
// 用户与职员
// ============================================================================

/// 用户记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub professional_title: Option<String>,
    pub status: String,
}

/// 新建用户参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub password_hash: String,
    #[serde(default)]
    pub professional_title: Option<String>,
}

/// 职员记录（姓名来自关联用户）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Staff {
    pub staff_id: i64,
    pub user_id: i64,
    pub name: String,
    pub role: String,
    pub contact_number: Option<String>,
    pub status: String,
}

/// 新建职员参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStaff {
    pub user_id: i64,
    pub role: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// 编辑职员参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub staff_id: i64,
    pub role: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    pub status: String,
}

/// 考勤记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attendance {
    pub attendance_id: i64,
    pub staff_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    /// "Present" 或 "Absent"
    pub status: String,
    pub reason: Option<String>,
    pub half_day: bool,
    pub comments: Option<String>,
}

/// 新增考勤参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAttendance {
    pub staff_id: i64,
    pub date: String,
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub half_day: bool,
    #[serde(default)]
    pub comments: Option<String>,
}

/// 修改考勤参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    pub attendance_id: i64,
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub half_day: bool,
    #[serde(default)]
    pub comments: Option<String>,
}

// ============================================================================
// 案件
// ============================================================================

/// 案件记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Case {
    pub case_id: i64,
    pub title: String,
    /// "Open" / "In Progress" / "Closed"
    pub status: String,
    pub assigned_staff_id: Option<i64>,
    /// "Low" / "Medium" / "High"
    pub priority: String,
    pub date_created: String,
}

// ============================================================================
// 通知
// ============================================================================

/// 通知记录（同时用作审计日志）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub notification_id: i64,
    pub user_id: Option<i64>,
    pub message: String,
    /// "Info" / "Warning" / "Error" / "Success"
    pub notification_type: String,
    pub date_created: String,
    pub read_status: bool,
}

/// 新建通知参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewNotification {
    pub message: String,
    pub notification_type: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

// ============================================================================
// 当事人
// ============================================================================

/// 当事人记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offender {
    pub offender_id: i64,
    pub full_name: String,
    pub national_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
    pub date_created: Option<String>,
    /// 关联案卷
    pub file_id: Option<i64>,
    pub penalty: Option<String>,
    pub penalty_notes: Option<String>,
}

/// 新建当事人参数（照片以字节数组传输）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewOffender {
    pub full_name: String,
    pub national_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub notes: Option<String>,
    pub file_id: Option<i64>,
    pub penalty: Option<String>,
    pub penalty_notes: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub photo_filename: Option<String>,
}

/// 修改当事人参数，`None` 字段保持原值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenderUpdate {
    pub offender_id: i64,
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub notes: Option<String>,
    pub file_id: Option<i64>,
    pub penalty: Option<String>,
    pub penalty_notes: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub photo_filename: Option<String>,
}

/// 当事人犯罪记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenderHistory {
    pub id: i64,
    pub offender_id: i64,
    pub file_id: Option<i64>,
    pub case_id: Option<i64>,
    pub offense_date: Option<String>,
    pub penalty: Option<String>,
    pub penalty_notes: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

/// 新增犯罪记录参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewOffenderHistory {
    pub offender_id: i64,
    pub file_id: Option<i64>,
    pub case_id: Option<i64>,
    pub offense_date: Option<String>,
    pub penalty: Option<String>,
    pub penalty_notes: Option<String>,
    pub notes: Option<String>,
}

/// 修改犯罪记录参数，`None` 字段保持原值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenderHistoryUpdate {
    pub id: i64,
    pub offender_id: Option<i64>,
    pub file_id: Option<i64>,
    pub case_id: Option<i64>,
    pub offense_date: Option<String>,
    pub penalty: Option<String>,
    pub penalty_notes: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// 其他登记簿
// ============================================================================

/// 通讯录联系人
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub contact_id: i64,
    pub name: String,
    pub role: String,
    pub phone_number: Option<String>,
}

/// 公告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub news_id: i64,
    pub title: String,
    pub content: String,
    pub date_created: String,
}

/// 摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub summary_id: i64,
    pub title: String,
    pub content: String,
    /// "Cases" / "Files" / "Attendance" / "Notifications" / "Overall"
    pub category: String,
    pub generated_by: String,
    pub date_created: String,
}

/// 报表（数据以 JSON 文本保存）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub report_id: i64,
    #[serde(rename = "type")]
    pub report_type: String,
    pub data_json: String,
    pub date_created: String,
}

/// 界面主题
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub theme_id: i64,
    pub name: String,
    pub config_json: String,
    pub user_id: Option<i64>,
}
