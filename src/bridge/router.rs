//! 进程内命令路由器
//!
//! 固定的命令表，按命令名把调用分发到 `Database`。
//!
//! ## 返回值约定
//!
//! - 查询命令：记录 / 记录数组 / `null`（单条记录不存在）
//! - 新建命令：`{ "message", "status": "success", "<id 字段>": id }`
//! - 其他写命令：一句结果消息字符串
//! - 当事人命令返回写入后的完整记录
//!
//! ## 错误映射
//!
//! - `DbError::NotFound` -> `BridgeError::NotFound`
//! - `DbError::InvalidInput` 与参数解析失败 -> `BridgeError::InvalidArgs`
//! - 其他存储错误 -> `BridgeError::Backend`

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use super::{Bridge, BridgeError};
use crate::db::offenders::OffenderRecord;
use crate::db::{
    AttendanceUpdate, CaseFileUpdate, Contact, Database, DbError, FileDateField, NewAttendance,
    NewCaseFile, NewNotification, NewOffender, NewOffenderHistory, NewStaff, NewUser,
    OffenderHistoryUpdate, OffenderUpdate, StaffUpdate, Summary, Theme,
};
use crate::photos::PhotoStore;

/// 支持的命令名
pub const COMMANDS: &[&str] = &[
    // 案卷
    "get_all_files",
    "add_new_file",
    "get_file_by_id",
    "update_file",
    "update_file_date",
    "update_file_notes",
    "mark_file_returned",
    "delete_file",
    "restore_file",
    "search_files_by_case_number",
    "filter_files_by_user",
    "get_files_by_purpose",
    "get_required_on_history",
    "get_notes_history",
    // 用户
    "create_user",
    "get_user",
    "get_user_by_email",
    "get_all_users",
    "update_user_status",
    "delete_user",
    // 职员
    "create_staff",
    "get_staff",
    "get_all_staff",
    "update_staff",
    "update_staff_status",
    "delete_staff",
    // 考勤
    "add_attendance",
    "get_all_attendance",
    "get_attendance",
    "get_attendance_by_staff",
    "update_attendance",
    "delete_attendance",
    // 案件
    "create_case",
    "get_case",
    "get_all_cases",
    "update_case_status",
    "assign_staff_to_case",
    "delete_case",
    // 通知
    "create_notification",
    "get_all_notifications",
    "get_notification",
    "mark_notification_as_read",
    "delete_notification",
    // 当事人
    "list_offenders",
    "get_offender",
    "create_offender",
    "update_offender",
    "delete_offender",
    "get_offender_photo",
    "list_offender_history",
    "add_offender_history",
    "update_offender_history",
    "delete_offender_history",
    // 通讯录
    "get_all_contacts",
    "create_contact",
    "update_contact",
    "delete_contact",
    // 公告
    "get_all_news",
    "create_news",
    "update_news",
    "delete_news",
    // 摘要与报表
    "get_all_summaries",
    "get_summaries_by_category",
    "create_summary",
    "delete_summary",
    "get_all_reports",
    "get_report",
    "create_report",
    "delete_report",
    // 主题
    "get_all_themes",
    "get_theme",
    "create_theme",
    "update_theme",
    "delete_theme",
];

// ============================================================================
// 参数解析
// ============================================================================

/// 单次调用的命名参数
struct Args<'a> {
    command: &'a str,
    map: Map<String, Value>,
}

impl<'a> Args<'a> {
    fn new(command: &'a str, value: Value) -> Result<Self, BridgeError> {
        let map = match value {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(BridgeError::invalid_args(
                    command,
                    format!("arguments must be an object, got {other}"),
                ));
            }
        };
        Ok(Self { command, map })
    }

    /// 必填参数
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, BridgeError> {
        self.opt(key)?.ok_or_else(|| {
            BridgeError::invalid_args(self.command, format!("missing argument `{key}`"))
        })
    }

    /// 可选参数，缺失或为 null 时返回 None
    fn opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BridgeError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                BridgeError::invalid_args(self.command, format!("argument `{key}`: {e}"))
            }),
        }
    }

    /// 把整个参数对象解析为结构体
    fn parse<T: DeserializeOwned>(&self) -> Result<T, BridgeError> {
        serde_json::from_value(Value::Object(self.map.clone()))
            .map_err(|e| BridgeError::invalid_args(self.command, e.to_string()))
    }

    /// `user_id` 可以是数字，也可以是包含 `user_id` 的对象（`create_user` 的返回值）
    fn user_id(&self) -> Result<i64, BridgeError> {
        let id = match self.map.get("user_id") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::Object(obj)) => obj.get("user_id").and_then(Value::as_i64),
            _ => None,
        };
        id.ok_or_else(|| BridgeError::invalid_args(self.command, "invalid argument `user_id`"))
    }
}

// ============================================================================
// 返回值
// ============================================================================

fn reply<T: Serialize>(value: T) -> Result<Value, BridgeError> {
    serde_json::to_value(value).map_err(|e| BridgeError::Backend(e.to_string()))
}

fn message(text: &str) -> Result<Value, BridgeError> {
    Ok(Value::String(text.to_string()))
}

fn created(text: &str, id_key: &str, id: i64) -> Result<Value, BridgeError> {
    let mut map = Map::new();
    map.insert("message".into(), json!(text));
    map.insert("status".into(), json!("success"));
    map.insert(id_key.into(), json!(id));
    Ok(Value::Object(map))
}

fn db_error(command: &str, err: DbError) -> BridgeError {
    match err {
        DbError::NotFound { entity, id } => BridgeError::NotFound {
            entity: entity.to_string(),
            id,
        },
        DbError::InvalidInput(reason) => BridgeError::invalid_args(command, reason),
        other => BridgeError::Backend(other.to_string()),
    }
}

// ============================================================================
// 路由器
// ============================================================================

/// 本地命令路由器
pub struct CommandRouter {
    db: Arc<Database>,
    photos: PhotoStore,
}

impl CommandRouter {
    pub fn new(db: Arc<Database>, photos: PhotoStore) -> Self {
        Self { db, photos }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    fn dispatch(&self, command: &str, args: &Args<'_>) -> Result<Value, BridgeError> {
        let db = &self.db;
        let err = |e: DbError| db_error(command, e);

        match command {
            // ================================================================
            // 案卷
            // ================================================================
            "get_all_files" => reply(db.get_all_files().map_err(err)?),
            "add_new_file" => {
                let file: NewCaseFile = args.parse()?;
                let id = db.add_new_file(&file).map_err(err)?;
                created("File uploaded successfully", "file_id", id)
            }
            "get_file_by_id" => reply(db.get_file_by_id(args.get("file_id")?).map_err(err)?),
            "update_file" => {
                let update: CaseFileUpdate = args.parse()?;
                db.update_file(&update).map_err(err)?;
                created("File updated successfully", "file_id", update.file_id)
            }
            "update_file_date" => {
                let date_type: String = args.get("date_type")?;
                let field = FileDateField::parse(&date_type).ok_or_else(|| {
                    BridgeError::invalid_args(command, format!("unsupported date column `{date_type}`"))
                })?;
                let new_date: String = args.get("new_date")?;
                db.update_file_date(args.get("file_id")?, field, &new_date)
                    .map_err(err)?;
                message("Updated successfully")
            }
            "update_file_notes" => {
                let notes: String = args.get("new_notes")?;
                db.update_file_notes(args.get("file_id")?, &notes, args.opt("created_by")?)
                    .map_err(err)?;
                message("Notes updated successfully")
            }
            "mark_file_returned" => {
                let date: String = args.get("return_date")?;
                let signature: String = args.get("return_signature")?;
                db.mark_file_returned(args.get("file_id")?, &date, &signature)
                    .map_err(err)?;
                message("File marked as returned")
            }
            "delete_file" => {
                db.delete_file(args.get("file_id")?).map_err(err)?;
                message("File deleted successfully")
            }
            "restore_file" => {
                db.restore_file(args.get("file_id")?).map_err(err)?;
                message("File restored successfully")
            }
            "search_files_by_case_number" => {
                let case_number: String = args.get("case_number")?;
                reply(db.search_files_by_case_number(&case_number).map_err(err)?)
            }
            "filter_files_by_user" => {
                reply(db.filter_files_by_user(args.get("user_id")?).map_err(err)?)
            }
            "get_files_by_purpose" => {
                let purpose: String = args.get("purpose")?;
                reply(db.get_files_by_purpose(&purpose).map_err(err)?)
            }
            "get_required_on_history" => {
                reply(db.get_required_on_history(args.get("file_id")?).map_err(err)?)
            }
            "get_notes_history" => reply(db.get_notes_history(args.get("file_id")?).map_err(err)?),

            // ================================================================
            // 用户
            // ================================================================
            "create_user" => {
                let user: NewUser = args.parse()?;
                let id = db.create_user(&user).map_err(err)?;
                created("User created successfully", "user_id", id)
            }
            "get_user" => reply(db.get_user(args.get("user_id")?).map_err(err)?),
            "get_user_by_email" => {
                let email: String = args.get("email")?;
                reply(db.get_user_by_email(&email).map_err(err)?)
            }
            "get_all_users" => reply(db.get_all_users().map_err(err)?),
            "update_user_status" => {
                let status: String = args.get("new_status")?;
                db.update_user_status(args.get("user_id")?, &status)
                    .map_err(err)?;
                message("User status updated")
            }
            "delete_user" => {
                db.delete_user(args.get("user_id")?).map_err(err)?;
                message("User deleted successfully")
            }

            // ================================================================
            // 职员
            // ================================================================
            "create_staff" => {
                let staff = NewStaff {
                    user_id: args.user_id()?,
                    role: args.get("role")?,
                    contact_number: args.opt("contact_number")?,
                    status: args.opt("status")?,
                };
                let id = db.create_staff(&staff).map_err(err)?;
                created("Staff member created successfully", "staff_id", id)
            }
            "get_staff" => reply(db.get_staff(args.get("staff_id")?).map_err(err)?),
            "get_all_staff" => reply(db.get_all_staff().map_err(err)?),
            "update_staff" => {
                let update: StaffUpdate = args.parse()?;
                db.update_staff(&update).map_err(err)?;
                message("Staff member updated")
            }
            "update_staff_status" => {
                let status: String = args.get("new_status")?;
                db.update_staff_status(args.get("staff_id")?, &status)
                    .map_err(err)?;
                message("Staff member status updated")
            }
            "delete_staff" => {
                db.delete_staff(args.get("staff_id")?).map_err(err)?;
                message("Staff member deleted successfully")
            }

            // ================================================================
            // 考勤
            // ================================================================
            "add_attendance" => {
                let record: NewAttendance = args.parse()?;
                let id = db.add_attendance(&record).map_err(err)?;
                created("Attendance record added", "attendance_id", id)
            }
            "get_all_attendance" => reply(db.get_all_attendance().map_err(err)?),
            "get_attendance" => reply(db.get_attendance(args.get("attendance_id")?).map_err(err)?),
            "get_attendance_by_staff" => {
                reply(db.get_attendance_by_staff(args.get("staff_id")?).map_err(err)?)
            }
            "update_attendance" => {
                let update: AttendanceUpdate = args.parse()?;
                db.update_attendance(&update).map_err(err)?;
                message("Attendance record updated successfully")
            }
            "delete_attendance" => {
                db.delete_attendance(args.get("attendance_id")?)
                    .map_err(err)?;
                message("Attendance record deleted successfully")
            }

            // ================================================================
            // 案件
            // ================================================================
            "create_case" => {
                let title: String = args.get("title")?;
                let priority: Option<String> = args.opt("priority")?;
                let id = db
                    .create_case(&title, args.opt("assigned_staff_id")?, priority.as_deref())
                    .map_err(err)?;
                created("Case created successfully", "case_id", id)
            }
            "get_case" => reply(db.get_case(args.get("case_id")?).map_err(err)?),
            "get_all_cases" => reply(db.get_all_cases().map_err(err)?),
            "update_case_status" => {
                let status: String = args.get("new_status")?;
                db.update_case_status(args.get("case_id")?, &status)
                    .map_err(err)?;
                message("Case status updated successfully")
            }
            "assign_staff_to_case" => {
                db.assign_staff_to_case(args.get("case_id")?, args.opt("staff_id")?)
                    .map_err(err)?;
                message("Staff assigned to case successfully")
            }
            "delete_case" => {
                db.delete_case(args.get("case_id")?).map_err(err)?;
                message("Case deleted successfully")
            }

            // ================================================================
            // 通知
            // ================================================================
            "create_notification" => {
                let notification: NewNotification = args.parse()?;
                let id = db.create_notification(&notification).map_err(err)?;
                created("Notification created", "notification_id", id)
            }
            "get_all_notifications" => reply(db.get_all_notifications().map_err(err)?),
            "get_notification" => {
                reply(db.get_notification(args.get("notification_id")?).map_err(err)?)
            }
            "mark_notification_as_read" => {
                db.mark_notification_as_read(args.get("notification_id")?)
                    .map_err(err)?;
                message("Notification marked as read")
            }
            "delete_notification" => {
                db.delete_notification(args.get("notification_id")?)
                    .map_err(err)?;
                message("Notification deleted successfully")
            }

            // ================================================================
            // 当事人
            // ================================================================
            "list_offenders" => reply(db.list_offenders().map_err(err)?),
            "get_offender" => reply(db.get_offender(args.get("offender_id")?).map_err(err)?),
            "create_offender" => self.create_offender(command, args.parse()?),
            "update_offender" => self.update_offender(command, args.parse()?),
            "delete_offender" => {
                let photo_path = db.delete_offender(args.get("offender_id")?).map_err(err)?;
                if let Some(path) = photo_path {
                    self.photos.remove(&path);
                }
                message("Offender deleted successfully")
            }
            "get_offender_photo" => {
                let offender_id: i64 = args.get("offender_id")?;
                let path = db
                    .get_offender_photo_path(offender_id)
                    .map_err(err)?
                    .ok_or_else(|| BridgeError::NotFound {
                        entity: "offender photo".into(),
                        id: offender_id.to_string(),
                    })?;
                let bytes = self
                    .photos
                    .read(&path)
                    .map_err(|e| BridgeError::Backend(format!("Failed to read photo: {e}")))?;
                reply(bytes)
            }
            "list_offender_history" => {
                reply(db.list_offender_history(args.get("offender_id")?).map_err(err)?)
            }
            "add_offender_history" => {
                let entry: NewOffenderHistory = args.parse()?;
                reply(db.add_offender_history(&entry).map_err(err)?)
            }
            "update_offender_history" => {
                let update: OffenderHistoryUpdate = args.parse()?;
                reply(db.update_offender_history(&update).map_err(err)?)
            }
            "delete_offender_history" => {
                db.delete_offender_history(args.get("id")?).map_err(err)?;
                message("Offender history deleted successfully")
            }

            // ================================================================
            // 通讯录 / 公告
            // ================================================================
            "get_all_contacts" => reply(db.get_all_contacts().map_err(err)?),
            "create_contact" => {
                let contact: Contact = args.parse()?;
                let id = db.create_contact(&contact).map_err(err)?;
                created("Contact created", "contact_id", id)
            }
            "update_contact" => {
                let contact: Contact = args.parse()?;
                db.update_contact(&contact).map_err(err)?;
                message("Contact updated")
            }
            "delete_contact" => {
                db.delete_contact(args.get("contact_id")?).map_err(err)?;
                message("Contact deleted")
            }
            "get_all_news" => reply(db.get_all_news().map_err(err)?),
            "create_news" => {
                let title: String = args.get("title")?;
                let content: String = args.get("content")?;
                let id = db.create_news(&title, &content).map_err(err)?;
                created("News created", "news_id", id)
            }
            "update_news" => {
                let title: String = args.get("title")?;
                let content: String = args.get("content")?;
                db.update_news(args.get("news_id")?, &title, &content)
                    .map_err(err)?;
                message("News updated")
            }
            "delete_news" => {
                db.delete_news(args.get("news_id")?).map_err(err)?;
                message("News deleted")
            }

            // ================================================================
            // 摘要与报表
            // ================================================================
            "get_all_summaries" => reply(db.get_all_summaries().map_err(err)?),
            "get_summaries_by_category" => {
                let category: String = args.get("category")?;
                reply(db.get_summaries_by_category(&category).map_err(err)?)
            }
            "create_summary" => {
                let summary: Summary = args.parse()?;
                let id = db.create_summary(&summary).map_err(err)?;
                created("Summary created", "summary_id", id)
            }
            "delete_summary" => {
                db.delete_summary(args.get("summary_id")?).map_err(err)?;
                message("Summary deleted")
            }
            "get_all_reports" => reply(db.get_all_reports().map_err(err)?),
            "get_report" => reply(db.get_report(args.get("report_id")?).map_err(err)?),
            "create_report" => {
                let report_type: String = args.get("report_type")?;
                let data: Value = args.get("data")?;
                let id = db.create_report(&report_type, &data).map_err(err)?;
                created("Report created", "report_id", id)
            }
            "delete_report" => {
                db.delete_report(args.get("report_id")?).map_err(err)?;
                message("Report deleted")
            }

            // ================================================================
            // 主题
            // ================================================================
            "get_all_themes" => reply(db.get_all_themes().map_err(err)?),
            "get_theme" => reply(db.get_theme(args.get("theme_id")?).map_err(err)?),
            "create_theme" => {
                let theme: Theme = args.parse()?;
                let id = db.create_theme(&theme).map_err(err)?;
                created("Theme created", "theme_id", id)
            }
            "update_theme" => {
                let theme: Theme = args.parse()?;
                db.update_theme(&theme).map_err(err)?;
                message("Theme updated")
            }
            "delete_theme" => {
                db.delete_theme(args.get("theme_id")?).map_err(err)?;
                message("Theme deleted")
            }

            _ => Err(BridgeError::UnknownCommand(command.to_string())),
        }
    }

    // ========================================================================
    // 当事人照片编排
    // ========================================================================

    fn save_photo(
        &self,
        photo: Option<Vec<u8>>,
        filename: Option<String>,
    ) -> Result<Option<String>, BridgeError> {
        let (Some(bytes), Some(filename)) = (photo, filename) else {
            return Ok(None);
        };
        let path = self
            .photos
            .save(&bytes, &filename)
            .map_err(|e| BridgeError::Backend(format!("Failed to save photo: {e}")))?;
        Ok(Some(path.to_string_lossy().to_string()))
    }

    fn create_offender(&self, command: &str, input: NewOffender) -> Result<Value, BridgeError> {
        let photo_path = self.save_photo(input.photo, input.photo_filename)?;

        let record = OffenderRecord {
            full_name: Some(input.full_name),
            national_id: input.national_id,
            date_of_birth: input.date_of_birth,
            gender: input.gender,
            photo_path: photo_path.clone(),
            notes: input.notes,
            file_id: input.file_id,
            penalty: input.penalty,
            penalty_notes: input.penalty_notes,
        };

        match self.db.create_offender(&record) {
            Ok(offender) => reply(offender),
            Err(e) => {
                // 写库失败时不留下孤立照片
                if let Some(path) = photo_path {
                    self.photos.remove(&path);
                }
                Err(db_error(command, e))
            }
        }
    }

    fn update_offender(&self, command: &str, input: OffenderUpdate) -> Result<Value, BridgeError> {
        let old_photo = self
            .db
            .get_offender_photo_path(input.offender_id)
            .map_err(|e| db_error(command, e))?;
        let photo_path = self.save_photo(input.photo, input.photo_filename)?;

        let record = OffenderRecord {
            full_name: input.full_name,
            national_id: input.national_id,
            date_of_birth: input.date_of_birth,
            gender: input.gender,
            photo_path: photo_path.clone(),
            notes: input.notes,
            file_id: input.file_id,
            penalty: input.penalty,
            penalty_notes: input.penalty_notes,
        };

        match self.db.update_offender(input.offender_id, &record) {
            Ok(offender) => {
                // 新照片写入成功后删除旧照片
                if photo_path.is_some()
                    && let Some(old) = old_photo
                {
                    self.photos.remove(&old);
                }
                reply(offender)
            }
            Err(e) => {
                if let Some(path) = photo_path {
                    self.photos.remove(&path);
                }
                Err(db_error(command, e))
            }
        }
    }
}

impl Bridge for CommandRouter {
    fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError> {
        tracing::debug!("[Bridge] invoke {}", command);

        let args = Args::new(command, args)?;
        let result = self.dispatch(command, &args);

        if let Err(e) = &result {
            tracing::warn!("[Bridge] {} 失败: {}", command, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> (CommandRouter, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open_in_memory().unwrap());
        let photos = PhotoStore::new(dir.path().join("offender_photos"));
        (CommandRouter::new(db, photos), dir)
    }

    #[test]
    fn test_every_listed_command_is_routed() {
        let (router, _dir) = router();
        for command in COMMANDS {
            let result = router.invoke(command, Value::Null);
            assert!(
                !matches!(result, Err(BridgeError::UnknownCommand(_))),
                "{command} is listed but not routed"
            );
        }
    }

    #[test]
    fn test_unknown_command() {
        let (router, _dir) = router();
        assert_eq!(
            router.invoke("sync_files", json!({})),
            Err(BridgeError::UnknownCommand("sync_files".into()))
        );
    }

    #[test]
    fn test_args_must_be_object() {
        let (router, _dir) = router();
        let result = router.invoke("get_file_by_id", json!([1]));
        assert!(matches!(result, Err(BridgeError::InvalidArgs { .. })));
    }

    #[test]
    fn test_missing_argument() {
        let (router, _dir) = router();
        let result = router.invoke("get_file_by_id", json!({}));
        assert_eq!(
            result,
            Err(BridgeError::invalid_args(
                "get_file_by_id",
                "missing argument `file_id`"
            ))
        );
    }

    #[test]
    fn test_file_commands() {
        let (router, _dir) = router();
        let created = router
            .invoke(
                "add_new_file",
                json!({
                    "case_number": "CV/44/2026",
                    "case_type": "Civil",
                    "purpose": "Hearing",
                    "uploaded_by": 1,
                    "current_location": "Registry",
                    "required_on": "2026-10-21"
                }),
            )
            .unwrap();
        assert_eq!(created["status"], "success");
        let file_id = created["file_id"].as_i64().unwrap();

        let file = router
            .invoke("get_file_by_id", json!({ "file_id": file_id }))
            .unwrap();
        assert_eq!(file["case_number"], "CV/44/2026");
        assert_eq!(file["deleted"], false);

        let missing = router.invoke("get_file_by_id", json!({ "file_id": 999 })).unwrap();
        assert!(missing.is_null());

        assert_eq!(
            router.invoke("delete_file", json!({ "file_id": file_id })).unwrap(),
            json!("File deleted successfully")
        );
        assert!(
            router
                .invoke("delete_file", json!({ "file_id": 999 }))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_update_file_date_whitelist() {
        let (router, _dir) = router();
        let created = router
            .invoke(
                "add_new_file",
                json!({
                    "case_number": "CR/1/2026",
                    "case_type": "Criminal",
                    "purpose": "Mention",
                    "uploaded_by": 1,
                    "current_location": "Court 1"
                }),
            )
            .unwrap();
        let file_id = created["file_id"].as_i64().unwrap();

        let rejected = router.invoke(
            "update_file_date",
            json!({ "file_id": file_id, "date_type": "deleted = 1, notes", "new_date": "x" }),
        );
        assert!(matches!(rejected, Err(BridgeError::InvalidArgs { .. })));

        router
            .invoke(
                "update_file_date",
                json!({ "file_id": file_id, "date_type": "date_returned", "new_date": "2026-10-18" }),
            )
            .unwrap();
        let file = router.invoke("get_file_by_id", json!({ "file_id": file_id })).unwrap();
        assert_eq!(file["date_returned"], "2026-10-18");
        assert_eq!(file["deleted"], false);
    }

    #[test]
    fn test_create_staff_accepts_user_object() {
        let (router, _dir) = router();
        let user = router
            .invoke(
                "create_user",
                json!({
                    "name": "Wambui",
                    "role": "Clerk",
                    "email": "wambui@courts.go.ke",
                    "password_hash": "hash"
                }),
            )
            .unwrap();

        let staff = router
            .invoke("create_staff", json!({ "user_id": user, "role": "Clerk" }))
            .unwrap();
        assert!(staff["staff_id"].as_i64().is_some());

        let all = router.invoke("get_all_staff", Value::Null).unwrap();
        assert_eq!(all[0]["name"], "Wambui");
    }

    #[test]
    fn test_attendance_validation_is_invalid_args() {
        let (router, _dir) = router();
        let result = router.invoke(
            "add_attendance",
            json!({ "staff_id": 1, "date": "2026-10-18", "status": "Late" }),
        );
        assert!(matches!(result, Err(BridgeError::InvalidArgs { .. })));
    }

    #[test]
    fn test_offender_photo_lifecycle() {
        let (router, dir) = router();
        let offender = router
            .invoke(
                "create_offender",
                json!({
                    "full_name": "Daniel Mutiso",
                    "national_id": "30112233",
                    "photo": [1, 2, 3],
                    "photo_filename": "daniel.png"
                }),
            )
            .unwrap();
        let offender_id = offender["offender_id"].as_i64().unwrap();
        let first_path = offender["photo_path"].as_str().unwrap().to_string();
        assert!(first_path.starts_with(dir.path().to_str().unwrap()));

        let photo = router
            .invoke("get_offender_photo", json!({ "offender_id": offender_id }))
            .unwrap();
        assert_eq!(photo, json!([1, 2, 3]));

        // 替换照片后旧文件被删除
        let updated = router
            .invoke(
                "update_offender",
                json!({
                    "offender_id": offender_id,
                    "photo": [9],
                    "photo_filename": "daniel-2.png"
                }),
            )
            .unwrap();
        assert_eq!(updated["full_name"], "Daniel Mutiso");
        assert!(!std::path::Path::new(&first_path).exists());

        let second_path = updated["photo_path"].as_str().unwrap().to_string();
        router
            .invoke("delete_offender", json!({ "offender_id": offender_id }))
            .unwrap();
        assert!(!std::path::Path::new(&second_path).exists());
    }

    #[test]
    fn test_offender_without_photo() {
        let (router, _dir) = router();
        let offender = router
            .invoke("create_offender", json!({ "full_name": "Ruth Mbithe" }))
            .unwrap();
        let result = router.invoke(
            "get_offender_photo",
            json!({ "offender_id": offender["offender_id"] }),
        );
        assert!(result.unwrap_err().is_not_found());
    }
}
