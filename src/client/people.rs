use serde_json::json;

use super::{Client, ClientResult, encode};
use crate::bridge::Bridge;
use crate::db::{
    Attendance, AttendanceUpdate, NewAttendance, NewStaff, NewUser, Staff, StaffUpdate, User,
};

impl<B: Bridge> Client<B> {
    // ========================================================================
    // 用户
    // ========================================================================

    /// 返回新用户的 user_id
    pub fn create_user(&self, user: &NewUser) -> ClientResult<i64> {
        let args = encode("create_user", user)?;
        self.call_created("create_user", args, "user_id")
    }

    pub fn get_user(&self, user_id: i64) -> ClientResult<Option<User>> {
        self.call("get_user", json!({ "user_id": user_id }))
    }

    pub fn get_user_by_email(&self, email: &str) -> ClientResult<Option<User>> {
        self.call("get_user_by_email", json!({ "email": email }))
    }

    pub fn get_all_users(&self) -> ClientResult<Vec<User>> {
        self.call("get_all_users", json!({}))
    }

    pub fn update_user_status(&self, user_id: i64, new_status: &str) -> ClientResult<()> {
        self.call_unit(
            "update_user_status",
            json!({ "user_id": user_id, "new_status": new_status }),
        )
    }

    pub fn delete_user(&self, user_id: i64) -> ClientResult<()> {
        self.call_unit("delete_user", json!({ "user_id": user_id }))
    }

    // ========================================================================
    // 职员
    // ========================================================================

    /// 返回新职员的 staff_id
    pub fn create_staff(&self, staff: &NewStaff) -> ClientResult<i64> {
        let args = encode("create_staff", staff)?;
        self.call_created("create_staff", args, "staff_id")
    }

    pub fn get_staff(&self, staff_id: i64) -> ClientResult<Option<Staff>> {
        self.call("get_staff", json!({ "staff_id": staff_id }))
    }

    pub fn get_all_staff(&self) -> ClientResult<Vec<Staff>> {
        self.call("get_all_staff", json!({}))
    }

    pub fn update_staff(&self, update: &StaffUpdate) -> ClientResult<()> {
        let args = encode("update_staff", update)?;
        self.call_unit("update_staff", args)
    }

    pub fn update_staff_status(&self, staff_id: i64, new_status: &str) -> ClientResult<()> {
        self.call_unit(
            "update_staff_status",
            json!({ "staff_id": staff_id, "new_status": new_status }),
        )
    }

    pub fn delete_staff(&self, staff_id: i64) -> ClientResult<()> {
        self.call_unit("delete_staff", json!({ "staff_id": staff_id }))
    }

    // ========================================================================
    // 考勤
    // ========================================================================

    pub fn add_attendance(&self, record: &NewAttendance) -> ClientResult<i64> {
        let args = encode("add_attendance", record)?;
        self.call_created("add_attendance", args, "attendance_id")
    }

    pub fn get_all_attendance(&self) -> ClientResult<Vec<Attendance>> {
        self.call("get_all_attendance", json!({}))
    }

    pub fn get_attendance(&self, attendance_id: i64) -> ClientResult<Option<Attendance>> {
        self.call("get_attendance", json!({ "attendance_id": attendance_id }))
    }

    pub fn get_attendance_by_staff(&self, staff_id: i64) -> ClientResult<Vec<Attendance>> {
        self.call("get_attendance_by_staff", json!({ "staff_id": staff_id }))
    }

    pub fn update_attendance(&self, update: &AttendanceUpdate) -> ClientResult<()> {
        let args = encode("update_attendance", update)?;
        self.call_unit("update_attendance", args)
    }

    pub fn delete_attendance(&self, attendance_id: i64) -> ClientResult<()> {
        self.call_unit(
            "delete_attendance",
            json!({ "attendance_id": attendance_id }),
        )
    }
}
