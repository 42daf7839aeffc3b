use serde_json::json;

use super::{Client, ClientResult};
use crate::bridge::Bridge;
use crate::db::Case;

impl<B: Bridge> Client<B> {
    /// 返回新案件的 case_id
    pub fn create_case(
        &self,
        title: &str,
        assigned_staff_id: Option<i64>,
        priority: Option<&str>,
    ) -> ClientResult<i64> {
        self.call_created(
            "create_case",
            json!({
                "title": title,
                "assigned_staff_id": assigned_staff_id,
                "priority": priority
            }),
            "case_id",
        )
    }

    pub fn get_case(&self, case_id: i64) -> ClientResult<Option<Case>> {
        self.call("get_case", json!({ "case_id": case_id }))
    }

    pub fn get_all_cases(&self) -> ClientResult<Vec<Case>> {
        self.call("get_all_cases", json!({}))
    }

    pub fn update_case_status(&self, case_id: i64, new_status: &str) -> ClientResult<()> {
        self.call_unit(
            "update_case_status",
            json!({ "case_id": case_id, "new_status": new_status }),
        )
    }

    pub fn assign_staff_to_case(&self, case_id: i64, staff_id: Option<i64>) -> ClientResult<()> {
        self.call_unit(
            "assign_staff_to_case",
            json!({ "case_id": case_id, "staff_id": staff_id }),
        )
    }

    pub fn delete_case(&self, case_id: i64) -> ClientResult<()> {
        self.call_unit("delete_case", json!({ "case_id": case_id }))
    }
}
