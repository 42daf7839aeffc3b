use serde_json::json;

use super::{Client, ClientResult, encode};
use crate::bridge::Bridge;
use crate::db::{NewNotification, Notification};

impl<B: Bridge> Client<B> {
    pub fn create_notification(&self, notification: &NewNotification) -> ClientResult<i64> {
        let args = encode("create_notification", notification)?;
        self.call_created("create_notification", args, "notification_id")
    }

    /// 最新在前
    pub fn get_all_notifications(&self) -> ClientResult<Vec<Notification>> {
        self.call("get_all_notifications", json!({}))
    }

    pub fn get_notification(&self, notification_id: i64) -> ClientResult<Option<Notification>> {
        self.call(
            "get_notification",
            json!({ "notification_id": notification_id }),
        )
    }

    pub fn mark_notification_as_read(&self, notification_id: i64) -> ClientResult<()> {
        self.call_unit(
            "mark_notification_as_read",
            json!({ "notification_id": notification_id }),
        )
    }

    pub fn delete_notification(&self, notification_id: i64) -> ClientResult<()> {
        self.call_unit(
            "delete_notification",
            json!({ "notification_id": notification_id }),
        )
    }
}
