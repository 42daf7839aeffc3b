use serde_json::json;

use super::{Client, ClientResult, encode};
use crate::bridge::Bridge;
use crate::db::{
    NewOffender, NewOffenderHistory, Offender, OffenderHistory, OffenderHistoryUpdate,
    OffenderUpdate,
};

impl<B: Bridge> Client<B> {
    pub fn list_offenders(&self) -> ClientResult<Vec<Offender>> {
        self.call("list_offenders", json!({}))
    }

    pub fn get_offender(&self, offender_id: i64) -> ClientResult<Option<Offender>> {
        self.call("get_offender", json!({ "offender_id": offender_id }))
    }

    /// 照片以字节数组随参数一起传输
    pub fn create_offender(&self, offender: &NewOffender) -> ClientResult<Offender> {
        let args = encode("create_offender", offender)?;
        self.call("create_offender", args)
    }

    pub fn update_offender(&self, update: &OffenderUpdate) -> ClientResult<Offender> {
        let args = encode("update_offender", update)?;
        self.call("update_offender", args)
    }

    pub fn delete_offender(&self, offender_id: i64) -> ClientResult<()> {
        self.call_unit("delete_offender", json!({ "offender_id": offender_id }))
    }

    pub fn get_offender_photo(&self, offender_id: i64) -> ClientResult<Vec<u8>> {
        self.call("get_offender_photo", json!({ "offender_id": offender_id }))
    }

    pub fn list_offender_history(&self, offender_id: i64) -> ClientResult<Vec<OffenderHistory>> {
        self.call(
            "list_offender_history",
            json!({ "offender_id": offender_id }),
        )
    }

    pub fn add_offender_history(&self, entry: &NewOffenderHistory) -> ClientResult<OffenderHistory> {
        let args = encode("add_offender_history", entry)?;
        self.call("add_offender_history", args)
    }

    pub fn update_offender_history(
        &self,
        update: &OffenderHistoryUpdate,
    ) -> ClientResult<OffenderHistory> {
        let args = encode("update_offender_history", update)?;
        self.call("update_offender_history", args)
    }

    pub fn delete_offender_history(&self, id: i64) -> ClientResult<()> {
        self.call_unit("delete_offender_history", json!({ "id": id }))
    }
}
