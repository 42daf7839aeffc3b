use serde_json::json;

use super::{Client, ClientResult, encode};
use crate::bridge::Bridge;
use crate::db::{CaseFile, CaseFileUpdate, FileDateField, NewCaseFile, NoteHistory, RequiredOnHistory};

impl<B: Bridge> Client<B> {
    pub fn get_all_files(&self) -> ClientResult<Vec<CaseFile>> {
        self.call("get_all_files", json!({}))
    }

    /// 返回新案卷的 file_id
    pub fn add_new_file(&self, file: &NewCaseFile) -> ClientResult<i64> {
        let args = encode("add_new_file", file)?;
        self.call_created("add_new_file", args, "file_id")
    }

    pub fn get_file_by_id(&self, file_id: i64) -> ClientResult<Option<CaseFile>> {
        self.call("get_file_by_id", json!({ "file_id": file_id }))
    }

    pub fn update_file(&self, update: &CaseFileUpdate) -> ClientResult<()> {
        let args = encode("update_file", update)?;
        self.call_unit("update_file", args)
    }

    pub fn update_file_date(
        &self,
        file_id: i64,
        field: FileDateField,
        new_date: &str,
    ) -> ClientResult<()> {
        self.call_unit(
            "update_file_date",
            json!({ "file_id": file_id, "date_type": field.column(), "new_date": new_date }),
        )
    }

    pub fn update_file_notes(
        &self,
        file_id: i64,
        new_notes: &str,
        created_by: Option<i64>,
    ) -> ClientResult<()> {
        self.call_unit(
            "update_file_notes",
            json!({ "file_id": file_id, "new_notes": new_notes, "created_by": created_by }),
        )
    }

    pub fn mark_file_returned(
        &self,
        file_id: i64,
        return_date: &str,
        return_signature: &str,
    ) -> ClientResult<()> {
        self.call_unit(
            "mark_file_returned",
            json!({
                "file_id": file_id,
                "return_date": return_date,
                "return_signature": return_signature
            }),
        )
    }

    pub fn delete_file(&self, file_id: i64) -> ClientResult<()> {
        self.call_unit("delete_file", json!({ "file_id": file_id }))
    }

    pub fn restore_file(&self, file_id: i64) -> ClientResult<()> {
        self.call_unit("restore_file", json!({ "file_id": file_id }))
    }

    pub fn search_files_by_case_number(&self, case_number: &str) -> ClientResult<Vec<CaseFile>> {
        self.call(
            "search_files_by_case_number",
            json!({ "case_number": case_number }),
        )
    }

    pub fn filter_files_by_user(&self, user_id: i64) -> ClientResult<Vec<CaseFile>> {
        self.call("filter_files_by_user", json!({ "user_id": user_id }))
    }

    pub fn get_files_by_purpose(&self, purpose: &str) -> ClientResult<Vec<CaseFile>> {
        self.call("get_files_by_purpose", json!({ "purpose": purpose }))
    }

    pub fn get_required_on_history(&self, file_id: i64) -> ClientResult<Vec<RequiredOnHistory>> {
        self.call("get_required_on_history", json!({ "file_id": file_id }))
    }

    pub fn get_notes_history(&self, file_id: i64) -> ClientResult<Vec<NoteHistory>> {
        self.call("get_notes_history", json!({ "file_id": file_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::ScriptedBridge;

    #[test]
    fn test_named_parameters() {
        let client = Client::new(ScriptedBridge::returning(json!("ok")));
        client
            .update_file_date(5, FileDateField::DateRecieved, "2026-10-01")
            .unwrap();
        client.mark_file_returned(5, "2026-10-18", "P. Ouma").unwrap();

        let calls = client.bridge().calls.lock();
        assert_eq!(calls[0].0, "update_file_date");
        assert_eq!(
            calls[0].1,
            json!({ "file_id": 5, "date_type": "date_recieved", "new_date": "2026-10-01" })
        );
        assert_eq!(calls[1].1["return_signature"], "P. Ouma");
    }

    #[test]
    fn test_struct_arguments_are_flat() {
        let client = Client::new(ScriptedBridge::returning(
            json!({ "message": "File uploaded successfully", "status": "success", "file_id": 3 }),
        ));
        let id = client
            .add_new_file(&NewCaseFile {
                case_number: "CV/1".into(),
                case_type: "Civil".into(),
                purpose: "Hearing".into(),
                uploaded_by: 2,
                current_location: "Registry".into(),
                notes: None,
                required_on: Some("2026-10-30".into()),
            })
            .unwrap();
        assert_eq!(id, 3);

        let calls = client.bridge().calls.lock();
        assert_eq!(calls[0].1["case_number"], "CV/1");
        assert_eq!(calls[0].1["required_on"], "2026-10-30");
    }
}
