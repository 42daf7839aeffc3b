use serde_json::{Value, json};

use super::{Client, ClientResult, encode};
use crate::bridge::Bridge;
use crate::db::{Contact, NewsItem, Report, Summary, Theme};

impl<B: Bridge> Client<B> {
    // ========================================================================
    // 通讯录
    // ========================================================================

    pub fn get_all_contacts(&self) -> ClientResult<Vec<Contact>> {
        self.call("get_all_contacts", json!({}))
    }

    pub fn create_contact(&self, contact: &Contact) -> ClientResult<i64> {
        let args = encode("create_contact", contact)?;
        self.call_created("create_contact", args, "contact_id")
    }

    pub fn update_contact(&self, contact: &Contact) -> ClientResult<()> {
        let args = encode("update_contact", contact)?;
        self.call_unit("update_contact", args)
    }

    pub fn delete_contact(&self, contact_id: i64) -> ClientResult<()> {
        self.call_unit("delete_contact", json!({ "contact_id": contact_id }))
    }

    // ========================================================================
    // 公告
    // ========================================================================

    pub fn get_all_news(&self) -> ClientResult<Vec<NewsItem>> {
        self.call("get_all_news", json!({}))
    }

    pub fn create_news(&self, title: &str, content: &str) -> ClientResult<i64> {
        self.call_created(
            "create_news",
            json!({ "title": title, "content": content }),
            "news_id",
        )
    }

    pub fn update_news(&self, news_id: i64, title: &str, content: &str) -> ClientResult<()> {
        self.call_unit(
            "update_news",
            json!({ "news_id": news_id, "title": title, "content": content }),
        )
    }

    pub fn delete_news(&self, news_id: i64) -> ClientResult<()> {
        self.call_unit("delete_news", json!({ "news_id": news_id }))
    }

    // ========================================================================
    // 摘要与报表
    // ========================================================================

    pub fn get_all_summaries(&self) -> ClientResult<Vec<Summary>> {
        self.call("get_all_summaries", json!({}))
    }

    pub fn get_summaries_by_category(&self, category: &str) -> ClientResult<Vec<Summary>> {
        self.call(
            "get_summaries_by_category",
            json!({ "category": category }),
        )
    }

    pub fn create_summary(&self, summary: &Summary) -> ClientResult<i64> {
        let args = encode("create_summary", summary)?;
        self.call_created("create_summary", args, "summary_id")
    }

    pub fn delete_summary(&self, summary_id: i64) -> ClientResult<()> {
        self.call_unit("delete_summary", json!({ "summary_id": summary_id }))
    }

    pub fn get_all_reports(&self) -> ClientResult<Vec<Report>> {
        self.call("get_all_reports", json!({}))
    }

    pub fn get_report(&self, report_id: i64) -> ClientResult<Option<Report>> {
        self.call("get_report", json!({ "report_id": report_id }))
    }

    pub fn create_report(&self, report_type: &str, data: &Value) -> ClientResult<i64> {
        self.call_created(
            "create_report",
            json!({ "report_type": report_type, "data": data }),
            "report_id",
        )
    }

    pub fn delete_report(&self, report_id: i64) -> ClientResult<()> {
        self.call_unit("delete_report", json!({ "report_id": report_id }))
    }

    // ========================================================================
    // 主题
    // ========================================================================

    pub fn get_all_themes(&self) -> ClientResult<Vec<Theme>> {
        self.call("get_all_themes", json!({}))
    }

    pub fn get_theme(&self, theme_id: i64) -> ClientResult<Option<Theme>> {
        self.call("get_theme", json!({ "theme_id": theme_id }))
    }

    pub fn create_theme(&self, theme: &Theme) -> ClientResult<i64> {
        let args = encode("create_theme", theme)?;
        self.call_created("create_theme", args, "theme_id")
    }

    pub fn update_theme(&self, theme: &Theme) -> ClientResult<()> {
        let args = encode("update_theme", theme)?;
        self.call_unit("update_theme", args)
    }

    pub fn delete_theme(&self, theme_id: i64) -> ClientResult<()> {
        self.call_unit("delete_theme", json!({ "theme_id": theme_id }))
    }
}
